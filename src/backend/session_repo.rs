//! Session records in the `match_sessions` table.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use super::{Backend, Filter};
use crate::{AppError, Result};

const TABLE: &str = "match_sessions";

/// Persisted status of a session record.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Elections in progress.
    Waiting,
    /// Host submitted the game details.
    Ready,
    /// Result received.
    Finished,
    /// Cancelled before the game started.
    Cancelled,
}

/// Row written when a session is formed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewSessionRecord {
    /// Mode label.
    #[serde(rename = "type")]
    pub mode: String,
    /// Member ids in lobby order.
    pub players: Vec<String>,
    /// Lobby voice channel.
    pub voice_channel_id: String,
    /// Private text channel.
    pub text_channel_id: String,
    /// Initial status.
    pub status: RecordStatus,
}

/// Repository wrapper for session records.
#[derive(Clone)]
pub struct SessionRepo {
    backend: Arc<dyn Backend>,
}

impl SessionRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Insert a session record and return the id the backend assigned.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Persistence` if the insert fails or no id comes back.
    pub async fn create(&self, record: &NewSessionRecord) -> Result<String> {
        let rows = self
            .backend
            .insert(TABLE, serde_json::to_value(record)?)
            .await?;
        rows.first()
            .and_then(|row| row.get("id"))
            .and_then(id_string)
            .ok_or_else(|| AppError::Persistence("session insert returned no id".into()))
    }

    /// Update the record status.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Persistence` if the update fails.
    pub async fn set_status(&self, id: &str, status: RecordStatus) -> Result<()> {
        self.backend
            .update(TABLE, Filter::eq("id", id), json!({ "status": status }))
            .await
            .map(|_| ())
    }

    /// Store the host's game details and mark the record ready.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Persistence` if the update fails.
    pub async fn set_game_details(&self, id: &str, name: &str, code: &str) -> Result<()> {
        self.backend
            .update(
                TABLE,
                Filter::eq("id", id),
                json!({ "game_name": name, "game_code": code, "status": RecordStatus::Ready }),
            )
            .await
            .map(|_| ())
    }
}

/// Render a JSON id (string or number) as a string key.
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
