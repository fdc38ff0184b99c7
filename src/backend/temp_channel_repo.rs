//! Temporary channel expiry records in the `temp_channels` table.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use super::session_repo::id_string;
use super::{Backend, Filter};
use crate::Result;

const TABLE: &str = "temp_channels";

/// An expiry record for one provisioned channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempChannelRecord {
    /// Record id.
    pub id: String,
    /// Owning session.
    pub match_id: String,
    /// Channel to delete once expired.
    pub channel_id: String,
}

/// Repository wrapper for temporary channel records.
#[derive(Clone)]
pub struct TempChannelRepo {
    backend: Arc<dyn Backend>,
}

impl TempChannelRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Register a channel for deletion at `expires_at`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Persistence` if the insert fails.
    pub async fn register(
        &self,
        match_id: &str,
        channel_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        self.backend
            .insert(
                TABLE,
                json!({
                    "match_id": match_id,
                    "channel_id": channel_id,
                    "expires_at": expires_at.to_rfc3339(),
                }),
            )
            .await
            .map(|_| ())
    }

    /// Records whose expiry lies before `now`. Malformed rows are skipped.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Persistence` if the query fails.
    pub async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<TempChannelRecord>> {
        let rows = self
            .backend
            .select(TABLE, Filter::all().and_lt("expires_at", now.to_rfc3339()))
            .await?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                Some(TempChannelRecord {
                    id: row.get("id").and_then(id_string)?,
                    match_id: row.get("match_id").and_then(id_string)?,
                    channel_id: row.get("channel_id").and_then(id_string)?,
                })
            })
            .collect())
    }

    /// Remove one record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Persistence` if the delete fails.
    pub async fn remove(&self, id: &str) -> Result<()> {
        self.backend.delete(TABLE, Filter::eq("id", id)).await
    }

    /// Remove the record for one channel of a session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Persistence` if the delete fails.
    pub async fn remove_channel(&self, match_id: &str, channel_id: &str) -> Result<()> {
        self.backend
            .delete(
                TABLE,
                Filter::eq("match_id", match_id).and_eq("channel_id", channel_id),
            )
            .await
    }
}
