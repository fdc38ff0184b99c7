//! In-game name to platform id lookups against the `users` table.

use std::sync::Arc;

use tracing::{debug, warn};

use super::session_repo::id_string;
use super::{Backend, Filter};

const TABLE: &str = "users";

/// Repository wrapper for registered players.
#[derive(Clone)]
pub struct PlayerRepo {
    backend: Arc<dyn Backend>,
}

impl PlayerRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Resolve in-game names to platform user ids.
    ///
    /// Best-effort: names that are unknown, or whose lookup fails, are
    /// dropped from the output.
    pub async fn resolve_names(&self, names: &[&str]) -> Vec<String> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            match self.backend.select(TABLE, Filter::eq("rl_name", name)).await {
                Ok(rows) => {
                    match rows.first().and_then(|row| row.get("discord_id")).and_then(id_string) {
                        Some(id) => ids.push(id),
                        None => debug!(name, "player name not registered"),
                    }
                }
                Err(err) => warn!(name, %err, "player lookup failed"),
            }
        }
        ids
    }
}
