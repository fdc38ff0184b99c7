//! Temporary channel expiry sweep.
//!
//! Runs every five minutes, deleting channels whose `temp_channels`
//! records have expired, then the records themselves. Sessions still
//! waiting for a result when their channels expire are dropped from the
//! registry.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::backend::temp_channel_repo::TempChannelRepo;
use crate::effect::Effect;
use crate::state::AppState;
use crate::Result;

const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Spawn the expiry sweep background task.
#[must_use]
pub fn spawn_expiry_sweep(state: Arc<AppState>, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("expiry sweep shutting down");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(err) = sweep(&state, Utc::now()).await {
                        error!(%err, "temp channel sweep failed");
                    }
                }
            }
        }
    })
}

/// Delete every channel whose record expired before `now`.
///
/// Returns the number of records processed.
///
/// # Errors
///
/// Returns `AppError::Persistence` if the expired records cannot be listed.
pub async fn sweep(state: &AppState, now: DateTime<Utc>) -> Result<usize> {
    let repo = TempChannelRepo::new(Arc::clone(&state.backend));
    let expired = repo.list_expired(now).await?;

    let mut evicted = HashSet::new();
    for record in &expired {
        // A channel already deleted by the lifecycle fails here; the record
        // still gets removed.
        Effect::from_result(
            "delete_expired_channel",
            state.platform.delete_channel(&record.channel_id).await,
        );
        Effect::from_result("remove_temp_record", repo.remove(&record.id).await);

        // A session whose channels expired before any result matched will
        // never close on its own.
        if !evicted.contains(&record.match_id)
            && state.registry.evict_unfinished(&record.match_id).await.is_some()
        {
            warn!(session_id = %record.match_id, "session expired without a result");
            evicted.insert(record.match_id.clone());
        }
    }

    if !expired.is_empty() {
        info!(count = expired.len(), "expired temp channels swept");
    }
    Ok(expired.len())
}
