//! Escalating suspensions for members who cancel sessions.
//!
//! Strike counts live in process memory. Applying a ban grants the penalty
//! role and schedules its removal; a once-per-minute sweep clears every
//! strike count at the configured daily instant.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};

use crate::config::BanConfig;
use crate::effect::Effect;
use crate::models::ban::BanRecord;
use crate::platform::messages;
use crate::state::AppState;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, BanRecord>,
    /// Pending penalty role removal per user.
    removals: HashMap<String, CancellationToken>,
    last_reset: Option<NaiveDate>,
}

/// Strike counts per user.
#[derive(Debug, Default)]
pub struct BanTracker {
    inner: Mutex<Inner>,
}

impl BanTracker {
    /// Add a strike and return the updated record.
    pub async fn record_strike(&self, user_id: &str) -> BanRecord {
        let mut guard = self.inner.lock().await;
        let record = guard
            .records
            .entry(user_id.to_owned())
            .or_insert_with(|| BanRecord::new(user_id.to_owned()));
        record.strikes = record.strikes.saturating_add(1);
        record.clone()
    }

    /// Current strike count.
    pub async fn strikes(&self, user_id: &str) -> u32 {
        self.inner
            .lock()
            .await
            .records
            .get(user_id)
            .map_or(0, |r| r.strikes)
    }

    /// Make `token` the pending role removal for `user_id`, cancelling the
    /// one it replaces. The role then stays until the newest suspension ends.
    pub async fn supersede_removal(&self, user_id: &str, token: CancellationToken) {
        let previous = self
            .inner
            .lock()
            .await
            .removals
            .insert(user_id.to_owned(), token);
        if let Some(previous) = previous {
            previous.cancel();
        }
    }

    /// Clear every strike count if `now` is the configured reset minute and
    /// no reset has happened yet that day. Returns whether it reset.
    pub async fn reset_if_due(&self, now: DateTime<Utc>, schedule: &BanConfig) -> bool {
        if !is_reset_minute(now, schedule) {
            return false;
        }
        let today = now.date_naive();
        let mut guard = self.inner.lock().await;
        if guard.last_reset == Some(today) {
            return false;
        }
        guard.last_reset = Some(today);
        for record in guard.records.values_mut() {
            record.strikes = 0;
        }
        true
    }
}

/// Whether `now` falls in the configured daily reset minute.
#[must_use]
pub fn is_reset_minute(now: DateTime<Utc>, schedule: &BanConfig) -> bool {
    now.hour() == schedule.reset_hour_utc && now.minute() == schedule.reset_minute_utc
}

/// Penalize `user_id`: add a strike, grant the penalty role, schedule its
/// removal, and notify the user and the moderation log. A removal still
/// pending from an earlier ban is cancelled.
///
/// Platform failures are logged and never propagated.
pub async fn apply_ban(state: &Arc<AppState>, user_id: &str) -> BanRecord {
    let record = state.bans.record_strike(user_id).await;
    let duration = record.current_suspension(&state.config.bans);
    let minutes = duration.as_secs() / 60;
    let role = state.config.platform.penalty_role_id.clone();

    info!(user_id, strikes = record.strikes, minutes, "applying ban");

    Effect::from_result("add_penalty_role", state.platform.add_role(user_id, &role).await);
    let removal = state.shutdown.child_token();
    state.bans.supersede_removal(user_id, removal.clone()).await;
    spawn_role_removal(Arc::clone(state), user_id.to_owned(), role, duration, removal);

    let notice = messages::ban_direct_notice(minutes);
    Effect::from_result(
        "notify_banned_user",
        state.platform.send_direct(user_id, &notice).await,
    );
    if let Some(ref log_channel) = state.config.platform.mod_log_channel_id {
        Effect::from_result(
            "log_ban",
            state
                .platform
                .send_message(
                    log_channel,
                    messages::ban_log_line(user_id, minutes, record.strikes),
                )
                .await,
        );
    }
    record
}

fn spawn_role_removal(
    state: Arc<AppState>,
    user_id: String,
    role_id: String,
    after: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let span = info_span!("ban_expiry", user_id = %user_id);
    tokio::spawn(
        async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(after) => {
                    let result = state.platform.remove_role(&user_id, &role_id).await;
                    if Effect::from_result("remove_penalty_role", result).is_applied() {
                        info!("ban expired");
                    }
                }
            }
        }
        .instrument(span),
    )
}

/// Spawn the daily strike reset sweep.
#[must_use]
pub fn spawn_reset_sweep(state: Arc<AppState>, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("ban reset sweep shutting down");
                    break;
                }
                _ = interval.tick() => {
                    if state.bans.reset_if_due(Utc::now(), &state.config.bans).await {
                        info!("daily strike counts reset");
                    }
                }
            }
        }
    })
}
