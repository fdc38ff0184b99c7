//! In-memory ban record.

use std::time::Duration;

use crate::config::BanConfig;

/// Strike history for one member. Process memory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRecord {
    /// Platform user id.
    pub user_id: String,
    /// Penalized cancellations since the last daily reset.
    pub strikes: u32,
}

impl BanRecord {
    /// A record with no strikes.
    #[must_use]
    pub fn new(user_id: String) -> Self {
        Self {
            user_id,
            strikes: 0,
        }
    }

    /// Suspension length for the current strike count.
    #[must_use]
    pub fn current_suspension(&self, schedule: &BanConfig) -> Duration {
        suspension_for(self.strikes, schedule)
    }
}

/// Map a strike count to its suspension length.
///
/// Strikes inside the table use the table; every later strike doubles the
/// escalation base: `base × 2^(strikes − table_len − 1)`. Zero strikes
/// means no suspension.
#[must_use]
pub fn suspension_for(strikes: u32, schedule: &BanConfig) -> Duration {
    if strikes == 0 {
        return Duration::ZERO;
    }
    let index = (strikes - 1) as usize;
    let minutes = match schedule.table_minutes.get(index) {
        Some(minutes) => *minutes,
        None => {
            let past_table = index - schedule.table_minutes.len();
            let factor = 1u64
                .checked_shl(u32::try_from(past_table).unwrap_or(u32::MAX))
                .unwrap_or(u64::MAX);
            schedule.escalation_base_minutes.saturating_mul(factor)
        }
    };
    Duration::from_secs(minutes.saturating_mul(60))
}
