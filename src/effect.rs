//! Best-effort side effects.
//!
//! Deletes, moves, notifications and incidental backend writes must never
//! block a transition. Their failures become an explicit
//! [`Effect::Degraded`] that is logged and dropped.

use tracing::warn;

use crate::{AppError, Result};

/// Outcome of a fire-once side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The side effect succeeded.
    Applied,
    /// The side effect failed; the caller continues regardless.
    Degraded(AppError),
}

impl Effect {
    /// Convert a side-effect result, logging a failure under `operation`.
    pub fn from_result<T>(operation: &'static str, result: Result<T>) -> Self {
        match result {
            Ok(_) => Self::Applied,
            Err(err) => {
                warn!(operation, %err, "best-effort side effect degraded");
                Self::Degraded(err)
            }
        }
    }

    /// Whether the side effect succeeded.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}
