//! Timed peer elections.
//!
//! An [`Election`] collects ballots from a fixed eligibility set until its
//! window closes or an early-exit condition is met, and then yields exactly
//! one [`Outcome`]. The struct itself is synchronous and lives inside the
//! registry entry, so every ballot is evaluated under the registry lock.
//! The window timer is a separate task that waits on the election's
//! [`CancellationToken`] and calls back into the lifecycle when it elapses.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, Instrument};

use crate::models::action::ActionKind;
use crate::models::session::SessionState;
use crate::state::AppState;
use crate::{AppError, Result};

/// What the election decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElectionKind {
    /// Every member confirms before captain selection.
    ReadyCheck,
    /// Members propose themselves as captain.
    Captain,
    /// Members volunteer to host.
    Host,
}

impl ElectionKind {
    /// Lifecycle state the session must be in while this election runs.
    #[must_use]
    pub fn stage(self) -> SessionState {
        match self {
            Self::ReadyCheck => SessionState::Forming,
            Self::Captain => SessionState::CaptainSelect,
            Self::Host => SessionState::HostSelect,
        }
    }

    /// When the election may finish before its window elapses.
    #[must_use]
    pub fn early_exit(self) -> EarlyExit {
        match self {
            Self::ReadyCheck => EarlyExit::AllAffirmative,
            Self::Captain => EarlyExit::Never,
            Self::Host => EarlyExit::FirstAffirmative,
        }
    }

    /// Map a button action onto this election's ballot, if it is one.
    #[must_use]
    pub fn ballot_for(self, action: ActionKind) -> Option<Ballot> {
        match (self, action) {
            (Self::ReadyCheck, ActionKind::Ready)
            | (Self::Captain, ActionKind::Propose)
            | (Self::Host, ActionKind::Volunteer) => Some(Ballot::Affirm),
            (Self::ReadyCheck, ActionKind::Decline)
            | (Self::Captain | Self::Host, ActionKind::Withdraw) => Some(Ballot::Refuse),
            _ => None,
        }
    }
}

/// Early-exit policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarlyExit {
    /// Run the full window.
    Never,
    /// Close on the first affirmative ballot.
    FirstAffirmative,
    /// Close once every eligible voter has affirmed.
    AllAffirmative,
}

/// A single vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ballot {
    /// Propose, volunteer, or confirm.
    Affirm,
    /// Explicit refusal; ends the election immediately.
    Refuse,
}

/// Terminal result of an election.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The early-exit condition was met; affirmative voters in ballot order.
    Completed(Vec<String>),
    /// The window elapsed; affirmative voters in ballot order.
    Expired(Vec<String>),
    /// A voter refused.
    Refused(String),
}

/// Result of casting a ballot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastResult {
    /// Ballot stored; the election is still open.
    Recorded,
    /// The voter had already affirmed; nothing changed.
    Duplicate,
    /// This ballot closed the election.
    Decided(Outcome),
}

/// Timed vote over a fixed set of eligible voters.
#[derive(Debug)]
pub struct Election {
    kind: ElectionKind,
    eligible: HashSet<String>,
    affirmed: Vec<String>,
    outcome: Option<Outcome>,
    cancel: CancellationToken,
}

impl Election {
    /// Open an election. `cancel` stops the window timer once the election
    /// is decided or aborted.
    pub fn new(
        kind: ElectionKind,
        eligible: impl IntoIterator<Item = String>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            kind,
            eligible: eligible.into_iter().collect(),
            affirmed: Vec::new(),
            outcome: None,
            cancel,
        }
    }

    /// What this election decides.
    #[must_use]
    pub fn kind(&self) -> ElectionKind {
        self.kind
    }

    /// Affirmative voters so far, in ballot order.
    #[must_use]
    pub fn affirmed(&self) -> &[String] {
        &self.affirmed
    }

    /// Terminal outcome, once decided.
    #[must_use]
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Cast a ballot.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotParticipant` for ineligible voters and
    /// `AppError::ElectionClosed` once an outcome exists. Neither mutates
    /// the election.
    pub fn cast(&mut self, voter: &str, ballot: Ballot) -> Result<CastResult> {
        if !self.eligible.contains(voter) {
            return Err(AppError::NotParticipant(format!(
                "{voter} is not eligible to vote"
            )));
        }
        if self.outcome.is_some() {
            return Err(AppError::ElectionClosed("voting has ended".into()));
        }

        match ballot {
            Ballot::Refuse => Ok(CastResult::Decided(
                self.decide(Outcome::Refused(voter.to_owned())),
            )),
            Ballot::Affirm => {
                if self.affirmed.iter().any(|v| v == voter) {
                    return Ok(CastResult::Duplicate);
                }
                self.affirmed.push(voter.to_owned());
                let done = match self.kind.early_exit() {
                    EarlyExit::Never => false,
                    EarlyExit::FirstAffirmative => true,
                    EarlyExit::AllAffirmative => self.affirmed.len() == self.eligible.len(),
                };
                if done {
                    let voters = self.affirmed.clone();
                    Ok(CastResult::Decided(self.decide(Outcome::Completed(voters))))
                } else {
                    Ok(CastResult::Recorded)
                }
            }
        }
    }

    /// Close the election because its window elapsed.
    ///
    /// Returns `None` when an outcome was already reached.
    pub fn expire(&mut self) -> Option<Outcome> {
        if self.outcome.is_some() {
            return None;
        }
        let voters = self.affirmed.clone();
        Some(self.decide(Outcome::Expired(voters)))
    }

    /// Stop the window timer without producing an outcome.
    pub fn abort(&self) {
        self.cancel.cancel();
    }

    fn decide(&mut self, outcome: Outcome) -> Outcome {
        self.cancel.cancel();
        self.outcome = Some(outcome.clone());
        outcome
    }
}

/// Spawn the window timer for an election on `session_id`.
///
/// When the window elapses without the token being cancelled, the
/// lifecycle is asked to close the election.
pub fn spawn_window(
    state: Arc<AppState>,
    session_id: String,
    kind: ElectionKind,
    window: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let span = tracing::info_span!("election_window", session_id = %session_id, ?kind);
    tokio::spawn(
        async move {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("election window cancelled");
                }
                () = tokio::time::sleep(window) => {
                    super::lifecycle::close_election(&state, &session_id, kind).await;
                }
            }
        }
        .instrument(span),
    )
}
