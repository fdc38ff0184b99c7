//! Interaction action identifiers.
//!
//! Buttons carry a custom id of the form `{kind}:{session_id}`. The string
//! is decoded exactly once, at the platform boundary, into an [`Action`].

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// What a button press asks for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Ready-check confirmation.
    Ready,
    /// Ready-check refusal.
    Decline,
    /// Captain self-proposal.
    Propose,
    /// Host volunteering.
    Volunteer,
    /// Leave the session during an election (explicit refusal).
    Withdraw,
    /// "Report a problem" during the report window.
    Report,
}

impl ActionKind {
    /// Wire name used in custom ids.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Decline => "decline",
            Self::Propose => "propose",
            Self::Volunteer => "volunteer",
            Self::Withdraw => "withdraw",
            Self::Report => "report",
        }
    }
}

impl FromStr for ActionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ready" => Ok(Self::Ready),
            "decline" => Ok(Self::Decline),
            "propose" => Ok(Self::Propose),
            "volunteer" => Ok(Self::Volunteer),
            "withdraw" => Ok(Self::Withdraw),
            "report" => Ok(Self::Report),
            other => Err(AppError::InvalidAction(format!("unknown action kind: {other}"))),
        }
    }
}

/// A decoded `{action, session_id}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Action {
    /// Requested action.
    pub kind: ActionKind,
    /// Target session.
    pub session_id: String,
}

impl Action {
    /// Construct an action for a session.
    pub fn new(kind: ActionKind, session_id: impl Into<String>) -> Self {
        Self {
            kind,
            session_id: session_id.into(),
        }
    }

    /// Encode as a button custom id.
    #[must_use]
    pub fn custom_id(&self) -> String {
        self.to_string()
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.session_id)
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, session_id) = s
            .split_once(':')
            .ok_or_else(|| AppError::InvalidAction(format!("malformed custom id: {s}")))?;
        if session_id.is_empty() {
            return Err(AppError::InvalidAction(format!("custom id has no session: {s}")));
        }
        Ok(Self {
            kind: kind.parse()?,
            session_id: session_id.to_owned(),
        })
    }
}
