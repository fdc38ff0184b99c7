//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Acting user is not allowed to perform the action (e.g. non-host form submit).
    PermissionDenied(String),
    /// Voter is outside the session's member list.
    NotParticipant(String),
    /// Action references a session that is no longer registered.
    SessionNotFound(String),
    /// Channel, role, move, or message operation failed on the chat platform.
    Provisioning(String),
    /// Backend read or write failed.
    Persistence(String),
    /// The de-duplication guard discarded a repeated result delivery.
    DuplicateResult(String),
    /// The election already produced its terminal outcome.
    ElectionClosed(String),
    /// Session state change not permitted from the current state.
    InvalidTransition(String),
    /// Interaction payload could not be decoded into a known action.
    InvalidAction(String),
    /// Result delivery carried a missing or wrong signature.
    InvalidSignature(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl AppError {
    /// Whether the error should be surfaced to the acting user as a rejected action.
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_)
                | Self::NotParticipant(_)
                | Self::SessionNotFound(_)
                | Self::ElectionClosed(_)
                | Self::InvalidAction(_)
        )
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::PermissionDenied(msg) => write!(f, "permission denied: {msg}"),
            Self::NotParticipant(msg) => write!(f, "not a participant: {msg}"),
            Self::SessionNotFound(msg) => write!(f, "session not found: {msg}"),
            Self::Provisioning(msg) => write!(f, "provisioning: {msg}"),
            Self::Persistence(msg) => write!(f, "persistence: {msg}"),
            Self::DuplicateResult(msg) => write!(f, "duplicate result: {msg}"),
            Self::ElectionClosed(msg) => write!(f, "election closed: {msg}"),
            Self::InvalidTransition(msg) => write!(f, "invalid transition: {msg}"),
            Self::InvalidAction(msg) => write!(f, "invalid action: {msg}"),
            Self::InvalidSignature(msg) => write!(f, "invalid signature: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence(format!("malformed json: {err}"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
