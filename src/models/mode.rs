//! Match mode definitions.

use serde::Deserialize;

/// A configured match format bound to one lobby voice channel.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Mode {
    /// Exact name of the lobby voice channel that feeds this mode.
    pub lobby_channel: String,
    /// Short label shown to players and persisted with the session (e.g. `2v2`).
    pub label: String,
    /// Members per side.
    pub team_size: usize,
    /// Whether an explicit refusal earns the refusing member a strike.
    #[serde(default)]
    pub penalties: bool,
    /// Whether a ready-check precedes captain selection.
    #[serde(default)]
    pub ready_check: bool,
}

impl Mode {
    /// Exact member count required before a session is created.
    #[must_use]
    pub fn quorum(&self) -> usize {
        self.team_size * 2
    }

    /// Whether captain selection is skipped because every member captains alone.
    #[must_use]
    pub fn skips_captain_election(&self) -> bool {
        self.team_size == 1
    }
}
