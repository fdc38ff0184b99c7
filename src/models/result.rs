//! Finished-match payload delivered by the game-side reporter.

use serde::{Deserialize, Serialize};

/// One player line of a finished-match payload.
///
/// Only `name` drives correlation; per-player statistics are carried
/// through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultPlayer {
    /// In-game player name.
    pub name: String,
    /// Side index (0 blue, 1 orange), when reported.
    #[serde(default)]
    pub team: Option<u8>,
    /// Remaining statistics.
    #[serde(flatten)]
    pub stats: serde_json::Map<String, serde_json::Value>,
}

/// Finished-match payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Players that took part.
    pub players: Vec<ResultPlayer>,
    /// Final blue score.
    pub score_blue: u32,
    /// Final orange score.
    pub score_orange: u32,
    /// Blue team display name.
    #[serde(default)]
    pub team_blue: Option<String>,
    /// Orange team display name.
    #[serde(default)]
    pub team_orange: Option<String>,
    /// Map played.
    #[serde(default)]
    pub map: Option<String>,
}

impl MatchResult {
    /// Player names in delivery order.
    #[must_use]
    pub fn player_names(&self) -> Vec<&str> {
        self.players.iter().map(|p| p.name.as_str()).collect()
    }
}
