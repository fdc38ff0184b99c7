//! Match session model and lifecycle helpers.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::mode::Mode;
use crate::{AppError, Result};

/// Lifecycle state of a match session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Channels provisioned; ready-check may be running.
    Forming,
    /// Captain proposal election running.
    CaptainSelect,
    /// Host volunteering election running.
    HostSelect,
    /// Host elected; waiting for the host's game details form.
    TeamSplit,
    /// Teams split; waiting for the finished-match result.
    Active,
    /// Result received; "report a problem" window open.
    ReportWindow,
    /// Cleanup finished.
    Closed,
    /// Cancelled by an explicit refusal or a failed ready-check.
    Cancelled,
}

impl SessionState {
    /// States from which an explicit refusal cancels the session.
    #[must_use]
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Forming | Self::CaptainSelect | Self::HostSelect)
    }
}

/// A session participant as seen when the lobby reached quorum.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    /// Platform user id.
    pub id: String,
    /// Display name (nickname or username).
    pub display_name: String,
}

impl Member {
    /// Convenience constructor.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Channels provisioned for a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionChannels {
    /// Private text channel.
    pub text: String,
    /// Private lobby voice channel.
    pub voice: String,
    /// Team voice channels, populated at split.
    pub team_voice: Vec<String>,
}

/// One coordinated match instance, from lobby quorum through cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSession {
    /// Identifier assigned by the backend on creation.
    pub id: String,
    /// Mode the session was formed for.
    pub mode: Mode,
    /// Members captured at quorum; immutable after creation.
    members: Vec<Member>,
    /// Members who proposed themselves as captain, in click order.
    pub candidates: Vec<String>,
    /// Elected captains: empty, or exactly two.
    captains: Vec<String>,
    /// Elected host.
    host: Option<String>,
    /// Team partitions, populated at split.
    teams: Option<[Vec<String>; 2]>,
    /// Provisioned channels.
    pub channels: SessionChannels,
    /// Current lifecycle state.
    pub state: SessionState,
    /// Whether a problem report was filed during the report window.
    pub reported: bool,
    /// Game instance name submitted by the host.
    pub game_name: Option<String>,
    /// Game access code submitted by the host.
    pub game_code: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl MatchSession {
    /// Construct a session in the `Forming` state.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidTransition` when the member count does not
    /// equal the mode's quorum or contains duplicates.
    pub fn new(
        id: String,
        mode: Mode,
        members: Vec<Member>,
        channels: SessionChannels,
    ) -> Result<Self> {
        let distinct: HashSet<&str> = members.iter().map(|m| m.id.as_str()).collect();
        if members.len() != mode.quorum() || distinct.len() != members.len() {
            return Err(AppError::InvalidTransition(format!(
                "mode {} requires {} distinct members, got {}",
                mode.label,
                mode.quorum(),
                distinct.len()
            )));
        }

        Ok(Self {
            id,
            mode,
            members,
            candidates: Vec::new(),
            captains: Vec::new(),
            host: None,
            teams: None,
            channels,
            state: SessionState::Forming,
            reported: false,
            game_name: None,
            game_code: None,
            created_at: Utc::now(),
        })
    }

    /// Members in their original lobby order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Member ids in their original lobby order.
    #[must_use]
    pub fn member_ids(&self) -> Vec<String> {
        self.members.iter().map(|m| m.id.clone()).collect()
    }

    /// Member ids as a set, for exact-equality correlation.
    #[must_use]
    pub fn member_set(&self) -> HashSet<&str> {
        self.members.iter().map(|m| m.id.as_str()).collect()
    }

    /// Whether `user_id` is one of the session members.
    #[must_use]
    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.id == user_id)
    }

    /// Display name of a member, if known.
    #[must_use]
    pub fn display_name(&self, user_id: &str) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.id == user_id)
            .map(|m| m.display_name.as_str())
    }

    /// Elected captains (empty until decided).
    #[must_use]
    pub fn captains(&self) -> &[String] {
        &self.captains
    }

    /// Elected host.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Team partitions, once split.
    #[must_use]
    pub fn teams(&self) -> Option<&[Vec<String>; 2]> {
        self.teams.as_ref()
    }

    /// Record the two elected captains.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidTransition` unless exactly two distinct
    /// members are given.
    pub fn set_captains(&mut self, captains: Vec<String>) -> Result<()> {
        let valid = captains.len() == 2
            && captains[0] != captains[1]
            && captains.iter().all(|c| self.is_member(c));
        if !valid {
            return Err(AppError::InvalidTransition(format!(
                "session {} needs exactly two distinct member captains",
                self.id
            )));
        }
        self.captains = captains;
        Ok(())
    }

    /// Record the elected host.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidTransition` if the host is not a member.
    pub fn set_host(&mut self, host: String) -> Result<()> {
        if !self.is_member(&host) {
            return Err(AppError::InvalidTransition(format!(
                "host {host} is not a member of session {}",
                self.id
            )));
        }
        self.host = Some(host);
        Ok(())
    }

    /// Record the team partition.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidTransition` when the teams overlap, are
    /// uneven, or do not cover exactly the member set.
    pub fn set_teams(&mut self, teams: [Vec<String>; 2]) -> Result<()> {
        let mut seen = HashSet::new();
        let covers = teams
            .iter()
            .flatten()
            .all(|id| self.is_member(id) && seen.insert(id.as_str()));
        if !covers || seen.len() != self.members.len() || teams[0].len() != teams[1].len() {
            return Err(AppError::InvalidTransition(format!(
                "teams for session {} must evenly partition the members",
                self.id
            )));
        }
        self.teams = Some(teams);
        Ok(())
    }

    /// Determine whether a lifecycle transition is permitted.
    #[must_use]
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::{
            Active, Cancelled, CaptainSelect, Closed, Forming, HostSelect, ReportWindow, TeamSplit,
        };
        matches!(
            (self.state, next),
            (Forming, CaptainSelect | HostSelect | Cancelled)
                | (CaptainSelect, HostSelect | Cancelled)
                | (HostSelect, TeamSplit | Cancelled)
                | (TeamSplit | Active, ReportWindow)
                | (TeamSplit, Active)
                | (ReportWindow, Closed)
        )
    }

    /// Move to `next`, rejecting transitions the state machine forbids.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidTransition` if the transition is not allowed.
    pub fn transition(&mut self, next: SessionState) -> Result<()> {
        if !self.can_transition_to(next) {
            return Err(AppError::InvalidTransition(format!(
                "session {} cannot move from {:?} to {next:?}",
                self.id, self.state
            )));
        }
        self.state = next;
        Ok(())
    }
}
