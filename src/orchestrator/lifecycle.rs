//! Session lifecycle state machine.
//!
//! Drives a session from lobby quorum through elections, team split, the
//! post-match report window and cleanup, or into cancellation.
//!
//! Every transition is claimed under the registry lock by checking the
//! current state first, so a transition attempted twice (two timers, a
//! timer racing a ballot, a duplicated gateway event) is a no-op. Platform
//! and backend I/O happens only after the lock is released; resources
//! created for a session that moved on in the meantime are deleted again.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, info_span, warn, Instrument};

use super::election::{self, CastResult, Election, ElectionKind, Outcome};
use super::registry::SessionEntry;
use super::{ban_tracker, teams};
use crate::backend::report_repo::ReportRepo;
use crate::backend::session_repo::{NewSessionRecord, RecordStatus, SessionRepo};
use crate::backend::temp_channel_repo::TempChannelRepo;
use crate::effect::Effect;
use crate::models::action::{Action, ActionKind};
use crate::models::mode::Mode;
use crate::models::session::{MatchSession, Member, SessionChannels, SessionState};
use crate::platform::{messages, ChannelKind, ChannelSpec, OutgoingMessage};
use crate::state::AppState;
use crate::{AppError, Result};

/// Non-bot occupants of a lobby voice channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbySnapshot {
    /// Lobby voice channel id.
    pub channel_id: String,
    /// Lobby voice channel name, matched against configured modes.
    pub channel_name: String,
    /// Current occupants, bots excluded.
    pub members: Vec<Member>,
}

// ── Forming ─────────────────────────────────────────────────

/// React to a lobby membership change.
///
/// Forms a session when the lobby belongs to a configured mode and holds
/// exactly the mode's quorum. Returns the new session id.
///
/// # Errors
///
/// Returns `AppError::Provisioning` or `AppError::Persistence` when the
/// session could not be created. Nothing is left registered in that case.
pub async fn on_lobby_update(
    state: &Arc<AppState>,
    lobby: LobbySnapshot,
) -> Result<Option<String>> {
    let Some(mode) = state.config.mode_for_lobby(&lobby.channel_name).cloned() else {
        return Ok(None);
    };
    if lobby.members.len() != mode.quorum() {
        return Ok(None);
    }

    let ids: Vec<String> = lobby.members.iter().map(|m| m.id.clone()).collect();
    if state.registry.any_engaged(&ids).await {
        debug!(lobby = %lobby.channel_id, "lobby members already in a session");
        return Ok(None);
    }
    if !state.registry.claim_lobby(&lobby.channel_id).await {
        debug!(lobby = %lobby.channel_id, "lobby already forming");
        return Ok(None);
    }

    let formed = form_session(state, mode, lobby.members).await;
    state.registry.release_lobby(&lobby.channel_id).await;
    formed.map(Some)
}

/// Provision, persist and register a session, then start its first stage.
///
/// # Errors
///
/// Returns the provisioning or persistence failure that aborted creation.
/// Channels created before the failure are deleted best-effort.
pub async fn form_session(
    state: &Arc<AppState>,
    mode: Mode,
    members: Vec<Member>,
) -> Result<String> {
    let number = state.registry.next_channel_number();
    let span = info_span!("form_session", mode = %mode.label, number);
    async move {
        let mut created = Vec::new();
        let session = match provision(state, mode, members, number, &mut created).await {
            Ok(session) => session,
            Err(err) => {
                warn!(%err, "session creation aborted");
                for channel_id in &created {
                    Effect::from_result(
                        "rollback_channel",
                        state.platform.delete_channel(channel_id).await,
                    );
                }
                return Err(err);
            }
        };

        let session_id = session.id.clone();
        let channels = session.channels.clone();
        let member_ids = session.member_ids();
        let ready_check = session.mode.ready_check;
        state.registry.insert(SessionEntry::new(session)).await;
        info!(session_id = %session_id, "session formed");

        let temp = TempChannelRepo::new(Arc::clone(&state.backend));
        let expires_at = temp_expiry(state);
        for channel_id in [&channels.text, &channels.voice] {
            Effect::from_result(
                "register_temp_channel",
                temp.register(&session_id, channel_id, expires_at).await,
            );
        }
        for member in &member_ids {
            Effect::from_result(
                "move_to_session_voice",
                state.platform.move_member(member, &channels.voice).await,
            );
        }

        if ready_check {
            open_election(state, &session_id, ElectionKind::ReadyCheck).await;
        } else {
            advance_from_forming(state, &session_id).await;
        }
        Ok(session_id)
    }
    .instrument(span)
    .await
}

async fn provision(
    state: &AppState,
    mode: Mode,
    members: Vec<Member>,
    number: u64,
    created: &mut Vec<String>,
) -> Result<MatchSession> {
    let member_ids: Vec<String> = members.iter().map(|m| m.id.clone()).collect();
    let text = state
        .platform
        .create_channel(private_channel(
            state,
            format!("{}-match-{number}", channel_slug(&mode.label)),
            ChannelKind::Text,
            &member_ids,
        ))
        .await?;
    created.push(text.clone());
    let voice = state
        .platform
        .create_channel(private_channel(
            state,
            format!("Match #{number}"),
            ChannelKind::Voice,
            &member_ids,
        ))
        .await?;
    created.push(voice.clone());

    let id = SessionRepo::new(Arc::clone(&state.backend))
        .create(&NewSessionRecord {
            mode: mode.label.clone(),
            players: member_ids,
            voice_channel_id: voice.clone(),
            text_channel_id: text.clone(),
            status: RecordStatus::Waiting,
        })
        .await?;

    let channels = SessionChannels {
        text,
        voice,
        team_voice: Vec::new(),
    };
    MatchSession::new(id, mode, members, channels)
}

fn private_channel(
    state: &AppState,
    name: String,
    kind: ChannelKind,
    member_ids: &[String],
) -> ChannelSpec {
    let platform = &state.config.platform;
    ChannelSpec {
        name,
        kind,
        parent_id: platform.category_id.clone(),
        allowed_users: member_ids.to_vec(),
        allowed_roles: platform.moderator_role_id.iter().cloned().collect(),
    }
}

/// Lowercase a mode label into a channel-name prefix.
#[must_use]
pub fn channel_slug(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_owned()
}

enum NextStage {
    Captain,
    Host(Vec<String>),
}

/// Expiry stamp for a temporary channel created now.
fn temp_expiry(state: &AppState) -> DateTime<Utc> {
    Utc::now() + chrono::Duration::hours(i64::from(state.config.timeouts.temp_channel_hours))
}

async fn advance_from_forming(state: &Arc<AppState>, session_id: &str) {
    let next = state
        .registry
        .with_session(session_id, |entry| {
            let session = &mut entry.session;
            if session.state != SessionState::Forming {
                return None;
            }
            if session.mode.skips_captain_election() {
                let captains = session.member_ids();
                session.set_captains(captains.clone()).ok()?;
                session.transition(SessionState::HostSelect).ok()?;
                Some(NextStage::Host(captains))
            } else {
                session.transition(SessionState::CaptainSelect).ok()?;
                Some(NextStage::Captain)
            }
        })
        .await
        .flatten();

    match next {
        Some(NextStage::Captain) => open_election(state, session_id, ElectionKind::Captain).await,
        Some(NextStage::Host(captains)) => {
            post_to_session(
                state,
                session_id,
                messages::captains_announcement(&captains),
            )
            .await;
            open_election(state, session_id, ElectionKind::Host).await;
        }
        None => debug!(session_id, "session already left forming"),
    }
}

// ── Elections ───────────────────────────────────────────────

async fn open_election(state: &Arc<AppState>, session_id: &str, kind: ElectionKind) {
    let timeouts = &state.config.timeouts;
    let window = match kind {
        ElectionKind::ReadyCheck => timeouts.ready_check(),
        ElectionKind::Captain => timeouts.captain(),
        ElectionKind::Host => timeouts.host(),
    };
    let cancel = state.shutdown.child_token();

    let text = state
        .registry
        .with_session(session_id, |entry| {
            if entry.session.state != kind.stage() {
                return None;
            }
            if let Some(previous) = entry.election.take() {
                previous.abort();
            }
            entry.election = Some(Election::new(
                kind,
                entry.session.member_ids(),
                cancel.clone(),
            ));
            Some(entry.session.channels.text.clone())
        })
        .await
        .flatten();
    let Some(text) = text else {
        cancel.cancel();
        return;
    };

    election::spawn_window(
        Arc::clone(state),
        session_id.to_owned(),
        kind,
        window,
        cancel,
    );

    let secs = window.as_secs();
    let prompt = match kind {
        ElectionKind::ReadyCheck => messages::ready_check_prompt(session_id, secs),
        ElectionKind::Captain => messages::captain_prompt(session_id, secs),
        ElectionKind::Host => messages::host_prompt(session_id, secs),
    };
    Effect::from_result(
        "post_election_prompt",
        state.platform.send_message(&text, prompt).await,
    );
    info!(session_id, ?kind, secs, "election opened");
}

/// Close an election whose window elapsed. No-op if it was already decided
/// or the session is gone.
pub async fn close_election(state: &Arc<AppState>, session_id: &str, kind: ElectionKind) {
    let outcome = state
        .registry
        .with_session(session_id, |entry| {
            entry
                .election
                .as_mut()
                .filter(|e| e.kind() == kind)
                .and_then(Election::expire)
        })
        .await
        .flatten();

    if let Some(outcome) = outcome {
        info!(session_id, ?kind, ?outcome, "election window elapsed");
        apply_outcome(state, session_id, kind, outcome).await;
    }
}

/// Handle a button press. Returns the text shown to the acting user.
///
/// # Errors
///
/// Returns `AppError::SessionNotFound`, `AppError::NotParticipant` or
/// `AppError::ElectionClosed` when the press is rejected. Rejections never
/// change session state.
pub async fn handle_action(
    state: &Arc<AppState>,
    user_id: &str,
    action: &Action,
) -> Result<String> {
    if action.kind == ActionKind::Report {
        return file_report(state, user_id, &action.session_id).await;
    }

    let session_id = action.session_id.as_str();
    let (kind, result) = state
        .registry
        .with_session(session_id, |entry| -> Result<(ElectionKind, CastResult)> {
            if !entry.session.is_member(user_id) {
                return Err(AppError::NotParticipant(format!(
                    "{user_id} is not in session {session_id}"
                )));
            }
            let election = entry
                .election
                .as_mut()
                .filter(|e| e.outcome().is_none())
                .ok_or_else(|| AppError::ElectionClosed("no vote is open".into()))?;
            let kind = election.kind();
            let ballot = kind.ballot_for(action.kind).ok_or_else(|| {
                AppError::ElectionClosed(format!("{} is not open", action.kind.as_str()))
            })?;
            let result = election.cast(user_id, ballot)?;
            if kind == ElectionKind::Captain && result == CastResult::Recorded {
                entry.session.candidates.push(user_id.to_owned());
            }
            Ok((kind, result))
        })
        .await
        .ok_or_else(|| AppError::SessionNotFound(session_id.to_owned()))??;

    info!(session_id, user_id, ?kind, ?result, "ballot cast");
    let reply = ballot_reply(action.kind, &result);
    if let CastResult::Decided(outcome) = result {
        apply_outcome(state, session_id, kind, outcome).await;
    }
    Ok(reply.to_owned())
}

fn ballot_reply(action: ActionKind, result: &CastResult) -> &'static str {
    if *result == CastResult::Duplicate {
        return "Your vote was already counted.";
    }
    match action {
        ActionKind::Ready => "You are marked ready.",
        ActionKind::Decline => "You declined. The match is cancelled.",
        ActionKind::Propose => "You proposed yourself as captain.",
        ActionKind::Volunteer => "You are the host.",
        ActionKind::Withdraw => "You withdrew. The match is cancelled.",
        ActionKind::Report => "Report received.",
    }
}

async fn apply_outcome(
    state: &Arc<AppState>,
    session_id: &str,
    kind: ElectionKind,
    outcome: Outcome,
) {
    match (kind, outcome) {
        (_, Outcome::Refused(user)) => cancel_session(state, session_id, Some(user.as_str())).await,
        (ElectionKind::ReadyCheck, Outcome::Completed(_)) => {
            advance_from_forming(state, session_id).await;
        }
        (ElectionKind::ReadyCheck, Outcome::Expired(_)) => {
            cancel_session(state, session_id, None).await;
        }
        (ElectionKind::Captain, Outcome::Completed(candidates) | Outcome::Expired(candidates)) => {
            close_captain_select(state, session_id, &candidates).await;
        }
        (ElectionKind::Host, Outcome::Completed(volunteers) | Outcome::Expired(volunteers)) => {
            close_host_select(state, session_id, volunteers.into_iter().next()).await;
        }
    }
}

async fn close_captain_select(state: &Arc<AppState>, session_id: &str, candidates: &[String]) {
    let captains = state
        .registry
        .with_session(session_id, |entry| {
            let session = &mut entry.session;
            if session.state != SessionState::CaptainSelect {
                return None;
            }
            let captains = teams::resolve_captains(
                candidates,
                &session.member_ids(),
                &mut rand::thread_rng(),
            );
            session.set_captains(captains.clone()).ok()?;
            session.transition(SessionState::HostSelect).ok()?;
            Some(captains)
        })
        .await
        .flatten();

    let Some(captains) = captains else {
        return;
    };
    info!(session_id, ?captains, proposals = candidates.len(), "captains elected");
    post_to_session(state, session_id, messages::captains_announcement(&captains)).await;
    open_election(state, session_id, ElectionKind::Host).await;
}

async fn close_host_select(state: &Arc<AppState>, session_id: &str, volunteer: Option<String>) {
    let by_default = volunteer.is_none();
    let host = state
        .registry
        .with_session(session_id, |entry| {
            let session = &mut entry.session;
            if session.state != SessionState::HostSelect {
                return None;
            }
            let host = volunteer.or_else(|| session.members().first().map(|m| m.id.clone()))?;
            session.set_host(host.clone()).ok()?;
            session.transition(SessionState::TeamSplit).ok()?;
            Some(host)
        })
        .await
        .flatten();

    let Some(host) = host else {
        return;
    };
    info!(session_id, host = %host, by_default, "host elected");
    post_to_session(state, session_id, messages::host_announcement(&host, by_default)).await;
    Effect::from_result(
        "notify_host",
        state
            .platform
            .send_direct(&host, messages::host_instructions())
            .await,
    );
}

// ── Team split ──────────────────────────────────────────────

struct SplitPlan {
    teams: [Vec<String>; 2],
    labels: [String; 2],
    member_ids: Vec<String>,
    text: String,
}

/// Accept the host's game details and split the teams.
///
/// # Errors
///
/// Returns `AppError::PermissionDenied` when `user_id` is not the elected
/// host, `AppError::InvalidAction` for empty fields or a repeated
/// submission, and `AppError::SessionNotFound` for unknown sessions. None of
/// these change session state.
pub async fn submit_game_details(
    state: &Arc<AppState>,
    user_id: &str,
    session_id: &str,
    name: &str,
    code: &str,
) -> Result<()> {
    let (name, code) = (name.trim(), code.trim());
    if name.is_empty() || code.is_empty() {
        return Err(AppError::InvalidAction(
            "game name and access code are both required".into(),
        ));
    }

    let plan = state
        .registry
        .with_session(session_id, |entry| -> Result<SplitPlan> {
            let session = &mut entry.session;
            if session.host() != Some(user_id) {
                return Err(AppError::PermissionDenied(
                    "only the elected host can submit the game details".into(),
                ));
            }
            if session.state != SessionState::TeamSplit || session.game_name.is_some() {
                return Err(AppError::InvalidAction(
                    "game details were already submitted".into(),
                ));
            }
            let member_ids = session.member_ids();
            let teams =
                teams::split_teams(&member_ids, session.captains(), &mut rand::thread_rng());
            session.set_teams(teams.clone())?;
            session.game_name = Some(name.to_owned());
            session.game_code = Some(code.to_owned());
            Ok(SplitPlan {
                labels: [team_label(session, 0), team_label(session, 1)],
                teams,
                member_ids,
                text: session.channels.text.clone(),
            })
        })
        .await
        .ok_or_else(|| AppError::SessionNotFound(session_id.to_owned()))??;

    let span = info_span!("team_split", session_id);
    split(state, session_id, name, code, plan).instrument(span).await;
    Ok(())
}

async fn split(state: &Arc<AppState>, session_id: &str, name: &str, code: &str, plan: SplitPlan) {
    Effect::from_result(
        "persist_game_details",
        SessionRepo::new(Arc::clone(&state.backend))
            .set_game_details(session_id, name, code)
            .await,
    );
    Effect::from_result(
        "announce_game",
        state
            .platform
            .send_message(&plan.text, messages::game_ready(name, code))
            .await,
    );

    let mut team_channels: Vec<Option<String>> = Vec::with_capacity(2);
    for label in &plan.labels {
        let created = state
            .platform
            .create_channel(private_channel(
                state,
                label.clone(),
                ChannelKind::Voice,
                &plan.member_ids,
            ))
            .await;
        team_channels.push(match created {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(%err, team = %label, "team channel not created");
                None
            }
        });
    }
    let created: Vec<String> = team_channels.iter().flatten().cloned().collect();

    let activated = state
        .registry
        .with_session(session_id, |entry| {
            if entry.session.state != SessionState::TeamSplit {
                return false;
            }
            entry.session.channels.team_voice.clone_from(&created);
            entry.session.transition(SessionState::Active).is_ok()
        })
        .await
        .unwrap_or(false);

    if !activated {
        // The session closed or moved on while the channels were created.
        for channel_id in &created {
            Effect::from_result(
                "delete_orphaned_team_channel",
                state.platform.delete_channel(channel_id).await,
            );
        }
        return;
    }

    let temp = TempChannelRepo::new(Arc::clone(&state.backend));
    let expires_at = temp_expiry(state);
    for (team, channel) in plan.teams.iter().zip(&team_channels) {
        let Some(channel_id) = channel else { continue };
        Effect::from_result(
            "register_temp_channel",
            temp.register(session_id, channel_id, expires_at).await,
        );
        for member in team {
            Effect::from_result(
                "move_to_team_voice",
                state.platform.move_member(member, channel_id).await,
            );
        }
    }

    Effect::from_result(
        "announce_teams",
        state
            .platform
            .send_message(
                &plan.text,
                messages::teams_announcement(&plan.teams, &plan.labels),
            )
            .await,
    );
    info!(teams = ?plan.teams, "teams split, session active");
}

fn team_label(session: &MatchSession, index: usize) -> String {
    session
        .captains()
        .get(index)
        .and_then(|captain| session.display_name(captain))
        .map_or_else(
            || format!("Team {}", index + 1),
            |name| format!("Team {name}"),
        )
}

// ── Cancellation ────────────────────────────────────────────

/// Cancel a session from one of its first three states.
///
/// `refused_by` names the member whose explicit refusal caused the
/// cancellation; they receive a strike when the mode is penalized. The
/// notice goes to the session text channel just before the channels are
/// deleted. A session past host selection is left untouched.
pub async fn cancel_session(state: &Arc<AppState>, session_id: &str, refused_by: Option<&str>) {
    let claimed = state
        .registry
        .with_session(session_id, |entry| {
            entry.session.state.is_cancellable()
                && entry.session.transition(SessionState::Cancelled).is_ok()
        })
        .await
        .unwrap_or(false);
    if !claimed {
        return;
    }
    let Some(entry) = state.registry.remove(session_id).await else {
        return;
    };
    let session = entry.session;
    info!(session_id, refused_by, "session cancelled");

    if let Some(user) = refused_by {
        if session.mode.penalties {
            ban_tracker::apply_ban(state, user).await;
        }
    }

    Effect::from_result(
        "post_cancellation_notice",
        state
            .platform
            .send_message(&session.channels.text, messages::cancellation_notice(refused_by))
            .await,
    );

    let temp = TempChannelRepo::new(Arc::clone(&state.backend));
    for channel_id in [&session.channels.voice, &session.channels.text] {
        Effect::from_result(
            "delete_session_channel",
            state.platform.delete_channel(channel_id).await,
        );
        Effect::from_result(
            "remove_temp_channel",
            temp.remove_channel(session_id, channel_id).await,
        );
    }
    Effect::from_result(
        "persist_cancellation",
        SessionRepo::new(Arc::clone(&state.backend))
            .set_status(session_id, RecordStatus::Cancelled)
            .await,
    );
}

// ── Report window ───────────────────────────────────────────

/// Tear down the voice channels of a session the correlator has claimed
/// and open its report window.
///
/// The session must already be in `ReportWindow`.
pub async fn enter_report_window(state: &Arc<AppState>, session: MatchSession) {
    let session_id = session.id.clone();
    Effect::from_result(
        "persist_finished",
        SessionRepo::new(Arc::clone(&state.backend))
            .set_status(&session_id, RecordStatus::Finished)
            .await,
    );

    let temp = TempChannelRepo::new(Arc::clone(&state.backend));
    let voice_channels =
        std::iter::once(&session.channels.voice).chain(session.channels.team_voice.iter());
    for channel_id in voice_channels {
        Effect::from_result(
            "delete_voice_channel",
            state.platform.delete_channel(channel_id).await,
        );
        Effect::from_result(
            "remove_temp_channel",
            temp.remove_channel(&session_id, channel_id).await,
        );
    }

    let window = state.config.timeouts.report_window();
    Effect::from_result(
        "post_report_prompt",
        state
            .platform
            .send_message(
                &session.channels.text,
                messages::report_prompt(&session_id, window.as_secs()),
            )
            .await,
    );

    let cancel = state.shutdown.child_token();
    let task_state = Arc::clone(state);
    let span = info_span!("report_window", session_id = %session_id);
    tokio::spawn(
        async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(window) => {
                    close_report_window(&task_state, &session_id).await;
                }
            }
        }
        .instrument(span),
    );
}

/// Close the report window: delete the text channel unless a problem was
/// reported, and purge the session.
pub async fn close_report_window(state: &Arc<AppState>, session_id: &str) {
    let reported = state
        .registry
        .with_session(session_id, |entry| {
            if entry.session.state != SessionState::ReportWindow {
                return None;
            }
            entry.session.transition(SessionState::Closed).ok()?;
            Some((entry.session.reported, entry.session.channels.text.clone()))
        })
        .await
        .flatten();
    let Some((reported, text)) = reported else {
        return;
    };
    state.registry.remove(session_id).await;

    if reported {
        info!(session_id, "problem reported; text channel kept for moderators");
    } else {
        Effect::from_result("delete_text_channel", state.platform.delete_channel(&text).await);
        Effect::from_result(
            "remove_temp_channel",
            TempChannelRepo::new(Arc::clone(&state.backend))
                .remove_channel(session_id, &text)
                .await,
        );
    }
    info!(session_id, "session closed");
}

async fn file_report(state: &Arc<AppState>, user_id: &str, session_id: &str) -> Result<String> {
    let first = state
        .registry
        .with_session(session_id, |entry| -> Result<bool> {
            if !entry.session.is_member(user_id) {
                return Err(AppError::NotParticipant(format!(
                    "{user_id} did not play in session {session_id}"
                )));
            }
            if entry.session.state != SessionState::ReportWindow {
                return Err(AppError::ElectionClosed(
                    "the report window is closed".into(),
                ));
            }
            let first = !entry.session.reported;
            entry.session.reported = true;
            Ok(first)
        })
        .await
        .ok_or_else(|| AppError::SessionNotFound(session_id.to_owned()))??;

    if !first {
        return Ok("A problem was already reported for this match.".to_owned());
    }

    info!(session_id, user_id, "problem reported");
    Effect::from_result(
        "persist_report",
        ReportRepo::new(Arc::clone(&state.backend))
            .file(session_id, user_id)
            .await,
    );
    if let Some(ref log_channel) = state.config.platform.mod_log_channel_id {
        Effect::from_result(
            "log_report",
            state
                .platform
                .send_message(log_channel, messages::report_log_line(session_id, user_id))
                .await,
        );
    }
    Ok("Your report was filed. A moderator will follow up.".to_owned())
}

async fn post_to_session(state: &Arc<AppState>, session_id: &str, message: OutgoingMessage) {
    let Some(text) = state
        .registry
        .with_session(session_id, |entry| entry.session.channels.text.clone())
        .await
    else {
        return;
    };
    Effect::from_result(
        "post_session_message",
        state.platform.send_message(&text, message).await,
    );
}
