//! Inbound platform event dispatch.
//!
//! Gateway traffic reaches the orchestrator as [`PlatformEvent`] values.
//! Button presses are decoded into an [`Action`] exactly once here and
//! routed by kind; rejected interactions turn into a short ephemeral reply
//! for the acting user and never change session state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info_span, warn, Instrument};

use crate::models::action::Action;
use crate::models::session::Member;
use crate::orchestrator::lifecycle::{self, LobbySnapshot};
use crate::state::AppState;
use crate::AppError;

/// A voice channel occupant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoiceMember {
    /// Platform user id.
    pub id: String,
    /// Nickname or username.
    pub display_name: String,
    /// Bot accounts never count towards a quorum.
    #[serde(default)]
    pub bot: bool,
}

/// An event delivered by the gateway relay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformEvent {
    /// Snapshot of a voice channel after a member joined or left it.
    VoiceStateUpdate {
        /// Channel id.
        channel_id: String,
        /// Channel name.
        channel_name: String,
        /// Everyone currently connected.
        members: Vec<VoiceMember>,
    },
    /// A button press.
    ButtonPressed {
        /// Acting user.
        user_id: String,
        /// Button custom id, `{action}:{session_id}`.
        custom_id: String,
    },
    /// The host's game details form.
    FormSubmitted {
        /// Acting user.
        user_id: String,
        /// Session the form belongs to.
        session_id: String,
        /// Game instance name.
        name: String,
        /// Game access code.
        code: String,
    },
}

/// Text to show the acting user, if any.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventReply {
    /// Ephemeral reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ephemeral: Option<String>,
}

impl EventReply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            ephemeral: Some(text.into()),
        }
    }
}

/// Route one platform event.
pub async fn dispatch(state: &Arc<AppState>, event: PlatformEvent) -> EventReply {
    match event {
        PlatformEvent::VoiceStateUpdate {
            channel_id,
            channel_name,
            members,
        } => {
            let lobby = LobbySnapshot {
                channel_id,
                channel_name,
                members: members
                    .into_iter()
                    .filter(|m| !m.bot)
                    .map(|m| Member::new(m.id, m.display_name))
                    .collect(),
            };
            if let Err(err) = lifecycle::on_lobby_update(state, lobby).await {
                error!(%err, "session formation failed");
            }
            EventReply::default()
        }
        PlatformEvent::ButtonPressed { user_id, custom_id } => {
            let span = info_span!("button", user_id = %user_id, custom_id = %custom_id);
            async {
                let action: Action = match custom_id.parse() {
                    Ok(action) => action,
                    Err(err) => {
                        warn!(%err, "undecodable button id");
                        return reply_for_error(&err);
                    }
                };
                match lifecycle::handle_action(state, &user_id, &action).await {
                    Ok(text) => EventReply::text(text),
                    Err(err) => reply_for_error(&err),
                }
            }
            .instrument(span)
            .await
        }
        PlatformEvent::FormSubmitted {
            user_id,
            session_id,
            name,
            code,
        } => {
            let span = info_span!("host_form", user_id = %user_id, session_id = %session_id);
            async {
                match lifecycle::submit_game_details(state, &user_id, &session_id, &name, &code)
                    .await
                {
                    Ok(()) => EventReply::text("Game details shared with the lobby."),
                    Err(err) => reply_for_error(&err),
                }
            }
            .instrument(span)
            .await
        }
    }
}

fn reply_for_error(err: &AppError) -> EventReply {
    if err.is_user_facing() {
        warn!(%err, "interaction rejected");
        EventReply::text(err.to_string())
    } else {
        error!(%err, "interaction failed");
        EventReply::text("Something went wrong. Please try again.")
    }
}
