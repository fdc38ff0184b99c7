//! Message builders for session prompts and notices.
//!
//! Provides helpers for constructing messages with interactive buttons.
//! Rendering to the wire format is the platform adapter's job.

use crate::models::action::{Action, ActionKind};

/// Visual style of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    /// Neutral call to action.
    Primary,
    /// Muted.
    Secondary,
    /// Positive confirmation.
    Success,
    /// Destructive or refusing.
    Danger,
}

/// An interactive button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Encoded [`Action`] custom id.
    pub custom_id: String,
    /// Label text.
    pub label: String,
    /// Visual style.
    pub style: ButtonStyle,
}

impl Button {
    /// Build a button that triggers `kind` on `session_id`.
    #[must_use]
    pub fn action(kind: ActionKind, session_id: &str, label: &str, style: ButtonStyle) -> Self {
        Self {
            custom_id: Action::new(kind, session_id).custom_id(),
            label: label.to_owned(),
            style,
        }
    }
}

/// A message to post into a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Markdown content.
    pub content: String,
    /// Buttons rendered in a single row.
    pub buttons: Vec<Button>,
}

impl OutgoingMessage {
    /// Create a plain-text message.
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            buttons: Vec::new(),
        }
    }

    /// Attach buttons.
    #[must_use]
    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }
}

fn mention(user_id: &str) -> String {
    format!("<@{user_id}>")
}

/// Ready-check prompt (Ready / Decline).
#[must_use]
pub fn ready_check_prompt(session_id: &str, window_secs: u64) -> OutgoingMessage {
    OutgoingMessage::plain(format!(
        "\u{1f3af} Ready to start the match? You have {window_secs}s.\n\
         Press *Ready* to confirm or *Decline* to cancel."
    ))
    .with_buttons(vec![
        Button::action(ActionKind::Ready, session_id, "Ready", ButtonStyle::Success),
        Button::action(ActionKind::Decline, session_id, "Decline", ButtonStyle::Danger),
    ])
}

/// Captain proposal prompt (Propose / Withdraw).
#[must_use]
pub fn captain_prompt(session_id: &str, window_secs: u64) -> OutgoingMessage {
    OutgoingMessage::plain(format!(
        "\u{1f9e2} *Captain selection*: click to propose yourself within {window_secs}s. \
         Two captains will be chosen."
    ))
    .with_buttons(vec![
        Button::action(
            ActionKind::Propose,
            session_id,
            "Propose me as captain",
            ButtonStyle::Primary,
        ),
        Button::action(ActionKind::Withdraw, session_id, "Withdraw", ButtonStyle::Danger),
    ])
}

/// Host volunteering prompt (Volunteer / Withdraw).
#[must_use]
pub fn host_prompt(session_id: &str, window_secs: u64) -> OutgoingMessage {
    OutgoingMessage::plain(format!(
        "\u{1f6e0}\u{fe0f} *Who hosts?* First volunteer within {window_secs}s hosts the game \
         and submits its name and access code."
    ))
    .with_buttons(vec![
        Button::action(
            ActionKind::Volunteer,
            session_id,
            "I'll host",
            ButtonStyle::Success,
        ),
        Button::action(ActionKind::Withdraw, session_id, "Withdraw", ButtonStyle::Danger),
    ])
}

/// Closing notice with a timed "report a problem" button.
#[must_use]
pub fn report_prompt(session_id: &str, window_secs: u64) -> OutgoingMessage {
    let minutes = (window_secs / 60).max(1);
    OutgoingMessage::plain(format!(
        "\u{1f3c1} Match finished. You have {minutes} minute(s) to report a problem."
    ))
    .with_buttons(vec![Button::action(
        ActionKind::Report,
        session_id,
        "Report a problem",
        ButtonStyle::Danger,
    )])
}

/// Announce the two captains.
#[must_use]
pub fn captains_announcement(captains: &[String]) -> OutgoingMessage {
    let names: Vec<String> = captains.iter().map(|c| mention(c)).collect();
    OutgoingMessage::plain(format!("Captains: {}", names.join(" and ")))
}

/// Announce the host, noting when it was assigned by fallback.
#[must_use]
pub fn host_announcement(host: &str, by_default: bool) -> OutgoingMessage {
    if by_default {
        OutgoingMessage::plain(format!("{} is host by default.", mention(host)))
    } else {
        OutgoingMessage::plain(format!("{} will host the game.", mention(host)))
    }
}

/// Direct notification telling the host how to submit the game details.
#[must_use]
pub fn host_instructions() -> &'static str {
    "You are hosting. Create a private game, then submit its name and access code \
     with the host form in the match channel."
}

/// Game details shared after the host form is submitted.
#[must_use]
pub fn game_ready(name: &str, code: &str) -> OutgoingMessage {
    OutgoingMessage::plain(format!(
        "\u{1f3ae} *Game ready!*\nName: **{name}**\nAccess code: **{code}**"
    ))
}

/// Team line-up posted after the split.
#[must_use]
pub fn teams_announcement(teams: &[Vec<String>; 2], labels: &[String; 2]) -> OutgoingMessage {
    let render = |team: &Vec<String>| {
        team.iter()
            .map(|id| mention(id))
            .collect::<Vec<_>>()
            .join(", ")
    };
    OutgoingMessage::plain(format!(
        "{}: {}\n{}: {}",
        labels[0],
        render(&teams[0]),
        labels[1],
        render(&teams[1])
    ))
}

/// Cancellation notice, naming the refusing member when there is one.
#[must_use]
pub fn cancellation_notice(refused_by: Option<&str>) -> OutgoingMessage {
    match refused_by {
        Some(user) => OutgoingMessage::plain(format!(
            "\u{26d4} Match cancelled: {} refused.",
            mention(user)
        )),
        None => OutgoingMessage::plain("\u{26d4} Match cancelled: not everyone was ready."),
    }
}

/// Direct notification sent to a banned member.
#[must_use]
pub fn ban_direct_notice(minutes: u64) -> String {
    format!("You are suspended from matchmaking for {minutes} minutes.")
}

/// Moderation log line for a ban.
#[must_use]
pub fn ban_log_line(user_id: &str, minutes: u64, strikes: u32) -> OutgoingMessage {
    OutgoingMessage::plain(format!(
        "{} suspended from matchmaking for {minutes} min (strike {strikes}).",
        mention(user_id)
    ))
}

/// Moderation log line for a filed problem report.
#[must_use]
pub fn report_log_line(session_id: &str, reporter_id: &str) -> OutgoingMessage {
    OutgoingMessage::plain(format!(
        "Problem reported for match {session_id} by {}.",
        mention(reporter_id)
    ))
}
