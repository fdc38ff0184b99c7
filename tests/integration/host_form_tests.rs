//! Integration tests for the host's game details form.

use scrim_coordinator::models::session::SessionState;
use scrim_coordinator::orchestrator::election::ElectionKind;
use scrim_coordinator::orchestrator::lifecycle;
use scrim_coordinator::AppError;

use super::test_helpers::{harness, Harness};

const MEMBERS: [&str; 4] = ["a", "b", "c", "d"];

/// Form a casual session and elect `a` as host by fallback.
async fn awaiting_form(h: &Harness) -> String {
    let id = h.form("Casual 2v2", &MEMBERS).await;
    lifecycle::close_election(&h.state, &id, ElectionKind::Captain).await;
    lifecycle::close_election(&h.state, &id, ElectionKind::Host).await;
    id
}

#[tokio::test]
async fn submission_from_non_host_is_permission_denied() {
    let h = harness();
    let id = awaiting_form(&h).await;
    let created_before = h.platform.created_specs().len();

    let err = lifecycle::submit_game_details(&h.state, "b", &id, "Practice", "1234")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::PermissionDenied(_)));
    let session = h.session(&id).await;
    assert_eq!(session.state, SessionState::TeamSplit);
    assert!(session.teams().is_none());
    assert!(session.game_name.is_none());
    assert_eq!(h.platform.created_specs().len(), created_before);
}

#[tokio::test]
async fn submission_before_host_is_elected_is_permission_denied() {
    let h = harness();
    let id = h.form("Casual 2v2", &MEMBERS).await;

    let err = lifecycle::submit_game_details(&h.state, "a", &id, "Practice", "1234")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));
}

#[tokio::test]
async fn second_submission_is_rejected() {
    let h = harness();
    let id = awaiting_form(&h).await;
    lifecycle::submit_game_details(&h.state, "a", &id, "Practice", "1234")
        .await
        .unwrap();

    let err = lifecycle::submit_game_details(&h.state, "a", &id, "Other", "9999")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidAction(_)));
    let session = h.session(&id).await;
    assert_eq!(session.game_name.as_deref(), Some("Practice"));
    assert_eq!(session.channels.team_voice.len(), 2);
}

#[tokio::test]
async fn blank_fields_are_rejected() {
    let h = harness();
    let id = awaiting_form(&h).await;

    let err = lifecycle::submit_game_details(&h.state, "a", &id, "  ", "1234")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidAction(_)));
    assert_eq!(h.session(&id).await.state, SessionState::TeamSplit);
}

#[tokio::test]
async fn unknown_session_is_reported() {
    let h = harness();
    let err = lifecycle::submit_game_details(&h.state, "a", "404", "Practice", "1234")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SessionNotFound(_)));
}

#[tokio::test]
async fn team_channel_failure_still_activates_the_session() {
    let h = harness();
    let id = awaiting_form(&h).await;
    // Creations 1 and 2 were the lobby pair; fail the first team channel.
    h.platform.fail_create_on(3);

    lifecycle::submit_game_details(&h.state, "a", &id, "Practice", "1234")
        .await
        .unwrap();

    let session = h.session(&id).await;
    assert_eq!(session.state, SessionState::Active);
    assert_eq!(session.channels.team_voice, vec!["chan-3"]);
}

#[tokio::test]
async fn backend_failure_does_not_block_the_split() {
    let h = harness();
    let id = awaiting_form(&h).await;
    h.backend.fail_table("match_sessions");

    lifecycle::submit_game_details(&h.state, "a", &id, "Practice", "1234")
        .await
        .unwrap();

    assert_eq!(h.session(&id).await.state, SessionState::Active);
}
