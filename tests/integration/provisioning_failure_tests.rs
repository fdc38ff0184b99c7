//! Integration tests for aborted session creation.

use scrim_coordinator::orchestrator::lifecycle;
use scrim_coordinator::AppError;

use super::test_helpers::{harness, lobby};

const MEMBERS: [&str; 4] = ["a", "b", "c", "d"];

#[tokio::test]
async fn voice_channel_failure_rolls_back_the_text_channel() {
    let h = harness();
    h.platform.fail_create_on(2);

    let err = lifecycle::on_lobby_update(&h.state, lobby("Casual 2v2", &MEMBERS))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Provisioning(_)));
    assert_eq!(h.platform.deleted(), vec!["chan-1"]);
    assert!(h.state.registry.is_empty().await);
    assert!(h.backend.rows("match_sessions").is_empty());
    assert!(h.platform.moves().is_empty());
}

#[tokio::test]
async fn persistence_failure_rolls_back_both_channels() {
    let h = harness();
    h.backend.fail_table("match_sessions");

    let err = lifecycle::on_lobby_update(&h.state, lobby("Casual 2v2", &MEMBERS))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Persistence(_)));
    assert_eq!(h.platform.deleted(), vec!["chan-1", "chan-2"]);
    assert!(h.state.registry.is_empty().await);
}

#[tokio::test]
async fn lobby_can_form_again_after_a_failure() {
    let h = harness();
    h.platform.fail_create_on(1);
    assert!(
        lifecycle::on_lobby_update(&h.state, lobby("Casual 2v2", &MEMBERS))
            .await
            .is_err()
    );

    let id = h.form("Casual 2v2", &MEMBERS).await;
    assert_eq!(h.session(&id).await.members().len(), 4);
}

#[tokio::test]
async fn expiry_record_failure_does_not_abort_creation() {
    let h = harness();
    h.backend.fail_table("temp_channels");

    let id = h.form("Casual 2v2", &MEMBERS).await;
    assert!(h.state.registry.snapshot(&id).await.is_some());
}
