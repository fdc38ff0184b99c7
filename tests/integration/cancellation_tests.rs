//! Integration tests for cancellation and ban escalation.

use std::time::Duration;

use scrim_coordinator::models::action::ActionKind;
use scrim_coordinator::orchestrator::election::ElectionKind;
use scrim_coordinator::orchestrator::lifecycle;
use scrim_coordinator::AppError;

use super::test_helpers::{harness, Harness, PlatformCall};

const MEMBERS: [&str; 4] = ["p1", "p2", "p3", "p4"];

#[tokio::test]
async fn decline_cancels_and_penalizes_the_decliner() {
    let h = harness();
    let id = h.form("Ranked 2v2", &MEMBERS).await;
    h.press("p1", ActionKind::Ready, &id).await.unwrap();

    let reply = h.press("p2", ActionKind::Decline, &id).await.unwrap();

    assert_eq!(reply, "You declined. The match is cancelled.");
    assert!(h.state.registry.snapshot(&id).await.is_none());
    assert_eq!(h.state.bans.strikes("p2").await, 1);
    assert_eq!(h.state.bans.strikes("p1").await, 0);

    let calls = h.platform.calls();
    assert!(calls.contains(&PlatformCall::AddRole {
        user: "p2".into(),
        role: "PENALTY".into(),
    }));
    let deleted = h.platform.deleted();
    assert!(deleted.contains(&"chan-1".to_owned()));
    assert!(deleted.contains(&"chan-2".to_owned()));

    assert!(h
        .platform
        .directs_to("p2")
        .iter()
        .any(|t| t.contains("suspended from matchmaking for 5 minutes")));
    assert!(h
        .platform
        .messages_to("LOG")
        .iter()
        .any(|m| m.content.contains("<@p2>") && m.content.contains("strike 1")));

    // The notice lands in the text channel before it is deleted.
    let notice = calls.iter().position(|c| {
        matches!(c, PlatformCall::SendMessage { channel, message }
            if channel == "chan-1" && message.content.contains("Match cancelled: <@p2> refused"))
    });
    let deletion = calls
        .iter()
        .position(|c| *c == PlatformCall::DeleteChannel("chan-1".into()));
    assert!(notice.unwrap() < deletion.unwrap());
    for member in MEMBERS {
        assert!(!h
            .platform
            .directs_to(member)
            .iter()
            .any(|t| t.contains("Match cancelled")));
    }

    assert!(h.backend.rows("temp_channels").is_empty());
    assert_eq!(h.backend.rows("match_sessions")[0]["status"], "cancelled");
}

#[tokio::test]
async fn repeated_refusals_escalate_the_suspension() {
    let h = harness();
    for round in 1..=3u32 {
        let id = h.form("Ranked 1v1", &["x", "y"]).await;
        h.press("x", ActionKind::Decline, &id).await.unwrap();
        assert_eq!(h.state.bans.strikes("x").await, round);
    }
    let notices = h.platform.directs_to("x");
    assert!(notices.iter().any(|t| t.contains("for 5 minutes")));
    assert!(notices.iter().any(|t| t.contains("for 10 minutes")));
    assert!(notices.iter().any(|t| t.contains("for 20 minutes")));
}

#[tokio::test(start_paused = true)]
async fn ready_check_timeout_cancels_without_a_strike() {
    let h = harness();
    let id = h.form("Ranked 2v2", &MEMBERS).await;
    for p in ["p1", "p2", "p3"] {
        h.press(p, ActionKind::Ready, &id).await.unwrap();
    }

    tokio::time::sleep(Duration::from_secs(31)).await;

    assert!(h.state.registry.is_empty().await);
    for p in MEMBERS {
        assert_eq!(h.state.bans.strikes(p).await, 0);
    }
    assert!(!h
        .platform
        .calls()
        .iter()
        .any(|c| matches!(c, PlatformCall::AddRole { .. })));
    assert!(h.platform.deleted().contains(&"chan-1".to_owned()));
}

#[tokio::test(start_paused = true)]
async fn penalty_role_is_removed_after_the_suspension() {
    let h = harness();
    let id = h.form("Ranked 2v2", &MEMBERS).await;
    h.press("p4", ActionKind::Decline, &id).await.unwrap();

    let removal = PlatformCall::RemoveRole {
        user: "p4".into(),
        role: "PENALTY".into(),
    };
    tokio::time::sleep(Duration::from_secs(4 * 60)).await;
    assert!(!h.platform.calls().contains(&removal));

    tokio::time::sleep(Duration::from_secs(61)).await;
    assert!(h.platform.calls().contains(&removal));
}

#[tokio::test(start_paused = true)]
async fn a_second_ban_keeps_the_role_until_the_longer_suspension_ends() {
    let h = harness();
    let first = h.form("Ranked 2v2", &MEMBERS).await;
    h.press("p4", ActionKind::Decline, &first).await.unwrap();

    tokio::time::sleep(Duration::from_secs(3 * 60)).await;
    let second = h.form("Ranked 2v2", &["p4", "q1", "q2", "q3"]).await;
    h.press("p4", ActionKind::Decline, &second).await.unwrap();
    assert_eq!(h.state.bans.strikes("p4").await, 2);

    let removals = |h: &Harness| {
        h.platform
            .calls()
            .iter()
            .filter(|c| matches!(c, PlatformCall::RemoveRole { user, .. } if user == "p4"))
            .count()
    };

    // The first suspension would have ended at five minutes.
    tokio::time::sleep(Duration::from_secs(2 * 60 + 5)).await;
    assert_eq!(removals(&h), 0);

    // The second one runs ten minutes from the second refusal.
    tokio::time::sleep(Duration::from_secs(8 * 60)).await;
    assert_eq!(removals(&h), 1);
}

#[tokio::test]
async fn withdraw_in_unpenalized_mode_cancels_without_a_ban() {
    let h = harness();
    let id = h.form("Casual 2v2", &["a", "b", "c", "d"]).await;
    lifecycle::close_election(&h.state, &id, ElectionKind::Captain).await;

    let reply = h.press("c", ActionKind::Withdraw, &id).await.unwrap();

    assert_eq!(reply, "You withdrew. The match is cancelled.");
    assert!(h.state.registry.is_empty().await);
    assert_eq!(h.state.bans.strikes("c").await, 0);
    assert!(!h
        .platform
        .calls()
        .iter()
        .any(|c| matches!(c, PlatformCall::AddRole { .. })));
}

#[tokio::test]
async fn votes_after_cancellation_are_rejected() {
    let h = harness();
    let id = h.form("Ranked 2v2", &MEMBERS).await;
    h.press("p1", ActionKind::Decline, &id).await.unwrap();

    let err = h.press("p2", ActionKind::Ready, &id).await.unwrap_err();
    assert!(matches!(err, AppError::SessionNotFound(_)));
    assert_eq!(h.state.bans.strikes("p1").await, 1);
}

#[tokio::test]
async fn sessions_past_host_selection_cannot_be_cancelled() {
    let h = harness();
    let id = h.form("Casual 2v2", &["a", "b", "c", "d"]).await;
    lifecycle::close_election(&h.state, &id, ElectionKind::Captain).await;
    lifecycle::close_election(&h.state, &id, ElectionKind::Host).await;

    lifecycle::cancel_session(&h.state, &id, Some("b")).await;

    assert!(h.state.registry.snapshot(&id).await.is_some());
    assert!(h.platform.deleted().is_empty());
}
