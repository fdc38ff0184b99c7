//! Unit tests for result signatures and the de-duplication guard.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::json;

use scrim_coordinator::models::result::MatchResult;
use scrim_coordinator::orchestrator::correlator::{result_signature, DedupGuard, IngestOutcome};

fn result(names: &[&str], blue: u32, orange: u32) -> MatchResult {
    serde_json::from_value(json!({
        "players": names.iter().map(|n| json!({ "name": n })).collect::<Vec<_>>(),
        "scoreBlue": blue,
        "scoreOrange": orange,
    }))
    .unwrap()
}

// ── Payload ──────────────────────────────────────────────────

#[test]
fn payload_keeps_unknown_player_stats() {
    let parsed: MatchResult = serde_json::from_value(json!({
        "players": [{ "name": "Ann", "team": 1, "goals": 2, "saves": 4 }],
        "scoreBlue": 0,
        "scoreOrange": 2,
        "teamBlue": "Blue",
        "map": "Mannfield",
    }))
    .unwrap();

    assert_eq!(parsed.player_names(), vec!["Ann"]);
    assert_eq!(parsed.players[0].team, Some(1));
    assert_eq!(parsed.players[0].stats["goals"], 2);
    assert_eq!(parsed.team_blue.as_deref(), Some("Blue"));
    assert!(parsed.team_orange.is_none());
}

// ── Signatures ───────────────────────────────────────────────

#[test]
fn signature_ignores_player_order() {
    let at = Utc.with_ymd_and_hms(2026, 5, 1, 20, 0, 10).unwrap();
    assert_eq!(
        result_signature(&result(&["a", "b", "c"], 3, 1), at),
        result_signature(&result(&["c", "a", "b"], 3, 1), at)
    );
}

#[test]
fn signature_depends_on_scores_and_players() {
    let at = Utc.with_ymd_and_hms(2026, 5, 1, 20, 0, 10).unwrap();
    let base = result_signature(&result(&["a", "b"], 3, 1), at);
    assert_ne!(base, result_signature(&result(&["a", "b"], 1, 3), at));
    assert_ne!(base, result_signature(&result(&["a", "c"], 3, 1), at));
}

#[test]
fn signature_buckets_by_minute() {
    let r = result(&["a", "b"], 2, 2);
    let early = Utc.with_ymd_and_hms(2026, 5, 1, 20, 0, 1).unwrap();
    let late = Utc.with_ymd_and_hms(2026, 5, 1, 20, 0, 59).unwrap();
    let next = Utc.with_ymd_and_hms(2026, 5, 1, 20, 1, 0).unwrap();

    assert_eq!(result_signature(&r, early), result_signature(&r, late));
    assert_ne!(result_signature(&r, late), result_signature(&r, next));
}

#[test]
fn signature_is_hex_sha256() {
    let sig = result_signature(&result(&["a"], 0, 0), Utc::now());
    assert_eq!(sig.len(), 64);
    assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
}

// ── De-duplication guard ─────────────────────────────────────

#[tokio::test]
async fn first_delivery_passes_and_repeat_is_caught() {
    let guard = DedupGuard::default();
    assert!(guard.check_and_record("sig-1").await);
    assert!(!guard.check_and_record("sig-1").await);
    assert!(guard.check_and_record("sig-2").await);
}

#[tokio::test(start_paused = true)]
async fn signatures_are_forgotten_after_the_ttl() {
    let guard = DedupGuard::with_ttl(Duration::from_secs(600));
    assert!(guard.check_and_record("sig").await);

    tokio::time::advance(Duration::from_secs(599)).await;
    assert!(!guard.check_and_record("sig").await);

    tokio::time::advance(Duration::from_secs(2)).await;
    assert!(guard.check_and_record("sig").await);
}

// ── Outcome wire format ──────────────────────────────────────

#[test]
fn outcome_serializes_with_status_tag() {
    let closed = serde_json::to_value(IngestOutcome::Closed {
        session_id: "12".into(),
    })
    .unwrap();
    assert_eq!(closed, json!({ "status": "closed", "session_id": "12" }));

    let none = serde_json::to_value(IngestOutcome::NoMatch).unwrap();
    assert_eq!(none, json!({ "status": "no_match" }));
}
