use scrim_coordinator::backend::Filter;
use scrim_coordinator::orchestrator::lifecycle::channel_slug;

// ── Filters ──────────────────────────────────────────────────

#[test]
fn empty_filter_has_no_pairs() {
    assert!(Filter::all().pairs().is_empty());
}

#[test]
fn predicates_render_in_insertion_order() {
    let filter = Filter::eq("match_id", 12)
        .and_eq("channel_id", "c-1")
        .and_lt("expires_at", "2026-01-01T00:00:00+00:00");

    let pairs: Vec<(&str, &str)> = filter
        .pairs()
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("match_id", "eq.12"),
            ("channel_id", "eq.c-1"),
            ("expires_at", "lt.2026-01-01T00:00:00+00:00"),
        ]
    );
}

// ── Channel names ────────────────────────────────────────────

#[test]
fn slug_lowercases_and_hyphenates() {
    assert_eq!(channel_slug("Ranked 2v2"), "ranked-2v2");
    assert_eq!(channel_slug("2v2"), "2v2");
}

#[test]
fn slug_collapses_and_trims_separators() {
    assert_eq!(channel_slug("  Casual!! 3v3 "), "casual-3v3");
    assert_eq!(channel_slug("Rumble / 3v3"), "rumble-3v3");
}
