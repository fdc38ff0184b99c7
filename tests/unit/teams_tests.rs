//! Unit tests for captain resolution and the team split.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::SeedableRng;

use scrim_coordinator::orchestrator::teams::{resolve_captains, split_teams};

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_owned()).collect()
}

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

// ── Captains ─────────────────────────────────────────────────

#[test]
fn two_candidates_are_both_captains() {
    let members = ids(&["a", "b", "c", "d"]);
    let captains = resolve_captains(&ids(&["c", "a"]), &members, &mut rng(1));
    assert_eq!(captains, ids(&["c", "a"]));
}

#[test]
fn one_candidate_is_joined_by_a_random_member() {
    let members = ids(&["a", "b", "c", "d"]);
    for seed in 0..20 {
        let captains = resolve_captains(&ids(&["b"]), &members, &mut rng(seed));
        assert_eq!(captains.len(), 2);
        assert_eq!(captains[0], "b");
        assert_ne!(captains[1], "b");
        assert!(members.contains(&captains[1]));
    }
}

#[test]
fn no_candidates_picks_two_distinct_members() {
    let members = ids(&["a", "b", "c", "d", "e", "f"]);
    for seed in 0..20 {
        let captains = resolve_captains(&[], &members, &mut rng(seed));
        assert_eq!(captains.len(), 2);
        assert_ne!(captains[0], captains[1]);
        assert!(captains.iter().all(|c| members.contains(c)));
    }
}

#[test]
fn surplus_candidates_are_drawn_from() {
    let members = ids(&["a", "b", "c", "d", "e", "f"]);
    let candidates = ids(&["a", "c", "e"]);
    for seed in 0..20 {
        let captains = resolve_captains(&candidates, &members, &mut rng(seed));
        assert_eq!(captains.len(), 2);
        assert_ne!(captains[0], captains[1]);
        assert!(captains.iter().all(|c| candidates.contains(c)));
    }
}

#[test]
fn duplicate_and_foreign_candidates_are_ignored() {
    let members = ids(&["a", "b", "c", "d"]);
    let candidates = ids(&["a", "a", "zz", "b"]);
    let captains = resolve_captains(&candidates, &members, &mut rng(3));
    assert_eq!(captains, ids(&["a", "b"]));
}

#[test]
fn fallback_draw_covers_every_pair() {
    let members = ids(&["a", "b", "c", "d"]);
    let mut seen: HashMap<Vec<String>, usize> = HashMap::new();
    for seed in 0..600 {
        let mut pair = resolve_captains(&[], &members, &mut rng(seed));
        pair.sort();
        *seen.entry(pair).or_default() += 1;
    }
    // Six unordered pairs, ~100 draws each.
    assert_eq!(seen.len(), 6);
    assert!(seen.values().all(|&n| n > 50), "{seen:?}");
}

// ── Team split ───────────────────────────────────────────────

#[test]
fn captains_land_on_opposite_teams() {
    let members = ids(&["a", "b", "c", "d", "e", "f"]);
    let captains = ids(&["d", "b"]);
    for seed in 0..20 {
        let [first, second] = split_teams(&members, &captains, &mut rng(seed));
        assert_eq!(first[0], "d");
        assert_eq!(second[0], "b");
        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 3);
    }
}

#[test]
fn split_partitions_every_member_exactly_once() {
    let members = ids(&["a", "b", "c", "d", "e", "f", "g", "h"]);
    let [first, second] = split_teams(&members, &ids(&["a", "h"]), &mut rng(9));

    let all: HashSet<&String> = first.iter().chain(second.iter()).collect();
    assert_eq!(all.len(), members.len());
    assert_eq!(first.len() + second.len(), members.len());
}

#[test]
fn one_versus_one_split_is_captain_against_captain() {
    let members = ids(&["a", "b"]);
    let [first, second] = split_teams(&members, &ids(&["b", "a"]), &mut rng(0));
    assert_eq!(first, ids(&["b"]));
    assert_eq!(second, ids(&["a"]));
}

#[test]
fn split_without_captains_still_halves() {
    let members = ids(&["a", "b", "c", "d"]);
    let [first, second] = split_teams(&members, &[], &mut rng(5));
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
}

#[test]
fn split_is_deterministic_for_a_seed() {
    let members = ids(&["a", "b", "c", "d", "e", "f"]);
    let captains = ids(&["a", "b"]);
    let left = split_teams(&members, &captains, &mut rng(42));
    let right = split_teams(&members, &captains, &mut rng(42));
    assert_eq!(left, right);
}
