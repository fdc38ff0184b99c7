//! Captain resolution and team partitioning.
//!
//! Pure functions over member ids; randomness is injected so callers can
//! seed it in tests.

use rand::seq::SliceRandom;
use rand::Rng;

/// Pick exactly two captains.
///
/// Candidates who are not members are ignored, as are repeated proposals.
/// With more than two candidates, two are drawn uniformly from them. With
/// fewer, the remaining slots are drawn uniformly from the non-candidate
/// members. The result has two entries whenever `members` has at least two.
pub fn resolve_captains<R: Rng + ?Sized>(
    candidates: &[String],
    members: &[String],
    rng: &mut R,
) -> Vec<String> {
    let mut pool: Vec<&String> = Vec::new();
    for candidate in candidates {
        if members.contains(candidate) && !pool.contains(&candidate) {
            pool.push(candidate);
        }
    }

    if pool.len() > 2 {
        return pool
            .choose_multiple(rng, 2)
            .map(|c| (*c).clone())
            .collect();
    }

    let rest: Vec<&String> = members.iter().filter(|m| !pool.contains(m)).collect();
    let missing = 2 - pool.len();
    let mut captains: Vec<String> = pool.into_iter().cloned().collect();
    captains.extend(rest.choose_multiple(rng, missing).map(|m| (*m).clone()));
    captains
}

/// Split members into two even teams.
///
/// With two captains, each team is seeded with its captain and the other
/// members are shuffled and dealt evenly. Otherwise the whole member list
/// is shuffled and halved.
pub fn split_teams<R: Rng + ?Sized>(
    members: &[String],
    captains: &[String],
    rng: &mut R,
) -> [Vec<String>; 2] {
    let seeded = captains.len() == 2 && captains.iter().all(|c| members.contains(c));
    let (mut first, mut second, mut rest) = if seeded {
        let rest: Vec<String> = members
            .iter()
            .filter(|m| !captains.contains(m))
            .cloned()
            .collect();
        (vec![captains[0].clone()], vec![captains[1].clone()], rest)
    } else {
        (Vec::new(), Vec::new(), members.to_vec())
    };

    rest.shuffle(rng);
    let per_side = members.len() / 2;
    for member in rest {
        if first.len() < per_side {
            first.push(member);
        } else {
            second.push(member);
        }
    }
    [first, second]
}
