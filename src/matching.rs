//! Matching Oracle: a bipartite many-to-one (b-matching) feasibility check
//! used to determine the strongest achievable preference guarantee level.
//!
//! Only a reverse map (shift -> occupying volunteers) is maintained; the
//! forward view (volunteer -> shift) is never needed, so it is not kept in
//! parallel the way a naive port of the original might.

use std::collections::HashSet;

use crate::domain::{Shift, Volunteer};

/// Adjacency restricted to ranks `<= n`, in shift-input order.
fn adjacency(volunteers: &[Volunteer], shifts: &[Shift], n: u32) -> Vec<Vec<usize>> {
    volunteers
        .iter()
        .map(|v| {
            shifts
                .iter()
                .enumerate()
                .filter(|(_, s)| v.rank_for(&s.id).is_some_and(|r| r <= n))
                .map(|(i, _)| i)
                .collect()
        })
        .collect()
}

/// Tries to place `volunteer` on some eligible shift, re-routing an
/// already-placed volunteer via another augmenting path if every eligible
/// shift is at capacity. `visited` is the per-outer-call visited-shift set
/// that prevents cycles.
fn try_augment(
    volunteer: usize,
    adj: &[Vec<usize>],
    capacity: &[usize],
    occupants: &mut [Vec<usize>],
    visited: &mut HashSet<usize>,
) -> bool {
    for &shift in &adj[volunteer] {
        if visited.contains(&shift) {
            continue;
        }
        visited.insert(shift);

        if occupants[shift].len() < capacity[shift] {
            occupants[shift].push(volunteer);
            return true;
        }

        let blocking: Vec<usize> = occupants[shift].clone();
        for other in blocking {
            if try_augment(other, adj, capacity, occupants, visited) {
                let pos = occupants[shift]
                    .iter()
                    .position(|&x| x == other)
                    .expect("occupant was just read from this slot");
                occupants[shift][pos] = volunteer;
                return true;
            }
        }
    }
    false
}

/// `feasible` iff there exists an assignment of one shift per volunteer
/// such that every volunteer's shift is ranked `<= n`, respecting shift
/// capacities. Never errors; a volunteer who cannot be matched is simply
/// reported in `unmatched_names`.
pub fn is_top_n_matchable(volunteers: &[Volunteer], shifts: &[Shift], n: u32) -> (bool, Vec<String>) {
    let adj = adjacency(volunteers, shifts, n);
    let capacity: Vec<usize> = shifts.iter().map(|s| s.capacity as usize).collect();
    let mut occupants: Vec<Vec<usize>> = vec![Vec::new(); shifts.len()];
    let mut unmatched = Vec::new();

    for (vi, v) in volunteers.iter().enumerate() {
        let mut visited = HashSet::new();
        if !try_augment(vi, &adj, &capacity, &mut occupants, &mut visited) {
            unmatched.push(v.name.clone());
        }
    }

    (unmatched.is_empty(), unmatched)
}

/// Scans `n = 1, 2, ...` (bounded by `max(max_rank, 10)`) for the smallest
/// `n` at which every volunteer can be matched, returning that level (or `0`
/// if none is achievable) plus the unmatched-names list observed at each `n`
/// attempted.
pub fn detect_strongest_guarantee(
    volunteers: &[Volunteer],
    shifts: &[Shift],
) -> (u32, std::collections::HashMap<u32, Vec<String>>) {
    let max_rank = volunteers
        .iter()
        .flat_map(|v| v.preferences.values().copied())
        .max()
        .unwrap_or(0);
    let upper_bound = max_rank.max(10);

    let mut unmatched_by_level = std::collections::HashMap::new();
    for n in 1..=upper_bound {
        let (feasible, unmatched) = is_top_n_matchable(volunteers, shifts, n);
        let found = feasible;
        unmatched_by_level.insert(n, unmatched);
        if found {
            return (n, unmatched_by_level);
        }
    }
    (0, unmatched_by_level)
}
