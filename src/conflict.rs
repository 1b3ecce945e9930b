//! Conflict Graph Builder: enumerates pairs of shifts that overlap in time
//! and pairs that are sequential (back-to-back within a gap threshold).
//!
//! Pure function over shifts; complexity is quadratic in the number of
//! shifts, acceptable at the sizes this core targets (a few hundred shifts).

use crate::domain::{ConflictGraph, Shift};

/// Builds the conflict graph for `shifts`, using `gap_hours` as the
/// back-to-back threshold `G`.
pub fn build_conflict_graph(shifts: &[Shift], gap_hours: f64) -> ConflictGraph {
    let mut overlap_pairs = Vec::new();
    let mut sequential_pairs = Vec::new();
    let gap_seconds = (gap_hours * 3600.0).round() as i64;

    for i in 0..shifts.len() {
        for j in 0..shifts.len() {
            if i == j {
                continue;
            }
            let a = &shifts[i];
            let b = &shifts[j];
            if a.date() != b.date() {
                continue;
            }

            if i < j && a.start < b.end && b.start < a.end {
                overlap_pairs.push((i, j));
            }

            let gap = (b.start - a.end).num_seconds();
            if (0..=gap_seconds).contains(&gap) {
                sequential_pairs.push((i, j));
            }
        }
    }

    ConflictGraph {
        overlap_pairs,
        sequential_pairs,
    }
}
