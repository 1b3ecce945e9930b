//! Result Assembler & Metrics: projects the solved `x[v,s] = 1` set back
//! into assignments and computes the per-volunteer and global fairness
//! metrics that are part of the core's output contract.

use serde::{Deserialize, Serialize};

use crate::domain::{satisfaction_weight, Assignment, Context};
use crate::solver::PrimalAssignment;

/// Projects the solver's primal `x` values into an `Assignment`, in input
/// order (volunteers outer, shifts inner), matching the ordering guarantees
/// the rest of the core relies on.
pub fn assemble(ctx: &Context, primal: &PrimalAssignment) -> Assignment {
    let mut pairs = Vec::new();
    for (vi, volunteer) in ctx.volunteers.iter().enumerate() {
        for (si, shift) in ctx.shifts.iter().enumerate() {
            if primal.get(&(vi, si)).copied().unwrap_or(false) {
                pairs.push((volunteer.name.clone(), shift.id.clone()));
            }
        }
    }
    Assignment { pairs }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerMetrics {
    pub name: String,
    pub satisfaction: i64,
    pub avg_satisfaction: f64,
    /// `rank_hits[k - 1]` is the count of assigned shifts ranked `k`, for
    /// `k` in `1..=5`.
    pub rank_hits: [u32; 5],
    pub shift_count: usize,
    pub points: f64,
    pub reached_effective_min: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GlobalMetrics {
    pub min_avg_satisfaction: f64,
    pub max_avg_satisfaction: f64,
    pub mean_avg_satisfaction: f64,
    pub stddev_avg_satisfaction: f64,
    pub fairness_index: f64,
    pub pct_assignments_from_preferences: f64,
    pub pct_volunteers_reaching_effective_min: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    pub per_volunteer: Vec<VolunteerMetrics>,
    pub global: GlobalMetrics,
}

/// Computes per-volunteer and global fairness metrics for `assignment`.
pub fn compute(ctx: &Context, assignment: &Assignment) -> Metrics {
    let mut per_volunteer = Vec::with_capacity(ctx.volunteers.len());
    let mut total_assignments = 0usize;
    let mut from_preferences = 0usize;

    for (vi, volunteer) in ctx.volunteers.iter().enumerate() {
        let assigned: Vec<usize> = ctx
            .shifts
            .iter()
            .enumerate()
            .filter(|(_, s)| assignment.volunteers_for(&s.id).any(|v| v == volunteer.name))
            .map(|(si, _)| si)
            .collect();
        let _ = vi;

        let mut satisfaction = 0i64;
        let mut rank_hits = [0u32; 5];
        let mut points = 0.0;
        for &si in &assigned {
            let rank = volunteer.rank_for(&ctx.shifts[si].id);
            satisfaction += satisfaction_weight(rank);
            points += ctx.shifts[si].points;
            if let Some(r @ 1..=5) = rank {
                rank_hits[(r - 1) as usize] += 1;
                from_preferences += 1;
            }
        }
        total_assignments += assigned.len();

        let avg_satisfaction = if assigned.is_empty() {
            0.0
        } else {
            satisfaction as f64 / assigned.len() as f64
        };

        let reached_effective_min = points >= volunteer.effective_min(&ctx.settings) - 1e-9;

        per_volunteer.push(VolunteerMetrics {
            name: volunteer.name.clone(),
            satisfaction,
            avg_satisfaction,
            rank_hits,
            shift_count: assigned.len(),
            points,
            reached_effective_min,
        });
    }

    let n = per_volunteer.len().max(1) as f64;
    let avgs: Vec<f64> = per_volunteer.iter().map(|v| v.avg_satisfaction).collect();
    let min_avg = avgs.iter().copied().fold(f64::INFINITY, f64::min);
    let max_avg = avgs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean_avg = avgs.iter().sum::<f64>() / n;
    let variance = avgs.iter().map(|a| (a - mean_avg).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    let fairness_index = if max_avg > 0.0 {
        (1.0 - stddev / max_avg).max(0.0)
    } else {
        0.0
    };

    let pct_assignments_from_preferences = if total_assignments == 0 {
        0.0
    } else {
        100.0 * from_preferences as f64 / total_assignments as f64
    };

    let reaching = per_volunteer.iter().filter(|v| v.reached_effective_min).count();
    let pct_volunteers_reaching_effective_min = 100.0 * reaching as f64 / n;

    Metrics {
        per_volunteer,
        global: GlobalMetrics {
            min_avg_satisfaction: if min_avg.is_finite() { min_avg } else { 0.0 },
            max_avg_satisfaction: if max_avg.is_finite() { max_avg } else { 0.0 },
            mean_avg_satisfaction: mean_avg,
            stddev_avg_satisfaction: stddev,
            fairness_index,
            pct_assignments_from_preferences,
            pct_volunteers_reaching_effective_min,
        },
    }
}
