//! MILP Model Builder: translates a `(Context, phase)` tuple into a MILP
//! instance — variables, objective, constraints — without solving it. The
//! Solver Adapter (`crate::solver`) owns the actual `good_lp` solve call.

use std::collections::HashMap;

use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};

use crate::domain::{satisfaction_weight, hard_fill_reward, Context, RelaxationLevel, SEQUENTIAL_PENALTY};
use crate::rng::Lcg;

/// Which of the two optimization phases a model is built for.
#[derive(Debug, Clone, Copy)]
pub enum Phase {
    /// The maximin binary-search phase. `tau` is the current average-
    /// satisfaction target.
    Egalitarian { tau: f64 },
    /// The capacity-equality phase with a named relaxation level applied to
    /// the workload/shift-count bounds.
    HardFill { relaxation: RelaxationLevel },
}

impl Phase {
    fn is_hard_fill(self) -> bool {
        matches!(self, Phase::HardFill { .. })
    }
}

/// A built-but-unsolved model: variables, objective, and constraints,
/// plus the index used to project solver output back onto (volunteer,
/// shift) pairs.
pub struct MilpModel {
    pub variables: ProblemVariables,
    pub objective: Expression,
    pub constraints: Vec<Constraint>,
    pub x_vars: HashMap<(usize, usize), Variable>,
}

fn scaled(points: f64) -> i64 {
    (points * 10.0).round() as i64
}

/// Lower bounds are floored after scaling so rounding never tightens a
/// workload floor beyond what the real-valued settings intended (§9).
fn scaled_floor(points: f64) -> i64 {
    (points * 10.0).floor() as i64
}

/// Upper bounds are ceiled after scaling so rounding never tightens a
/// workload ceiling beyond what the real-valued settings intended (§9).
fn scaled_ceil(points: f64) -> i64 {
    (points * 10.0).ceil() as i64
}

/// Builds the model for `ctx` at the given `phase`.
pub fn build(ctx: &Context, phase: Phase) -> MilpModel {
    let num_v = ctx.volunteers.len();
    let num_s = ctx.shifts.len();
    let settings = &ctx.settings;

    let mut variables = ProblemVariables::new();
    let mut x_vars: HashMap<(usize, usize), Variable> = HashMap::with_capacity(num_v * num_s);
    for vi in 0..num_v {
        for si in 0..num_s {
            x_vars.insert((vi, si), variables.add(variable().binary()));
        }
    }

    let mut y_vars: HashMap<(usize, (usize, usize)), Variable> = HashMap::new();
    if !settings.forbid_back_to_back {
        for vi in 0..num_v {
            for &pair in &ctx.conflict.sequential_pairs {
                y_vars.insert((vi, pair), variables.add(variable().binary()));
            }
        }
    }

    let mut jitter = Lcg::new(settings.seed);
    let mut jitter_at: HashMap<(usize, usize), i64> = HashMap::with_capacity(num_v * num_s);
    if phase.is_hard_fill() {
        // Deterministic in input order, per the ordering-guarantees contract.
        for vi in 0..num_v {
            for si in 0..num_s {
                jitter_at.insert((vi, si), jitter.next_jitter());
            }
        }
    }

    // ---- Objective ----
    let mut obj_terms: Vec<Expression> = Vec::with_capacity(num_v * num_s + y_vars.len());
    for vi in 0..num_v {
        for si in 0..num_s {
            let rank = ctx.rank(vi, si);
            let coeff: f64 = match phase {
                Phase::Egalitarian { .. } => -(satisfaction_weight(rank) as f64),
                Phase::HardFill { .. } => {
                    let reward = hard_fill_reward(rank) + jitter_at[&(vi, si)];
                    -(reward as f64)
                }
            };
            obj_terms.push(coeff * x_vars[&(vi, si)]);
        }
    }
    for (&key, &var) in &y_vars {
        let _ = key;
        obj_terms.push((SEQUENTIAL_PENALTY as f64) * var);
    }
    let objective: Expression = obj_terms.into_iter().sum();

    // ---- Constraints ----
    let mut constraints = Vec::new();

    let (floor_mult, shift_count_mult, ceiling_mult) = match phase {
        Phase::Egalitarian { .. } => (1.0, 1.0, 1.0),
        Phase::HardFill { relaxation } => relaxation.multipliers(),
    };

    // 1. Shift capacity.
    for si in 0..num_s {
        let lhs: Expression = (0..num_v).map(|vi| x_vars[&(vi, si)]).sum();
        let cap = ctx.shifts[si].capacity as f64;
        if phase.is_hard_fill() {
            constraints.push(constraint!(lhs == cap));
        } else {
            constraints.push(constraint!(lhs <= cap));
        }
    }

    for vi in 0..num_v {
        let volunteer = &ctx.volunteers[vi];

        // 2/3. Workload floor and ceiling, in scaled-integer point units.
        let points_expr_floor: Expression = (0..num_s)
            .map(|si| (scaled(ctx.shifts[si].points) as f64) * x_vars[&(vi, si)])
            .sum();
        let points_expr_ceiling: Expression = (0..num_s)
            .map(|si| (scaled(ctx.shifts[si].points) as f64) * x_vars[&(vi, si)])
            .sum();
        let floor = scaled_floor(volunteer.effective_min(settings) * floor_mult) as f64;
        let ceiling = scaled_ceil(volunteer.effective_max(settings) * ceiling_mult) as f64;
        constraints.push(constraint!(points_expr_floor >= floor));
        constraints.push(constraint!(points_expr_ceiling <= ceiling));

        // 4. Shift-count ceiling.
        let count_expr_max: Expression = (0..num_s).map(|si| x_vars[&(vi, si)]).sum();
        let count_expr_min: Expression = (0..num_s).map(|si| x_vars[&(vi, si)]).sum();
        let max_shifts = settings.max_shifts as f64 * shift_count_mult;
        constraints.push(constraint!(count_expr_max <= max_shifts));

        // 5. Assignment minimum.
        constraints.push(constraint!(count_expr_min >= 1));

        // 6. Guarantee.
        if settings.guarantee_level > 0 {
            let eligible: Vec<usize> = (0..num_s)
                .filter(|&si| {
                    ctx.rank(vi, si)
                        .is_some_and(|r| r <= settings.guarantee_level)
                })
                .collect();
            if !eligible.is_empty() {
                let guarantee_expr: Expression =
                    eligible.iter().map(|&si| x_vars[&(vi, si)]).sum();
                constraints.push(constraint!(guarantee_expr >= 1));
            }
            // else: no eligible shift exists for this volunteer; constraint
            // 5 (assignment minimum) already covers the fallback.
        }
    }

    // 7. Overlap: no volunteer double-booked on an overlapping pair.
    for &(a, b) in &ctx.conflict.overlap_pairs {
        for vi in 0..num_v {
            let expr = x_vars[&(vi, a)] + x_vars[&(vi, b)];
            constraints.push(constraint!(expr <= 1));
        }
    }

    // 8. Back-to-back: hard-forbidden, or soft via the penalty variable.
    for &pair @ (a, b) in &ctx.conflict.sequential_pairs {
        for vi in 0..num_v {
            if settings.forbid_back_to_back {
                let expr = x_vars[&(vi, a)] + x_vars[&(vi, b)];
                constraints.push(constraint!(expr <= 1));
            } else {
                let y = y_vars[&(vi, pair)];
                let expr = x_vars[&(vi, a)] + x_vars[&(vi, b)] - y;
                constraints.push(constraint!(expr <= 1));
            }
        }
    }

    // Phase-1-only: the maximin egalitarian average-satisfaction constraint.
    if let Phase::Egalitarian { tau } = phase {
        for vi in 0..num_v {
            let expr: Expression = (0..num_s)
                .map(|si| {
                    let rank = ctx.rank(vi, si);
                    (satisfaction_weight(rank) as f64 - tau) * x_vars[&(vi, si)]
                })
                .sum();
            constraints.push(constraint!(expr >= 0));
        }
    }

    MilpModel {
        variables,
        objective,
        constraints,
        x_vars,
    }
}
