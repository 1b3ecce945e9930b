//! Egalitarian Search: binary search over the achievable minimum-per-
//! volunteer average satisfaction `tau`, invoking the Model Builder and
//! Solver Adapter at each step.
//!
//! The constraint set grows monotonically tighter with `tau`, so a single
//! binary search suffices instead of re-deriving a classic maximin LP — the
//! *average*-satisfaction form is nonlinear in the assigned-shift count, so
//! this reformulation keeps each inner solve a plain MILP at the cost of
//! `log2(5 / 0.1) ≈ 6` solver calls.

use std::time::Instant;

use crate::domain::Context;
use crate::milp::{self, Phase};
use crate::solver::{self, SolveOutcome};

const LOW: f64 = 0.0;
const HIGH: f64 = 5.0;
const TOLERANCE: f64 = 0.1;

pub struct EgalitarianOutcome {
    pub best: Option<(f64, SolveOutcome)>,
    /// True if a deadline interrupted the search before it converged.
    pub cancelled: bool,
}

/// Runs the binary search. `deadline`, if set, is checked before each solver
/// call (the core's only suspension points); once it passes, the search
/// stops and returns whatever `best` it has accumulated so far.
pub fn run(ctx: &Context, deadline: Option<Instant>) -> EgalitarianOutcome {
    let mut low = LOW;
    let mut high = HIGH;
    let mut best: Option<(f64, SolveOutcome)> = None;

    while high - low > TOLERANCE {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            tracing::warn!("egalitarian search cancelled at deadline");
            return EgalitarianOutcome {
                best,
                cancelled: true,
            };
        }

        let tau = (low + high) / 2.0;
        let model = milp::build(ctx, Phase::Egalitarian { tau });
        let outcome = solver::solve(model);

        tracing::debug!(tau, status = ?outcome.status, "egalitarian iteration");

        if outcome.status.is_success() {
            low = tau;
            best = Some((tau, outcome));
        } else {
            high = tau;
        }
    }

    EgalitarianOutcome {
        best,
        cancelled: false,
    }
}
