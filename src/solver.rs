//! Solver Adapter: a thin wrapper over the backing MILP solver (`good_lp`,
//! using its pure-Rust `microlp` backend so the crate carries no system
//! solver dependency — the backend is swappable by feature flag, the only
//! abstraction boundary the rest of the core depends on).
//!
//! Normalizes solver-specific termination into the `Optimal / Feasible /
//! Infeasible / Transient` taxonomy and extracts the 0/1 assignment by
//! thresholding primal `x` values at 0.5.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use good_lp::{Solution, SolverModel};

use crate::domain::SolverStatus;
use crate::milp::MilpModel;

/// The primal `x[v,s] = 1` set extracted from a successful solve.
pub type PrimalAssignment = HashMap<(usize, usize), bool>;

#[derive(Clone)]
pub struct SolveOutcome {
    pub status: SolverStatus,
    pub primal: Option<PrimalAssignment>,
}

/// Solves `model` and normalizes the result.
///
/// `good_lp`'s error taxonomy collapses to two recognizable cases:
/// infeasible and unbounded both indicate no assignment satisfies the
/// constraints at these parameters (`Infeasible`, per the spec's explicit
/// "infeasible, infeasible or unbounded" bucket); any other solver error, or
/// a panic inside the solver (caught here so one bad model never aborts the
/// whole invocation), is a recognized-flaky pattern and maps to `Transient`.
pub fn solve(model: MilpModel) -> SolveOutcome {
    let MilpModel {
        variables,
        objective,
        constraints,
        x_vars,
    } = model;

    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut problem = variables.minimise(objective).using(good_lp::microlp);
        for c in constraints {
            problem = problem.with(c);
        }
        problem.solve()
    }));

    let solved = match result {
        Ok(inner) => inner,
        Err(_) => {
            return SolveOutcome {
                status: SolverStatus::Transient,
                primal: None,
            }
        }
    };

    match solved {
        Ok(solution) => {
            let primal = x_vars
                .iter()
                .map(|(&key, &var)| (key, solution.value(var) > 0.5))
                .collect();
            SolveOutcome {
                status: SolverStatus::Optimal,
                primal: Some(primal),
            }
        }
        Err(good_lp::ResolutionError::Infeasible) | Err(good_lp::ResolutionError::Unbounded) => {
            SolveOutcome {
                status: SolverStatus::Infeasible,
                primal: None,
            }
        }
        Err(_) => SolveOutcome {
            status: SolverStatus::Transient,
            primal: None,
        },
    }
}
