//! Hard-Fill Phase: exact-capacity-fill MILP with progressive relaxation of
//! workload bounds, invoked when the egalitarian search leaves a shift
//! underfilled or fails outright.

use std::time::Instant;

use crate::domain::{Context, RelaxationDescriptor, RelaxationLevel};
use crate::milp::{self, Phase};
use crate::solver::{self, SolveOutcome};

pub struct HardFillOutcome {
    pub outcome: SolveOutcome,
    /// `None` when the `full` level (no relaxation) succeeded.
    pub relaxation: Option<RelaxationDescriptor>,
    pub cancelled: bool,
}

/// Sweeps relaxation levels in order, stopping at the first that yields
/// `Optimal`/`Feasible`. Only the `full` level is attempted when
/// `ctx.settings.allow_relaxation` is false.
pub fn run(ctx: &Context, deadline: Option<Instant>) -> HardFillOutcome {
    let levels: &[RelaxationLevel] = if ctx.settings.allow_relaxation {
        &RelaxationLevel::ALL
    } else {
        &RelaxationLevel::ALL[..1]
    };

    let mut last = SolveOutcome {
        status: crate::domain::SolverStatus::Infeasible,
        primal: None,
    };

    for &level in levels {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            tracing::warn!("hard-fill cancelled at deadline");
            return HardFillOutcome {
                outcome: last,
                relaxation: None,
                cancelled: true,
            };
        }

        let model = milp::build(ctx, Phase::HardFill { relaxation: level });
        let outcome = solver::solve(model);

        tracing::info!(?level, status = ?outcome.status, "hard-fill attempt");

        if outcome.status.is_success() {
            let relaxation = if matches!(level, RelaxationLevel::Full) {
                None
            } else {
                Some(RelaxationDescriptor::for_level(level))
            };
            return HardFillOutcome {
                outcome,
                relaxation,
                cancelled: false,
            };
        }
        last = outcome;
    }

    HardFillOutcome {
        outcome: last,
        relaxation: None,
        cancelled: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Settings, Shift, Volunteer};
    use chrono::NaiveDate;

    fn dt(hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn only_tries_full_level_when_relaxation_disallowed() {
        let shifts = vec![Shift::new("a", "r", dt(9), dt(11), 10, 100.0)];
        let volunteers = vec![Volunteer::new("Alice", 0.0)];
        let settings = Settings {
            min_points: 1000.0,
            max_over: 0.0,
            allow_relaxation: false,
            ..Settings::default()
        };
        let ctx = Context::build(shifts, volunteers, settings).unwrap();
        let result = run(&ctx, None);
        assert_eq!(result.outcome.status, crate::domain::SolverStatus::Infeasible);
        assert!(result.relaxation.is_none());
    }
}
