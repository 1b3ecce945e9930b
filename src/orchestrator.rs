//! Top-level entry point: threads an immutable `Context` through the
//! Egalitarian Search and Hard-Fill phases, and the Infeasibility Diagnoser
//! when both have nothing to offer.
//!
//! Data flow is strictly bottom-up, per the system overview: Egalitarian
//! Search runs first; its coverage is inspected (every shift at capacity?);
//! Hard-Fill is delegated to only when coverage is incomplete or Egalitarian
//! Search found nothing at all. The Diagnoser runs only once both phases
//! have failed to produce any assignment.

use std::time::Instant;

use crate::domain::{
    Assignment, Context, Settings, Shift, SolverResult, SolverStatus, Volunteer,
};
use crate::error::CoreError;
use crate::solver::SolveOutcome;
use crate::{diagnose, hardfill, metrics, search};

/// Builds a `Context` from raw input and runs the full two-phase optimizer.
///
/// This is the crate's main entry point. Input validation (duplicate names,
/// duplicate shift ids, unknown shift references, non-positive durations or
/// capacities) happens in `Context::build` before any solver call.
pub fn solve(
    shifts: Vec<Shift>,
    volunteers: Vec<Volunteer>,
    settings: Settings,
    deadline: Option<Instant>,
) -> Result<SolverResult, CoreError> {
    let ctx = Context::build(shifts, volunteers, settings)?;
    Ok(solve_ctx(&ctx, deadline))
}

fn fully_covered(ctx: &Context, assignment: &Assignment) -> bool {
    ctx.shifts
        .iter()
        .all(|s| assignment.occupancy(&s.id) == s.capacity as usize)
}

fn transient_result(phase: u8) -> SolverResult {
    SolverResult {
        status: SolverStatus::Transient,
        assignment: Assignment::default(),
        phase,
        relaxation: None,
        diagnosis: None,
        metrics: None,
        summary: "cancelled at deadline before any solver call produced a result".to_string(),
    }
}

fn outcome_into_result(
    ctx: &Context,
    outcome: SolveOutcome,
    phase: u8,
    relaxation: Option<crate::domain::RelaxationDescriptor>,
) -> SolverResult {
    let primal = outcome
        .primal
        .as_ref()
        .expect("success outcomes always carry a primal assignment");
    let assignment = metrics::assemble(ctx, primal);
    let computed = metrics::compute(ctx, &assignment);
    let summary = match (phase, relaxation) {
        (1, _) => format!(
            "egalitarian search succeeded: {} volunteers, min avg satisfaction {:.2}",
            ctx.volunteers.len(),
            computed.global.min_avg_satisfaction
        ),
        (_, None) => "hard-fill succeeded at full workload bounds".to_string(),
        (_, Some(r)) => format!("hard-fill succeeded after relaxing to {:?}", r.level),
    };
    SolverResult {
        status: outcome.status,
        assignment,
        phase,
        relaxation,
        diagnosis: None,
        metrics: Some(computed),
        summary,
    }
}

fn infeasible_result(ctx: &Context, phase: u8) -> SolverResult {
    let diagnosis = diagnose::diagnose(ctx);
    tracing::warn!(diagnosis_count = diagnosis.entries.len(), "infeasible, diagnosing");
    let summary = if diagnosis.is_empty() {
        "no feasible assignment found; no structural cause identified".to_string()
    } else {
        format!(
            "no feasible assignment found: {}",
            diagnosis
                .entries
                .iter()
                .map(|e| e.description.as_str())
                .collect::<Vec<_>>()
                .join("; ")
        )
    };
    SolverResult {
        status: SolverStatus::Infeasible,
        assignment: Assignment::default(),
        phase,
        relaxation: None,
        diagnosis: Some(diagnosis),
        metrics: None,
        summary,
    }
}

/// Runs the two-phase optimizer over an already-validated `Context`.
pub fn solve_ctx(ctx: &Context, deadline: Option<Instant>) -> SolverResult {
    let span = tracing::info_span!(
        "solve",
        num_shifts = ctx.shifts.len(),
        num_volunteers = ctx.volunteers.len(),
        seed = ctx.settings.seed
    );
    let _enter = span.enter();

    let egal = search::run(ctx, deadline);

    if egal.cancelled && egal.best.is_none() {
        return transient_result(1);
    }

    let egal_outcome = egal.best.map(|(_, outcome)| outcome);
    let egal_assignment = egal_outcome.as_ref().map(|o| {
        let primal = o
            .primal
            .as_ref()
            .expect("a successful egalitarian outcome always carries a primal assignment");
        metrics::assemble(ctx, primal)
    });

    let needs_hard_fill = match &egal_assignment {
        None => true,
        Some(assignment) => !fully_covered(ctx, assignment),
    };

    if !needs_hard_fill {
        return outcome_into_result(ctx, egal_outcome.unwrap(), 1, None);
    }

    let hf = hardfill::run(ctx, deadline);

    if hf.outcome.status.is_success() {
        return outcome_into_result(ctx, hf.outcome, 2, hf.relaxation);
    }

    if hf.cancelled && egal_outcome.is_none() {
        return transient_result(2);
    }

    // Hard-fill could not improve on (or replace) an incomplete egalitarian
    // solution: fall back to it rather than declaring total failure, since
    // it is a valid assignment under every invariant in §8 save full
    // coverage. Both phases failed only when neither produced anything.
    if let Some(outcome) = egal_outcome {
        return outcome_into_result(ctx, outcome, 2, None);
    }

    infeasible_result(ctx, 2)
}
