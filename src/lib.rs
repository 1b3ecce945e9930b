//! Shift assignment optimization core for volunteer scheduling.
//!
//! Given shifts (dates, times, capacities, workload points) and volunteers
//! (ranked shift preferences plus prior workload credit), produces an
//! assignment that maximizes the least-satisfied volunteer's average
//! per-shift satisfaction subject to hard constraints on capacity, workload
//! bounds, scheduling conflicts, and preference guarantees.
//!
//! [`orchestrator::solve`] is the main entry point: it validates input via
//! [`domain::Context::build`], runs the egalitarian binary search
//! ([`search`]), falls back to the hard-fill phase ([`hardfill`]) when
//! capacity is left unfilled, and runs the infeasibility diagnoser
//! ([`diagnose`]) when neither phase produces an assignment.

pub mod conflict;
pub mod detector;
pub mod diagnose;
pub mod domain;
pub mod error;
pub mod hardfill;
pub mod matching;
pub mod metrics;
pub mod milp;
pub mod orchestrator;
pub mod rng;
pub mod search;
pub mod solver;

pub use domain::{
    Assignment, Context, DiagnosisKind, RelaxationDescriptor, RelaxationLevel, Settings, Shift,
    SolverResult, SolverStatus, Volunteer,
};
pub use error::CoreError;
pub use orchestrator::solve;
