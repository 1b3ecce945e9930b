//! Input validation errors.
//!
//! Per the core's error taxonomy, validation is the caller's responsibility,
//! but a defensive implementation repeats the checks before any solving
//! begins and signals `CoreError` rather than silently misbehaving.

use thiserror::Error;

/// Raised by [`crate::domain::Context::build`] before the core ever invokes
/// a solver. A clean input never produces one of these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("duplicate volunteer name: {0}")]
    DuplicateVolunteerName(String),

    #[error("duplicate shift id: {0}")]
    DuplicateShiftId(String),

    #[error("volunteer {volunteer} ranks unknown shift {shift}")]
    UnknownShiftReference { volunteer: String, shift: String },

    #[error("shift {shift} has end <= start")]
    NonPositiveDuration { shift: String },

    #[error("shift {shift} has capacity {capacity}, must be >= 1")]
    NonPositiveCapacity { shift: String, capacity: i64 },
}
