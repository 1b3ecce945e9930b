//! Data model: `Shift`, `Volunteer`, `Settings`, `ConflictGraph`, `Assignment`,
//! and the solver's output contract `SolverResult`.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::conflict;
use crate::error::CoreError;

/// A shift that needs to be staffed. Immutable after input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub id: String,
    pub role: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub capacity: u32,
    /// Half-unit granularity (e.g. `1.5`). Scaled by 10 inside the MILP.
    pub points: f64,
}

impl Shift {
    pub fn new(
        id: impl Into<String>,
        role: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        capacity: u32,
        points: f64,
    ) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            start,
            end,
            capacity,
            points,
        }
    }

    /// The opaque day key; comparisons against it are equality only.
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Points scaled by 10 and rounded to the nearest integer, kept fully
    /// integer so the MILP is deterministic across solver backends.
    pub fn scaled_points(&self) -> i64 {
        (self.points * 10.0).round() as i64
    }
}

/// A volunteer offering a ranked list of shift preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volunteer {
    pub name: String,
    /// Half-unit granularity, non-negative.
    pub pre_assigned_points: f64,
    /// Shift id -> rank (1 = most preferred). Unranked shifts are absent.
    pub preferences: HashMap<String, u32>,
}

impl Volunteer {
    pub fn new(name: impl Into<String>, pre_assigned_points: f64) -> Self {
        Self {
            name: name.into(),
            pre_assigned_points,
            preferences: HashMap::new(),
        }
    }

    pub fn with_preference(mut self, shift_id: impl Into<String>, rank: u32) -> Self {
        self.preferences.insert(shift_id.into(), rank);
        self
    }

    pub fn rank_for(&self, shift_id: &str) -> Option<u32> {
        self.preferences.get(shift_id).copied()
    }

    /// `effective_min = max(0, min_points - pre_assigned_points)`.
    pub fn effective_min(&self, settings: &Settings) -> f64 {
        (settings.min_points - self.pre_assigned_points).max(0.0)
    }

    /// `effective_max = effective_min + max_over`.
    pub fn effective_max(&self, settings: &Settings) -> f64 {
        self.effective_min(settings) + settings.max_over
    }
}

/// Problem-wide parameters. Constructed by the caller, or recommended by the
/// Setting Detector (`crate::detector::detect`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub min_points: f64,
    pub max_over: f64,
    pub max_shifts: u32,
    pub forbid_back_to_back: bool,
    pub back_to_back_gap_hours: f64,
    /// 0 disables the guarantee.
    pub guarantee_level: u32,
    pub allow_relaxation: bool,
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_points: 0.0,
            max_over: 0.0,
            max_shifts: u32::MAX,
            forbid_back_to_back: false,
            back_to_back_gap_hours: 2.0,
            guarantee_level: 0,
            allow_relaxation: true,
            seed: 1,
        }
    }
}

/// The satisfaction weight table `W(r)`: part of the external contract.
/// `W(1)=5 .. W(5)=1`, everything else (unranked, or rank > 5) is `0`.
pub fn satisfaction_weight(rank: Option<u32>) -> i64 {
    match rank {
        Some(r @ 1..=5) => 6 - r as i64,
        _ => 0,
    }
}

/// Stepped hard-fill preference reward: part of the external contract.
pub fn hard_fill_reward(rank: Option<u32>) -> i64 {
    match rank {
        Some(1) => 500,
        Some(2) => 300,
        Some(3) => 200,
        Some(4) => 100,
        Some(5) => 50,
        _ => 1,
    }
}

/// The large soft penalty applied per assigned sequential (back-to-back)
/// pair when `forbid_back_to_back` is false.
pub const SEQUENTIAL_PENALTY: i64 = 100_000;

/// Two sets of pairs of shift *indices* (into `Context::shifts`) derived
/// purely from shift timing. Indices rather than ids, the way the teacher's
/// `Shift.employee_idx` indexes into `EmployeeSchedule.employees` for O(1)
/// joins instead of carrying a cloned string around.
#[derive(Debug, Clone, Default)]
pub struct ConflictGraph {
    /// Unordered pairs `{a, b}` (stored as `a < b`) that overlap in time.
    pub overlap_pairs: Vec<(usize, usize)>,
    /// Directed pairs `(a, b)` where `b` starts within the back-to-back gap
    /// after `a` ends.
    pub sequential_pairs: Vec<(usize, usize)>,
}

/// An immutable bundle of validated input, threaded through the pure
/// functions that make up the rest of the core instead of being rebuilt or
/// captured by closures at each step.
#[derive(Debug, Clone)]
pub struct Context {
    pub shifts: Vec<Shift>,
    pub volunteers: Vec<Volunteer>,
    pub settings: Settings,
    pub conflict: ConflictGraph,
    shift_index: HashMap<String, usize>,
}

impl Context {
    /// Validates the input and builds a `Context`. Duplicate volunteer
    /// names, duplicate shift ids, preferences referencing unknown shifts,
    /// and non-positive-duration/capacity shifts are all rejected here, even
    /// though the spec treats a clean input as the caller's precondition.
    pub fn build(
        shifts: Vec<Shift>,
        volunteers: Vec<Volunteer>,
        settings: Settings,
    ) -> Result<Self, CoreError> {
        let mut shift_index = HashMap::with_capacity(shifts.len());
        for (i, s) in shifts.iter().enumerate() {
            if s.end <= s.start {
                return Err(CoreError::NonPositiveDuration { shift: s.id.clone() });
            }
            if s.capacity == 0 {
                return Err(CoreError::NonPositiveCapacity {
                    shift: s.id.clone(),
                    capacity: 0,
                });
            }
            if shift_index.insert(s.id.clone(), i).is_some() {
                return Err(CoreError::DuplicateShiftId(s.id.clone()));
            }
        }

        let mut seen_names = HashSet::with_capacity(volunteers.len());
        for v in &volunteers {
            if !seen_names.insert(v.name.clone()) {
                return Err(CoreError::DuplicateVolunteerName(v.name.clone()));
            }
            for shift_id in v.preferences.keys() {
                if !shift_index.contains_key(shift_id) {
                    return Err(CoreError::UnknownShiftReference {
                        volunteer: v.name.clone(),
                        shift: shift_id.clone(),
                    });
                }
            }
        }

        let conflict = conflict::build_conflict_graph(&shifts, settings.back_to_back_gap_hours);

        Ok(Self {
            shifts,
            volunteers,
            settings,
            conflict,
            shift_index,
        })
    }

    pub fn shift_idx(&self, id: &str) -> Option<usize> {
        self.shift_index.get(id).copied()
    }

    /// Rank of `volunteer_idx` for `shift_idx`, resolved through the shift's
    /// id (preferences are keyed by id in the public `Volunteer` type).
    pub fn rank(&self, volunteer_idx: usize, shift_idx: usize) -> Option<u32> {
        self.volunteers[volunteer_idx].rank_for(&self.shifts[shift_idx].id)
    }
}

/// Output: a set of (volunteer_name, shift_id) pairs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assignment {
    pub pairs: Vec<(String, String)>,
}

impl Assignment {
    pub fn shifts_for<'a>(&'a self, volunteer: &'a str) -> impl Iterator<Item = &'a str> {
        self.pairs
            .iter()
            .filter(move |(v, _)| v == volunteer)
            .map(|(_, s)| s.as_str())
    }

    pub fn volunteers_for<'a>(&'a self, shift: &'a str) -> impl Iterator<Item = &'a str> {
        self.pairs
            .iter()
            .filter(move |(_, s)| s == shift)
            .map(|(v, _)| v.as_str())
    }

    pub fn occupancy(&self, shift: &str) -> usize {
        self.volunteers_for(shift).count()
    }
}

/// One of the three named relaxation levels the hard-fill phase sweeps
/// through, in order. The labels and multipliers are part of the external
/// contract (reports disclose them to users).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelaxationLevel {
    Full,
    RelaxedPoints,
    Minimal,
}

impl RelaxationLevel {
    pub const ALL: [RelaxationLevel; 3] = [
        RelaxationLevel::Full,
        RelaxationLevel::RelaxedPoints,
        RelaxationLevel::Minimal,
    ];

    /// `(workload-floor, shift-count, workload-ceiling)` multipliers.
    pub fn multipliers(self) -> (f64, f64, f64) {
        match self {
            RelaxationLevel::Full => (1.0, 1.0, 1.0),
            RelaxationLevel::RelaxedPoints => (0.5, 1.5, 1.5),
            RelaxationLevel::Minimal => (0.0, 2.0, 2.0),
        }
    }
}

/// Attached to a `SolverResult` when the hard-fill phase succeeded at a
/// level other than `full`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelaxationDescriptor {
    pub level: RelaxationLevel,
    pub min_points_multiplier: f64,
    pub max_shifts_multiplier: f64,
    pub max_over_multiplier: f64,
}

impl RelaxationDescriptor {
    pub fn for_level(level: RelaxationLevel) -> Self {
        let (floor, shifts, ceiling) = level.multipliers();
        Self {
            level,
            min_points_multiplier: floor,
            max_shifts_multiplier: shifts,
            max_over_multiplier: ceiling,
        }
    }
}

/// A structural cause the Infeasibility Diagnoser attributes a failed run
/// to. The type names are part of the external contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisKind {
    CapacityExcess,
    PointsShortage,
    PointsExcess,
    ConcurrentOverlap,
    BackToBackTight,
    GuaranteeImpossible,
    GuaranteeBottleneck,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisEntry {
    pub kind: DiagnosisKind,
    pub description: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnosis {
    pub entries: Vec<DiagnosisEntry>,
}

impl Diagnosis {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The discriminated solver outcome. `Optimal`/`Feasible` carry a valid
/// assignment; `Infeasible`/`Transient` are control-flow signals the
/// egalitarian search and hard-fill phase recover from internally, and only
/// surface to the caller once every parameter combination is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverStatus {
    Optimal,
    Feasible,
    Infeasible,
    Transient,
}

impl SolverStatus {
    pub fn is_success(self) -> bool {
        matches!(self, SolverStatus::Optimal | SolverStatus::Feasible)
    }
}

/// The core's full output contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverResult {
    pub status: SolverStatus,
    pub assignment: Assignment,
    /// 1 = egalitarian search only, 2 = hard-fill was invoked.
    pub phase: u8,
    pub relaxation: Option<RelaxationDescriptor>,
    pub diagnosis: Option<Diagnosis>,
    pub metrics: Option<crate::metrics::Metrics>,
    pub summary: String,
}
