//! End-to-end acceptance scenarios S1-S6 from the spec's testable-properties
//! section, driven entirely through the public API (`solve`).

use chrono::NaiveDate;
use shift_assignment_core::{solve, RelaxationLevel, Settings, Shift, SolverStatus, Volunteer};

fn dt(day: u32, hour: u32, minute: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// S1 - Trivial optimum: two non-overlapping shifts, two volunteers with
/// opposite top preferences. Both should get their #1 in phase 1.
#[test]
fn s1_trivial_optimum() {
    let shifts = vec![
        Shift::new("A", "role", dt(1, 9, 0), dt(1, 11, 0), 1, 2.0),
        Shift::new("B", "role", dt(1, 11, 0), dt(1, 13, 0), 1, 2.0),
    ];
    let volunteers = vec![
        Volunteer::new("Alice", 0.0)
            .with_preference("A", 1)
            .with_preference("B", 2),
        Volunteer::new("Bob", 0.0)
            .with_preference("B", 1)
            .with_preference("A", 2),
    ];
    let settings = Settings {
        min_points: 2.0,
        max_over: 0.0,
        max_shifts: 1,
        guarantee_level: 1,
        ..Settings::default()
    };

    let result = solve(shifts, volunteers, settings, None).unwrap();

    assert_eq!(result.status, SolverStatus::Optimal);
    assert_eq!(result.phase, 1);
    assert!(result
        .assignment
        .pairs
        .contains(&("Alice".to_string(), "A".to_string())));
    assert!(result
        .assignment
        .pairs
        .contains(&("Bob".to_string(), "B".to_string())));

    let metrics = result.metrics.unwrap();
    let alice = metrics
        .per_volunteer
        .iter()
        .find(|v| v.name == "Alice")
        .unwrap();
    let bob = metrics.per_volunteer.iter().find(|v| v.name == "Bob").unwrap();
    assert_eq!(alice.rank_hits[0], 1, "Alice should have one rank-1 hit");
    assert_eq!(bob.rank_hits[0], 1, "Bob should have one rank-1 hit");
}

/// S2 - Maximin beats total: the sum-maximizing assignment (Alice gets
/// shift-1+3, Bob gets shift-2) is rejected because it leaves Bob with a
/// lower average than the maximin alternative. Bob, who only ranks shift-3,
/// must receive it; Alice absorbs the remaining two shifts.
#[test]
fn s2_maximin_beats_total() {
    let shifts = vec![
        Shift::new("shift-1", "role", dt(1, 9, 0), dt(1, 11, 0), 1, 2.0),
        Shift::new("shift-2", "role", dt(2, 9, 0), dt(2, 11, 0), 1, 2.0),
        Shift::new("shift-3", "role", dt(3, 9, 0), dt(3, 11, 0), 1, 2.0),
    ];
    let volunteers = vec![
        Volunteer::new("Alice", 0.0)
            .with_preference("shift-1", 1)
            .with_preference("shift-2", 2)
            .with_preference("shift-3", 3),
        Volunteer::new("Bob", 0.0).with_preference("shift-3", 1),
    ];
    let settings = Settings {
        min_points: 2.0,
        max_over: 2.0,
        max_shifts: 2,
        guarantee_level: 1,
        ..Settings::default()
    };

    let result = solve(shifts, volunteers, settings, None).unwrap();

    assert!(result.status.is_success());
    assert!(result
        .assignment
        .pairs
        .contains(&("Bob".to_string(), "shift-3".to_string())));
    assert_eq!(
        result.assignment.shifts_for("Bob").count(),
        1,
        "Bob should receive only his single ranked shift"
    );
    assert_eq!(
        result.assignment.shifts_for("Alice").count(),
        2,
        "Alice should absorb the remaining two shifts"
    );

    let metrics = result.metrics.unwrap();
    let bob = metrics.per_volunteer.iter().find(|v| v.name == "Bob").unwrap();
    assert!(
        bob.avg_satisfaction > 0.0,
        "Bob's maximin share must not be sacrificed for a higher total"
    );
}

/// S3 - Back-to-back forbidden forces a split: s1 and s2 are sequential
/// under a 2-hour gap; no volunteer may hold both.
#[test]
fn s3_back_to_back_forbidden_forces_split() {
    let shifts = vec![
        Shift::new("s1", "role", dt(1, 9, 0), dt(1, 10, 0), 1, 1.0),
        Shift::new("s2", "role", dt(1, 10, 30), dt(1, 11, 30), 1, 1.0),
        Shift::new("s3", "role", dt(1, 14, 0), dt(1, 15, 0), 1, 1.0),
    ];
    let volunteers = vec![
        Volunteer::new("Alice", 0.0)
            .with_preference("s1", 1)
            .with_preference("s2", 2)
            .with_preference("s3", 3),
        Volunteer::new("Bob", 0.0)
            .with_preference("s1", 1)
            .with_preference("s2", 2)
            .with_preference("s3", 3),
    ];
    let settings = Settings {
        min_points: 1.0,
        max_over: 1.0,
        max_shifts: 2,
        forbid_back_to_back: true,
        back_to_back_gap_hours: 2.0,
        ..Settings::default()
    };

    let result = solve(shifts, volunteers, settings, None).unwrap();

    assert!(result.status.is_success());
    let alice_has_both = result.assignment.shifts_for("Alice").any(|s| s == "s1")
        && result.assignment.shifts_for("Alice").any(|s| s == "s2");
    let bob_has_both = result.assignment.shifts_for("Bob").any(|s| s == "s1")
        && result.assignment.shifts_for("Bob").any(|s| s == "s2");
    assert!(!alice_has_both, "Alice must not hold both sequential shifts");
    assert!(!bob_has_both, "Bob must not hold both sequential shifts");
}

/// S4 - Hard-fill triggered, no relaxation needed: Bob has no preferences at
/// all, so phase 1 cannot find a positive-average assignment for him and
/// yields nothing; hard-fill at the `full` level fills both shifts exactly.
#[test]
fn s4_hard_fill_without_relaxation() {
    let shifts = vec![
        Shift::new("A", "role", dt(1, 9, 0), dt(1, 11, 0), 1, 1.0),
        Shift::new("B", "role", dt(2, 9, 0), dt(2, 11, 0), 1, 1.0),
    ];
    let volunteers = vec![
        Volunteer::new("Alice", 0.0).with_preference("A", 1),
        Volunteer::new("Bob", 0.0),
    ];
    let settings = Settings {
        min_points: 0.0,
        max_over: 2.0,
        max_shifts: 2,
        guarantee_level: 0,
        ..Settings::default()
    };

    let result = solve(shifts, volunteers, settings, None).unwrap();

    assert!(result.status.is_success());
    assert_eq!(result.phase, 2);
    assert!(result.relaxation.is_none());
    assert_eq!(result.assignment.occupancy("A"), 1);
    assert_eq!(result.assignment.occupancy("B"), 1);
}

fn s5_fixture() -> (Vec<Shift>, Vec<Volunteer>, Settings) {
    let shifts: Vec<Shift> = (0..15)
        .map(|i| {
            Shift::new(
                format!("s{i}"),
                "role",
                dt(i + 1, 9, 0),
                dt(i + 1, 11, 0),
                1,
                3.5,
            )
        })
        .collect();
    let volunteers: Vec<Volunteer> = (0..10).map(|i| Volunteer::new(format!("v{i}"), 0.0)).collect();
    let settings = Settings {
        min_points: 6.0,
        max_over: 4.0,
        max_shifts: 3,
        guarantee_level: 0,
        allow_relaxation: true,
        ..Settings::default()
    };
    (shifts, volunteers, settings)
}

/// S5 - Relaxation required: 10 volunteers each need 6 points but only 52.5
/// points of capacity exist across 15 shifts. Full-level hard-fill cannot
/// meet everyone's floor; `relaxed-points` (0.5/1.5/1.5) can.
#[test]
fn s5_relaxation_required() {
    let (shifts, volunteers, settings) = s5_fixture();

    let result = solve(shifts, volunteers, settings, None).unwrap();

    assert!(result.status.is_success());
    assert_eq!(result.phase, 2);
    let relaxation = result.relaxation.expect("relaxed-points level should have been needed");
    assert_eq!(relaxation.level, RelaxationLevel::RelaxedPoints);
    assert_eq!(relaxation.min_points_multiplier, 0.5);
    assert_eq!(relaxation.max_shifts_multiplier, 1.5);
    assert_eq!(relaxation.max_over_multiplier, 1.5);
    assert!(result.diagnosis.is_none());
    for shift_id in (0..15).map(|i| format!("s{i}")) {
        assert_eq!(result.assignment.occupancy(&shift_id), 1);
    }
}

/// S6 - Provably infeasible, diagnosis speaks: identical to S5 but
/// relaxation is disallowed, so only the `full` level is attempted and the
/// points-shortage diagnosis fires.
#[test]
fn s6_infeasible_without_relaxation_yields_diagnosis() {
    let (shifts, volunteers, mut settings) = s5_fixture();
    settings.allow_relaxation = false;

    let result = solve(shifts, volunteers, settings, None).unwrap();

    assert_eq!(result.status, SolverStatus::Infeasible);
    assert!(result.relaxation.is_none());
    let diagnosis = result.diagnosis.expect("a failed run must carry a diagnosis");
    assert!(!diagnosis.entries.is_empty());
    assert!(diagnosis
        .entries
        .iter()
        .any(|e| e.kind == shift_assignment_core::DiagnosisKind::PointsShortage));
}
