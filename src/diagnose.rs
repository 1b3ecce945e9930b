//! Infeasibility Diagnoser: heuristic structural checks on the input and
//! settings, run only after both optimization phases have failed. Sound
//! (every emitted diagnosis corresponds to a property that truly holds) but
//! not complete (a failure may have no rule that fires).

use crate::domain::{Context, Diagnosis, DiagnosisEntry, DiagnosisKind};

/// The canonical scanline algorithm for interval-overlap-depth: build
/// `(timestamp, +/-capacity)` events, sort by time (stable), and scan with a
/// running sum. The maximum is the peak concurrent capacity demand.
fn peak_concurrent_capacity(ctx: &Context) -> i64 {
    let mut events: Vec<(chrono::NaiveDateTime, i64)> = Vec::with_capacity(ctx.shifts.len() * 2);
    for s in &ctx.shifts {
        events.push((s.start, s.capacity as i64));
        events.push((s.end, -(s.capacity as i64)));
    }
    events.sort_by_key(|&(t, _)| t);

    let mut running = 0i64;
    let mut peak = 0i64;
    for (_, delta) in events {
        running += delta;
        peak = peak.max(running);
    }
    peak
}

/// Runs every rule and returns the (possibly empty) list of diagnoses that
/// fired.
pub fn diagnose(ctx: &Context) -> Diagnosis {
    let mut entries = Vec::new();
    let settings = &ctx.settings;
    let num_volunteers = ctx.volunteers.len() as i64;
    let num_shifts = ctx.shifts.len().max(1) as f64;

    let total_capacity: i64 = ctx.shifts.iter().map(|s| s.capacity as i64).sum();
    let total_available_points: f64 = ctx.shifts.iter().map(|s| s.points * s.capacity as f64).sum();
    let total_effective_min: f64 = ctx
        .volunteers
        .iter()
        .map(|v| v.effective_min(settings))
        .sum();
    let total_effective_min_plus_over: f64 = ctx
        .volunteers
        .iter()
        .map(|v| v.effective_min(settings) + settings.max_over)
        .sum();

    if total_capacity > num_volunteers * settings.max_shifts as i64 {
        entries.push(DiagnosisEntry {
            kind: DiagnosisKind::CapacityExcess,
            description: format!(
                "total shift capacity ({total_capacity}) exceeds volunteers * max_shifts ({})",
                num_volunteers * settings.max_shifts as i64
            ),
            suggestion: "Add volunteers / raise max_shifts / lower capacities.".to_string(),
        });
    }

    if total_available_points < total_effective_min {
        entries.push(DiagnosisEntry {
            kind: DiagnosisKind::PointsShortage,
            description: format!(
                "total available points ({total_available_points:.1}) is below the sum of effective minimums ({total_effective_min:.1})"
            ),
            suggestion: "Lower min_points or raise points / capacities.".to_string(),
        });
    }

    if total_available_points > 1.5 * total_effective_min_plus_over {
        entries.push(DiagnosisEntry {
            kind: DiagnosisKind::PointsExcess,
            description: format!(
                "total available points ({total_available_points:.1}) exceeds 1.5x the sum of (effective_min + max_over) ({:.1})",
                total_effective_min_plus_over
            ),
            suggestion: "Raise max_over / add volunteers / lower points.".to_string(),
        });
    }

    let peak = peak_concurrent_capacity(ctx);
    if peak > num_volunteers {
        entries.push(DiagnosisEntry {
            kind: DiagnosisKind::ConcurrentOverlap,
            description: format!(
                "peak concurrent shift capacity demand ({peak}) exceeds the number of volunteers ({num_volunteers})"
            ),
            suggestion: "Stagger shifts / add volunteers.".to_string(),
        });
    }

    if settings.forbid_back_to_back {
        let ratio = 2.0 * ctx.conflict.sequential_pairs.len() as f64 / num_shifts;
        if ratio > 2.0 {
            entries.push(DiagnosisEntry {
                kind: DiagnosisKind::BackToBackTight,
                description: format!(
                    "sequential-pair density ({ratio:.2}) is too high under forbid_back_to_back"
                ),
                suggestion: "Switch to \"minimize\" mode.".to_string(),
            });
        }
    }

    if settings.guarantee_level > 0 {
        let impossible: Vec<&str> = ctx
            .volunteers
            .iter()
            .enumerate()
            .filter(|(vi, _)| {
                !(0..ctx.shifts.len())
                    .any(|si| ctx.rank(*vi, si).is_some_and(|r| r <= settings.guarantee_level))
            })
            .map(|(_, v)| v.name.as_str())
            .collect();
        if !impossible.is_empty() {
            entries.push(DiagnosisEntry {
                kind: DiagnosisKind::GuaranteeImpossible,
                description: format!(
                    "{} volunteer(s) have no shift ranked within guarantee_level {}: {}",
                    impossible.len(),
                    settings.guarantee_level,
                    impossible.join(", ")
                ),
                suggestion: "Lower guarantee level.".to_string(),
            });
        }

        let bottlenecked = ctx
            .volunteers
            .iter()
            .enumerate()
            .filter(|(vi, _)| {
                let top_capacity: i64 = (0..ctx.shifts.len())
                    .filter(|&si| ctx.rank(*vi, si).is_some_and(|r| r <= settings.guarantee_level))
                    .map(|si| ctx.shifts[si].capacity as i64)
                    .sum();
                top_capacity <= 2
            })
            .count();
        if bottlenecked > 5 {
            entries.push(DiagnosisEntry {
                kind: DiagnosisKind::GuaranteeBottleneck,
                description: format!(
                    "{bottlenecked} volunteers have <= 2 total capacity in their top-{} preferences",
                    settings.guarantee_level
                ),
                suggestion: "Diversify preferences or lower guarantee.".to_string(),
            });
        }
    }

    Diagnosis { entries }
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
    fn flags_points_shortage() {
        let shifts: Vec<Shift> = (0..15)
            .map(|i| Shift::new(format!("s{i}"), "r", dt(9), dt(11), 1, 10.0 / 3.0))
            .collect();
        let volunteers: Vec<Volunteer> = (0..10).map(|i| Volunteer::new(format!("v{i}"), 0.0)).collect();
        let settings = Settings {
            min_points: 6.0,
            max_over: 1.0,
            allow_relaxation: false,
            ..Settings::default()
        };
        let ctx = Context::build(shifts, volunteers, settings).unwrap();
        let diagnosis = diagnose(&ctx);
        assert!(diagnosis
            .entries
            .iter()
            .any(|e| e.kind == DiagnosisKind::PointsShortage));
    }

    #[test]
    fn flags_capacity_excess() {
        let shifts: Vec<Shift> = (0..5)
            .map(|i| Shift::new(format!("s{i}"), "r", dt(9), dt(11), 10, 1.0))
            .collect();
        let volunteers = vec![Volunteer::new("Alice", 0.0)];
        let settings = Settings {
            max_shifts: 1,
            ..Settings::default()
        };
        let ctx = Context::build(shifts, volunteers, settings).unwrap();
        let diagnosis = diagnose(&ctx);
        assert!(diagnosis
            .entries
            .iter()
            .any(|e| e.kind == DiagnosisKind::CapacityExcess));
    }

    #[test]
    fn sound_not_complete_no_false_trigger_on_balanced_input() {
        let shifts = vec![
            Shift::new("a", "r", dt(9), dt(11), 1, 2.0),
            Shift::new("b", "r", dt(12), dt(14), 1, 2.0),
        ];
        let volunteers = vec![
            Volunteer::new("Alice", 0.0).with_preference("a", 1),
            Volunteer::new("Bob", 0.0).with_preference("b", 1),
        ];
        let settings = Settings {
            min_points: 2.0,
            max_over: 0.0,
            max_shifts: 1,
            ..Settings::default()
        };
        let ctx = Context::build(shifts, volunteers, settings).unwrap();
        let diagnosis = diagnose(&ctx);
        assert!(diagnosis.entries.is_empty());
    }
}
