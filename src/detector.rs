//! Setting Detector: from raw input, computes recommended and allowed
//! ranges for the workload, preference, and shift-count settings.

use serde::{Deserialize, Serialize};

use crate::domain::{Shift, Volunteer};
use crate::matching;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedSettings {
    pub recommended_min_points: f64,
    pub recommended_max_over: f64,
    pub recommended_max_shifts: u32,
    pub recommended_guarantee_level: u32,
    /// `(min, max)` bounds for `min_points`, used by downstream validators.
    pub min_points_bounds: (f64, f64),
}

fn floor_to_half(x: f64) -> f64 {
    (x * 2.0).floor() / 2.0
}

/// Computes recommended settings and bounds. Pure function over the input;
/// never errors (an empty input yields zeroed-out recommendations).
pub fn detect(volunteers: &[Volunteer], shifts: &[Shift]) -> DetectedSettings {
    let num_volunteers = volunteers.len().max(1) as f64;
    let num_shifts = shifts.len().max(1) as f64;

    let total_available_points: f64 = shifts.iter().map(|s| s.points * s.capacity as f64).sum();
    let total_capacity: f64 = shifts.iter().map(|s| s.capacity as f64).sum();

    let fair_share = total_available_points / num_volunteers;
    let recommended_min_points = floor_to_half(0.85 * fair_share);
    let recommended_max_over = 1.5;

    let avg_shifts = total_capacity / num_volunteers;
    let min_shift_points = shifts
        .iter()
        .map(|s| s.points)
        .filter(|p| *p > 0.0)
        .fold(f64::INFINITY, f64::min);
    let min_shift_points = if min_shift_points.is_finite() {
        min_shift_points
    } else {
        1.0
    };
    // An upper bound on the workload any single volunteer might be pushed to
    // under the recommended settings: floor + the over-allowance.
    let max_pts_per_person = recommended_min_points + recommended_max_over;

    let recommended_max_shifts = [
        (avg_shifts.ceil() as i64) + 3,
        ((max_pts_per_person / min_shift_points).ceil() as i64) + 2,
        ((num_shifts / num_volunteers).ceil() as i64) + 3,
    ]
    .into_iter()
    .max()
    .unwrap_or(1)
    .max(1) as u32;

    let recommended_guarantee_level = if volunteers.is_empty() || shifts.is_empty() {
        0
    } else {
        let (level, _) = matching::detect_strongest_guarantee(volunteers, shifts);
        if level >= 1 {
            level.max(5)
        } else {
            0
        }
    };

    DetectedSettings {
        recommended_min_points,
        recommended_max_over,
        recommended_max_shifts,
        recommended_guarantee_level,
        min_points_bounds: (0.0, fair_share.floor()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn recommends_headroom_below_fair_share() {
        let shifts = vec![
            Shift::new("a", "role", dt(9), dt(11), 1, 2.0),
            Shift::new("b", "role", dt(11), dt(13), 1, 2.0),
        ];
        let volunteers = vec![Volunteer::new("Alice", 0.0), Volunteer::new("Bob", 0.0)];
        let detected = detect(&volunteers, &shifts);
        // total points = 4, fair share = 2, 85% = 1.7 -> floor to half = 1.5
        assert_eq!(detected.recommended_min_points, 1.5);
        assert_eq!(detected.recommended_max_over, 1.5);
    }

    #[test]
    fn empty_input_does_not_panic() {
        let detected = detect(&[], &[]);
        assert_eq!(detected.recommended_min_points, 0.0);
        assert_eq!(detected.recommended_guarantee_level, 0);
    }

    #[test]
    fn guarantee_level_floors_at_five_when_achievable() {
        let shifts = vec![
            Shift::new("a", "role", dt(9), dt(11), 1, 2.0),
            Shift::new("b", "role", dt(11), dt(13), 1, 2.0),
        ];
        let volunteers = vec![
            Volunteer::new("Alice", 0.0).with_preference("a", 1),
            Volunteer::new("Bob", 0.0).with_preference("b", 1),
        ];
        let detected = detect(&volunteers, &shifts);
        assert_eq!(detected.recommended_guarantee_level, 5);
    }
}
