//! Allowable Stress Interpolation
//!
//! Piecewise-linear lookup over a temperature-indexed stress curve. Curves are
//! stored as nullable values aligned index-for-index with a fixed temperature
//! step sequence (see [`BOLT_TEMP_STEPS_C`](super::BOLT_TEMP_STEPS_C) and
//! [`PLATE_TEMP_STEPS_C`](super::PLATE_TEMP_STEPS_C)).
//!
//! Two policies exist for unpublished (`None`) entries:
//!
//! - [`MissingStressPolicy::AsZero`] (default): a missing value is a zero
//!   allowable stress. Interpolating towards a missing upper point therefore
//!   heads to zero.
//! - [`MissingStressPolicy::SkipGaps`]: missing points are ignored and the
//!   curve is interpolated between the nearest published values.

use serde::{Deserialize, Serialize};

/// How unpublished stress values are treated during interpolation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingStressPolicy {
    /// Coerce missing values to 0 MPa before interpolating
    #[default]
    AsZero,
    /// Interpolate between the nearest published values
    SkipGaps,
}

/// Interpolate an allowable stress at `temp_c` with null-as-zero semantics.
///
/// - At or below the first step: the first value.
/// - At or above the last step: the last value.
/// - Otherwise: linear between the bracketing steps, using coerced zeros as-is.
///
/// Entries beyond the end of `curve` count as missing. An empty step sequence
/// yields 0.
///
/// # Example
///
/// ```rust
/// use flange_core::materials::interpolation::interpolate_stress;
///
/// let steps = [40.0, 100.0, 150.0];
/// let curve = [Some(200.0), Some(180.0), None];
/// assert_eq!(interpolate_stress(70.0, &curve, &steps), 190.0);
/// assert_eq!(interpolate_stress(125.0, &curve, &steps), 90.0);
/// ```
pub fn interpolate_stress(temp_c: f64, curve: &[Option<f64>], steps: &[f64]) -> f64 {
    let value_at = |i: usize| curve.get(i).copied().flatten().unwrap_or(0.0);

    let Some(last) = steps.len().checked_sub(1) else {
        return 0.0;
    };
    if temp_c <= steps[0] {
        return value_at(0);
    }
    if temp_c >= steps[last] {
        return value_at(last);
    }

    for i in 0..last {
        let (t1, t2) = (steps[i], steps[i + 1]);
        if temp_c >= t1 && temp_c <= t2 {
            return lerp(temp_c, t1, t2, value_at(i), value_at(i + 1));
        }
    }

    // Unreachable for ascending steps and a finite temperature
    value_at(0)
}

/// Interpolate an allowable stress at `temp_c`, skipping unpublished values.
///
/// An explicitly published `Some(0.0)` is a real data point and is kept.
/// A curve with no published values yields 0.
pub fn interpolate_stress_skipping_gaps(temp_c: f64, curve: &[Option<f64>], steps: &[f64]) -> f64 {
    let points: Vec<(f64, f64)> = steps
        .iter()
        .zip(curve.iter())
        .filter_map(|(&t, s)| s.map(|s| (t, s)))
        .collect();

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    if temp_c <= first.0 {
        return first.1;
    }
    if temp_c >= last.0 {
        return last.1;
    }

    points
        .windows(2)
        .find(|w| temp_c >= w[0].0 && temp_c <= w[1].0)
        .map(|w| lerp(temp_c, w[0].0, w[1].0, w[0].1, w[1].1))
        .unwrap_or(first.1)
}

/// Interpolate using the given missing-value policy
pub fn interpolate_with(policy: MissingStressPolicy, temp_c: f64, curve: &[Option<f64>], steps: &[f64]) -> f64 {
    match policy {
        MissingStressPolicy::AsZero => interpolate_stress(temp_c, curve, steps),
        MissingStressPolicy::SkipGaps => interpolate_stress_skipping_gaps(temp_c, curve, steps),
    }
}

fn lerp(t: f64, t1: f64, t2: f64, s1: f64, s2: f64) -> f64 {
    if t2 == t1 {
        return s1;
    }
    s1 + (s2 - s1) * (t - t1) / (t2 - t1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const STEPS: [f64; 4] = [40.0, 100.0, 200.0, 300.0];

    #[test]
    fn test_boundaries_return_end_values() {
        let curve = [Some(172.0), Some(170.0), Some(160.0), Some(150.0)];
        assert_eq!(interpolate_stress(40.0, &curve, &STEPS), 172.0);
        assert_eq!(interpolate_stress(-20.0, &curve, &STEPS), 172.0);
        assert_eq!(interpolate_stress(300.0, &curve, &STEPS), 150.0);
        assert_eq!(interpolate_stress(650.0, &curve, &STEPS), 150.0);
    }

    #[test]
    fn test_midpoint_is_mean() {
        let curve = [Some(172.0), Some(170.0), Some(160.0), Some(150.0)];
        assert_relative_eq!(interpolate_stress(150.0, &curve, &STEPS), 165.0, epsilon = 1e-12);
        assert_relative_eq!(interpolate_stress(70.0, &curve, &STEPS), 171.0, epsilon = 1e-12);
    }

    #[test]
    fn test_null_end_values_coerce_to_zero() {
        let curve = [None, Some(170.0), Some(160.0), None];
        assert_eq!(interpolate_stress(10.0, &curve, &STEPS), 0.0);
        assert_eq!(interpolate_stress(400.0, &curve, &STEPS), 0.0);
    }

    #[test]
    fn test_null_upper_point_pulls_towards_zero() {
        let curve = [Some(172.0), Some(170.0), None, Some(150.0)];
        // Halfway between 170 and a coerced 0
        assert_relative_eq!(interpolate_stress(150.0, &curve, &STEPS), 85.0, epsilon = 1e-12);
    }

    #[test]
    fn test_short_curve_counts_as_missing() {
        let curve = [Some(172.0)];
        assert_eq!(interpolate_stress(300.0, &curve, &STEPS), 0.0);
        assert_relative_eq!(interpolate_stress(70.0, &curve, &STEPS), 86.0, epsilon = 1e-12);
        assert_eq!(interpolate_stress(100.0, &[], &STEPS), 0.0);
    }

    #[test]
    fn test_empty_steps() {
        assert_eq!(interpolate_stress(100.0, &[Some(1.0)], &[]), 0.0);
    }

    #[test]
    fn test_skip_gaps_bridges_missing_points() {
        let curve = [Some(172.0), Some(170.0), None, Some(150.0)];
        assert_relative_eq!(
            interpolate_stress_skipping_gaps(200.0, &curve, &STEPS),
            160.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_skip_gaps_clamps_to_published_range() {
        let curve = [None, Some(170.0), Some(160.0), None];
        assert_eq!(interpolate_stress_skipping_gaps(40.0, &curve, &STEPS), 170.0);
        assert_eq!(interpolate_stress_skipping_gaps(300.0, &curve, &STEPS), 160.0);
        assert_eq!(interpolate_stress_skipping_gaps(300.0, &[None, None], &STEPS), 0.0);
    }

    #[test]
    fn test_skip_gaps_keeps_published_zero() {
        let curve = [Some(100.0), Some(0.0), None, None];
        assert_relative_eq!(
            interpolate_stress_skipping_gaps(70.0, &curve, &STEPS),
            50.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_policy_dispatch() {
        let curve = [Some(172.0), Some(170.0), None, Some(150.0)];
        assert_relative_eq!(
            interpolate_with(MissingStressPolicy::AsZero, 150.0, &curve, &STEPS),
            85.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            interpolate_with(MissingStressPolicy::SkipGaps, 150.0, &curve, &STEPS),
            165.0,
            epsilon = 1e-12
        );
    }
}
