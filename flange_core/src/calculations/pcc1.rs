//! # PCC-1 Assembly Bolt Stress (ASME PCC-1 Appendix O)
//!
//! Selects an assembly bolt stress from a target gasket stress, clamps it to
//! the bolt and flange limits, then checks it against four limits:
//!
//! ```text
//! Ag       = π/4·(sOD² − sID²) + pct/100·w·l
//! Sb,calc  = Sg,T·Ag / Ab
//! Sb,sel   = min(max(min(Sb,calc, Sb,max), Sb,min), Sf,max)
//!
//! step 5   Sb,sel ≥ Sg,min-S·Ag / Ab
//! step 6   Sb,sel ≥ (Sg,min-O·Ag + π/4·P·sID²) / (g·Ab)
//! step 7   Sb,sel ≤ Sg,max·Ag / Ab           (skipped when Sg,max = 0)
//! step 8   Sb,sel ≤ Sf,max·φg,max / φf,max   (skipped when φf,max = 0)
//! ```
//!
//! A zero `Sb,max`/`Sf,max` means unbounded and a zero `Sb,min` means no
//! floor; zero `g`/`φg,max` count as 1. Every comparison allows a 0.001 MPa
//! tolerance.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::inputs::Pcc1Parameters;

/// Absolute tolerance on every step comparison (MPa)
pub const PCC1_TOLERANCE_MPA: f64 = 0.001;

/// Joint quantities the PCC-1 check reads from a calculated flange
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pcc1Joint {
    /// Design pressure (MPa)
    pub pressure_mpa: f64,

    pub seating_id_mm: f64,
    pub seating_od_mm: f64,

    /// Total bolt root area Ab (mm²)
    pub root_area_mm2: f64,

    /// Pass-partition plate area w·l (mm²)
    pub pass_area_mm2: f64,
}

/// One limit check. `threshold_mpa` is `None` when the limit is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pcc1Check {
    pub threshold_mpa: Option<f64>,
    pub passed: bool,
}

/// Result of the PCC-1 assembly bolt stress evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pcc1Evaluation {
    pub root_area_mm2: f64,

    /// π/4·(sOD² − sID²)
    pub ring_area_mm2: f64,

    /// Pass-partition area counted as gasket area
    pub reduced_pass_area_mm2: f64,

    /// Total gasket area Ag
    pub gasket_area_mm2: f64,

    /// Unclamped Sb from the target gasket stress
    pub sb_sel_calc_mpa: f64,

    /// Selected assembly bolt stress after clamping
    pub sb_sel_mpa: f64,

    /// Minimum seating gasket stress
    pub step5: Pcc1Check,

    /// Minimum operating gasket stress
    pub step6: Pcc1Check,

    /// Maximum gasket stress
    pub step7: Pcc1Check,

    /// Flange rotation
    pub step8: Pcc1Check,

    /// All four steps pass
    pub safe: bool,
}

/// Evaluate the PCC-1 assembly bolt stress for `joint`.
///
/// # Example
///
/// ```rust
/// use flange_core::calculations::pcc1::{evaluate, Pcc1Joint};
/// use flange_core::inputs::Pcc1Parameters;
///
/// let joint = Pcc1Joint {
///     pressure_mpa: 1.0,
///     seating_id_mm: 1024.0,
///     seating_od_mm: 1054.0,
///     root_area_mm2: 194.84 * 48.0,
///     pass_area_mm2: 0.0,
/// };
/// let eval = evaluate(&Pcc1Parameters::default(), &joint);
///
/// // Sb,calc ≈ 1047 MPa is capped at Sb,max = 507.5, then at Sf,max = 150
/// assert_eq!(eval.sb_sel_mpa, 150.0);
/// assert!(!eval.step5.passed);
/// assert!(eval.step7.passed); // spiral-wound: Sg,max = 0
/// ```
pub fn evaluate(params: &Pcc1Parameters, joint: &Pcc1Joint) -> Pcc1Evaluation {
    let root_area_mm2 = joint.root_area_mm2;
    let has_area = root_area_mm2 > 0.0;
    let ring_area_mm2 = PI / 4.0 * (joint.seating_od_mm.powi(2) - joint.seating_id_mm.powi(2));
    let reduced_pass_area_mm2 = params.pass_area_reduction_pct / 100.0 * joint.pass_area_mm2;
    let ag = ring_area_mm2 + reduced_pass_area_mm2;

    let sb_sel_calc_mpa = if has_area { params.sg_t_mpa * ag / root_area_mm2 } else { 0.0 };
    let sb_sel_mpa = clamp_bolt_stress(sb_sel_calc_mpa, params);

    let step5_threshold = if has_area { params.sg_min_s_mpa * ag / root_area_mm2 } else { 0.0 };
    let step6_threshold = if has_area {
        let numerator = params.sg_min_o_mpa * ag + PI / 4.0 * joint.pressure_mpa * joint.seating_id_mm.powi(2);
        numerator / (nonzero_or(params.g, 1.0) * root_area_mm2)
    } else {
        0.0
    };
    let step7_threshold = has_area.then(|| params.sg_max_mpa * ag / root_area_mm2);
    let step8_threshold =
        (params.phi_f_max > 0.0).then(|| params.sf_max_mpa * nonzero_or(params.phi_g_max, 1.0) / params.phi_f_max);

    let step5 = Pcc1Check {
        threshold_mpa: Some(step5_threshold),
        passed: sb_sel_mpa >= step5_threshold - PCC1_TOLERANCE_MPA,
    };
    let step6 = Pcc1Check {
        threshold_mpa: Some(step6_threshold),
        passed: sb_sel_mpa >= step6_threshold - PCC1_TOLERANCE_MPA,
    };
    let step7 = Pcc1Check {
        threshold_mpa: step7_threshold,
        passed: params.sg_max_mpa == 0.0 || at_most(sb_sel_mpa, step7_threshold),
    };
    let step8 = Pcc1Check {
        threshold_mpa: step8_threshold,
        passed: params.phi_f_max == 0.0 || at_most(sb_sel_mpa, step8_threshold),
    };

    Pcc1Evaluation {
        root_area_mm2,
        ring_area_mm2,
        reduced_pass_area_mm2,
        gasket_area_mm2: ag,
        sb_sel_calc_mpa,
        sb_sel_mpa,
        safe: step5.passed && step6.passed && step7.passed && step8.passed,
        step5,
        step6,
        step7,
        step8,
    }
}

/// Clamp a bolt stress: cap at Sb,max, lift to Sb,min, then cap at Sf,max
pub fn clamp_bolt_stress(sb_mpa: f64, params: &Pcc1Parameters) -> f64 {
    sb_mpa
        .min(nonzero_or(params.sb_max_mpa, f64::INFINITY))
        .max(nonzero_or(params.sb_min_mpa, 0.0))
        .min(nonzero_or(params.sf_max_mpa, f64::INFINITY))
}

fn at_most(value: f64, threshold: Option<f64>) -> bool {
    threshold.map_or(true, |t| value <= t + PCC1_TOLERANCE_MPA)
}

fn nonzero_or(value: f64, fallback: f64) -> f64 {
    if value == 0.0 || value.is_nan() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn joint() -> Pcc1Joint {
        Pcc1Joint {
            pressure_mpa: 1.0,
            seating_id_mm: 1024.0,
            seating_od_mm: 1054.0,
            root_area_mm2: 194.84 * 48.0,
            pass_area_mm2: 0.0,
        }
    }

    fn open_params() -> Pcc1Parameters {
        Pcc1Parameters {
            enabled: true,
            sb_max_mpa: 0.0,
            sb_min_mpa: 0.0,
            sf_max_mpa: 0.0,
            ..Pcc1Parameters::default()
        }
    }

    #[test]
    fn test_areas_and_calculated_stress() {
        let eval = evaluate(&open_params(), &joint());
        let ring = PI / 4.0 * (1054.0f64.powi(2) - 1024.0f64.powi(2));
        assert_relative_eq!(eval.ring_area_mm2, ring, epsilon = 1e-6);
        assert_eq!(eval.reduced_pass_area_mm2, 0.0);
        assert_relative_eq!(eval.sb_sel_calc_mpa, 200.0 * ring / (194.84 * 48.0), epsilon = 1e-9);
        // Unbounded: selected equals calculated
        assert_eq!(eval.sb_sel_mpa, eval.sb_sel_calc_mpa);
    }

    #[test]
    fn test_clamp_order() {
        let params = Pcc1Parameters {
            sb_max_mpa: 400.0,
            sb_min_mpa: 300.0,
            sf_max_mpa: 350.0,
            ..Pcc1Parameters::default()
        };
        assert_eq!(clamp_bolt_stress(500.0, &params), 350.0);
        assert_eq!(clamp_bolt_stress(100.0, &params), 300.0);
        assert_eq!(clamp_bolt_stress(320.0, &params), 320.0);

        // Sf,max is applied last, so it wins over Sb,min
        let params = Pcc1Parameters {
            sb_max_mpa: 507.5,
            sb_min_mpa: 290.0,
            sf_max_mpa: 150.0,
            ..Pcc1Parameters::default()
        };
        assert_eq!(clamp_bolt_stress(100.0, &params), 150.0);
    }

    #[test]
    fn test_zero_limits_are_unbounded() {
        let params = open_params();
        assert_eq!(clamp_bolt_stress(1.0e6, &params), 1.0e6);
        assert_eq!(clamp_bolt_stress(-5.0, &params), 0.0);
    }

    #[test]
    fn test_zero_sg_max_skips_step7() {
        let mut params = open_params();
        params.sg_t_mpa = 10_000.0;
        params.sg_max_mpa = 0.0;
        let eval = evaluate(&params, &joint());
        assert_eq!(eval.step7.threshold_mpa, Some(0.0));
        assert!(eval.step7.passed);

        params.sg_max_mpa = 380.0;
        let eval = evaluate(&params, &joint());
        assert!(!eval.step7.passed);
        assert!(!eval.safe);
    }

    #[test]
    fn test_step8_rotation_limit() {
        let mut params = open_params();
        params.sf_max_mpa = 150.0;
        params.phi_g_max = 0.0;
        let eval = evaluate(&params, &joint());
        // 150 × 1 / 0.32
        assert_relative_eq!(eval.step8.threshold_mpa.unwrap(), 468.75, epsilon = 1e-9);
        assert!(eval.step8.passed);

        params.phi_f_max = 0.0;
        let eval = evaluate(&params, &joint());
        assert_eq!(eval.step8.threshold_mpa, None);
        assert!(eval.step8.passed);
    }

    #[test]
    fn test_step6_uses_g_default() {
        let mut params = open_params();
        params.g = 0.0;
        let eval = evaluate(&params, &joint());
        let ag = eval.gasket_area_mm2;
        let expected = (97.0 * ag + PI / 4.0 * 1024.0f64.powi(2)) / (194.84 * 48.0);
        assert_relative_eq!(eval.step6.threshold_mpa.unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_tolerance_on_boundaries() {
        let mut params = open_params();
        let j = joint();
        let eval = evaluate(&params, &j);
        // Put Sg,min-S so the step 5 threshold sits just above Sb,sel
        params.sg_min_s_mpa = (eval.sb_sel_mpa + 0.0009) * j.root_area_mm2 / eval.gasket_area_mm2;
        assert!(evaluate(&params, &j).step5.passed);
        params.sg_min_s_mpa = (eval.sb_sel_mpa + 0.01) * j.root_area_mm2 / eval.gasket_area_mm2;
        assert!(!evaluate(&params, &j).step5.passed);
    }

    #[test]
    fn test_zero_root_area() {
        let mut j = joint();
        j.root_area_mm2 = 0.0;
        let mut params = open_params();
        params.sg_max_mpa = 380.0;
        let eval = evaluate(&params, &j);
        assert_eq!(eval.sb_sel_calc_mpa, 0.0);
        assert_eq!(eval.step5.threshold_mpa, Some(0.0));
        assert_eq!(eval.step6.threshold_mpa, Some(0.0));
        assert_eq!(eval.step7.threshold_mpa, None);
        assert!(eval.safe);
    }

    #[test]
    fn test_pass_partition_area_reduction() {
        let mut j = joint();
        j.pass_area_mm2 = 10.0 * 900.0;
        let eval = evaluate(&open_params(), &j);
        assert_eq!(eval.reduced_pass_area_mm2, 4500.0);
        assert_relative_eq!(eval.gasket_area_mm2, eval.ring_area_mm2 + 4500.0, epsilon = 1e-9);
    }
}
