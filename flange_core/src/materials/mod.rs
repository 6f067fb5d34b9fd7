//! # Materials & Reference Records
//!
//! Record types for the reference tables the engine reads: bolt and plate
//! materials with their temperature-indexed allowable stresses, TEMA bolt
//! data, hydraulic tensioning spacing, gasket ring standards and ASME gasket
//! factors.
//!
//! ## Temperature Steps
//!
//! Stress curves are positional. Entry `i` of a bolt material's curve is the
//! allowable stress at `BOLT_TEMP_STEPS_C[i]`; plates use `PLATE_TEMP_STEPS_C`.
//! Reordering a step sequence without reordering every curve silently corrupts
//! interpolation, so the sequences are fixed constants.
//!
//! ## Example
//!
//! ```rust
//! use flange_core::materials::{Material, MaterialKind};
//! use flange_core::materials::interpolation::MissingStressPolicy;
//!
//! let b7 = Material::new("SA-193 B7 (<= 64)")
//!     .with_yield(725.0)
//!     .with_uniform_stress(MaterialKind::Bolt, 172.4);
//!
//! let s = b7.allowable_stress(MaterialKind::Bolt, 250.0, MissingStressPolicy::AsZero);
//! assert!((s - 172.4).abs() < 1e-9);
//! ```

pub mod bolting;
pub mod gaskets;
pub mod interpolation;

pub use bolting::{formula_max_pitch_mm, BoltSpec, RingStandard, TensioningSpec};
pub use gaskets::{Api660Family, FacingSketch, GasketFactor};
pub use interpolation::{interpolate_stress, MissingStressPolicy};

use serde::{Deserialize, Serialize};

/// Temperature steps (°C) for bolt material stress curves (35 steps)
pub const BOLT_TEMP_STEPS_C: [f64; 35] = [
    40.0, 65.0, 100.0, 125.0, 150.0, 175.0, 200.0, 225.0, 250.0, 275.0, 300.0, 325.0, 350.0, 375.0,
    400.0, 425.0, 450.0, 475.0, 500.0, 525.0, 550.0, 575.0, 600.0, 625.0, 650.0, 675.0, 700.0,
    725.0, 750.0, 775.0, 800.0, 825.0, 850.0, 875.0, 900.0,
];

/// Temperature steps (°C) for plate / shell material stress curves (32 steps)
pub const PLATE_TEMP_STEPS_C: [f64; 32] = [
    40.0, 65.0, 100.0, 125.0, 150.0, 200.0, 250.0, 300.0, 325.0, 350.0, 375.0, 400.0, 425.0, 450.0,
    475.0, 500.0, 525.0, 550.0, 575.0, 600.0, 625.0, 650.0, 675.0, 700.0, 725.0, 750.0, 775.0,
    800.0, 825.0, 850.0, 875.0, 900.0,
];

/// Ambient (bolt-up) temperature step used for gasket seating checks
pub const AMBIENT_TEMP_C: f64 = 40.0;

/// Which temperature-step sequence a material's curve is aligned with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Bolting material (35 steps)
    Bolt,
    /// Plate / shell material (32 steps)
    Plate,
}

impl MaterialKind {
    /// The temperature steps this kind of curve is aligned with
    pub fn temperature_steps(&self) -> &'static [f64] {
        match self {
            MaterialKind::Bolt => &BOLT_TEMP_STEPS_C,
            MaterialKind::Plate => &PLATE_TEMP_STEPS_C,
        }
    }
}

/// A bolt or plate material with its allowable stress curve.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "SA-516-70",
///   "min_tensile_mpa": 485.0,
///   "min_yield_mpa": 260.0,
///   "stresses": [138.0, 138.0, null, 138.0]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material identifier, matched exactly against input selections
    pub id: String,

    /// Specified minimum tensile strength (MPa)
    #[serde(default)]
    pub min_tensile_mpa: Option<f64>,

    /// Specified minimum yield strength (MPa)
    #[serde(default)]
    pub min_yield_mpa: Option<f64>,

    /// Allowable stress (MPa) per temperature step; `None` = not published
    #[serde(default)]
    pub stresses: Vec<Option<f64>>,
}

impl Material {
    /// Create a material with no published stresses
    pub fn new(id: impl Into<String>) -> Self {
        Material {
            id: id.into(),
            min_tensile_mpa: None,
            min_yield_mpa: None,
            stresses: Vec::new(),
        }
    }

    /// Set the minimum tensile strength (MPa)
    pub fn with_tensile(mut self, mpa: f64) -> Self {
        self.min_tensile_mpa = Some(mpa);
        self
    }

    /// Set the minimum yield strength (MPa)
    pub fn with_yield(mut self, mpa: f64) -> Self {
        self.min_yield_mpa = Some(mpa);
        self
    }

    /// Replace the stress curve
    pub fn with_stresses(mut self, stresses: Vec<Option<f64>>) -> Self {
        self.stresses = stresses;
        self
    }

    /// Publish the same allowable stress at every step of `kind`'s sequence
    pub fn with_uniform_stress(mut self, kind: MaterialKind, mpa: f64) -> Self {
        self.stresses = vec![Some(mpa); kind.temperature_steps().len()];
        self
    }

    /// Stress published at step `index`, if any
    pub fn stress_at_step(&self, index: usize) -> Option<f64> {
        self.stresses.get(index).copied().flatten()
    }

    /// Whether the curve length matches the step sequence (an empty curve is
    /// accepted as "nothing published yet")
    pub fn is_aligned(&self, kind: MaterialKind) -> bool {
        self.stresses.is_empty() || self.stresses.len() == kind.temperature_steps().len()
    }

    /// Interpolated allowable stress (MPa) at `temp_c`
    pub fn allowable_stress(&self, kind: MaterialKind, temp_c: f64, policy: MissingStressPolicy) -> f64 {
        interpolation::interpolate_with(policy, temp_c, &self.stresses, kind.temperature_steps())
    }

    /// Allowable stress (MPa) at the ambient step.
    ///
    /// Missing or zero values fall back to `fallback_mpa`.
    pub fn ambient_stress(&self, kind: MaterialKind, fallback_mpa: f64) -> f64 {
        kind.temperature_steps()
            .iter()
            .position(|&t| t == AMBIENT_TEMP_C)
            .and_then(|i| self.stress_at_step(i))
            .filter(|&s| s != 0.0)
            .unwrap_or(fallback_mpa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_sequences() {
        assert_eq!(BOLT_TEMP_STEPS_C.len(), 35);
        assert_eq!(PLATE_TEMP_STEPS_C.len(), 32);
        assert!(BOLT_TEMP_STEPS_C.windows(2).all(|w| w[0] < w[1]));
        assert!(PLATE_TEMP_STEPS_C.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(BOLT_TEMP_STEPS_C[0], AMBIENT_TEMP_C);
    }

    #[test]
    fn test_ambient_stress_fallback() {
        let empty = Material::new("B7");
        assert_eq!(empty.ambient_stress(MaterialKind::Bolt, 138.0), 138.0);

        let zero = Material::new("B7").with_stresses(vec![Some(0.0)]);
        assert_eq!(zero.ambient_stress(MaterialKind::Bolt, 138.0), 138.0);

        let published = Material::new("B7").with_uniform_stress(MaterialKind::Bolt, 172.4);
        assert_eq!(published.ambient_stress(MaterialKind::Bolt, 138.0), 172.4);
    }

    #[test]
    fn test_alignment() {
        let bolt = Material::new("B7").with_uniform_stress(MaterialKind::Bolt, 172.4);
        assert!(bolt.is_aligned(MaterialKind::Bolt));
        assert!(!bolt.is_aligned(MaterialKind::Plate));
        assert!(Material::new("blank").is_aligned(MaterialKind::Plate));
    }

    #[test]
    fn test_null_stresses_deserialize() {
        let json = r#"{ "id": "SA-516-70", "min_yield_mpa": 260.0, "stresses": [138.0, null, 130.0] }"#;
        let mat: Material = serde_json::from_str(json).unwrap();
        assert_eq!(mat.stress_at_step(0), Some(138.0));
        assert_eq!(mat.stress_at_step(1), None);
        assert_eq!(mat.stress_at_step(7), None);
        assert_eq!(mat.min_tensile_mpa, None);
    }
}
