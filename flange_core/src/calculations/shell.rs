//! # Minimum Hub Thickness (g0 / g1)
//!
//! Cylindrical shell thickness under internal pressure (ASME VIII Div.1
//! UG-27(c)(1)) rounded up to the whole millimetre, and the flange-end hub
//! thickness derived from it.
//!
//! ```text
//! g0 = ceil( P·(ID/2 + Corr) / (S·E − 0.6·P) + Corr )
//! g1 = ceil( g0·1.3/3 + g0 )
//! ```
//!
//! When `S·E − 0.6·P` is not positive (no published shell stress, or a
//! pressure the shell cannot hold) the denominator is floored to 1 and the
//! result is flagged `infeasible`.
//!
//! ## Example
//!
//! ```rust
//! use flange_core::calculations::shell::auto_g0;
//! use flange_core::inputs::FlangeInputs;
//! use flange_core::tables::ReferenceTables;
//!
//! let tables = ReferenceTables::standard().unwrap();
//! // Standard plate curves are unpublished, so the floor applies: ceil(1 × 500 / 1)
//! assert_eq!(auto_g0(&FlangeInputs::default(), tables), 500.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::inputs::FlangeInputs;
use crate::materials::MaterialKind;
use crate::settings::EngineSettings;
use crate::tables::ReferenceTables;

/// Auto-derived hub thicknesses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShellThickness {
    /// Shell-end hub thickness (mm)
    pub g0_mm: f64,

    /// Flange-end hub thickness (mm)
    pub g1_mm: f64,

    /// Shell allowable stress at design temperature (MPa)
    pub shell_stress_mpa: f64,

    /// The stress denominator was not positive and was floored to 1
    pub infeasible: bool,
}

/// Flange-end hub thickness g1 from g0
pub fn hub_thickness_g1(g0_mm: f64) -> f64 {
    (g0_mm * 1.3 / 3.0 + g0_mm).ceil()
}

/// Minimum g0 (mm) under default engine settings
pub fn auto_g0(inputs: &FlangeInputs, tables: &ReferenceTables) -> f64 {
    auto_thickness(inputs, tables, &EngineSettings::default()).g0_mm
}

/// Minimum g0/g1 from the shell material's allowable stress.
pub fn auto_thickness(inputs: &FlangeInputs, tables: &ReferenceTables, settings: &EngineSettings) -> ShellThickness {
    let material = tables.plate_material(&inputs.shell_material);
    let shell_stress_mpa = material.allowable_stress(MaterialKind::Plate, inputs.temperature_c(), settings.missing_stress);
    let p = inputs.pressure_mpa();
    let corr = inputs.corrosion_allowance_mm;

    let denominator = shell_stress_mpa * inputs.joint_efficiency - 0.6 * p;
    let infeasible = denominator <= 0.0;
    if infeasible {
        warn!(
            material = %material.id,
            shell_stress_mpa,
            pressure_mpa = p,
            "shell stress denominator not positive, floored to 1"
        );
    }
    let denominator = if infeasible { 1.0 } else { denominator };

    let g0_mm = (p * (inputs.inside_dia_mm / 2.0 + corr) / denominator + corr).ceil();
    ShellThickness {
        g0_mm,
        g1_mm: hub_thickness_g1(g0_mm),
        shell_stress_mpa,
        infeasible,
    }
}
