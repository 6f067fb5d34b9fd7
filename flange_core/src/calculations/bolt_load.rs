//! # Bolt Loads (ASME VIII Div.1 Appendix 2-5)
//!
//! Required bolt loads for the operating and gasket seating conditions and
//! the bolt area needed to carry them.
//!
//! ```text
//! H   = 0.785·G²·P                                    hydrostatic end force
//! Hp  = 2·P·(b·π·G·m + w·l·m_pass)                    joint-contact compression
//! Wm1 = H + Hp                                        operating
//! Wm2 = π·b·G·y + w·l·y_pass                          seating (y in MPa)
//! Am  = max(Wm1/Sb_design, Wm2/Sb_ambient)
//! ```
//!
//! Forces are in N with P in MPa and lengths in mm.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::geometry::FlangeGeometry;
use crate::inputs::FlangeInputs;
use crate::materials::{MaterialKind, AMBIENT_TEMP_C};
use crate::settings::EngineSettings;
use crate::tables::ResolvedReferences;
use crate::units::psi_to_mpa;

/// Bolt load requirements and capacities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoltLoad {
    /// Gasket factor m in use
    pub gasket_m: f64,

    /// Gasket seating stress y in use (psi)
    pub gasket_y_psi: f64,

    pub pass_m: f64,
    pub pass_y_psi: f64,

    /// Hydrostatic end force H (N)
    pub h_force_n: f64,

    /// Joint-contact surface compression load Hp (N)
    pub hp_force_n: f64,

    /// Operating bolt load Wm1 (N)
    pub wm1_n: f64,

    /// Gasket seating bolt load Wm2 (N)
    pub wm2_n: f64,

    /// Bolt allowable stress at ambient (MPa)
    pub ambient_stress_mpa: f64,

    /// The ambient stress came from the settings fallback
    pub ambient_stress_fallback: bool,

    /// Bolt allowable stress at design temperature (MPa)
    pub design_stress_mpa: f64,

    pub single_bolt_area_mm2: f64,
    pub total_bolt_area_mm2: f64,
    pub required_area_operating_mm2: f64,
    pub required_area_seating_mm2: f64,

    /// Am (mm²)
    pub required_bolt_area_mm2: f64,

    pub total_bolt_load_ambient_n: f64,
    pub total_bolt_load_design_n: f64,

    /// A zero stress divisor was floored to 1
    pub stress_divisor_floored: bool,
}

impl BoltLoad {
    /// Governing required load max(Wm1, Wm2) (N)
    pub fn required_load_n(&self) -> f64 {
        self.wm1_n.max(self.wm2_n)
    }

    /// Bolts carry the governing load at design stress
    pub fn is_safe(&self) -> bool {
        self.total_bolt_load_design_n >= self.required_load_n()
    }

    /// Design capacity margin over the governing load (%)
    ///
    /// A zero governing load is floored to 1 N.
    pub fn margin_percent(&self) -> f64 {
        let required = self.required_load_n();
        let divisor = if required == 0.0 { 1.0 } else { required };
        (self.total_bolt_load_design_n - required) / divisor * 100.0
    }
}

/// Compute bolt loads for `inputs` with the already derived `geometry`.
pub fn calculate_bolt_load(
    inputs: &FlangeInputs,
    refs: &ResolvedReferences<'_>,
    geometry: &FlangeGeometry,
    settings: &EngineSettings,
) -> BoltLoad {
    let manual = &inputs.manual;
    let gasket_m = manual.m().unwrap_or(refs.gasket.m);
    let gasket_y_psi = manual.y_psi().unwrap_or(refs.gasket.y_psi);
    let pass_m = manual.pass_m().unwrap_or(refs.pass_gasket.m);
    let pass_y_psi = manual.pass_y_psi().unwrap_or(refs.pass_gasket.y_psi);

    let p = inputs.pressure_mpa();
    let g = geometry.gasket_mean_dia_mm;
    let b = geometry.effective_width_mm;
    let pass_area = inputs.pass_partition_area_mm2();

    let h_force_n = 0.785 * g.powi(2) * p;
    let hp_force_n = 2.0 * p * (b * PI * g * gasket_m + pass_area * pass_m);
    let wm1_n = h_force_n + hp_force_n;
    let wm2_n = PI * b * g * psi_to_mpa(gasket_y_psi) + pass_area * psi_to_mpa(pass_y_psi);

    let material = refs.bolt_material;
    let ambient_stress_mpa = material.ambient_stress(MaterialKind::Bolt, settings.ambient_fallback_stress_mpa);
    let ambient_stress_fallback = MaterialKind::Bolt
        .temperature_steps()
        .iter()
        .position(|&t| t == AMBIENT_TEMP_C)
        .and_then(|i| material.stress_at_step(i))
        .map_or(true, |s| s == 0.0);
    let design_stress_mpa = material.allowable_stress(MaterialKind::Bolt, inputs.temperature_c(), settings.missing_stress);

    let stress_divisor_floored = design_stress_mpa == 0.0 || ambient_stress_mpa == 0.0;
    if stress_divisor_floored {
        warn!(
            material = %material.id,
            design_stress_mpa,
            ambient_stress_mpa,
            "zero bolt allowable stress, required area divisor floored to 1"
        );
    }

    let single_bolt_area_mm2 = refs.bolt.tensile_area_mm2;
    let total_bolt_area_mm2 = single_bolt_area_mm2 * inputs.bolt_count as f64;
    let required_area_operating_mm2 = wm1_n / floor_to_one(design_stress_mpa);
    let required_area_seating_mm2 = wm2_n / floor_to_one(ambient_stress_mpa);

    BoltLoad {
        gasket_m,
        gasket_y_psi,
        pass_m,
        pass_y_psi,
        h_force_n,
        hp_force_n,
        wm1_n,
        wm2_n,
        ambient_stress_mpa,
        ambient_stress_fallback,
        design_stress_mpa,
        single_bolt_area_mm2,
        total_bolt_area_mm2,
        required_area_operating_mm2,
        required_area_seating_mm2,
        required_bolt_area_mm2: required_area_operating_mm2.max(required_area_seating_mm2),
        total_bolt_load_ambient_n: total_bolt_area_mm2 * ambient_stress_mpa,
        total_bolt_load_design_n: total_bolt_area_mm2 * design_stress_mpa,
        stress_divisor_floored,
    }
}

fn floor_to_one(divisor: f64) -> f64 {
    if divisor == 0.0 {
        1.0
    } else {
        divisor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::geometry::calculate_geometry;
    use crate::inputs::ManualOverrides;
    use crate::materials::Material;
    use crate::tables::ReferenceTables;
    use approx::assert_relative_eq;

    fn loads(inputs: &FlangeInputs, tables: &ReferenceTables) -> BoltLoad {
        let settings = EngineSettings::default();
        let refs = tables.resolve(inputs);
        let geometry = calculate_geometry(inputs, &refs, &settings);
        calculate_bolt_load(inputs, &refs, &geometry, &settings)
    }

    fn tables_with_b7_stress(mpa: f64) -> ReferenceTables {
        let mut data = ReferenceTables::standard().unwrap().clone().into_data();
        data.bolt_materials[0] = Material::new("SA-193 B7 (<= 64)")
            .with_yield(725.0)
            .with_uniform_stress(MaterialKind::Bolt, mpa);
        ReferenceTables::new(data).unwrap()
    }

    #[test]
    fn test_default_forces() {
        let tables = ReferenceTables::standard().unwrap();
        let l = loads(&FlangeInputs::default(), tables);

        let b = 0.5 * 25.4 * (7.5f64 / 25.4).sqrt();
        let g = 1054.0 - 2.0 * b;
        assert_relative_eq!(l.h_force_n, 0.785 * g * g, epsilon = 1e-6);
        assert_relative_eq!(l.hp_force_n, 2.0 * b * PI * g * 3.0, epsilon = 1e-6);
        assert_relative_eq!(l.wm2_n, PI * b * g * 68.9476, epsilon = 1e-6);
        assert_relative_eq!(l.h_force_n, 849_379.04, max_relative = 1e-6);
        assert_relative_eq!(l.wm2_n, 1_554_900.0, max_relative = 1e-6);
        assert_eq!(l.gasket_m, 3.0);
        assert_eq!(l.gasket_y_psi, 10_000.0);
    }

    #[test]
    fn test_unpublished_stresses_floor_and_fallback() {
        let tables = ReferenceTables::standard().unwrap();
        let l = loads(&FlangeInputs::default(), tables);

        assert_eq!(l.ambient_stress_mpa, 138.0);
        assert!(l.ambient_stress_fallback);
        assert_eq!(l.design_stress_mpa, 0.0);
        assert!(l.stress_divisor_floored);
        assert_relative_eq!(l.required_area_operating_mm2, l.wm1_n, epsilon = 1e-9);
        assert_eq!(l.total_bolt_load_design_n, 0.0);
        assert!(!l.is_safe());
        assert_relative_eq!(l.margin_percent(), -100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_published_stress_makes_default_safe() {
        let tables = tables_with_b7_stress(172.4);
        let l = loads(&FlangeInputs::default(), &tables);

        assert_eq!(l.ambient_stress_mpa, 172.4);
        assert!(!l.ambient_stress_fallback);
        assert!(!l.stress_divisor_floored);
        assert_relative_eq!(l.total_bolt_area_mm2, 194.84 * 48.0, epsilon = 1e-9);
        assert_relative_eq!(l.total_bolt_load_design_n, 194.84 * 48.0 * 172.4, epsilon = 1e-6);
        assert_relative_eq!(
            l.required_bolt_area_mm2,
            (l.wm1_n / 172.4).max(l.wm2_n / 172.4),
            epsilon = 1e-9
        );
        assert!(l.is_safe());
        assert!(l.margin_percent() > 0.0);
    }

    #[test]
    fn test_manual_gasket_factors_and_pass_partition() {
        let tables = ReferenceTables::standard().unwrap();
        let mut inputs = FlangeInputs::default();
        inputs.pass_partition_width_mm = 10.0;
        inputs.pass_partition_length_mm = 900.0;
        inputs.manual = ManualOverrides {
            enabled: true,
            gasket_m: Some(2.0),
            pass_gasket_y_psi: Some(5000.0),
            ..ManualOverrides::default()
        };
        let l = loads(&inputs, tables);

        assert_eq!(l.gasket_m, 2.0);
        assert_eq!(l.gasket_y_psi, 10_000.0);
        assert_eq!(l.pass_m, 3.0);
        assert_eq!(l.pass_y_psi, 5000.0);

        let b = 0.5 * 25.4 * (7.5f64 / 25.4).sqrt();
        let g = 1054.0 - 2.0 * b;
        assert_relative_eq!(l.hp_force_n, 2.0 * (b * PI * g * 2.0 + 9000.0 * 3.0), epsilon = 1e-6);
        assert_relative_eq!(
            l.wm2_n,
            PI * b * g * psi_to_mpa(10_000.0) + 9000.0 * psi_to_mpa(5000.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_margin_with_zero_load() {
        let tables = tables_with_b7_stress(100.0);
        let mut inputs = FlangeInputs::default();
        inputs.design_pressure = 0.0;
        inputs.gasket_type = "Self-energizing types (O rings, metallic, elastomer, other gasket types)".to_string();
        inputs.pass_gasket_type = inputs.gasket_type.clone();
        let l = loads(&inputs, &tables);

        assert_eq!(l.required_load_n(), 0.0);
        assert_relative_eq!(l.margin_percent(), l.total_bolt_load_design_n * 100.0, epsilon = 1e-6);
    }
}
