//! # Flange Evaluation
//!
//! The full calculation chain for one flange: reference lookup, geometry,
//! bolt loads and, when enabled, the PCC-1 assembly bolt stress check.
//! Every call recomputes the complete [`CalculationResults`] record from the
//! inputs; nothing is cached between calls.
//!
//! ## Example
//!
//! ```rust
//! use flange_core::calculations::flange::evaluate;
//! use flange_core::inputs::FlangeInputs;
//! use flange_core::tables::ReferenceTables;
//!
//! let tables = ReferenceTables::standard().unwrap();
//! let inputs = FlangeInputs::default();
//!
//! let results = evaluate(&inputs, tables);
//! assert_eq!(results.geometry.bcd_method1_mm, 680.0);
//! assert_eq!(results.geometry.final_bcd_mm, 1101.0);
//! assert_eq!(results.geometry.final_od_mm, 1143.0);
//!
//! // Standard bolt curves are unpublished: zero design stress
//! assert!(!results.is_safe);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::bolt_load::{calculate_bolt_load, BoltLoad};
use crate::calculations::geometry::{calculate_geometry, FlangeGeometry};
use crate::calculations::pcc1::{self, Pcc1Evaluation, Pcc1Joint};
use crate::inputs::FlangeInputs;
use crate::materials::MaterialKind;
use crate::settings::EngineSettings;
use crate::tables::ReferenceTables;

/// Complete derived results for one flange.
///
/// Geometry and bolt load fields are flattened into the top level of the
/// JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResults {
    #[serde(flatten)]
    pub geometry: FlangeGeometry,

    #[serde(flatten)]
    pub bolt_load: BoltLoad,

    /// Shell allowable stress at design temperature (MPa)
    pub shell_stress_mpa: f64,

    /// Governing required load max(Wm1, Wm2) (N)
    pub required_load_n: f64,

    /// Design bolt load covers the governing required load
    pub is_safe: bool,

    /// Design capacity margin over the governing load (%)
    pub margin_percent: f64,

    /// PCC-1 evaluation, present only when enabled
    pub pcc1: Option<Pcc1Evaluation>,
}

impl CalculationResults {
    /// Strength, spacing and (when run) PCC-1 all pass
    pub fn passes(&self) -> bool {
        self.is_safe && self.geometry.spacing_ok && self.pcc1.as_ref().map_or(true, |p| p.safe)
    }

    /// Short description of what governs a failure, or "OK"
    pub fn governing_condition(&self) -> &'static str {
        if !self.is_safe {
            "Bolt load"
        } else if !self.geometry.spacing_ok {
            "Bolt spacing"
        } else if self.pcc1.as_ref().is_some_and(|p| !p.safe) {
            "PCC-1 bolt stress"
        } else {
            "OK"
        }
    }
}

/// Evaluate `inputs` with default engine settings.
pub fn evaluate(inputs: &FlangeInputs, tables: &ReferenceTables) -> CalculationResults {
    evaluate_with(inputs, tables, &EngineSettings::default())
}

/// Evaluate `inputs` with explicit engine settings.
pub fn evaluate_with(inputs: &FlangeInputs, tables: &ReferenceTables, settings: &EngineSettings) -> CalculationResults {
    let refs = tables.resolve(inputs);
    let geometry = calculate_geometry(inputs, &refs, settings);
    let bolt_load = calculate_bolt_load(inputs, &refs, &geometry, settings);

    let shell_stress_mpa =
        refs.shell_material
            .allowable_stress(MaterialKind::Plate, inputs.temperature_c(), settings.missing_stress);

    let pcc1 = inputs.pcc1.enabled.then(|| {
        let joint = Pcc1Joint {
            pressure_mpa: inputs.pressure_mpa(),
            seating_id_mm: geometry.seating_id_mm,
            seating_od_mm: geometry.seating_od_mm,
            root_area_mm2: bolt_load.total_bolt_area_mm2,
            pass_area_mm2: inputs.pass_partition_area_mm2(),
        };
        pcc1::evaluate(&inputs.pcc1, &joint)
    });

    debug!(
        size_in = inputs.bolt_size_in,
        count = inputs.bolt_count,
        bcd_mm = geometry.final_bcd_mm,
        source = geometry.bcd_source.number(),
        "flange evaluated"
    );

    CalculationResults {
        shell_stress_mpa,
        required_load_n: bolt_load.required_load_n(),
        is_safe: bolt_load.is_safe(),
        margin_percent: bolt_load.margin_percent(),
        pcc1,
        geometry,
        bolt_load,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::geometry::BcdMethod;
    use crate::materials::{Material, MissingStressPolicy};

    fn fixture_tables() -> ReferenceTables {
        let mut data = ReferenceTables::standard().unwrap().clone().into_data();
        data.bolt_materials[0] = Material::new("SA-193 B7 (<= 64)")
            .with_yield(725.0)
            .with_uniform_stress(MaterialKind::Bolt, 172.4);
        data.plate_materials[3] = Material::new("SA–516-70").with_uniform_stress(MaterialKind::Plate, 138.0);
        ReferenceTables::new(data).unwrap()
    }

    #[test]
    fn test_evaluate_default_standard_tables() {
        let tables = ReferenceTables::standard().unwrap();
        let r = evaluate(&FlangeInputs::default(), tables);
        assert_eq!(r.geometry.bcd_source, BcdMethod::GasketClearance);
        assert_eq!(r.shell_stress_mpa, 0.0);
        assert!(!r.is_safe);
        assert!(r.pcc1.is_none());
        assert!(!r.passes());
        assert_eq!(r.governing_condition(), "Bolt load");
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let tables = fixture_tables();
        let inputs = FlangeInputs::default();
        assert_eq!(evaluate(&inputs, &tables), evaluate(&inputs, &tables));
    }

    #[test]
    fn test_fixture_tables_pass() {
        let tables = fixture_tables();
        let r = evaluate(&FlangeInputs::default(), &tables);
        assert_eq!(r.shell_stress_mpa, 138.0);
        assert!(r.is_safe);
        assert!(r.passes());
        assert_eq!(r.governing_condition(), "OK");
        assert_eq!(r.required_load_n, r.bolt_load.wm2_n);
    }

    #[test]
    fn test_pcc1_only_when_enabled() {
        let tables = fixture_tables();
        let mut inputs = FlangeInputs::default();
        inputs.pcc1.enabled = true;
        let r = evaluate(&inputs, &tables);
        let pcc1 = r.pcc1.as_ref().unwrap();
        assert_eq!(pcc1.root_area_mm2, r.bolt_load.total_bolt_area_mm2);
        assert_eq!(pcc1.sb_sel_mpa, 150.0);
        assert!(!pcc1.safe);
        assert!(!r.passes());
        assert_eq!(r.governing_condition(), "PCC-1 bolt stress");
    }

    #[test]
    fn test_settings_change_interpolation() {
        let mut data = fixture_tables().into_data();
        let mut curve = vec![Some(172.4); 35];
        curve[2] = None; // 100 °C
        data.bolt_materials[0].stresses = curve;
        let tables = ReferenceTables::new(data).unwrap();
        let inputs = FlangeInputs::default();

        let as_zero = evaluate(&inputs, &tables);
        assert_eq!(as_zero.bolt_load.design_stress_mpa, 0.0);

        let settings = EngineSettings {
            missing_stress: MissingStressPolicy::SkipGaps,
            ..EngineSettings::default()
        };
        let skip = evaluate_with(&inputs, &tables, &settings);
        assert_eq!(skip.bolt_load.design_stress_mpa, 172.4);
    }

    #[test]
    fn test_results_json_is_flat() {
        let tables = ReferenceTables::standard().unwrap();
        let r = evaluate(&FlangeInputs::default(), tables);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["final_bcd_mm"], 1101.0);
        assert_eq!(json["bcd_source"], "gasket_clearance");
        assert!(json["wm1_n"].is_number());
        assert!(json["pcc1"].is_null());

        let back: CalculationResults = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }
}
