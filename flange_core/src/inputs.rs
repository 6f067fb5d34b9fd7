//! # Flange Inputs
//!
//! The complete caller-owned input state for one flange: process conditions,
//! material selections, shell and bolt geometry, gasket clearances, manual
//! overrides and PCC-1 parameters.
//!
//! Every field has a default (the standard GEN-001 channel-side flange), so
//! a JSON document only needs the fields it changes:
//!
//! ```rust
//! use flange_core::inputs::FlangeInputs;
//!
//! let inputs: FlangeInputs = serde_json::from_str(r#"{
//!     "item_no": "E-101",
//!     "design_pressure": 15.0,
//!     "pressure_unit": "Bar",
//!     "inside_dia_mm": 800.0
//! }"#).unwrap();
//!
//! assert_eq!(inputs.bolt_count, 48);
//! assert!((inputs.pressure_mpa() - 1.5).abs() < 1e-12);
//! ```
//!
//! Besides plain data, this module carries the input-editing operations the
//! engine supports: applying auto thickness, PCC-1 presets, gasket seating
//! suggestions and the gasket-standard reset.

use serde::{Deserialize, Serialize};

use crate::calculations::flange::CalculationResults;
use crate::calculations::shell::{self, hub_thickness_g1, ShellThickness};
use crate::errors::{CalcError, CalcResult};
use crate::materials::{Api660Family, FacingSketch};
use crate::settings::EngineSettings;
use crate::tables::ReferenceTables;
use crate::units::{PressureUnit, TemperatureUnit};

/// Which auto-derived seating OD candidate the gasket follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GasketPreference {
    /// Largest gasket the bolt circle allows
    Bcd,
    /// Smallest gasket the shell allows
    Shell,
}

impl std::fmt::Display for GasketPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GasketPreference::Bcd => write!(f, "bcd"),
            GasketPreference::Shell => write!(f, "shell"),
        }
    }
}

/// Manual geometry and gasket factor overrides.
///
/// A value participates only while `enabled` is on **and** the value is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualOverrides {
    /// Master switch for every override below
    pub enabled: bool,

    /// Bolt circle diameter (mm)
    pub bcd_mm: Option<f64>,

    /// Flange outside diameter (mm)
    pub od_mm: Option<f64>,

    /// Gasket seating inside diameter (mm)
    pub seating_id_mm: Option<f64>,

    /// Gasket seating outside diameter (mm)
    pub seating_od_mm: Option<f64>,

    /// Main gasket factor m
    pub gasket_m: Option<f64>,

    /// Main gasket seating stress y (psi)
    pub gasket_y_psi: Option<f64>,

    /// Pass-partition gasket factor m
    pub pass_gasket_m: Option<f64>,

    /// Pass-partition gasket seating stress y (psi)
    pub pass_gasket_y_psi: Option<f64>,
}

impl ManualOverrides {
    fn active(&self, value: Option<f64>) -> Option<f64> {
        value.filter(|_| self.enabled)
    }

    pub fn bcd(&self) -> Option<f64> {
        self.active(self.bcd_mm)
    }

    pub fn od(&self) -> Option<f64> {
        self.active(self.od_mm)
    }

    pub fn seating_id(&self) -> Option<f64> {
        self.active(self.seating_id_mm)
    }

    pub fn seating_od(&self) -> Option<f64> {
        self.active(self.seating_od_mm)
    }

    pub fn m(&self) -> Option<f64> {
        self.active(self.gasket_m)
    }

    pub fn y_psi(&self) -> Option<f64> {
        self.active(self.gasket_y_psi)
    }

    pub fn pass_m(&self) -> Option<f64> {
        self.active(self.pass_gasket_m)
    }

    pub fn pass_y_psi(&self) -> Option<f64> {
        self.active(self.pass_gasket_y_psi)
    }

    /// Whether a manual seating dimension pins the gasket
    pub fn fixes_gasket(&self) -> bool {
        self.enabled && (self.seating_od_mm.is_some() || self.seating_id_mm.is_some())
    }

    /// Clear the BCD and OD overrides
    pub fn clear_bcd_od(&mut self) {
        self.bcd_mm = None;
        self.od_mm = None;
    }

    /// Clear the seating ID/OD overrides
    pub fn clear_seating(&mut self) {
        self.seating_id_mm = None;
        self.seating_od_mm = None;
    }
}

/// ASME PCC-1 Appendix O assembly bolt stress parameters (MPa unless noted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pcc1Parameters {
    /// Run the PCC-1 check
    pub enabled: bool,

    /// Target assembly gasket stress Sg,T
    pub sg_t_mpa: f64,

    /// Minimum seating gasket stress Sg,min-S
    pub sg_min_s_mpa: f64,

    /// Minimum operating gasket stress Sg,min-O
    pub sg_min_o_mpa: f64,

    /// Maximum gasket stress Sg,max; 0 skips step 7
    pub sg_max_mpa: f64,

    /// Maximum bolt stress Sb,max; 0 = unbounded
    pub sb_max_mpa: f64,

    /// Minimum bolt stress Sb,min; 0 = no floor
    pub sb_min_mpa: f64,

    /// Maximum flange stress Sf,max; 0 = unbounded
    pub sf_max_mpa: f64,

    /// Flange rotation limit φf,max; 0 skips step 8
    pub phi_f_max: f64,

    /// Gasket rotation limit φg,max; 0 counts as 1
    pub phi_g_max: f64,

    /// Operating-load fraction g; 0 counts as 1
    pub g: f64,

    /// Share of the pass-partition area counted as gasket area (%)
    pub pass_area_reduction_pct: f64,
}

impl Default for Pcc1Parameters {
    fn default() -> Self {
        Pcc1Parameters {
            enabled: false,
            sg_t_mpa: 200.0,
            sg_min_s_mpa: 140.0,
            sg_min_o_mpa: 97.0,
            sg_max_mpa: 0.0,
            sb_max_mpa: 507.5,
            sb_min_mpa: 290.0,
            sf_max_mpa: 150.0,
            phi_f_max: 0.32,
            phi_g_max: 1.0,
            g: 0.7,
            pass_area_reduction_pct: 50.0,
        }
    }
}

impl Pcc1Parameters {
    /// Apply the API 660 gasket stress preset for `family`
    pub fn apply_gasket_family(&mut self, family: Api660Family) {
        self.sg_max_mpa = family.sg_max_mpa();
        self.sg_min_s_mpa = family.sg_min_seating_mpa();
        self.sg_min_o_mpa = family.sg_min_operating_mpa();
    }

    /// Derive Sb,max = 0.7·Sy and Sb,min = 0.4·Sy, rounded to 0.1 MPa
    pub fn apply_bolt_yield(&mut self, min_yield_mpa: f64) {
        self.sb_max_mpa = round_to(min_yield_mpa * 0.7, 1);
        self.sb_min_mpa = round_to(min_yield_mpa * 0.4, 1);
    }

    /// Fill unset (zero) rotation, load-fraction and pass-area parameters
    pub fn fill_unset_defaults(&mut self) {
        let defaults = Pcc1Parameters::default();
        if self.phi_f_max == 0.0 {
            self.phi_f_max = defaults.phi_f_max;
        }
        if self.phi_g_max == 0.0 {
            self.phi_g_max = defaults.phi_g_max;
        }
        if self.g == 0.0 {
            self.g = defaults.g;
        }
        if self.pass_area_reduction_pct == 0.0 {
            self.pass_area_reduction_pct = defaults.pass_area_reduction_pct;
        }
    }
}

/// Complete input state for one flange calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "item_no": "GEN-001",
///   "part_name": "CHANNEL SIDE",
///   "design_pressure": 1.0,
///   "pressure_unit": "MPa",
///   "design_temp": 100.0,
///   "temp_unit": "°C",
///   "shell_material": "SA–516-70",
///   "bolt_material": "SA-193 B7 (<= 64)",
///   "gasket_type": "Spiral-wound (Stainless steel, Monel, and Ni-base alloy)",
///   "inside_dia_mm": 1000.0,
///   "g0_mm": 5.0,
///   "g1_mm": 7.0,
///   "bolt_size_in": 0.75,
///   "bolt_count": 48,
///   "manual": { "enabled": true, "bcd_mm": 1110.0 },
///   "gasket_preference": "shell"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlangeInputs {
    /// Equipment item number
    pub item_no: String,

    /// Part / side name
    pub part_name: String,

    /// Design pressure in `pressure_unit`
    pub design_pressure: f64,
    pub pressure_unit: PressureUnit,

    /// Design temperature in `temp_unit`
    pub design_temp: f64,
    pub temp_unit: TemperatureUnit,

    /// Shell (plate) material id
    pub shell_material: String,

    /// Bolting material id
    pub bolt_material: String,

    /// Main gasket type id
    pub gasket_type: String,

    /// Pass-partition gasket type id
    pub pass_gasket_type: String,

    /// Shell inside diameter (mm)
    pub inside_dia_mm: f64,

    /// Corrosion allowance (mm)
    pub corrosion_allowance_mm: f64,

    /// Longitudinal joint efficiency E
    pub joint_efficiency: f64,

    /// Hub thickness at the shell end g0 (mm)
    pub g0_mm: f64,

    /// Hub thickness at the flange end g1 (mm)
    pub g1_mm: f64,

    /// Nominal bolt diameter (in)
    pub bolt_size_in: f64,

    /// Number of bolts
    pub bolt_count: u32,

    /// Bolt-hole clearance C (mm); not positive = engine default
    pub clearance_c_mm: f64,

    /// Gap between shell ID and gasket inner ring A (mm)
    pub shell_gap_a_mm: f64,

    /// Gasket contact width N (mm)
    pub seating_width_mm: f64,

    pub has_inner_ring: bool,
    pub has_outer_ring: bool,

    /// Inner ring width override (mm); standard width when unset
    pub inner_ring_width_mm: Option<f64>,

    /// Outer ring width override (mm); standard width when unset
    pub outer_ring_width_mm: Option<f64>,

    pub manual: ManualOverrides,

    /// Pass-partition plate width (mm)
    pub pass_partition_width_mm: f64,

    /// Pass-partition plate length (mm)
    pub pass_partition_length_mm: f64,

    /// Bolts are tightened with hydraulic tensioners
    pub use_hydraulic_tensioning: bool,

    pub pcc1: Pcc1Parameters,

    /// ASME Table 2-5.2 facing sketch
    pub facing_sketch: FacingSketch,

    /// Seating OD candidate to follow; unset picks the larger
    pub gasket_preference: Option<GasketPreference>,
}

impl Default for FlangeInputs {
    fn default() -> Self {
        FlangeInputs {
            item_no: "GEN-001".to_string(),
            part_name: "CHANNEL SIDE".to_string(),
            design_pressure: 1.0,
            pressure_unit: PressureUnit::MPa,
            design_temp: 100.0,
            temp_unit: TemperatureUnit::Celsius,
            shell_material: "SA–516-70".to_string(),
            bolt_material: "SA-193 B7 (<= 64)".to_string(),
            gasket_type: "Spiral-wound (Stainless steel, Monel, and Ni-base alloy)".to_string(),
            pass_gasket_type: "Spiral-wound (Stainless steel, Monel, and Ni-base alloy)".to_string(),
            inside_dia_mm: 1000.0,
            corrosion_allowance_mm: 0.0,
            joint_efficiency: 1.0,
            g0_mm: 5.0,
            g1_mm: 7.0,
            bolt_size_in: 0.75,
            bolt_count: 48,
            clearance_c_mm: 2.5,
            shell_gap_a_mm: 3.0,
            seating_width_mm: 15.0,
            has_inner_ring: true,
            has_outer_ring: true,
            inner_ring_width_mm: None,
            outer_ring_width_mm: None,
            manual: ManualOverrides::default(),
            pass_partition_width_mm: 0.0,
            pass_partition_length_mm: 0.0,
            use_hydraulic_tensioning: false,
            pcc1: Pcc1Parameters::default(),
            facing_sketch: FacingSketch::Sketch1a,
            gasket_preference: None,
        }
    }
}

impl FlangeInputs {
    /// Validate input parameters.
    ///
    /// The engine itself accepts any numbers; this is for callers that want
    /// to reject nonsense before evaluating.
    pub fn validate(&self) -> CalcResult<()> {
        if self.bolt_count == 0 {
            return Err(CalcError::invalid_input(
                "bolt_count",
                "0",
                "At least one bolt is required",
            ));
        }
        positive("bolt_size_in", self.bolt_size_in)?;
        positive("inside_dia_mm", self.inside_dia_mm)?;
        non_negative("seating_width_mm", self.seating_width_mm)?;
        non_negative("corrosion_allowance_mm", self.corrosion_allowance_mm)?;
        non_negative("g0_mm", self.g0_mm)?;
        non_negative("g1_mm", self.g1_mm)?;
        non_negative("pass_partition_width_mm", self.pass_partition_width_mm)?;
        non_negative("pass_partition_length_mm", self.pass_partition_length_mm)?;
        if !self.design_pressure.is_finite() || !self.design_temp.is_finite() {
            return Err(CalcError::invalid_input(
                "design_conditions",
                format!("{} / {}", self.design_pressure, self.design_temp),
                "Design pressure and temperature must be finite",
            ));
        }
        if !(self.joint_efficiency > 0.0 && self.joint_efficiency <= 1.0) {
            return Err(CalcError::invalid_input(
                "joint_efficiency",
                self.joint_efficiency.to_string(),
                "Joint efficiency must be in (0, 1]",
            ));
        }
        if !(0.0..=100.0).contains(&self.pcc1.pass_area_reduction_pct) {
            return Err(CalcError::invalid_input(
                "pcc1.pass_area_reduction_pct",
                self.pcc1.pass_area_reduction_pct.to_string(),
                "Percentage must be between 0 and 100",
            ));
        }
        Ok(())
    }

    /// Design pressure in MPa
    pub fn pressure_mpa(&self) -> f64 {
        self.pressure_unit.to_mpa(self.design_pressure)
    }

    /// Design temperature in °C
    pub fn temperature_c(&self) -> f64 {
        self.temp_unit.to_celsius(self.design_temp)
    }

    /// Pass-partition plate area (mm²)
    pub fn pass_partition_area_mm2(&self) -> f64 {
        self.pass_partition_width_mm * self.pass_partition_length_mm
    }

    /// Whether the optimizer must keep the gasket as currently defined
    pub fn gasket_fixed(&self) -> bool {
        self.manual.fixes_gasket() || self.gasket_preference.is_some()
    }

    /// Set g0 and re-derive g1 from it
    pub fn set_g0(&mut self, g0_mm: f64) {
        self.g0_mm = g0_mm;
        self.g1_mm = hub_thickness_g1(g0_mm);
    }

    /// Replace g0/g1 with the minimum thickness from shell stress and pressure
    pub fn apply_auto_thickness(&mut self, tables: &ReferenceTables, settings: &EngineSettings) -> ShellThickness {
        let thickness = shell::auto_thickness(self, tables, settings);
        self.g0_mm = thickness.g0_mm;
        self.g1_mm = thickness.g1_mm;
        thickness
    }

    /// Apply API 660 / bolt-yield PCC-1 presets for the selected gasket and
    /// bolting material.
    ///
    /// Gasket presets apply only to recognised families; bolt stress limits
    /// only when the material is tabulated with a yield strength.
    pub fn apply_pcc1_presets(&mut self, tables: &ReferenceTables) {
        if let Some(family) = Api660Family::classify(&self.gasket_type) {
            self.pcc1.apply_gasket_family(family);
        }
        let yield_mpa = tables
            .bolt_material_strict(&self.bolt_material)
            .ok()
            .and_then(|m| m.min_yield_mpa)
            .filter(|&y| y != 0.0);
        if let Some(y) = yield_mpa {
            self.pcc1.apply_bolt_yield(y);
        }
        self.pcc1.fill_unset_defaults();
    }

    /// Switch the PCC-1 check on or off; switching on applies the presets
    pub fn set_pcc1_enabled(&mut self, enabled: bool, tables: &ReferenceTables) {
        self.pcc1.enabled = enabled;
        if enabled {
            self.apply_pcc1_presets(tables);
        }
    }

    /// Restore the gasket standard: default clearances, standard rings, no
    /// overrides, no tensioning or pass partition, default PCC-1 auxiliaries.
    ///
    /// The manual-mode switch itself is kept.
    pub fn reset_gasket_standard(&mut self) {
        let defaults = FlangeInputs::default();
        self.clearance_c_mm = defaults.clearance_c_mm;
        self.shell_gap_a_mm = defaults.shell_gap_a_mm;
        self.inner_ring_width_mm = None;
        self.outer_ring_width_mm = None;
        self.has_inner_ring = true;
        self.has_outer_ring = true;
        self.gasket_preference = None;
        self.manual = ManualOverrides {
            enabled: self.manual.enabled,
            ..ManualOverrides::default()
        };
        self.use_hydraulic_tensioning = false;
        self.pass_partition_width_mm = 0.0;
        self.pass_partition_length_mm = 0.0;
        self.pcc1.pass_area_reduction_pct = defaults.pcc1.pass_area_reduction_pct;
        self.pcc1.phi_f_max = defaults.pcc1.phi_f_max;
        self.pcc1.phi_g_max = defaults.pcc1.phi_g_max;
        self.pcc1.g = defaults.pcc1.g;
    }

    /// Pin the gasket to a suggested seating pair
    pub fn apply_gasket_suggestion(&mut self, suggestion: &SeatingSuggestion) {
        self.gasket_preference = Some(suggestion.preference);
        self.manual.seating_id_mm = Some(round_to(suggestion.seating_id_mm, 2));
        self.manual.seating_od_mm = Some(round_to(suggestion.seating_od_mm, 2));
    }
}

/// One suggested gasket seating ID/OD pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeatingSuggestion {
    pub preference: GasketPreference,
    pub seating_id_mm: f64,
    pub seating_od_mm: f64,
}

/// The two gasket seating suggestions for a calculated flange
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasketSuggestions {
    /// Largest seating the bolt circle allows (max raised face)
    pub bcd_side: SeatingSuggestion,

    /// Smallest seating the shell allows
    pub shell_side: SeatingSuggestion,
}

impl GasketSuggestions {
    /// Suggestions for `inputs` given its evaluated `results`
    pub fn from_results(inputs: &FlangeInputs, results: &CalculationResults) -> Self {
        let n = inputs.seating_width_mm;
        let bcd_od = results.geometry.max_raised_face_mm;
        let shell_od = inputs.inside_dia_mm
            + 2.0 * inputs.shell_gap_a_mm
            + 2.0 * results.geometry.inner_ring_width_mm
            + 2.0 * n;

        GasketSuggestions {
            bcd_side: SeatingSuggestion {
                preference: GasketPreference::Bcd,
                seating_id_mm: bcd_od - 2.0 * n,
                seating_od_mm: bcd_od,
            },
            shell_side: SeatingSuggestion {
                preference: GasketPreference::Shell,
                seating_id_mm: shell_od - 2.0 * n,
                seating_od_mm: shell_od,
            },
        }
    }

    pub fn get(&self, preference: GasketPreference) -> &SeatingSuggestion {
        match preference {
            GasketPreference::Bcd => &self.bcd_side,
            GasketPreference::Shell => &self.shell_side,
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

fn positive(field: &str, value: f64) -> CalcResult<()> {
    if !(value > 0.0) {
        return Err(CalcError::invalid_input(field, value.to_string(), "Must be positive"));
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !(value >= 0.0) {
        return Err(CalcError::invalid_input(field, value.to_string(), "Must not be negative"));
    }
    Ok(())
}
