//! # Flange Geometry (TEMA bolt circle / gasket seating)
//!
//! Derives the bolt circle diameter from three competing minimums, the gasket
//! seating and ring dimensions, bolt spacing bounds and the flange OD, then
//! the effective gasket width `b` and reaction diameter `G` per ASME VIII
//! Div.1 Appendix 2.
//!
//! ## BCD Methods
//!
//! ```text
//! M1 (bolt pitch)      = ceil(B_eff·25.4·n / π)
//! M2 (radial distance) = ceil(ID + 2·g1 + 2·R)
//! M3 (gasket)          = ceil(gasketOD + 2·1.5 + 2·C + hole)
//! BCD                  = max(M1, M2, M3)
//! ```
//!
//! The auto gasket seating OD is taken from either the bolt circle side
//! (largest gasket inside max(M1, M2)) or the shell side (smallest gasket
//! clearing the shell), so M3 depends on M1/M2 through the gasket.
//!
//! ## Gasket Width
//!
//! ```text
//! N  = (seatingOD − seatingID)/2
//! b0 = N/2 (1a, 1b) | N/4 (1c, 1d) | N/8 (2)
//! b0 ≤ 6 mm : b = b0,                   G = (seatingID + seatingOD)/2
//! b0 > 6 mm : b = 0.5·25.4·√(b0/25.4),  G = seatingOD − 2b
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::inputs::{FlangeInputs, GasketPreference};
use crate::materials::bolting::formula_max_pitch_mm;
use crate::settings::EngineSettings;
use crate::tables::ResolvedReferences;
use crate::units::{inches_to_mm, MM_PER_INCH};

/// Radial margin between the bolt hole and the gasket / raised face (mm)
pub const BOLT_HOLE_MARGIN_MM: f64 = 1.5;

/// Basic seating width above which the effective width is reduced (mm)
pub const NARROW_GASKET_LIMIT_MM: f64 = 6.0;

/// Which BCD method governs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BcdMethod {
    /// Method 1: minimum bolt pitch around the circle
    BoltPitch,
    /// Method 2: hub plus TEMA radial distance
    RadialDistance,
    /// Method 3: gasket OD plus bolt hole clearance
    GasketClearance,
}

impl BcdMethod {
    /// Method number 1, 2 or 3
    pub fn number(&self) -> u8 {
        match self {
            BcdMethod::BoltPitch => 1,
            BcdMethod::RadialDistance => 2,
            BcdMethod::GasketClearance => 3,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BcdMethod::BoltPitch => "Bolt pitch",
            BcdMethod::RadialDistance => "Radial distance",
            BcdMethod::GasketClearance => "Gasket clearance",
        }
    }

    /// First method whose value equals the maximum, checked 1, 2, 3
    pub fn governing(m1: f64, m2: f64, m3: f64) -> BcdMethod {
        let max = m1.max(m2).max(m3);
        if m1 == max {
            BcdMethod::BoltPitch
        } else if m2 == max {
            BcdMethod::RadialDistance
        } else {
            BcdMethod::GasketClearance
        }
    }
}

impl std::fmt::Display for BcdMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Method {} ({})", self.number(), self.display_name())
    }
}

/// Derived flange and gasket geometry. All lengths in mm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlangeGeometry {
    pub inner_ring_width_mm: f64,
    pub outer_ring_width_mm: f64,

    /// Clearance C actually used
    pub effective_c_mm: f64,
    pub shell_gap_a_mm: f64,

    /// Governing minimum pitch, B_min or B_ten (in)
    pub effective_b_min_in: f64,

    pub bcd_method1_mm: f64,
    pub bcd_method2_mm: f64,
    pub bcd_method3_mm: f64,

    /// max(M1, M2, M3)
    pub bcd_tema_mm: f64,
    pub bcd_source: BcdMethod,

    /// Manual BCD replaced the computed one
    pub bcd_manual: bool,
    pub final_bcd_mm: f64,

    /// Auto seating OD candidates
    pub seating_od_bcd_side_mm: f64,
    pub seating_od_shell_side_mm: f64,

    pub gasket_id_mm: f64,
    pub seating_id_mm: f64,
    pub seating_od_mm: f64,
    pub gasket_od_mm: f64,

    /// TEMA radial distance R
    pub radial_distance_mm: f64,

    /// TEMA edge distance E
    pub edge_distance_mm: f64,
    pub od_tema_mm: f64,
    pub final_od_mm: f64,

    /// Largest raised face / seating OD the final bolt circle allows
    pub max_raised_face_mm: f64,
    pub bolt_hole_dia_mm: f64,

    /// π·BCD / n
    pub geometric_pitch_mm: f64,
    pub min_bolt_spacing_mm: f64,
    pub max_bolt_spacing_mm: f64,
    pub spacing_ok: bool,

    /// Gasket contact width N
    pub contact_width_mm: f64,

    /// Basic gasket seating width b0
    pub basic_width_mm: f64,

    /// Effective gasket seating width b
    pub effective_width_mm: f64,

    /// Diameter of gasket load reaction G
    pub gasket_mean_dia_mm: f64,
}

/// Compute the flange geometry for `inputs` against resolved reference rows.
pub fn calculate_geometry(inputs: &FlangeInputs, refs: &ResolvedReferences<'_>, settings: &EngineSettings) -> FlangeGeometry {
    let bolt = refs.bolt;
    let n_count = inputs.bolt_count as f64;

    // 1. Rings
    let inner_ring_width_mm = if inputs.has_inner_ring {
        inputs.inner_ring_width_mm.unwrap_or(refs.ring.inner_ring_min_mm)
    } else {
        0.0
    };
    let outer_ring_width_mm = if inputs.has_outer_ring {
        inputs.outer_ring_width_mm.unwrap_or(refs.ring.outer_ring_min_mm)
    } else {
        0.0
    };
    let effective_c_mm = if inputs.clearance_c_mm > 0.0 {
        inputs.clearance_c_mm
    } else {
        settings.default_clearance_mm
    };
    let shell_gap_a_mm = inputs.shell_gap_a_mm;
    let hole = bolt.hole_dia_mm;

    // 2. Governing minimum pitch
    let effective_b_min_in = match refs.tensioning {
        Some(ten) if inputs.use_hydraulic_tensioning => bolt.min_pitch_in.max(ten.min_spacing_in),
        _ => bolt.min_pitch_in,
    };

    // 3-4. Bolt pitch and radial distance methods
    let bcd_method1_mm = (effective_b_min_in * MM_PER_INCH * n_count / PI).ceil();
    let radial_distance_mm = bolt.radial_distance_mm();
    let bcd_method2_mm = (inputs.inside_dia_mm + 2.0 * inputs.g1_mm + 2.0 * radial_distance_mm).ceil();

    // 5. Auto seating OD
    let clearance_stack = |bcd: f64| {
        bcd - hole - 2.0 * effective_c_mm - 2.0 * BOLT_HOLE_MARGIN_MM - 2.0 * outer_ring_width_mm
    };
    let seating_od_bcd_side_mm = clearance_stack(bcd_method1_mm.max(bcd_method2_mm)).ceil();
    let seating_od_shell_side_mm = (inputs.inside_dia_mm
        + 2.0 * shell_gap_a_mm
        + 2.0 * inner_ring_width_mm
        + 2.0 * inputs.seating_width_mm)
        .ceil();
    let auto_seating_od = match inputs.gasket_preference {
        Some(GasketPreference::Shell) => seating_od_shell_side_mm,
        Some(GasketPreference::Bcd) => seating_od_bcd_side_mm,
        None => seating_od_bcd_side_mm.max(seating_od_shell_side_mm),
    };

    // 6-7. Seating and gasket diameters
    let auto_seating_id = auto_seating_od - 2.0 * inputs.seating_width_mm;
    let seating_od_mm = inputs.manual.seating_od().unwrap_or(auto_seating_od);
    let seating_id_mm = inputs.manual.seating_id().unwrap_or(auto_seating_id);
    let gasket_od_mm = seating_od_mm + 2.0 * outer_ring_width_mm;
    let gasket_id_mm = seating_id_mm - 2.0 * inner_ring_width_mm;

    // 8-9. Gasket method and final BCD
    let bcd_method3_mm = (gasket_od_mm + 2.0 * BOLT_HOLE_MARGIN_MM + 2.0 * effective_c_mm + hole).ceil();
    let bcd_tema_mm = bcd_method1_mm.max(bcd_method2_mm).max(bcd_method3_mm);
    let bcd_source = BcdMethod::governing(bcd_method1_mm, bcd_method2_mm, bcd_method3_mm);
    let manual_bcd = inputs.manual.bcd();
    let final_bcd_mm = manual_bcd.unwrap_or(bcd_tema_mm);

    // 10. Flange OD
    let edge_distance_mm = bolt.edge_distance_mm();
    let od_tema_mm = (final_bcd_mm + 2.0 * edge_distance_mm).ceil();
    let final_od_mm = inputs.manual.od().unwrap_or(od_tema_mm);

    // 11. Spacing
    let geometric_pitch_mm = PI * final_bcd_mm / n_count;
    let min_bolt_spacing_mm = inches_to_mm(effective_b_min_in);
    // WHC pitch only applies to a tabulated size
    let max_bolt_spacing_mm = if bolt.matches_size(inputs.bolt_size_in) {
        bolt.max_pitch_mm()
    } else {
        formula_max_pitch_mm(inputs.bolt_size_in)
    };
    let spacing_ok = geometric_pitch_mm >= min_bolt_spacing_mm && geometric_pitch_mm <= max_bolt_spacing_mm;

    // 12-13. Gasket widths and reaction diameter
    let contact_width_mm = (seating_od_mm - seating_id_mm) / 2.0;
    let basic_width_mm = inputs.facing_sketch.basic_seating_width(contact_width_mm);
    let (effective_width_mm, gasket_mean_dia_mm) = effective_gasket_width(basic_width_mm, seating_id_mm, seating_od_mm);

    FlangeGeometry {
        inner_ring_width_mm,
        outer_ring_width_mm,
        effective_c_mm,
        shell_gap_a_mm,
        effective_b_min_in,
        bcd_method1_mm,
        bcd_method2_mm,
        bcd_method3_mm,
        bcd_tema_mm,
        bcd_source,
        bcd_manual: manual_bcd.is_some(),
        final_bcd_mm,
        seating_od_bcd_side_mm,
        seating_od_shell_side_mm,
        gasket_id_mm,
        seating_id_mm,
        seating_od_mm,
        gasket_od_mm,
        radial_distance_mm,
        edge_distance_mm,
        od_tema_mm,
        final_od_mm,
        max_raised_face_mm: clearance_stack(final_bcd_mm).ceil(),
        bolt_hole_dia_mm: hole,
        geometric_pitch_mm,
        min_bolt_spacing_mm,
        max_bolt_spacing_mm,
        spacing_ok,
        contact_width_mm,
        basic_width_mm,
        effective_width_mm,
        gasket_mean_dia_mm,
    }
}

/// Effective seating width `b` and reaction diameter `G` from `b0`
pub fn effective_gasket_width(basic_width_mm: f64, seating_id_mm: f64, seating_od_mm: f64) -> (f64, f64) {
    if basic_width_mm > NARROW_GASKET_LIMIT_MM {
        let b = 0.5 * MM_PER_INCH * (basic_width_mm / MM_PER_INCH).sqrt();
        (b, seating_od_mm - 2.0 * b)
    } else {
        (basic_width_mm, (seating_id_mm + seating_od_mm) / 2.0)
    }
}
