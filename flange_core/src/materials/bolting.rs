//! Bolting Reference Records (TEMA / WHC / hydraulic tensioning / ring standards)
//!
//! Bolt dimensions follow the TEMA bolting data table and are published in
//! inches; hole diameters and stress areas are already metric. Gasket ring
//! standards map a shell inside-diameter range to minimum inner/outer
//! centering ring widths.

use serde::{Deserialize, Serialize};

use crate::units::inches_to_mm;

/// Tolerance for matching nominal bolt sizes parsed from tables
const SIZE_TOLERANCE_IN: f64 = 1e-6;

/// TEMA bolting data for one nominal bolt size.
///
/// ## JSON Example
///
/// ```json
/// {
///   "size_in": 0.75,
///   "radial_distance_in": 1.125,
///   "min_pitch_in": 1.75,
///   "edge_distance_in": 0.8125,
///   "hole_dia_mm": 22.225,
///   "tensile_area_mm2": 194.84,
///   "whc_max_pitch_mm": 90.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoltSpec {
    /// Nominal bolt diameter (in)
    pub size_in: f64,

    /// Radial distance R from hub to bolt centre (in)
    pub radial_distance_in: f64,

    /// Minimum bolt pitch B_min (in)
    pub min_pitch_in: f64,

    /// Edge distance E from bolt centre to flange OD (in)
    pub edge_distance_in: f64,

    /// Bolt hole diameter (mm)
    pub hole_dia_mm: f64,

    /// Tensile stress (root) area of one bolt (mm²)
    pub tensile_area_mm2: f64,

    /// WHC maximum allowable pitch (mm); formula fallback when absent
    #[serde(default)]
    pub whc_max_pitch_mm: Option<f64>,
}

impl BoltSpec {
    /// Whether this row is for the given nominal size
    pub fn matches_size(&self, size_in: f64) -> bool {
        (self.size_in - size_in).abs() < SIZE_TOLERANCE_IN
    }

    /// Radial distance R (mm)
    pub fn radial_distance_mm(&self) -> f64 {
        inches_to_mm(self.radial_distance_in)
    }

    /// Edge distance E (mm)
    pub fn edge_distance_mm(&self) -> f64 {
        inches_to_mm(self.edge_distance_in)
    }

    /// Maximum allowable pitch (mm): the WHC value, else [`formula_max_pitch_mm`]
    pub fn max_pitch_mm(&self) -> f64 {
        self.whc_max_pitch_mm
            .filter(|&p| p > 0.0)
            .unwrap_or_else(|| formula_max_pitch_mm(self.size_in))
    }
}

/// Maximum bolt pitch `2.5·d + 12` (mm) for a bolt of `size_in` inches
pub fn formula_max_pitch_mm(size_in: f64) -> f64 {
    2.5 * inches_to_mm(size_in) + 12.0
}

/// Minimum bolt spacing required for hydraulic tensioning tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensioningSpec {
    /// Nominal bolt diameter (in)
    pub size_in: f64,

    /// Minimum spacing B_ten (in)
    pub min_spacing_in: f64,
}

impl TensioningSpec {
    /// Whether this row is for the given nominal size
    pub fn matches_size(&self, size_in: f64) -> bool {
        (self.size_in - size_in).abs() < SIZE_TOLERANCE_IN
    }
}

/// Minimum centering ring widths for a shell inside-diameter range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingStandard {
    /// Lower bound of the shell ID range, inclusive (mm)
    pub min_id_mm: f64,

    /// Upper bound of the shell ID range, inclusive (mm)
    pub max_id_mm: f64,

    /// Minimum inner ring width (mm)
    pub inner_ring_min_mm: f64,

    /// Minimum outer ring width (mm)
    pub outer_ring_min_mm: f64,
}

impl RingStandard {
    /// Whether the inclusive range contains `inside_dia_mm`
    pub fn contains(&self, inside_dia_mm: f64) -> bool {
        inside_dia_mm >= self.min_id_mm && inside_dia_mm <= self.max_id_mm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spec_075() -> BoltSpec {
        BoltSpec {
            size_in: 0.75,
            radial_distance_in: 1.125,
            min_pitch_in: 1.75,
            edge_distance_in: 0.8125,
            hole_dia_mm: 22.225,
            tensile_area_mm2: 194.84,
            whc_max_pitch_mm: Some(90.0),
        }
    }

    #[test]
    fn test_bolt_dimensions_in_mm() {
        let spec = spec_075();
        assert_relative_eq!(spec.radial_distance_mm(), 28.575, epsilon = 1e-9);
        assert_relative_eq!(spec.edge_distance_mm(), 20.6375, epsilon = 1e-9);
        assert!(spec.matches_size(0.75));
        assert!(!spec.matches_size(0.875));
    }

    #[test]
    fn test_max_pitch_fallback_formula() {
        let mut spec = spec_075();
        assert_eq!(spec.max_pitch_mm(), 90.0);

        spec.whc_max_pitch_mm = None;
        // 2.5 × 0.75 × 25.4 + 12
        assert_relative_eq!(spec.max_pitch_mm(), 59.625, epsilon = 1e-9);
    }

    #[test]
    fn test_ring_range_is_inclusive() {
        let ring = RingStandard {
            min_id_mm: 631.0,
            max_id_mm: 1000.0,
            inner_ring_min_mm: 9.0,
            outer_ring_min_mm: 8.0,
        };
        assert!(ring.contains(631.0));
        assert!(ring.contains(1000.0));
        assert!(!ring.contains(1000.5));
        assert!(!ring.contains(630.0));
    }
}
