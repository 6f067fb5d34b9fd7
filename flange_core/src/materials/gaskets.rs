//! Gasket Factors (ASME VIII Div.1 Appendix 2, Table 2-5.1 / 2-5.2)
//!
//! Each gasket type carries a maintenance factor `m`, a minimum design
//! seating stress `y` (psi) and the facing sketches it is tabulated for. The
//! facing sketch decides how the basic seating width b0 follows from the
//! contact width N.

use serde::{Deserialize, Serialize};

use crate::units::psi_to_mpa;

/// Gasket factors for one gasket type.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "Spiral-wound (Stainless steel, Monel, and Ni-base alloy)",
///   "m": 3.0,
///   "y_psi": 10000.0,
///   "sketches": "(1a), (1b)"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasketFactor {
    /// Gasket type identifier
    pub id: String,

    /// Gasket factor m (dimensionless)
    pub m: f64,

    /// Minimum design seating stress y (psi)
    pub y_psi: f64,

    /// Facing sketches the factors apply to, e.g. `"(1a), (1b)"`
    #[serde(default)]
    pub sketches: String,
}

impl GasketFactor {
    /// Create a gasket factor row with no sketch list
    pub fn new(id: impl Into<String>, m: f64, y_psi: f64) -> Self {
        GasketFactor {
            id: id.into(),
            m,
            y_psi,
            sketches: String::new(),
        }
    }

    /// Seating stress y in MPa
    pub fn y_mpa(&self) -> f64 {
        psi_to_mpa(self.y_psi)
    }

    /// Whether the table lists `sketch` for this gasket type
    pub fn lists_sketch(&self, sketch: FacingSketch) -> bool {
        match sketch.table_tag() {
            Some(tag) => self.sketches.contains(tag),
            None => false,
        }
    }

    /// API 660 family used for PCC-1 gasket stress presets
    pub fn api660_family(&self) -> Option<Api660Family> {
        Api660Family::classify(&self.id)
    }
}

/// ASME Table 2-5.2 facing sketch
///
/// Serialized as the short code (`"1a"` … `"2"`); labels such as
/// `"1c: Raised Face / Tongue"` are accepted and matched by prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FacingSketch {
    #[default]
    Sketch1a,
    Sketch1b,
    Sketch1c,
    Sketch1d,
    /// Ring joint
    Sketch2,
    /// Anything not covered above; treated like 1a/1b
    Unlisted,
}

impl FacingSketch {
    /// Parse a sketch code or label by prefix
    pub fn parse_lenient(label: &str) -> Self {
        let code = label.trim().trim_start_matches('(');
        if code.starts_with("1a") {
            FacingSketch::Sketch1a
        } else if code.starts_with("1b") {
            FacingSketch::Sketch1b
        } else if code.starts_with("1c") {
            FacingSketch::Sketch1c
        } else if code.starts_with("1d") {
            FacingSketch::Sketch1d
        } else if code.starts_with('2') {
            FacingSketch::Sketch2
        } else {
            FacingSketch::Unlisted
        }
    }

    /// Short code, also the serialized form
    pub fn code(&self) -> &'static str {
        match self {
            FacingSketch::Sketch1a => "1a",
            FacingSketch::Sketch1b => "1b",
            FacingSketch::Sketch1c => "1c",
            FacingSketch::Sketch1d => "1d",
            FacingSketch::Sketch2 => "2",
            FacingSketch::Unlisted => "other",
        }
    }

    fn table_tag(&self) -> Option<&'static str> {
        match self {
            FacingSketch::Sketch1a => Some("(1a)"),
            FacingSketch::Sketch1b => Some("(1b)"),
            FacingSketch::Sketch1c => Some("(1c)"),
            FacingSketch::Sketch1d => Some("(1d)"),
            FacingSketch::Sketch2 => Some("(2)"),
            FacingSketch::Unlisted => None,
        }
    }

    /// Basic gasket seating width b0 from contact width N
    ///
    /// ```text
    /// 1a, 1b : b0 = N/2
    /// 1c, 1d : b0 = N/4
    /// 2      : b0 = N/8
    /// ```
    pub fn basic_seating_width(&self, contact_width_mm: f64) -> f64 {
        match self {
            FacingSketch::Sketch1a | FacingSketch::Sketch1b | FacingSketch::Unlisted => contact_width_mm / 2.0,
            FacingSketch::Sketch1c | FacingSketch::Sketch1d => contact_width_mm / 4.0,
            FacingSketch::Sketch2 => contact_width_mm / 8.0,
        }
    }
}

impl From<String> for FacingSketch {
    fn from(label: String) -> Self {
        FacingSketch::parse_lenient(&label)
    }
}

impl From<FacingSketch> for String {
    fn from(sketch: FacingSketch) -> Self {
        sketch.code().to_string()
    }
}

impl std::fmt::Display for FacingSketch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// API 660 gasket families with tabulated PCC-1 gasket stress limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Api660Family {
    /// Grooved metal with soft facing
    GroovedMetal,
    /// Corrugated metal with soft facing
    CorrugatedMetal,
    /// Spiral-wound
    SpiralWound,
}

impl Api660Family {
    /// Classify a gasket type id by name
    pub fn classify(gasket_id: &str) -> Option<Self> {
        let lower = gasket_id.to_lowercase();
        if lower.contains("grooved") {
            Some(Api660Family::GroovedMetal)
        } else if lower.contains("corruga") {
            Some(Api660Family::CorrugatedMetal)
        } else if lower.contains("spiral") {
            Some(Api660Family::SpiralWound)
        } else {
            None
        }
    }

    /// Maximum gasket stress Sg,max (MPa); 0 when the table defers to the
    /// manufacturer (spiral-wound, note b)
    pub fn sg_max_mpa(&self) -> f64 {
        match self {
            Api660Family::GroovedMetal => 380.0,
            Api660Family::CorrugatedMetal => 275.0,
            Api660Family::SpiralWound => 0.0,
        }
    }

    /// Minimum seating gasket stress Sg,min-S (MPa)
    pub fn sg_min_seating_mpa(&self) -> f64 {
        140.0
    }

    /// Minimum operating gasket stress Sg,min-O (MPa)
    pub fn sg_min_operating_mpa(&self) -> f64 {
        97.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sketch_parsing() {
        assert_eq!(FacingSketch::parse_lenient("1a: Flat Face / Groove"), FacingSketch::Sketch1a);
        assert_eq!(FacingSketch::parse_lenient("1d"), FacingSketch::Sketch1d);
        assert_eq!(FacingSketch::parse_lenient("(1c)"), FacingSketch::Sketch1c);
        assert_eq!(FacingSketch::parse_lenient("2: Ring Joint"), FacingSketch::Sketch2);
        assert_eq!(FacingSketch::parse_lenient("3"), FacingSketch::Unlisted);
    }

    #[test]
    fn test_basic_seating_width() {
        assert_eq!(FacingSketch::Sketch1a.basic_seating_width(16.0), 8.0);
        assert_eq!(FacingSketch::Sketch1b.basic_seating_width(16.0), 8.0);
        assert_eq!(FacingSketch::Sketch1c.basic_seating_width(16.0), 4.0);
        assert_eq!(FacingSketch::Sketch1d.basic_seating_width(16.0), 4.0);
        assert_eq!(FacingSketch::Sketch2.basic_seating_width(16.0), 2.0);
        assert_eq!(FacingSketch::Unlisted.basic_seating_width(16.0), 8.0);
    }

    #[test]
    fn test_sketch_serialization() {
        let json = serde_json::to_string(&FacingSketch::Sketch2).unwrap();
        assert_eq!(json, "\"2\"");
        let sketch: FacingSketch = serde_json::from_str("\"1b: Raised Face\"").unwrap();
        assert_eq!(sketch, FacingSketch::Sketch1b);
    }

    #[test]
    fn test_gasket_factor_lookups() {
        let mut sw = GasketFactor::new("Spiral-wound (Carbon steel)", 2.5, 10_000.0);
        sw.sketches = "(1a), (1b)".to_string();
        assert_relative_eq!(sw.y_mpa(), 68.9476, epsilon = 1e-9);
        assert!(sw.lists_sketch(FacingSketch::Sketch1b));
        assert!(!sw.lists_sketch(FacingSketch::Sketch1c));
        assert!(!sw.lists_sketch(FacingSketch::Unlisted));
        assert_eq!(sw.api660_family(), Some(Api660Family::SpiralWound));
    }

    #[test]
    fn test_api660_classification() {
        assert_eq!(
            Api660Family::classify("Grooved metal (Soft aluminum)"),
            Some(Api660Family::GroovedMetal)
        );
        assert_eq!(
            Api660Family::classify("Corrugated metal, jacketed (Soft copper or brass)"),
            Some(Api660Family::CorrugatedMetal)
        );
        assert_eq!(Api660Family::classify("Vegetable fiber"), None);
        assert_eq!(Api660Family::GroovedMetal.sg_max_mpa(), 380.0);
        assert_eq!(Api660Family::SpiralWound.sg_max_mpa(), 0.0);
    }
}
