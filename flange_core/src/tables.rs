//! # Reference Tables
//!
//! The read-only lookup data every calculation consumes: TEMA bolt data,
//! hydraulic tensioning spacing, gasket ring standards, gasket factors and
//! bolt/plate materials.
//!
//! A [`ReferenceTables`] can only be built through validation, which rejects
//! empty tables once, up front. Every lookup afterwards is infallible: an
//! unmatched key falls back to the first row (or the last row for the ring
//! range table), so the engine always produces a numeric answer.
//!
//! ## Example
//!
//! ```rust
//! use flange_core::tables::ReferenceTables;
//!
//! let tables = ReferenceTables::standard().unwrap();
//! let bolt = tables.bolt_spec(0.75);
//! assert_eq!(bolt.hole_dia_mm, 22.225);
//!
//! // Unknown sizes fall back to the first row
//! assert_eq!(tables.bolt_spec(9.0).size_in, 0.5);
//! ```

use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{CalcError, CalcResult};
use crate::inputs::FlangeInputs;
use crate::materials::{BoltSpec, GasketFactor, Material, MaterialKind, RingStandard, TensioningSpec};

/// Standard reference data shipped with the crate
const STANDARD_TABLES_TOML: &str = include_str!("../data/standard_tables.toml");

static STANDARD_TABLES: Lazy<CalcResult<ReferenceTables>> =
    Lazy::new(|| ReferenceTables::from_toml_str(STANDARD_TABLES_TOML));

/// Unvalidated table rows, as read from a document or assembled by a caller.
///
/// Turn into a usable [`ReferenceTables`] with [`ReferenceTables::new`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    /// TEMA bolt data, in catalog order
    pub bolts: Vec<BoltSpec>,

    /// Hydraulic tensioning spacing (may be empty)
    #[serde(default)]
    pub tensioning: Vec<TensioningSpec>,

    /// Gasket ring standards by shell ID range
    pub rings: Vec<RingStandard>,

    /// Gasket factors
    pub gaskets: Vec<GasketFactor>,

    /// Bolting materials (35-step stress curves)
    pub bolt_materials: Vec<Material>,

    /// Plate / shell materials (32-step stress curves)
    pub plate_materials: Vec<Material>,
}

/// A validated, read-only set of reference tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableData", into = "TableData")]
pub struct ReferenceTables {
    data: TableData,
}

impl ReferenceTables {
    /// Validate table rows into a usable table set.
    ///
    /// Fails with [`CalcError::EmptyTable`] when any table that lookups fall
    /// back on is empty, and with [`CalcError::InvalidInput`] for inverted
    /// ring ranges. Stress curves whose length does not match their
    /// temperature-step sequence are accepted with a warning.
    pub fn new(data: TableData) -> CalcResult<Self> {
        let required = [
            ("bolts", data.bolts.is_empty()),
            ("rings", data.rings.is_empty()),
            ("gaskets", data.gaskets.is_empty()),
            ("bolt_materials", data.bolt_materials.is_empty()),
            ("plate_materials", data.plate_materials.is_empty()),
        ];
        if let Some((table, _)) = required.iter().find(|(_, empty)| *empty) {
            return Err(CalcError::empty_table(*table));
        }

        for ring in &data.rings {
            if ring.min_id_mm > ring.max_id_mm {
                return Err(CalcError::invalid_input(
                    "rings",
                    format!("[{}, {}]", ring.min_id_mm, ring.max_id_mm),
                    "Ring range minimum exceeds maximum",
                ));
            }
        }

        for (kind, materials) in [
            (MaterialKind::Bolt, &data.bolt_materials),
            (MaterialKind::Plate, &data.plate_materials),
        ] {
            for mat in materials.iter().filter(|m| !m.is_aligned(kind)) {
                warn!(
                    material = %mat.id,
                    points = mat.stresses.len(),
                    steps = kind.temperature_steps().len(),
                    "stress curve length does not match temperature steps"
                );
            }
        }

        Ok(ReferenceTables { data })
    }

    /// The standard tables embedded in the crate
    pub fn standard() -> CalcResult<&'static ReferenceTables> {
        STANDARD_TABLES.as_ref().map_err(Clone::clone)
    }

    /// Parse and validate a JSON table document
    pub fn from_json_str(json: &str) -> CalcResult<Self> {
        let data: TableData = serde_json::from_str(json)?;
        Self::new(data)
    }

    /// Parse and validate a TOML table document
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        let data: TableData = toml::from_str(text)?;
        Self::new(data)
    }

    /// Load a JSON (`.json`) or TOML (any other extension) table document
    pub fn load(path: &Path) -> CalcResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }

    /// The validated rows
    pub fn data(&self) -> &TableData {
        &self.data
    }

    /// Take back the rows for editing
    pub fn into_data(self) -> TableData {
        self.data
    }

    pub fn bolts(&self) -> &[BoltSpec] {
        &self.data.bolts
    }

    pub fn tensioning(&self) -> &[TensioningSpec] {
        &self.data.tensioning
    }

    pub fn rings(&self) -> &[RingStandard] {
        &self.data.rings
    }

    pub fn gaskets(&self) -> &[GasketFactor] {
        &self.data.gaskets
    }

    pub fn bolt_materials(&self) -> &[Material] {
        &self.data.bolt_materials
    }

    pub fn plate_materials(&self) -> &[Material] {
        &self.data.plate_materials
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Bolt data for `size_in`, falling back to the first row
    pub fn bolt_spec(&self, size_in: f64) -> &BoltSpec {
        self.data.bolts.iter().find(|b| b.matches_size(size_in)).unwrap_or_else(|| {
            debug!(size_in, "bolt size not tabulated, using first row");
            &self.data.bolts[0]
        })
    }

    /// Tensioning spacing for `size_in`; no fallback
    pub fn tensioning_spec(&self, size_in: f64) -> Option<&TensioningSpec> {
        self.data.tensioning.iter().find(|t| t.matches_size(size_in))
    }

    /// Ring standard whose inclusive range contains `inside_dia_mm`,
    /// falling back to the last row
    pub fn ring_standard(&self, inside_dia_mm: f64) -> &RingStandard {
        self.data.rings.iter().find(|r| r.contains(inside_dia_mm)).unwrap_or_else(|| {
            debug!(inside_dia_mm, "shell ID outside ring ranges, using last row");
            &self.data.rings[self.data.rings.len() - 1]
        })
    }

    /// Gasket factors for `gasket_id`, falling back to the first row
    pub fn gasket_factor(&self, gasket_id: &str) -> &GasketFactor {
        self.data.gaskets.iter().find(|g| g.id == gasket_id).unwrap_or_else(|| {
            debug!(gasket_id, "gasket type not tabulated, using first row");
            &self.data.gaskets[0]
        })
    }

    /// Pass-partition gasket factors, falling back to the main gasket
    pub fn pass_gasket_factor<'a>(&'a self, gasket_id: &str, main: &'a GasketFactor) -> &'a GasketFactor {
        self.data.gaskets.iter().find(|g| g.id == gasket_id).unwrap_or(main)
    }

    /// Bolting material by id, falling back to the first row
    pub fn bolt_material(&self, material_id: &str) -> &Material {
        find_material(&self.data.bolt_materials, material_id)
    }

    /// Plate material by id, falling back to the first row
    pub fn plate_material(&self, material_id: &str) -> &Material {
        find_material(&self.data.plate_materials, material_id)
    }

    /// Bolting material by id, failing when absent
    pub fn bolt_material_strict(&self, material_id: &str) -> CalcResult<&Material> {
        self.data
            .bolt_materials
            .iter()
            .find(|m| m.id == material_id)
            .ok_or_else(|| CalcError::material_not_found(material_id))
    }

    /// Catalog bolt sizes, in table order
    pub fn bolt_sizes(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.bolts.iter().map(|b| b.size_in)
    }

    /// Resolve every reference row an evaluation of `inputs` needs
    pub fn resolve(&self, inputs: &FlangeInputs) -> ResolvedReferences<'_> {
        let gasket = self.gasket_factor(&inputs.gasket_type);
        ResolvedReferences {
            bolt: self.bolt_spec(inputs.bolt_size_in),
            tensioning: self.tensioning_spec(inputs.bolt_size_in),
            ring: self.ring_standard(inputs.inside_dia_mm),
            gasket,
            pass_gasket: self.pass_gasket_factor(&inputs.pass_gasket_type, gasket),
            bolt_material: self.bolt_material(&inputs.bolt_material),
            shell_material: self.plate_material(&inputs.shell_material),
        }
    }
}

impl TryFrom<TableData> for ReferenceTables {
    type Error = CalcError;

    fn try_from(data: TableData) -> CalcResult<Self> {
        ReferenceTables::new(data)
    }
}

impl From<ReferenceTables> for TableData {
    fn from(tables: ReferenceTables) -> Self {
        tables.data
    }
}

fn find_material<'a>(materials: &'a [Material], material_id: &str) -> &'a Material {
    materials.iter().find(|m| m.id == material_id).unwrap_or_else(|| {
        debug!(material_id, "material not tabulated, using first row");
        &materials[0]
    })
}

/// The reference rows selected for one set of inputs
#[derive(Debug, Clone, Copy)]
pub struct ResolvedReferences<'a> {
    pub bolt: &'a BoltSpec,
    /// Present only when the size has a tensioning row
    pub tensioning: Option<&'a TensioningSpec>,
    pub ring: &'a RingStandard,
    pub gasket: &'a GasketFactor,
    pub pass_gasket: &'a GasketFactor,
    pub bolt_material: &'a Material,
    pub shell_material: &'a Material,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tables_parse() {
        let tables = ReferenceTables::standard().unwrap();
        assert_eq!(tables.bolts().len(), 21);
        assert_eq!(tables.tensioning().len(), 19);
        assert_eq!(tables.rings().len(), 12);
        assert_eq!(tables.gaskets().len(), 42);
        assert_eq!(tables.bolt_materials().len(), 4);
        assert_eq!(tables.plate_materials().len(), 5);
    }

    #[test]
    fn test_bolt_lookup_and_fallback() {
        let tables = ReferenceTables::standard().unwrap();
        let b = tables.bolt_spec(1.0);
        assert_eq!(b.radial_distance_in, 1.375);
        assert_eq!(b.whc_max_pitch_mm, Some(116.0));
        assert_eq!(tables.bolt_spec(0.3).size_in, 0.5);
    }

    #[test]
    fn test_tensioning_has_no_fallback() {
        let tables = ReferenceTables::standard().unwrap();
        assert_eq!(tables.tensioning_spec(1.25).map(|t| t.min_spacing_in), Some(2.9));
        assert!(tables.tensioning_spec(0.5).is_none());
    }

    #[test]
    fn test_ring_lookup_inclusive_with_last_fallback() {
        let tables = ReferenceTables::standard().unwrap();
        assert_eq!(tables.ring_standard(1000.0).inner_ring_min_mm, 9.0);
        assert_eq!(tables.ring_standard(1001.0).inner_ring_min_mm, 12.0);
        // Falls between the integer ranges
        assert_eq!(tables.ring_standard(1000.5).outer_ring_min_mm, 15.0);
        assert_eq!(tables.ring_standard(-5.0).outer_ring_min_mm, 15.0);
    }

    #[test]
    fn test_gasket_and_material_fallbacks() {
        let tables = ReferenceTables::standard().unwrap();
        assert_eq!(tables.gasket_factor("Vegetable fiber").m, 1.75);
        assert_eq!(tables.gasket_factor("unknown").m, 0.0);

        let main = tables.gasket_factor("Vegetable fiber");
        assert_eq!(tables.pass_gasket_factor("unknown", main).id, "Vegetable fiber");

        assert_eq!(tables.bolt_material("SA-453 660 A").min_yield_mpa, Some(585.0));
        assert_eq!(tables.bolt_material("nope").id, "SA-193 B7 (<= 64)");
        assert_eq!(tables.plate_material("SA–516-70").min_tensile_mpa, Some(485.0));
        assert!(tables.bolt_material_strict("nope").is_err());
    }

    #[test]
    fn test_empty_table_rejected() {
        let mut data = ReferenceTables::standard().unwrap().clone().into_data();
        data.gaskets.clear();
        let err = ReferenceTables::new(data).unwrap_err();
        assert_eq!(err, CalcError::empty_table("gaskets"));
    }

    #[test]
    fn test_empty_tensioning_allowed() {
        let mut data = ReferenceTables::standard().unwrap().clone().into_data();
        data.tensioning.clear();
        assert!(ReferenceTables::new(data).is_ok());
    }

    #[test]
    fn test_inverted_ring_range_rejected() {
        let mut data = ReferenceTables::standard().unwrap().clone().into_data();
        data.rings[0].min_id_mm = 50.0;
        assert_eq!(ReferenceTables::new(data).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_json_roundtrip_validates() {
        let tables = ReferenceTables::standard().unwrap();
        let json = serde_json::to_string(tables).unwrap();
        let parsed = ReferenceTables::from_json_str(&json).unwrap();
        assert_eq!(&parsed, tables);

        let empty = r#"{ "bolts": [], "rings": [], "gaskets": [], "bolt_materials": [], "plate_materials": [] }"#;
        assert!(serde_json::from_str::<ReferenceTables>(empty).is_err());
    }

    #[test]
    fn test_resolve_default_inputs() {
        let tables = ReferenceTables::standard().unwrap();
        let refs = tables.resolve(&FlangeInputs::default());
        assert_eq!(refs.bolt.size_in, 0.75);
        assert!(refs.tensioning.is_some());
        assert_eq!(refs.ring.outer_ring_min_mm, 8.0);
        assert_eq!(refs.gasket.m, 3.0);
        assert_eq!(refs.pass_gasket.id, refs.gasket.id);
        assert_eq!(refs.shell_material.id, "SA–516-70");
    }
}
