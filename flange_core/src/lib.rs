//! # flange_core - Flange Bolting and Gasket Geometry Engine
//!
//! `flange_core` sizes the bolting and gasket seating of a bolted flange
//! joint using TEMA bolt-circle rules, ASME VIII Div.1 Appendix 2 bolt loads
//! and the ASME PCC-1 assembly bolt stress procedure. All inputs and outputs
//! are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: every evaluation recomputes the full result record
//! - **Data-driven**: bolt, gasket, ring and material tables are plain data
//!   that can be replaced at load time
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use flange_core::{evaluate, FlangeInputs, ReferenceTables};
//!
//! let tables = ReferenceTables::standard().unwrap();
//! let mut inputs = FlangeInputs::default();
//! inputs.bolt_count = 52;
//!
//! let results = evaluate(&inputs, tables);
//! println!("BCD {} mm, OD {} mm", results.geometry.final_bcd_mm, results.geometry.final_od_mm);
//!
//! let json = serde_json::to_string_pretty(&results).unwrap();
//! assert!(json.contains("final_bcd_mm"));
//! ```
//!
//! ## Modules
//!
//! - [`inputs`] - The flange definition and its editing operations
//! - [`calculations`] - Geometry, bolt loads, PCC-1 and the optimizer
//! - [`tables`] - Reference tables (bolts, rings, gaskets, materials)
//! - [`materials`] - Material records, gasket factors and interpolation
//! - [`settings`] - Engine settings (fallbacks and interpolation policy)
//! - [`units`] - Unit conversions
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod inputs;
pub mod materials;
pub mod settings;
pub mod tables;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{evaluate, evaluate_with, optimize, CalculationResults, OptimizationOutcome};
pub use errors::{CalcError, CalcResult};
pub use inputs::FlangeInputs;
pub use settings::EngineSettings;
pub use tables::ReferenceTables;
