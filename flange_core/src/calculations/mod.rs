//! # Flange Calculations
//!
//! The calculation chain for one bolted flange joint. Each stage is a pure
//! function of the inputs, the resolved reference rows and the results of
//! the stages before it:
//!
//! 1. [`shell`] - automatic shell thickness g0 and hub thickness g1
//! 2. [`geometry`] - bolt circle, flange OD, gasket seating and widths
//! 3. [`bolt_load`] - operating and seating loads, required bolt area
//! 4. [`pcc1`] - ASME PCC-1 assembly bolt stress selection
//! 5. [`flange`] - the complete [`CalculationResults`] record
//!
//! [`optimizer`] searches bolt size × count over the whole chain.

pub mod bolt_load;
pub mod flange;
pub mod geometry;
pub mod optimizer;
pub mod pcc1;
pub mod shell;

// Re-export commonly used types
pub use bolt_load::BoltLoad;
pub use flange::{evaluate, evaluate_with, CalculationResults};
pub use geometry::{BcdMethod, FlangeGeometry};
pub use optimizer::{optimize, optimize_with, reset_and_optimize, OptimizationOutcome, SearchMode};
pub use pcc1::{Pcc1Check, Pcc1Evaluation, Pcc1Joint};
pub use shell::ShellThickness;
