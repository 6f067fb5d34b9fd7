//! # Bolt Configuration Optimizer
//!
//! Brute-force search over bolt size × bolt count for the smallest bolt
//! circle that carries the governing load at design stress and keeps the
//! bolt pitch within the spacing bounds.
//!
//! - Sizes: the current size only (fixed-size search) or every catalog size
//!   from 0.75 in up, in table order.
//! - Counts: 4, 8, … 80.
//! - Gasket: kept as defined when manual seating values pin it or a gasket
//!   preference is set; otherwise each candidate re-derives the gasket.
//! - Ties keep the first candidate found.
//!
//! ## Example
//!
//! ```rust
//! use flange_core::calculations::optimizer::{optimize, OptimizationOutcome};
//! use flange_core::inputs::FlangeInputs;
//! use flange_core::tables::ReferenceTables;
//!
//! let tables = ReferenceTables::standard().unwrap();
//! let mut inputs = FlangeInputs::default();
//!
//! // Standard bolt curves are unpublished, so nothing is strong enough
//! let outcome = optimize(&inputs, tables, false);
//! assert!(matches!(outcome, OptimizationOutcome::NotFound { .. }));
//! assert!(!outcome.commit(&mut inputs));
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculations::flange::evaluate_with;
use crate::inputs::FlangeInputs;
use crate::settings::EngineSettings;
use crate::tables::ReferenceTables;

/// Bolt counts tried for every size
pub const BOLT_COUNT_CANDIDATES: [u32; 20] = [
    4, 8, 12, 16, 20, 24, 28, 32, 36, 40, 44, 48, 52, 56, 60, 64, 68, 72, 76, 80,
];

/// Smallest catalog bolt size considered by a full search (in)
pub const MIN_SEARCH_BOLT_SIZE_IN: f64 = 0.75;

/// Search space: bolt size fixed or free × gasket fixed or re-derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    FullSearchAutoGasket,
    FullSearchFixedGasket,
    FixedSizeAutoGasket,
    FixedSizeFixedGasket,
}

impl SearchMode {
    pub const ALL: [SearchMode; 4] = [
        SearchMode::FullSearchAutoGasket,
        SearchMode::FullSearchFixedGasket,
        SearchMode::FixedSizeAutoGasket,
        SearchMode::FixedSizeFixedGasket,
    ];

    pub fn new(size_fixed: bool, gasket_fixed: bool) -> Self {
        match (size_fixed, gasket_fixed) {
            (false, false) => SearchMode::FullSearchAutoGasket,
            (false, true) => SearchMode::FullSearchFixedGasket,
            (true, false) => SearchMode::FixedSizeAutoGasket,
            (true, true) => SearchMode::FixedSizeFixedGasket,
        }
    }

    /// Mode for `inputs`; the gasket is fixed when the inputs pin it
    pub fn for_inputs(inputs: &FlangeInputs, fixed_size: bool) -> Self {
        SearchMode::new(fixed_size, inputs.gasket_fixed())
    }

    pub fn size_fixed(&self) -> bool {
        matches!(self, SearchMode::FixedSizeAutoGasket | SearchMode::FixedSizeFixedGasket)
    }

    pub fn gasket_fixed(&self) -> bool {
        matches!(self, SearchMode::FullSearchFixedGasket | SearchMode::FixedSizeFixedGasket)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SearchMode::FullSearchAutoGasket => "Full Search + Auto Gasket",
            SearchMode::FullSearchFixedGasket => "Full Search + Fixed Gasket",
            SearchMode::FixedSizeAutoGasket => "Fixed Size + Auto Gasket",
            SearchMode::FixedSizeFixedGasket => "Fixed Size + Fixed Gasket",
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Result of a configuration search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OptimizationOutcome {
    /// A feasible configuration with the smallest bolt circle
    Found {
        size_in: f64,
        count: u32,
        min_bcd_mm: f64,
        mode: SearchMode,
        evaluations: usize,
    },
    /// No candidate satisfied strength and spacing
    NotFound { mode: SearchMode, evaluations: usize },
}

impl OptimizationOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, OptimizationOutcome::Found { .. })
    }

    pub fn mode(&self) -> SearchMode {
        match self {
            OptimizationOutcome::Found { mode, .. } | OptimizationOutcome::NotFound { mode, .. } => *mode,
        }
    }

    /// Number of candidate configurations evaluated
    pub fn evaluations(&self) -> usize {
        match self {
            OptimizationOutcome::Found { evaluations, .. } | OptimizationOutcome::NotFound { evaluations, .. } => {
                *evaluations
            }
        }
    }

    /// Write a found size/count into `inputs` and clear manual BCD/OD.
    ///
    /// Leaves `inputs` untouched and returns false for `NotFound`.
    pub fn commit(&self, inputs: &mut FlangeInputs) -> bool {
        match self {
            OptimizationOutcome::Found { size_in, count, .. } => {
                inputs.bolt_size_in = *size_in;
                inputs.bolt_count = *count;
                inputs.manual.clear_bcd_od();
                true
            }
            OptimizationOutcome::NotFound { .. } => false,
        }
    }
}

/// Search with default engine settings. `inputs` is not modified.
pub fn optimize(inputs: &FlangeInputs, tables: &ReferenceTables, fixed_size: bool) -> OptimizationOutcome {
    optimize_with(inputs, tables, fixed_size, &EngineSettings::default())
}

/// Search with explicit engine settings. `inputs` is not modified.
pub fn optimize_with(
    inputs: &FlangeInputs,
    tables: &ReferenceTables,
    fixed_size: bool,
    settings: &EngineSettings,
) -> OptimizationOutcome {
    let mode = SearchMode::for_inputs(inputs, fixed_size);
    let sizes: Vec<f64> = if mode.size_fixed() {
        vec![inputs.bolt_size_in]
    } else {
        tables.bolt_sizes().filter(|&s| s >= MIN_SEARCH_BOLT_SIZE_IN).collect()
    };

    let mut best: Option<(f64, u32, f64)> = None;
    let mut evaluations = 0usize;

    for &size_in in &sizes {
        for &count in &BOLT_COUNT_CANDIDATES {
            let candidate = candidate_inputs(inputs, size_in, count, mode);
            let results = evaluate_with(&candidate, tables, settings);
            evaluations += 1;

            let feasible = results.is_safe && results.geometry.spacing_ok;
            let bcd = results.geometry.bcd_tema_mm;
            debug!(size_in, count, bcd_mm = bcd, feasible, "optimizer candidate");

            if feasible && best.map_or(true, |(_, _, min)| bcd < min) {
                best = Some((size_in, count, bcd));
            }
        }
    }

    match best {
        Some((size_in, count, min_bcd_mm)) => {
            info!(%mode, size_in, count, min_bcd_mm, evaluations, "optimization found a configuration");
            OptimizationOutcome::Found {
                size_in,
                count,
                min_bcd_mm,
                mode,
                evaluations,
            }
        }
        None => {
            info!(%mode, evaluations, "optimization found no feasible configuration");
            OptimizationOutcome::NotFound { mode, evaluations }
        }
    }
}

/// Search and commit the outcome into `inputs`
pub fn optimize_and_commit(
    inputs: &mut FlangeInputs,
    tables: &ReferenceTables,
    fixed_size: bool,
    settings: &EngineSettings,
) -> OptimizationOutcome {
    let outcome = optimize_with(inputs, tables, fixed_size, settings);
    outcome.commit(inputs);
    outcome
}

/// Recompute g0/g1, drop manual mode and every gasket pin, then run a full
/// search and commit it.
///
/// The thickness and override changes stay in `inputs` even when no
/// configuration is found.
pub fn reset_and_optimize(
    inputs: &mut FlangeInputs,
    tables: &ReferenceTables,
    settings: &EngineSettings,
) -> OptimizationOutcome {
    inputs.apply_auto_thickness(tables, settings);
    inputs.manual.enabled = false;
    inputs.manual.clear_bcd_od();
    inputs.manual.clear_seating();
    inputs.gasket_preference = None;
    optimize_and_commit(inputs, tables, false, settings)
}

fn candidate_inputs(inputs: &FlangeInputs, size_in: f64, count: u32, mode: SearchMode) -> FlangeInputs {
    let mut candidate = inputs.clone();
    candidate.bolt_size_in = size_in;
    candidate.bolt_count = count;
    candidate.manual.clear_bcd_od();
    if !mode.gasket_fixed() {
        candidate.manual.clear_seating();
        candidate.gasket_preference = None;
    }
    candidate
}
