//! # Unit Types
//!
//! Lightweight unit wrappers and the two process-condition converters the
//! engine needs: pressure to MPa and temperature to °C.
//!
//! ## Internal Unit System
//!
//! Flange geometry mixes two worlds. TEMA bolt tables are published in inches
//! while every derived dimension is carried in millimetres:
//! - Length: millimetres (mm); bolt table columns in inches (in)
//! - Stress / pressure: megapascals (MPa); ASME gasket `y` in psi
//! - Force: newtons (N), consistent with mm and MPa
//! - Area: square millimetres (mm²)
//!
//! ## Example
//!
//! ```rust
//! use flange_core::units::{Inches, Millimeters, PressureUnit, TemperatureUnit};
//!
//! let pitch: Millimeters = Inches(1.75).into();
//! assert!((pitch.0 - 44.45).abs() < 1e-9);
//!
//! assert!((PressureUnit::Bar.to_mpa(10.0) - 1.0).abs() < 1e-12);
//! assert!((TemperatureUnit::Fahrenheit.to_celsius(212.0) - 100.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// MPa per psi, the factor used for gasket `y` values and PSI pressures
pub const MPA_PER_PSI: f64 = 0.00689476;

/// MPa per bar
pub const MPA_PER_BAR: f64 = 0.1;

/// MPa per kg/cm²
pub const MPA_PER_KG_CM2: f64 = 0.0980665;

// ============================================================================
// Length Units
// ============================================================================

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Inches> for Millimeters {
    fn from(inches: Inches) -> Self {
        Millimeters(inches.0 * MM_PER_INCH)
    }
}

impl From<Millimeters> for Inches {
    fn from(mm: Millimeters) -> Self {
        Inches(mm.0 / MM_PER_INCH)
    }
}

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in pounds per square inch (psi)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Psi(pub f64);

/// Stress in megapascals (MPa, N/mm²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MegaPascals(pub f64);

impl From<Psi> for MegaPascals {
    fn from(psi: Psi) -> Self {
        MegaPascals(psi.0 * MPA_PER_PSI)
    }
}

impl From<MegaPascals> for Psi {
    fn from(mpa: MegaPascals) -> Self {
        Psi(mpa.0 / MPA_PER_PSI)
    }
}

/// Convert an inch dimension from a bolt table to millimetres.
pub fn inches_to_mm(inches: f64) -> f64 {
    Millimeters::from(Inches(inches)).0
}

/// Convert a psi stress (gasket `y`) to MPa.
pub fn psi_to_mpa(psi: f64) -> f64 {
    MegaPascals::from(Psi(psi)).0
}

// ============================================================================
// Process Condition Units
// ============================================================================

/// Design pressure unit.
///
/// Serializes as its label (`"MPa"`, `"Bar"`, `"PSI"`, `"kg/cm²"`). Unknown
/// labels deserialize as [`PressureUnit::MPa`], so a pressure in an
/// unrecognized unit is taken at face value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PressureUnit {
    #[default]
    MPa,
    Bar,
    Psi,
    KgPerCm2,
}

impl PressureUnit {
    /// All pressure units for selection lists
    pub const ALL: [PressureUnit; 4] = [
        PressureUnit::MPa,
        PressureUnit::Bar,
        PressureUnit::Psi,
        PressureUnit::KgPerCm2,
    ];

    /// Display label, also the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            PressureUnit::MPa => "MPa",
            PressureUnit::Bar => "Bar",
            PressureUnit::Psi => "PSI",
            PressureUnit::KgPerCm2 => "kg/cm²",
        }
    }

    /// Parse a unit label. Never fails: anything unrecognized is MPa.
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim() {
            "Bar" | "bar" | "BAR" => PressureUnit::Bar,
            "PSI" | "psi" | "Psi" => PressureUnit::Psi,
            "kg/cm²" | "kg/cm2" | "kgf/cm²" | "kgf/cm2" => PressureUnit::KgPerCm2,
            _ => PressureUnit::MPa,
        }
    }

    /// Convert a pressure in this unit to MPa
    pub fn to_mpa(&self, value: f64) -> f64 {
        match self {
            PressureUnit::MPa => value,
            PressureUnit::Bar => value * MPA_PER_BAR,
            PressureUnit::Psi => value * MPA_PER_PSI,
            PressureUnit::KgPerCm2 => value * MPA_PER_KG_CM2,
        }
    }
}

impl From<String> for PressureUnit {
    fn from(label: String) -> Self {
        PressureUnit::parse_lenient(&label)
    }
}

impl From<PressureUnit> for String {
    fn from(unit: PressureUnit) -> Self {
        unit.label().to_string()
    }
}

impl std::fmt::Display for PressureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Design temperature unit.
///
/// Serializes as `"°C"`, `"°F"` or `"K"`; unknown labels are taken as °C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    /// All temperature units for selection lists
    pub const ALL: [TemperatureUnit; 3] = [
        TemperatureUnit::Celsius,
        TemperatureUnit::Fahrenheit,
        TemperatureUnit::Kelvin,
    ];

    /// Display label, also the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Kelvin => "K",
        }
    }

    /// Parse a unit label. Never fails: anything unrecognized is °C.
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim() {
            "°F" | "F" | "degF" => TemperatureUnit::Fahrenheit,
            "K" | "k" => TemperatureUnit::Kelvin,
            _ => TemperatureUnit::Celsius,
        }
    }

    /// Convert a temperature in this unit to °C
    pub fn to_celsius(&self, value: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TemperatureUnit::Kelvin => value - 273.15,
        }
    }
}

impl From<String> for TemperatureUnit {
    fn from(label: String) -> Self {
        TemperatureUnit::parse_lenient(&label)
    }
}

impl From<TemperatureUnit> for String {
    fn from(unit: TemperatureUnit) -> Self {
        unit.label().to_string()
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Convert a pressure given with a unit label to MPa.
///
/// Unrecognized labels are treated as MPa (identity).
pub fn pressure_to_mpa(value: f64, unit: &str) -> f64 {
    PressureUnit::parse_lenient(unit).to_mpa(value)
}

/// Convert a temperature given with a unit label to °C.
///
/// Unrecognized labels are treated as °C (identity).
pub fn temperature_to_celsius(value: f64, unit: &str) -> f64 {
    TemperatureUnit::parse_lenient(unit).to_celsius(value)
}
