//! # Engine Settings
//!
//! Policy knobs that change how the engine fills gaps in its inputs. The
//! defaults reproduce the established behaviour exactly; settings files only
//! need the keys they change.
//!
//! ```toml
//! missing_stress = "skip_gaps"
//! ambient_fallback_stress_mpa = 138.0
//! default_clearance_mm = 2.5
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::MissingStressPolicy;

/// Engine-wide calculation policies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Treatment of unpublished stress-curve entries
    pub missing_stress: MissingStressPolicy,

    /// Bolt stress at ambient used when the 40 °C value is missing or zero (MPa)
    pub ambient_fallback_stress_mpa: f64,

    /// Bolt-hole clearance C used when the input clearance is not positive (mm)
    pub default_clearance_mm: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            missing_stress: MissingStressPolicy::AsZero,
            ambient_fallback_stress_mpa: 138.0,
            default_clearance_mm: 2.5,
        }
    }
}

impl EngineSettings {
    /// Parse settings from TOML text and validate them
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        let settings: EngineSettings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> CalcResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !(self.ambient_fallback_stress_mpa > 0.0) {
            return Err(CalcError::invalid_input(
                "ambient_fallback_stress_mpa",
                self.ambient_fallback_stress_mpa.to_string(),
                "Fallback stress must be positive",
            ));
        }
        if !(self.default_clearance_mm > 0.0) {
            return Err(CalcError::invalid_input(
                "default_clearance_mm",
                self.default_clearance_mm.to_string(),
                "Default clearance must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = EngineSettings::default();
        assert_eq!(s.missing_stress, MissingStressPolicy::AsZero);
        assert_eq!(s.ambient_fallback_stress_mpa, 138.0);
        assert_eq!(s.default_clearance_mm, 2.5);
    }

    #[test]
    fn test_partial_toml() {
        let s = EngineSettings::from_toml_str("missing_stress = \"skip_gaps\"").unwrap();
        assert_eq!(s.missing_stress, MissingStressPolicy::SkipGaps);
        assert_eq!(s.ambient_fallback_stress_mpa, 138.0);

        let empty = EngineSettings::from_toml_str("").unwrap();
        assert_eq!(empty, EngineSettings::default());
    }

    #[test]
    fn test_invalid_values() {
        let err = EngineSettings::from_toml_str("default_clearance_mm = 0.0").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = EngineSettings::from_toml_str("missing_stress = \"guess\"").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
