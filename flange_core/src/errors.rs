//! # Error Types
//!
//! Structured error types for flange_core. The calculation engine itself never
//! fails once it has a validated [`ReferenceTables`](crate::tables::ReferenceTables);
//! errors only surface at the edges: validating inputs, building table sets,
//! and parsing settings or table documents.
//!
//! ## Example
//!
//! ```rust
//! use flange_core::errors::{CalcError, CalcResult};
//!
//! fn validate_count(bolt_count: u32) -> CalcResult<()> {
//!     if bolt_count == 0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "bolt_count".to_string(),
//!             value: bolt_count.to_string(),
//!             reason: "At least one bolt is required".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for flange_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for flange calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong sign, etc.)
    #[error("Invalid value {value} for '{field}': {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A reference table has no rows, so fallback lookups have nothing to fall back to
    #[error("Reference table '{table}' is empty")]
    EmptyTable { table: String },

    /// Material not found in a reference table (strict lookups only)
    #[error("Material '{material_id}' is not in the reference tables")]
    MaterialNotFound { material_id: String },

    /// File I/O error
    #[error("Could not {operation} '{path}': {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON / TOML serialization or deserialization error
    #[error("Malformed document: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an EmptyTable error
    pub fn empty_table(table: impl Into<String>) -> Self {
        CalcError::EmptyTable {
            table: table.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_id: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_id: material_id.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::EmptyTable { .. } => "EMPTY_TABLE",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CalcError {
    fn from(err: toml::de::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("bolt_count", "0", "At least one bolt is required");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        assert!(json.contains("\"field\":\"bolt_count\""));
        assert_eq!(serde_json::from_str::<CalcError>(&json).unwrap(), error);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::empty_table("bolt_specs").error_code(), "EMPTY_TABLE");
        assert_eq!(CalcError::material_not_found("SA-193 B7").error_code(), "MATERIAL_NOT_FOUND");
        assert_eq!(CalcError::serialization("bad").error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_json_error_conversion() {
        let err: CalcError = serde_json::from_str::<f64>("not a number").unwrap_err().into();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
