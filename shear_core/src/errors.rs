//! # Error Types
//!
//! Structured error types for shear_core. The evaluator itself never fails;
//! these errors come from the caller-side steps around it (input validation,
//! range policy, sweep specification, batch parsing).
//!
//! ## Example
//!
//! ```rust
//! use shear_core::errors::{CalcError, CalcResult};
//!
//! fn validate_depth(depth_mm: f64) -> CalcResult<()> {
//!     if !(depth_mm > 0.0) {
//!         return Err(CalcError::invalid_input(
//!             "depth_mm",
//!             depth_mm.to_string(),
//!             "Effective depth must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_depth(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for shear_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for shear capacity operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is malformed (non-finite, non-positive, unparseable)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Input lies outside the nominal validity range of the regression
    #[error("Out of range: '{field}' = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Sweep variable name not recognized
    #[error("Unknown sweep variable: {name}")]
    UnknownVariable { name: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },
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

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an OutOfRange error
    pub fn out_of_range(field: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        CalcError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        }
    }

    /// Create an UnknownVariable error
    pub fn unknown_variable(name: impl Into<String>) -> Self {
        CalcError::UnknownVariable { name: name.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::OutOfRange { .. } => "OUT_OF_RANGE",
            CalcError::UnknownVariable { .. } => "UNKNOWN_VARIABLE",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::FileError { .. } => "FILE_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        // serde_json reports absent struct fields as "missing field `name`"
        let message = err.to_string();
        if let Some(rest) = message.strip_prefix("missing field `") {
            if let Some(field) = rest.split('`').next() {
                return CalcError::missing_field(field);
            }
        }
        CalcError::SerializationError { reason: message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("width_mm", "NaN", "Value must be finite");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("fc_mpa").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::unknown_variable("x").error_code(), "UNKNOWN_VARIABLE");
        assert_eq!(
            CalcError::out_of_range("width_mm", 50.0, 89.0, 1200.0).error_code(),
            "OUT_OF_RANGE"
        );
    }

    #[test]
    fn test_missing_field_from_json() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Probe {
            depth_mm: f64,
        }

        let err: CalcError = serde_json::from_str::<Probe>("{}").unwrap_err().into();
        assert_eq!(err, CalcError::missing_field("depth_mm"));

        let err: CalcError = serde_json::from_str::<Probe>("{\"depth_mm\": \"deep\"}")
            .unwrap_err()
            .into();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
