//! # Error Types
//!
//! Structured error types for composite_core. These errors are designed to be
//! informative for both humans and LLMs, providing enough context to
//! understand and fix issues programmatically.
//!
//! ## Example
//!
//! ```rust
//! use composite_core::errors::{CalcError, CalcResult};
//!
//! fn validate_fraction(vm: f64) -> CalcResult<()> {
//!     if !(0.0..=1.0).contains(&vm) {
//!         return Err(CalcError::InvalidInput {
//!             field: "vol_fraction_matrix".to_string(),
//!             value: vm.to_string(),
//!             reason: "Volume fraction must be between 0 and 1".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for composite_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by LLMs and other consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong category, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Unit label is unknown, or belongs to a different unit family
    #[error("Invalid unit for {family}: '{unit}'")]
    InvalidUnit { family: String, unit: String },

    /// Material not found in catalog
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// Stiffness-weighted denominator is zero
    #[error("Division by zero in {calculation_type}: {reason}")]
    DivisionByZero {
        calculation_type: String,
        reason: String,
    },

    /// Result overflowed or became NaN
    #[error("Non-finite result for '{field}': {value}")]
    NonFinite { field: String, value: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
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

    /// Create an InvalidUnit error
    pub fn invalid_unit(family: impl Into<String>, unit: impl Into<String>) -> Self {
        CalcError::InvalidUnit {
            family: family.into(),
            unit: unit.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create a DivisionByZero error
    pub fn division_by_zero(calculation_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::DivisionByZero {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a NonFinite error
    pub fn non_finite(field: impl Into<String>, value: f64) -> Self {
        CalcError::NonFinite {
            field: field.into(),
            value: value.to_string(),
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

    /// Check if the caller can fix this error by re-entering input.
    ///
    /// Computation errors are deterministic; retrying with the same
    /// inputs yields the same error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::InvalidUnit { .. }
                | CalcError::MaterialNotFound { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::InvalidUnit { .. } => "INVALID_UNIT",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::DivisionByZero { .. } => "DIVISION_BY_ZERO",
            CalcError::NonFinite { .. } => "NON_FINITE",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::serialization(e.to_string())
    }
}
