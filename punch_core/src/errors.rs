//! # Error Types
//!
//! Structured error types for punch_core. Errors carry enough context for a
//! host application (or an operator reading a log) to understand and fix the
//! offending input programmatically.
//!
//! ## Example
//!
//! ```rust
//! use punch_core::errors::{PlanError, PlanResult};
//!
//! fn validate_length(length_mm: u32) -> PlanResult<()> {
//!     if length_mm < 1000 {
//!         return Err(PlanError::invalid_input(
//!             "length_mm",
//!             length_mm.to_string(),
//!             "Member length must be at least 1000 mm",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for punch_core operations
pub type PlanResult<T> = Result<T, PlanError>;

/// Structured error type for planning operations.
///
/// Each variant provides specific context about what went wrong. Clash
/// findings are deliberately *not* errors; they are returned as data by the
/// clash detector so a host can grade and display them.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum PlanError {
    /// A profile field is invalid (out of range, wrong combination, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A manual punch list could not be installed
    #[error("Manual layout rejected: {reason}")]
    ManualLayoutRejected { reason: String },

    /// JSON or wire-format serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// A punch-program line does not follow the press wire format
    #[error("Wire format error at field {field_index}: {reason}")]
    WireFormat { field_index: usize, reason: String },
}

impl PlanError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PlanError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a ManualLayoutRejected error
    pub fn manual_layout_rejected(reason: impl Into<String>) -> Self {
        PlanError::ManualLayoutRejected {
            reason: reason.into(),
        }
    }

    /// Create a WireFormat error
    pub fn wire_format(field_index: usize, reason: impl Into<String>) -> Self {
        PlanError::WireFormat {
            field_index,
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            PlanError::InvalidInput { .. } => "INVALID_INPUT",
            PlanError::ManualLayoutRejected { .. } => "MANUAL_LAYOUT_REJECTED",
            PlanError::SerializationError { .. } => "SERIALIZATION_ERROR",
            PlanError::WireFormat { .. } => "WIRE_FORMAT",
        }
    }
}
