//! # Error Types
//!
//! Structured error types for tally_core.
//!
//! The tally computation itself has no failure path: catalog misses fall back
//! to the configured policy and bad steel density zeroes the buoyancy factor.
//! Errors are reserved for caller mistakes (a joint index past the end of the
//! ledger) and for the I/O and parsing around snapshots and config files.
//!
//! ## Example
//!
//! ```rust
//! use tally_core::errors::{TallyError, TallyResult};
//!
//! fn validate_depth(depth_m: f64) -> TallyResult<()> {
//!     if !depth_m.is_finite() {
//!         return Err(TallyError::invalid_input(
//!             "reference_depth_m",
//!             depth_m.to_string(),
//!             "Reference depth must be a finite number",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for tally_core operations
pub type TallyResult<T> = Result<T, TallyError>;

/// Structured error type for tally operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum TallyError {
    /// An input value is invalid (not finite, out of range, unparseable)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A ledger index does not address an existing joint
    #[error("Joint not found: index {index} (ledger holds {len} joints)")]
    JointNotFound { index: usize, len: usize },

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

    /// Snapshot schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Config file could not be read, parsed or validated
    #[error("Config error ({path}): {reason}")]
    ConfigError { path: String, reason: String },
}

impl TallyError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        TallyError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a JointNotFound error
    pub fn joint_not_found(index: usize, len: usize) -> Self {
        TallyError::JointNotFound { index, len }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        TallyError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        TallyError::ConfigError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            TallyError::InvalidInput { .. } => "INVALID_INPUT",
            TallyError::JointNotFound { .. } => "JOINT_NOT_FOUND",
            TallyError::FileError { .. } => "FILE_ERROR",
            TallyError::SerializationError { .. } => "SERIALIZATION_ERROR",
            TallyError::VersionMismatch { .. } => "VERSION_MISMATCH",
            TallyError::ConfigError { .. } => "CONFIG_ERROR",
        }
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(e: serde_json::Error) -> Self {
        TallyError::SerializationError {
            reason: e.to_string(),
        }
    }
}
