//! # Batch Error Types
//!
//! Error types for payroll runs.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError / CoreError (planilla-core)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BatchError (this module) ← adds I/O, JSON and config failures          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  planilla-run exits non-zero with the message in the log                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::config::ConfigError;
use planilla_core::{CoreError, ValidationError};

/// Payroll run errors.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Reading the input or writing the report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input or policy file is not valid JSON for the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A record failed boundary validation.
    ///
    /// ## When This Occurs
    /// - A sale whose NETO does not match its BRUTO
    /// - A malformed month, arrival time or employee id
    /// - A policy override with an incoherent table
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A domain rule rejected the operation.
    #[error("Domain error: {0}")]
    Core(#[from] CoreError),
}

/// Convenience type alias for Results with BatchError.
pub type BatchResult<T> = Result<T, BatchError>;
