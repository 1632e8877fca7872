//! # Error Types
//!
//! Domain-specific error types for planilla-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  planilla-core errors (this file)                                       │
//! │  ├── CoreError        - Lifecycle and domain rule violations            │
//! │  └── ValidationError  - Raw input validation failures                   │
//! │                                                                         │
//! │  planilla-batch errors (separate crate)                                 │
//! │  └── BatchError       - I/O and configuration failures                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → BatchError → operator log          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculators themselves never return errors for in-domain numeric
//! input: negative revenue, zero sales and empty lists all degrade to zero
//! amounts. Errors exist only at the input boundary (malformed arrival
//! times, incoherent policy tables) and on the payslip status machine.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (employee id, status, field)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule violations.
///
/// These errors represent operations that the business rules forbid.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Payslip is not in a state that allows the requested transition.
    ///
    /// ## When This Occurs
    /// - Approving a payslip that is already approved or sent
    /// - Sending a payslip that was never approved
    #[error("Payslip {payslip_id} is {current_status}, cannot perform operation")]
    InvalidPayslipStatus {
        payslip_id: String,
        current_status: String,
    },

    /// Payslip has been sent and its monetary fields are frozen.
    ///
    /// ## When This Occurs
    /// - Recomputing amounts on a sent payslip
    ///
    /// Recalculation must start from a fresh draft for the same month.
    #[error("Payslip {payslip_id} was already sent and is read-only")]
    PayslipImmutable { payslip_id: String },

    /// A commission calculation was attached to the wrong employee.
    #[error("Commission for advisor {advisor_id} cannot be attached to employee {employee_id}")]
    AdvisorMismatch {
        advisor_id: String,
        employee_id: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when raw upstream data doesn't meet requirements.
/// Used for early validation before any calculation runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be non-negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., invalid arrival time, invalid month).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that must agree do not.
    ///
    /// ## When This Occurs
    /// - A sale whose NETO amount is not BRUTO with IGV stripped
    /// - A policy table whose ranges leave gaps or overlap
    #[error("{field} is inconsistent: {reason}")]
    Inconsistent { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidPayslipStatus {
            payslip_id: "pay-7-2024-12".to_string(),
            current_status: "sent".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Payslip pay-7-2024-12 is sent, cannot perform operation"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "employee_id".to_string(),
        };
        assert_eq!(err.to_string(), "employee_id is required");

        let err = ValidationError::InvalidFormat {
            field: "arrival_time".to_string(),
            reason: "expected HH:MM".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "arrival_time has invalid format: expected HH:MM"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "month".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
