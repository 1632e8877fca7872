//! # Validation Module
//!
//! Boundary validation of raw upstream data.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Upstream services (CRM, attendance uploads)                   │
//! │  ├── Row-level parsing of spreadsheets and CRM exports                  │
//! │  └── Out of scope for this crate                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Field shape (ids, months, arrival times, emails)                   │
//! │  └── Cross-field coherence (NETO really is BRUTO without IGV)           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: The calculators                                               │
//! │  └── Total over validated input; numeric edge cases degrade to zero     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use planilla_core::validation::{validate_employee_id, validate_month};
//!
//! validate_employee_id("emp-5").unwrap();
//! validate_month("2024-12").unwrap();
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::{neto_from_bruto, Rate};
use crate::types::SaleRecord;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Tolerance in soles for the BRUTO/NETO coherence check.
const AMOUNT_TOLERANCE: f64 = 0.01;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an employee or advisor identifier.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 64 characters
/// - Only letters, numbers, hyphens and underscores
pub fn validate_employee_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "employee_id".to_string(),
        });
    }

    if id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "employee_id".to_string(),
            max: 64,
        });
    }

    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "employee_id".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a payroll month in `YYYY-MM` form.
pub fn validate_month(month: &str) -> ValidationResult<()> {
    let month = month.trim();

    if month.is_empty() {
        return Err(ValidationError::Required {
            field: "month".to_string(),
        });
    }

    // The first of the month must be a real date
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidFormat {
            field: "month".to_string(),
            reason: "expected YYYY-MM".to_string(),
        }
    })?;

    Ok(())
}

/// Validates an arrival time string.
///
/// Empty is accepted: a missing punch is valid input for the classifier.
pub fn validate_arrival_time(raw: &str) -> ValidationResult<()> {
    if raw.trim().is_empty() {
        return Ok(());
    }
    crate::tardiness::parse_arrival(raw).map(|_| ())
}

/// Validates a payslip delivery address.
///
/// ## Rules
/// - Must not be empty, at most 254 characters
/// - One `@` with a non-empty local part and a dotted domain
///
/// Full RFC validation belongs to the mail collaborator; this only rejects
/// addresses that can never deliver.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "expected local@domain.tld".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a monetary amount.
///
/// ## Rules
/// - Must be finite (no NaN/infinity from upstream parsing)
/// - Must be non-negative; zero is allowed
pub fn validate_amount(field: &str, amount: f64) -> ValidationResult<()> {
    if !amount.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if amount < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a contract base salary.
pub fn validate_base_salary(amount: f64) -> ValidationResult<()> {
    validate_amount("base_salary", amount)
}

/// Validates a rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Cross-Field Validators
// =============================================================================

/// Checks the BRUTO/NETO coherence of one sale record.
///
/// `amount_neto` must equal `amount_bruto` with IGV stripped, to within
/// céntimos rounding. Upstream feeds occasionally recompute one side after
/// a correction and forget the other; this catches it before the month
/// aggregates drift.
pub fn validate_sale_amounts(sale: &SaleRecord, igv: Rate) -> ValidationResult<()> {
    validate_amount("amount_bruto", sale.amount_bruto)?;
    validate_amount("amount_neto", sale.amount_neto)?;

    let expected = neto_from_bruto(sale.amount_bruto, igv);
    if (sale.amount_neto - expected).abs() > AMOUNT_TOLERANCE {
        return Err(ValidationError::Inconsistent {
            field: "amount_neto".to_string(),
            reason: format!(
                "sale {}: expected {expected:.2} from bruto {:.2}, got {:.2}",
                sale.id, sale.amount_bruto, sale.amount_neto
            ),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MarginType, PaymentType, SaleStatus};

    #[test]
    fn test_validate_employee_id() {
        assert!(validate_employee_id("emp-5").is_ok());
        assert!(validate_employee_id("a_001").is_ok());
        assert!(validate_employee_id("550e8400-e29b-41d4-a716-446655440000").is_ok());

        assert!(validate_employee_id("").is_err());
        assert!(validate_employee_id("   ").is_err());
        assert!(validate_employee_id("has space").is_err());
        assert!(validate_employee_id(&"a".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_month() {
        assert!(validate_month("2024-12").is_ok());
        assert!(validate_month("2025-01").is_ok());

        assert!(validate_month("").is_err());
        assert!(validate_month("2024-13").is_err());
        assert!(validate_month("12-2024").is_err());
        assert!(validate_month("diciembre").is_err());
    }

    #[test]
    fn test_validate_arrival_time() {
        assert!(validate_arrival_time("09:05").is_ok());
        assert!(validate_arrival_time("").is_ok()); // missing punch
        assert!(validate_arrival_time("9h30").is_err());
        assert!(validate_arrival_time("25:00").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("rosa.martin@ccd.pe").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("sin-arroba").is_err());
        assert!(validate_email("@ccd.pe").is_err());
        assert!(validate_email("rosa@sindominio").is_err());
        assert!(validate_email("rosa@.pe").is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("overtime", 0.0).is_ok());
        assert!(validate_amount("overtime", 150.0).is_ok());
        assert!(validate_amount("overtime", -1.0).is_err());
        assert!(validate_amount("overtime", f64::NAN).is_err());
        assert!(validate_amount("overtime", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_rate_bps() {
        assert!(validate_rate_bps(0).is_ok());
        assert!(validate_rate_bps(4500).is_ok());
        assert!(validate_rate_bps(10000).is_ok());
        assert!(validate_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_sale_amounts() {
        let igv = Rate::from_bps(1800);
        let mut sale = SaleRecord {
            id: "sr1".to_string(),
            advisor_id: "a-001".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            course_name: "Curso de Gestión Pública".to_string(),
            client_name: "María López".to_string(),
            amount_bruto: 500.0,
            amount_neto: 423.73,
            margin_type: MarginType::Estandar,
            payment_type: PaymentType::Cuotas,
            total_installments: Some(3),
            paid_installments: Some(2),
            status: SaleStatus::Paid,
        };
        assert!(validate_sale_amounts(&sale, igv).is_ok());

        sale.amount_neto = 500.0; // forgot to strip IGV
        assert!(validate_sale_amounts(&sale, igv).is_err());

        sale.amount_neto = -10.0;
        assert!(validate_sale_amounts(&sale, igv).is_err());
    }
}
