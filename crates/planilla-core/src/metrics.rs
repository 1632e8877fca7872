//! # Advisor Metrics Derivation
//!
//! Aggregates a month of sale records into [`AdvisorMetrics`].
//!
//! ## Pipeline Position
//! ```text
//! SaleRecord[] + ComplianceSnapshot
//!        │
//!        ▼
//! derive_metrics()          ← THIS MODULE
//!        │
//!        ▼
//! AdvisorMetrics ──► commission::calculate_commission()
//! ```
//!
//! ## Rules
//! - Only the advisor's own records count; other advisors' sales are skipped
//! - Reversed sales are excluded from every monetary aggregate
//! - `adjusted_neto` weighs each NETO amount by its margin coefficient
//! - `rentable_revenue = adjusted_neto - profitability_point` (may be
//!   negative when the advisor sits below the PR)
//! - Aggregation is order-independent: shuffling the input changes nothing

use crate::policy::CompensationPolicy;
use crate::types::{AdvisorMetrics, ComplianceSnapshot, SaleRecord};

/// Builds one advisor-month of metrics from resolved inputs.
///
/// Pure and total: an empty slice yields zero totals and a rentable
/// revenue of `-profitability_point`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use planilla_core::metrics::derive_metrics;
/// use planilla_core::policy::CompensationPolicy;
/// use planilla_core::types::*;
///
/// let policy = CompensationPolicy::default();
/// let sale = SaleRecord {
///     id: "sr1".into(),
///     advisor_id: "a-001".into(),
///     date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
///     course_name: "Curso AutoCAD".into(),
///     client_name: "Ana Torres".into(),
///     amount_bruto: 1180.0,
///     amount_neto: 1000.0,
///     margin_type: MarginType::Estandar,
///     payment_type: PaymentType::Contado,
///     total_installments: None,
///     paid_installments: None,
///     status: SaleStatus::Paid,
/// };
/// let compliance = ComplianceSnapshot {
///     coverage_rate: 0.96,
///     follow_up_complete: true,
///     crm_complete: true,
///     script_compliance: true,
///     nps_score: 4.5,
///     delinquency_rate: 0.08,
///     desertion_rate: 0.03,
/// };
///
/// let metrics = derive_metrics("a-001", "2024-12", &[sale], compliance, &policy);
/// assert_eq!(metrics.valid_sales, 1);
/// assert_eq!(metrics.total_neto, 1000.0);
/// // 1000 × 1.00 - 12367.68: still below the profitability point
/// assert!(metrics.rentable_revenue < 0.0);
/// ```
pub fn derive_metrics(
    advisor_id: &str,
    month: &str,
    sales: &[SaleRecord],
    compliance: ComplianceSnapshot,
    policy: &CompensationPolicy,
) -> AdvisorMetrics {
    let mut total_sales = 0_u32;
    let mut valid_sales = 0_u32;
    let mut total_bruto = 0.0_f64;
    let mut total_neto = 0.0_f64;
    let mut adjusted_neto = 0.0_f64;

    for sale in sales.iter().filter(|s| s.advisor_id == advisor_id) {
        total_sales += 1;
        if !sale.is_valid() {
            continue;
        }
        valid_sales += 1;
        total_bruto += sale.amount_bruto;
        total_neto += sale.amount_neto;
        adjusted_neto += sale.amount_neto * policy.margin_coefficients.for_margin(sale.margin_type);
    }

    AdvisorMetrics {
        advisor_id: advisor_id.to_string(),
        month: month.to_string(),
        total_sales,
        valid_sales,
        total_bruto,
        total_neto,
        adjusted_neto,
        rentable_revenue: adjusted_neto - policy.commission.profitability_point,
        compliance,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MarginType, PaymentType, SaleStatus};
    use chrono::NaiveDate;

    fn compliance() -> ComplianceSnapshot {
        ComplianceSnapshot {
            coverage_rate: 0.96,
            follow_up_complete: true,
            crm_complete: true,
            script_compliance: true,
            nps_score: 4.5,
            delinquency_rate: 0.08,
            desertion_rate: 0.03,
        }
    }

    fn sale(id: &str, advisor: &str, neto: f64, margin: MarginType, status: SaleStatus) -> SaleRecord {
        SaleRecord {
            id: id.to_string(),
            advisor_id: advisor.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 12, 3).unwrap(),
            course_name: "Especialización Minería".to_string(),
            client_name: "Carlos Ruiz".to_string(),
            amount_bruto: neto * 1.18,
            amount_neto: neto,
            margin_type: margin,
            payment_type: PaymentType::Contado,
            total_installments: None,
            paid_installments: None,
            status,
        }
    }

    #[test]
    fn test_reversed_sales_are_excluded() {
        let policy = CompensationPolicy::default();
        let sales = vec![
            sale("sr1", "a-001", 1000.0, MarginType::Estandar, SaleStatus::Paid),
            sale("sr2", "a-001", 800.0, MarginType::Estandar, SaleStatus::Reversed),
            sale("sr3", "a-001", 500.0, MarginType::Estandar, SaleStatus::Pending),
        ];
        let metrics = derive_metrics("a-001", "2024-12", &sales, compliance(), &policy);

        assert_eq!(metrics.total_sales, 3);
        assert_eq!(metrics.valid_sales, 2);
        assert_eq!(metrics.total_neto, 1500.0);
    }

    #[test]
    fn test_other_advisors_are_ignored() {
        let policy = CompensationPolicy::default();
        let sales = vec![
            sale("sr1", "a-001", 1000.0, MarginType::Estandar, SaleStatus::Paid),
            sale("sr2", "a-002", 9000.0, MarginType::Estandar, SaleStatus::Paid),
        ];
        let metrics = derive_metrics("a-001", "2024-12", &sales, compliance(), &policy);

        assert_eq!(metrics.total_sales, 1);
        assert_eq!(metrics.total_neto, 1000.0);
    }

    #[test]
    fn test_margin_coefficients_shape_adjusted_neto() {
        let policy = CompensationPolicy::default();
        let sales = vec![
            sale("sr1", "a-001", 1000.0, MarginType::AltoMargen, SaleStatus::Paid),
            sale("sr2", "a-001", 1000.0, MarginType::Estandar, SaleStatus::Paid),
            sale("sr3", "a-001", 1000.0, MarginType::BajoMargen, SaleStatus::Paid),
        ];
        let metrics = derive_metrics("a-001", "2024-12", &sales, compliance(), &policy);

        assert_eq!(metrics.total_neto, 3000.0);
        // 1100 + 1000 + 900
        assert!((metrics.adjusted_neto - 3000.0).abs() < 1e-9);
        assert!(
            (metrics.rentable_revenue - (3000.0 - 12367.68)).abs() < 1e-9,
            "rentable revenue may be negative below the PR"
        );
    }

    #[test]
    fn test_empty_month() {
        let policy = CompensationPolicy::default();
        let metrics = derive_metrics("a-001", "2024-12", &[], compliance(), &policy);

        assert_eq!(metrics.total_sales, 0);
        assert_eq!(metrics.valid_sales, 0);
        assert_eq!(metrics.total_bruto, 0.0);
        assert_eq!(metrics.rentable_revenue, -12367.68);
    }

    #[test]
    fn test_order_independence() {
        let policy = CompensationPolicy::default();
        let mut sales = vec![
            sale("sr1", "a-001", 1000.0, MarginType::AltoMargen, SaleStatus::Paid),
            sale("sr2", "a-001", 750.0, MarginType::BajoMargen, SaleStatus::Paid),
            sale("sr3", "a-001", 420.5, MarginType::Estandar, SaleStatus::Reversed),
            sale("sr4", "a-001", 610.0, MarginType::Estandar, SaleStatus::Paid),
        ];
        let forward = derive_metrics("a-001", "2024-12", &sales, compliance(), &policy);
        sales.reverse();
        let backward = derive_metrics("a-001", "2024-12", &sales, compliance(), &policy);

        assert_eq!(forward.valid_sales, backward.valid_sales);
        assert!((forward.total_bruto - backward.total_bruto).abs() < 1e-9);
        assert!((forward.adjusted_neto - backward.adjusted_neto).abs() < 1e-9);
    }
}
