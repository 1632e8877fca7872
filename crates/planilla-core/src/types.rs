//! # Domain Types
//!
//! Core domain types used throughout Planilla.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌──────────────────┐  │
//! │  │   SaleRecord    │   │  ComplianceSnapshot │   │  AdvisorMetrics  │  │
//! │  │  ─────────────  │   │  ─────────────────  │   │  ──────────────  │  │
//! │  │  advisor_id     │   │  coverage_rate      │   │  totals + RR     │  │
//! │  │  amount_bruto   │   │  crm_complete       │   │  compliance      │  │
//! │  │  margin_type    │   │  nps_score          │   │  gates_passed()  │  │
//! │  │  status         │   │  desertion_rate     │   │  (derived!)      │  │
//! │  └─────────────────┘   └─────────────────────┘   └──────────────────┘  │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   MarginType    │   │   PaymentType   │   │   SaleStatus    │       │
//! │  │  alto_margen    │   │  contado        │   │  paid           │       │
//! │  │  estandar       │   │  cuotas         │   │  pending        │       │
//! │  │  bajo_margen    │   │                 │   │  reversed       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names serialize in camelCase and enum values in snake_case to match
//! the upstream sales feed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::policy::CompensationPolicy;

// =============================================================================
// Department
// =============================================================================

/// Company departments. Commission only applies to `Comercial`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Comercial,
    Soporte,
    Marketing,
    Campanas,
    Ti,
    DigitalCollege,
}

impl Department {
    /// Commercial advisors earn tiered commission; everyone else does not.
    #[inline]
    pub const fn is_commissioned(&self) -> bool {
        matches!(self, Department::Comercial)
    }
}

// =============================================================================
// Sale Enums
// =============================================================================

/// Product margin classification driving the revenue coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MarginType {
    /// Own/asynchronous portfolio, coefficient above 1.
    AltoMargen,
    /// Mid portfolio, neutral coefficient.
    Estandar,
    /// Licensed/premium external portfolio, coefficient below 1.
    BajoMargen,
}

/// How the client pays for the course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Single up-front payment.
    Contado,
    /// Installment plan.
    Cuotas,
}

/// Collection status of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Money collected.
    Paid,
    /// Awaiting collection.
    Pending,
    /// Charge-back or cancellation. Excluded from every aggregate.
    Reversed,
}

// =============================================================================
// Sale Record
// =============================================================================

/// One recorded sale by a commercial advisor.
///
/// ## Invariant
/// `amount_neto` is `amount_bruto` with IGV stripped
/// (`amount_bruto / 1.18` at the standard rate), to within céntimos
/// rounding. [`crate::validation::validate_sale_amounts`] checks this at
/// the input boundary.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    /// Unique identifier.
    pub id: String,

    /// Advisor who closed the sale.
    pub advisor_id: String,

    /// Date the sale was recorded.
    #[ts(as = "String")]
    pub date: NaiveDate,

    /// Course sold.
    pub course_name: String,

    /// Client name as captured by the CRM.
    pub client_name: String,

    /// Gross amount, tax inclusive (S/).
    pub amount_bruto: f64,

    /// Net amount, IGV stripped (S/).
    pub amount_neto: f64,

    /// Margin classification of the product.
    pub margin_type: MarginType,

    /// Payment modality.
    pub payment_type: PaymentType,

    /// Total installments agreed (installment sales only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_installments: Option<u32>,

    /// Installments collected so far (installment sales only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_installments: Option<u32>,

    /// Collection status.
    pub status: SaleStatus,
}

impl SaleRecord {
    /// A valid sale counts toward metrics; reversed sales never do.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.status != SaleStatus::Reversed
    }
}

// =============================================================================
// Compliance Snapshot
// =============================================================================

/// Per advisor-month compliance figures delivered by the CRM.
///
/// These are inputs to the engine: the upstream system resolves lead
/// coverage, follow-up discipline and quality scores before the payroll
/// run starts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceSnapshot {
    /// Share of leads contacted within 2 hours (0.0 - 1.0).
    pub coverage_rate: f64,

    /// Three contact attempts within 72 hours completed.
    pub follow_up_complete: bool,

    /// CRM records fully maintained.
    pub crm_complete: bool,

    /// Sales script and ethics compliance.
    pub script_compliance: bool,

    /// Net promoter score (0.0 - 5.0).
    pub nps_score: f64,

    /// 30-day delinquency rate (morosidad, 0.0 - 1.0).
    pub delinquency_rate: f64,

    /// Student desertion rate (0.0 - 1.0).
    pub desertion_rate: f64,
}

// =============================================================================
// Advisor Metrics
// =============================================================================

/// One advisor's aggregated month: sale totals plus compliance.
///
/// ## Derived, Not Stored
/// The gate count is deliberately NOT a field. A stored count could drift
/// from the four underlying conditions; [`AdvisorMetrics::gates_passed`]
/// recomputes it on every call.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorMetrics {
    /// Advisor this month belongs to.
    pub advisor_id: String,

    /// Month in `YYYY-MM` form.
    pub month: String,

    /// All recorded sales, reversed included.
    pub total_sales: u32,

    /// Sales that count (not reversed).
    pub valid_sales: u32,

    /// Gross collections over valid sales (S/).
    pub total_bruto: f64,

    /// Net collections over valid sales (S/).
    pub total_neto: f64,

    /// Net collections after margin coefficients (S/).
    pub adjusted_neto: f64,

    /// `adjusted_neto` minus the profitability point. May be negative.
    pub rentable_revenue: f64,

    /// Compliance figures feeding the gates and bonuses.
    #[serde(flatten)]
    #[ts(flatten)]
    pub compliance: ComplianceSnapshot,
}

impl AdvisorMetrics {
    /// Counts the release gates this advisor satisfies (0 - 4).
    ///
    /// ## The Four Gates
    /// 1. Lead coverage at or above the policy threshold (95% default)
    /// 2. Three contact attempts within 72 hours
    /// 3. CRM complete
    /// 4. Script & ethics compliance
    ///
    /// ## Example
    /// ```rust
    /// use planilla_core::policy::CompensationPolicy;
    /// use planilla_core::types::{AdvisorMetrics, ComplianceSnapshot};
    ///
    /// let policy = CompensationPolicy::default();
    /// let metrics = AdvisorMetrics {
    ///     advisor_id: "a-001".into(),
    ///     month: "2024-12".into(),
    ///     total_sales: 32,
    ///     valid_sales: 30,
    ///     total_bruto: 18500.0,
    ///     total_neto: 15677.97,
    ///     adjusted_neto: 16461.86,
    ///     rentable_revenue: 4094.18,
    ///     compliance: ComplianceSnapshot {
    ///         coverage_rate: 0.96,
    ///         follow_up_complete: true,
    ///         crm_complete: true,
    ///         script_compliance: true,
    ///         nps_score: 4.5,
    ///         delinquency_rate: 0.08,
    ///         desertion_rate: 0.03,
    ///     },
    /// };
    /// assert_eq!(metrics.gates_passed(&policy), 4);
    /// ```
    pub fn gates_passed(&self, policy: &CompensationPolicy) -> u8 {
        let c = &self.compliance;
        let mut gates = 0;
        if c.coverage_rate >= policy.commission.coverage_threshold.fraction() {
            gates += 1;
        }
        if c.follow_up_complete {
            gates += 1;
        }
        if c.crm_complete {
            gates += 1;
        }
        if c.script_compliance {
            gates += 1;
        }
        gates
    }

    /// Average gross ticket over valid sales, or `None` with no valid sales.
    pub fn average_ticket_bruto(&self) -> Option<f64> {
        if self.valid_sales == 0 {
            None
        } else {
            Some(self.total_bruto / self.valid_sales as f64)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
