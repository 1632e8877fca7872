//! # planilla-core: Pure Compensation Engine for Planilla
//!
//! This crate is the **heart** of Planilla. It contains the compensation
//! rules of the CCD 2025 plan as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Planilla Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Upstream Collaborators (out of crate)              │   │
//! │  │   Attendance uploads ──► CRM metrics ──► Contract data          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ resolved records                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ planilla-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌────────────┐  ┌──────────┐  │   │
//! │  │   │ tardiness │  │ commission │  │  payslip   │  │  policy  │  │   │
//! │  │   │ brackets  │  │ tier math  │  │ aggregator │  │  tables  │  │   │
//! │  │   └───────────┘  └────────────┘  └────────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ immutable results                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          Downstream Collaborators (out of crate)                │   │
//! │  │   Payslip rendering ──► Email delivery ──► Dashboards           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`policy`] - Tunable rule tables (tiers, coefficients, brackets, caps)
//! - [`types`] - Domain types (SaleRecord, AdvisorMetrics, etc.)
//! - [`money`] - Rates in basis points and céntimos rounding
//! - [`metrics`] - Sales aggregation into monthly advisor metrics
//! - [`tardiness`] - Arrival classification and discount override
//! - [`commission`] - Marginal tiered commission, gates, bonuses, cap
//! - [`payslip`] - Earnings/deductions aggregation and status lifecycle
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary validation of raw inputs
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every calculation is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Policy as Data**: Every tunable lives in [`policy::CompensationPolicy`],
//!    never as a literal inside a calculation
//! 4. **Degrade to Zero**: In-domain numeric edge cases (negative revenue,
//!    zero sales) produce zero amounts, never panics or errors
//!
//! ## Example Usage
//!
//! ```rust
//! use planilla_core::commission::calculate_commission;
//! use planilla_core::metrics::derive_metrics;
//! use planilla_core::policy::CompensationPolicy;
//! use planilla_core::types::ComplianceSnapshot;
//!
//! let policy = CompensationPolicy::default();
//! let compliance = ComplianceSnapshot {
//!     coverage_rate: 0.96,
//!     follow_up_complete: true,
//!     crm_complete: true,
//!     script_compliance: true,
//!     nps_score: 4.5,
//!     delinquency_rate: 0.08,
//!     desertion_rate: 0.03,
//! };
//! let metrics = derive_metrics("a-001", "2024-12", &[], compliance, &policy);
//!
//! // No sales this month: revenue sits below the profitability point,
//! // so nothing is payable.
//! let calc = calculate_commission(&metrics, &policy);
//! assert_eq!(calc.final_payment, 0.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod commission;
pub mod error;
pub mod metrics;
pub mod money;
pub mod payslip;
pub mod policy;
pub mod tardiness;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use planilla_core::CommissionCalculation` instead
// of `use planilla_core::commission::CommissionCalculation`

pub use commission::{BonusCalculation, CommissionCalculation, ReleaseStatus};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Rate;
pub use payslip::{Payslip, PayslipStatus};
pub use policy::CompensationPolicy;
pub use tardiness::{TardyCategory, TardyDiscount};
pub use types::{AdvisorMetrics, ComplianceSnapshot, SaleRecord};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of compliance gates in the release regime.
///
/// The gate regime is structural (4/4 full release, 3/4 reduced, ≤2/4
/// retained); only the gate *thresholds* are tunable through policy.
pub const GATE_COUNT: u8 = 4;
