//! # Commission Calculator
//!
//! Turns one advisor-month of metrics into an immutable
//! [`CommissionCalculation`].
//!
//! ## Calculation Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Commission Pipeline                                  │
//! │                                                                         │
//! │  AdvisorMetrics { rentable_revenue: RR, compliance }                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. MARGINAL TIERS      each tier taxes only its own slice of RR        │
//! │       │                 (bracket semantics, not flat-rate-on-total)     │
//! │       ▼                                                                 │
//! │  2. GATES               4/4 → 100%   3/4 → 70%, no bonuses              │
//! │       │                 ≤2/4 → retained until regularization            │
//! │       ▼                                                                 │
//! │  3. BONUSES             five independent accelerators, monthly cap      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. CAP                 payment ≤ 45% of RR, commission+bonuses         │
//! │                         combined; never below zero                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure function: same metrics and policy always produce the same result,
//! and each advisor's calculation is fully independent of every other
//! advisor's. Negative rentable revenue degrades to zero commission and
//! zero cap headroom; nothing in this module errors or panics for
//! in-domain numeric input.
//!
//! ## Usage
//! ```rust
//! use planilla_core::commission::calculate_commission;
//! use planilla_core::policy::CompensationPolicy;
//! use planilla_core::types::{AdvisorMetrics, ComplianceSnapshot};
//!
//! let policy = CompensationPolicy::default();
//! let metrics = AdvisorMetrics {
//!     advisor_id: "a-001".into(),
//!     month: "2024-12".into(),
//!     total_sales: 32,
//!     valid_sales: 30,
//!     total_bruto: 18500.0,
//!     total_neto: 15677.97,
//!     adjusted_neto: 16461.86,
//!     rentable_revenue: 4094.18,
//!     compliance: ComplianceSnapshot {
//!         coverage_rate: 0.96,
//!         follow_up_complete: true,
//!         crm_complete: true,
//!         script_compliance: true,
//!         nps_score: 4.5,
//!         delinquency_rate: 0.08,
//!         desertion_rate: 0.03,
//!     },
//! };
//!
//! let calc = calculate_commission(&metrics, &policy);
//! assert_eq!(calc.gates_passed, 4);
//! assert!((calc.base_commission - 209.419).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::policy::CompensationPolicy;
use crate::types::AdvisorMetrics;

// =============================================================================
// Release Status
// =============================================================================

/// Outcome of the gate evaluation.
///
/// `Retained` is a business-process hold, not an earned zero: the
/// commission stays withheld until the advisor regularizes compliance,
/// and downstream payout flows treat it as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStatus {
    /// 4/4 gates: full commission plus bonuses, subject to the cap.
    Full,
    /// Exactly 3/4 gates: 70% of base commission, bonuses forced out.
    Reduced,
    /// 2 gates or fewer: payment withheld pending regularization.
    Retained,
}

impl ReleaseStatus {
    /// Derives the status from a gate count.
    pub fn from_gates(gates_passed: u8) -> Self {
        if gates_passed >= crate::GATE_COUNT {
            ReleaseStatus::Full
        } else if gates_passed == crate::GATE_COUNT - 1 {
            ReleaseStatus::Reduced
        } else {
            ReleaseStatus::Retained
        }
    }

    /// Multiplier applied to the base commission.
    pub fn penalty(&self) -> f64 {
        match self {
            ReleaseStatus::Full => 1.0,
            ReleaseStatus::Reduced => 0.7,
            ReleaseStatus::Retained => 0.0,
        }
    }

    /// Whether bonuses are payable under this status.
    pub fn bonuses_payable(&self) -> bool {
        matches!(self, ReleaseStatus::Full)
    }
}

// =============================================================================
// Tier Breakdown
// =============================================================================

/// One tier row of the marginal walk, kept for the audit table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TierCommission {
    /// Lower bound of the tier (S/).
    pub from: f64,

    /// Inclusive upper cut point, `None` for the open tier.
    pub to: Option<f64>,

    /// Marginal rate in basis points.
    pub rate_bps: u32,

    /// Slice of rentable revenue that fell inside this tier (S/).
    pub portion: f64,

    /// Commission earned on the slice (S/).
    pub amount: f64,
}

// =============================================================================
// Bonus Calculation
// =============================================================================

/// The five accelerator bonuses and their capped sum.
///
/// `adjusted_bonuses` always reports the capped value, even when a gate
/// failure later forces the payable amount to zero; the zeroing happens in
/// [`CommissionCalculation::total_before_cap`], keeping both numbers
/// visible for transparency.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BonusCalculation {
    /// Average gross ticket above threshold (S/ 100 or 200).
    pub ticket_saludable: f64,

    /// Valid-sales volume with delinquency under control (S/ 100 or 200).
    pub productividad: f64,

    /// Coverage gate met and CRM complete (S/ 150).
    pub seguimiento_perfecto: f64,

    /// NPS at or above threshold (S/ 150).
    pub calidad_nps: f64,

    /// Desertion strictly below threshold (S/ 200).
    pub retencion: f64,

    /// Sum of the five bonuses.
    pub total_bonuses: f64,

    /// Sum after the monthly ceiling.
    pub adjusted_bonuses: f64,
}

/// Evaluates the five bonus rules against one advisor-month.
///
/// Each rule is independent; a rule whose precondition fails contributes
/// zero. Division by zero on the average ticket is guarded: an advisor
/// with no valid sales simply earns no ticket bonus.
pub fn calculate_bonuses(
    metrics: &AdvisorMetrics,
    policy: &CompensationPolicy,
) -> BonusCalculation {
    let rules = &policy.bonuses;
    let c = &metrics.compliance;
    let mut bonuses = BonusCalculation::default();

    // Ticket saludable: strictly-above thresholds, upper level first
    if let Some(avg_ticket) = metrics.average_ticket_bruto() {
        if avg_ticket > rules.ticket_upper_threshold {
            bonuses.ticket_saludable = rules.ticket_upper_amount;
        } else if avg_ticket > rules.ticket_lower_threshold {
            bonuses.ticket_saludable = rules.ticket_lower_amount;
        }
    }

    // Productividad: only evaluated with delinquency under control
    if c.delinquency_rate <= rules.productivity_delinquency_ceiling {
        if metrics.valid_sales >= rules.productivity_upper_sales {
            bonuses.productividad = rules.productivity_upper_amount;
        } else if metrics.valid_sales >= rules.productivity_lower_sales {
            bonuses.productividad = rules.productivity_lower_amount;
        }
    }

    // Seguimiento perfecto
    if c.coverage_rate >= policy.commission.coverage_threshold.fraction() && c.crm_complete {
        bonuses.seguimiento_perfecto = rules.follow_up_amount;
    }

    // Calidad (NPS)
    if c.nps_score >= rules.nps_threshold {
        bonuses.calidad_nps = rules.nps_amount;
    }

    // Retención: strictly below the desertion ceiling
    if c.desertion_rate < rules.retention_desertion_ceiling {
        bonuses.retencion = rules.retention_amount;
    }

    bonuses.total_bonuses = bonuses.ticket_saludable
        + bonuses.productividad
        + bonuses.seguimiento_perfecto
        + bonuses.calidad_nps
        + bonuses.retencion;
    bonuses.adjusted_bonuses = bonuses.total_bonuses.min(rules.max_monthly_bonus);

    bonuses
}

// =============================================================================
// Commission Calculation
// =============================================================================

/// The immutable result of one commission run.
///
/// Computed on demand from metrics, never persisted-then-mutated: any
/// change to the inputs requires a full recomputation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CommissionCalculation {
    /// Advisor the calculation belongs to.
    pub advisor_id: String,

    /// Month in `YYYY-MM` form.
    pub month: String,

    /// Snapshot of the input metrics.
    pub metrics: AdvisorMetrics,

    /// Net collections for the month (S/).
    pub total_neto_collected: f64,

    /// PR in force for this run (S/).
    pub profitability_point: f64,

    /// RR the tiers were walked over (S/). May be negative.
    pub rentable_revenue: f64,

    /// Per-tier audit rows, in table order.
    pub tiers: Vec<TierCommission>,

    /// Sum of all tier amounts (S/).
    pub base_commission: f64,

    /// Gates satisfied (0 - 4), derived from the compliance snapshot.
    pub gates_passed: u8,

    /// Release outcome of the gate evaluation.
    pub release: ReleaseStatus,

    /// Multiplier the gates applied to the base commission (1 / 0.7 / 0).
    pub gates_penalty: f64,

    /// `base_commission × gates_penalty` (S/).
    pub adjusted_commission: f64,

    /// The five bonuses and their capped sum.
    pub bonuses: BonusCalculation,

    /// Commission plus payable bonuses, before the cap (S/).
    pub total_before_cap: f64,

    /// Cap headroom: 45% of RR, clamped at zero (S/).
    pub cap_amount: f64,

    /// What payroll actually pays (S/).
    pub final_payment: f64,
}

/// Runs the full commission pipeline for one advisor-month.
///
/// ## Edge Semantics
/// - RR ≤ 0: every tier slice is empty, the cap clamps to zero, and the
///   final payment is zero regardless of gates or bonuses
/// - gates = 3: commission at 70%, bonuses excluded from the payable total
///   (their capped value is still reported)
/// - gates ≤ 2: everything withheld (`ReleaseStatus::Retained`)
/// - the cap binds the *combined* commission+bonus total; bonuses can
///   never push the payment above 45% of RR
pub fn calculate_commission(
    metrics: &AdvisorMetrics,
    policy: &CompensationPolicy,
) -> CommissionCalculation {
    let rr = metrics.rentable_revenue;

    // Step 1: marginal walk over the ordered cut points. Each tier taxes
    // only the slice of RR between the previous cut and its own.
    let mut tiers = Vec::with_capacity(policy.commission.tiers.len());
    let mut base_commission = 0.0_f64;
    let mut prev_cut = 0.0_f64;
    for tier in &policy.commission.tiers {
        let portion = match tier.to {
            Some(cut) => {
                let portion = (rr.min(cut) - prev_cut).max(0.0);
                prev_cut = cut;
                portion
            }
            None => (rr - prev_cut).max(0.0),
        };
        let amount = tier.rate.apply(portion);
        base_commission += amount;
        tiers.push(TierCommission {
            from: tier.from,
            to: tier.to,
            rate_bps: tier.rate.bps(),
            portion,
            amount,
        });
    }

    // Step 2: gates
    let gates_passed = metrics.gates_passed(policy);
    let release = ReleaseStatus::from_gates(gates_passed);
    let gates_penalty = release.penalty();
    let adjusted_commission = base_commission * gates_penalty;

    // Step 3: bonuses (computed unconditionally, paid only on full release)
    let bonuses = calculate_bonuses(metrics, policy);
    let payable_bonuses = if release.bonuses_payable() {
        bonuses.adjusted_bonuses
    } else {
        0.0
    };

    // Step 4: combined cap and final clamp
    let total_before_cap = adjusted_commission + payable_bonuses;
    let cap_amount = policy.commission.cap_rate.apply(rr).max(0.0);
    let final_payment = total_before_cap.min(cap_amount).max(0.0);

    CommissionCalculation {
        advisor_id: metrics.advisor_id.clone(),
        month: metrics.month.clone(),
        metrics: metrics.clone(),
        total_neto_collected: metrics.total_neto,
        profitability_point: policy.commission.profitability_point,
        rentable_revenue: rr,
        tiers,
        base_commission,
        gates_passed,
        release,
        gates_penalty,
        adjusted_commission,
        bonuses,
        total_before_cap,
        cap_amount,
        final_payment,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ComplianceSnapshot;

    fn full_compliance() -> ComplianceSnapshot {
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

    fn metrics(rr: f64, compliance: ComplianceSnapshot) -> AdvisorMetrics {
        AdvisorMetrics {
            advisor_id: "a-001".to_string(),
            month: "2024-12".to_string(),
            total_sales: 32,
            valid_sales: 30,
            total_bruto: 18500.0,
            total_neto: 15677.97,
            adjusted_neto: rr + 12367.68,
            rentable_revenue: rr,
            compliance,
        }
    }

    fn gates(n: u8) -> ComplianceSnapshot {
        let mut c = full_compliance();
        if n < 4 {
            c.script_compliance = false;
        }
        if n < 3 {
            c.crm_complete = false;
        }
        if n < 2 {
            c.follow_up_complete = false;
        }
        if n < 1 {
            c.coverage_rate = 0.50;
        }
        c
    }

    #[test]
    fn test_negative_rr_pays_nothing() {
        let policy = CompensationPolicy::default();
        // Advisor 2 from the December close: below the PR with 4 gates
        let calc = calculate_commission(&metrics(-333.78, full_compliance()), &policy);

        assert_eq!(calc.base_commission, 0.0);
        assert_eq!(calc.cap_amount, 0.0);
        assert_eq!(calc.final_payment, 0.0);
        // Bonuses still reported for transparency
        assert!(calc.bonuses.total_bonuses > 0.0);
    }

    #[test]
    fn test_zero_rr_pays_nothing() {
        let policy = CompensationPolicy::default();
        let calc = calculate_commission(&metrics(0.0, full_compliance()), &policy);
        assert_eq!(calc.base_commission, 0.0);
        assert_eq!(calc.final_payment, 0.0);
    }

    #[test]
    fn test_tier_boundary_just_below_activation() {
        let policy = CompensationPolicy::default();
        let calc = calculate_commission(&metrics(1999.99, full_compliance()), &policy);
        assert_eq!(calc.base_commission, 0.0);
    }

    #[test]
    fn test_tier_boundary_at_activation() {
        let policy = CompensationPolicy::default();
        let calc = calculate_commission(&metrics(2000.0, full_compliance()), &policy);
        // The marginal slice past the 1,999.99 cut is one céntimo wide:
        // 0.10 × 0.01 = S/ 0.001
        assert!((calc.base_commission - 0.001).abs() < 1e-9);
        assert_eq!(calc.tiers[0].amount, 0.0);
    }

    #[test]
    fn test_tier_boundary_full_second_tier() {
        let policy = CompensationPolicy::default();
        let calc = calculate_commission(&metrics(5000.0, full_compliance()), &policy);
        // Full tier 2 (3,000 × 10% = 300) plus the first céntimo of tier 3
        assert!((calc.tiers[1].amount - 300.0).abs() < 1e-9);
        assert!((calc.tiers[2].amount - 0.0015).abs() < 1e-9);
        assert!((calc.base_commission - 300.0015).abs() < 1e-9);
    }

    #[test]
    fn test_base_commission_is_sum_of_tiers() {
        let policy = CompensationPolicy::default();
        for rr in [-500.0, 0.0, 1500.0, 2000.0, 4094.18, 9000.0, 20000.0] {
            let calc = calculate_commission(&metrics(rr, full_compliance()), &policy);
            let tier_sum: f64 = calc.tiers.iter().map(|t| t.amount).sum();
            assert!(
                (calc.base_commission - tier_sum).abs() < 1e-9,
                "RR {rr}: base {} != tier sum {tier_sum}",
                calc.base_commission
            );
        }
    }

    #[test]
    fn test_top_tier_is_open_ended() {
        let policy = CompensationPolicy::default();
        let calc = calculate_commission(&metrics(20000.0, full_compliance()), &policy);
        // (20,000 - 12,999.99) × 22%
        assert!((calc.tiers[4].amount - 7000.01 * 0.22).abs() < 1e-9);
    }

    #[test]
    fn test_gates_monotonicity() {
        let policy = CompensationPolicy::default();
        let rr = 4094.18;

        let four = calculate_commission(&metrics(rr, gates(4)), &policy);
        let three = calculate_commission(&metrics(rr, gates(3)), &policy);
        let two = calculate_commission(&metrics(rr, gates(2)), &policy);
        let zero = calculate_commission(&metrics(rr, gates(0)), &policy);

        assert_eq!(four.release, ReleaseStatus::Full);
        assert_eq!(three.release, ReleaseStatus::Reduced);
        assert_eq!(two.release, ReleaseStatus::Retained);

        assert!(four.final_payment >= three.final_payment);
        assert!(three.final_payment >= two.final_payment);
        assert_eq!(two.final_payment, 0.0);
        assert_eq!(zero.final_payment, 0.0);
    }

    #[test]
    fn test_three_gates_reduces_commission_and_drops_bonuses() {
        let policy = CompensationPolicy::default();
        let calc = calculate_commission(&metrics(4094.18, gates(3)), &policy);

        assert_eq!(calc.gates_passed, 3);
        assert_eq!(calc.gates_penalty, 0.7);
        assert!((calc.adjusted_commission - calc.base_commission * 0.7).abs() < 1e-9);
        // Payable total excludes bonuses entirely...
        assert!((calc.total_before_cap - calc.adjusted_commission).abs() < 1e-12);
        // ...while the capped bonus value stays visible
        assert!(calc.bonuses.adjusted_bonuses > 0.0);
    }

    #[test]
    fn test_retained_is_a_hold_not_a_zero_bonus_state() {
        let policy = CompensationPolicy::default();
        let calc = calculate_commission(&metrics(4094.18, gates(2)), &policy);

        assert_eq!(calc.release, ReleaseStatus::Retained);
        assert_eq!(calc.gates_penalty, 0.0);
        assert_eq!(calc.final_payment, 0.0);
        assert!(calc.base_commission > 0.0, "the earned base stays on record");
    }

    #[test]
    fn test_cap_binds_combined_total() {
        let policy = CompensationPolicy::default();
        // RR = 1,500: no commission yet, but full bonuses (S/ 800).
        // Cap = 675 beats the bonus total; bonuses cannot out-earn the cap.
        let calc = calculate_commission(&metrics(1500.0, full_compliance()), &policy);

        assert_eq!(calc.base_commission, 0.0);
        assert!((calc.total_before_cap - 800.0).abs() < 1e-9);
        assert!((calc.cap_amount - 675.0).abs() < 1e-9);
        assert!((calc.final_payment - 675.0).abs() < 1e-9);
    }

    #[test]
    fn test_cap_invariant_over_input_grid() {
        let policy = CompensationPolicy::default();
        for rr in [-1000.0, -0.01, 0.0, 1999.99, 2000.0, 4094.18, 13000.0, 50000.0] {
            for g in [0, 2, 3, 4] {
                let calc = calculate_commission(&metrics(rr, gates(g)), &policy);
                let ceiling = (rr * 0.45).max(0.0);
                assert!(
                    calc.final_payment <= ceiling + 1e-9,
                    "RR {rr}, gates {g}: {} > {ceiling}",
                    calc.final_payment
                );
                assert!(calc.final_payment >= 0.0);
            }
        }
    }

    #[test]
    fn test_bonus_monthly_ceiling() {
        let policy = CompensationPolicy::default();
        let mut m = metrics(20000.0, full_compliance());
        m.valid_sales = 50; // upgrades productividad to S/ 200
        m.total_bruto = 32000.0; // keeps the average ticket above S/ 600
        let calc = calculate_commission(&m, &policy);

        // 200 + 200 + 150 + 150 + 200 = 900, still under the S/ 1,200 cap
        assert_eq!(calc.bonuses.total_bonuses, 900.0);
        assert_eq!(calc.bonuses.adjusted_bonuses, 900.0);

        let mut tight = policy.clone();
        tight.bonuses.max_monthly_bonus = 500.0;
        let calc = calculate_commission(&m, &tight);
        assert_eq!(calc.bonuses.total_bonuses, 900.0);
        assert_eq!(calc.bonuses.adjusted_bonuses, 500.0);
    }

    #[test]
    fn test_ticket_bonus_guards_zero_sales() {
        let policy = CompensationPolicy::default();
        let mut m = metrics(4094.18, full_compliance());
        m.valid_sales = 0;
        m.total_bruto = 0.0;

        let calc = calculate_commission(&m, &policy);
        assert_eq!(calc.bonuses.ticket_saludable, 0.0);
        assert_eq!(calc.bonuses.productividad, 0.0);
    }

    #[test]
    fn test_ticket_bonus_levels() {
        let policy = CompensationPolicy::default();

        let mut m = metrics(4094.18, full_compliance());
        m.valid_sales = 10;
        m.total_bruto = 5500.0; // avg 550: lower level
        assert_eq!(calculate_bonuses(&m, &policy).ticket_saludable, 100.0);

        m.total_bruto = 6100.0; // avg 610: upper level
        assert_eq!(calculate_bonuses(&m, &policy).ticket_saludable, 200.0);

        m.total_bruto = 5000.0; // avg 500: not strictly above the lower bar
        assert_eq!(calculate_bonuses(&m, &policy).ticket_saludable, 0.0);
    }

    #[test]
    fn test_productivity_requires_delinquency_under_control() {
        let policy = CompensationPolicy::default();
        let mut c = full_compliance();
        c.delinquency_rate = 0.15;
        let m = metrics(4094.18, c);
        assert_eq!(calculate_bonuses(&m, &policy).productividad, 0.0);
    }

    #[test]
    fn test_december_close_scenario() {
        // Advisor 1, December 2024 close: the worked example of the plan
        let policy = CompensationPolicy::default();
        let calc = calculate_commission(&metrics(4094.18, full_compliance()), &policy);

        assert!((calc.base_commission - 209.419).abs() < 1e-6);
        assert_eq!(calc.gates_passed, 4);
        assert_eq!(calc.gates_penalty, 1.0);

        // avg ticket 616.67 → 200; 30 sales at 8% delinquency → 100;
        // coverage+CRM → 150; NPS 4.5 → 150; desertion 3% → 200
        assert_eq!(calc.bonuses.ticket_saludable, 200.0);
        assert_eq!(calc.bonuses.productividad, 100.0);
        assert_eq!(calc.bonuses.seguimiento_perfecto, 150.0);
        assert_eq!(calc.bonuses.calidad_nps, 150.0);
        assert_eq!(calc.bonuses.retencion, 200.0);
        assert_eq!(calc.bonuses.adjusted_bonuses, 800.0);

        assert!((calc.total_before_cap - 1009.419).abs() < 1e-6);
        assert!((calc.cap_amount - 1842.381).abs() < 1e-6);
        assert!((calc.final_payment - 1009.419).abs() < 1e-6);
    }

    #[test]
    fn test_determinism() {
        let policy = CompensationPolicy::default();
        let m = metrics(4094.18, full_compliance());
        let a = calculate_commission(&m, &policy);
        let b = calculate_commission(&m, &policy);
        assert_eq!(a.final_payment, b.final_payment);
        assert_eq!(a.base_commission, b.base_commission);
    }
}
