//! # Policy Tables
//!
//! Every tunable of the compensation plan lives here as data, never as a
//! literal inside a calculation.
//!
//! ## Configuration Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     CompensationPolicy                                  │
//! │                                                                         │
//! │  commission            bonuses                tardiness                 │
//! │  ──────────            ───────                ─────────                 │
//! │  profitability point   monthly bonus cap      scheduled start           │
//! │  activation threshold  ticket thresholds      bracket table             │
//! │  payout cap rate       productivity rules       on_time  ≤ +5 min      │
//! │  IGV rate              follow-up amount         range_1  ≤ +29 min     │
//! │  coverage threshold    NPS rule                 range_2  ≤ +59 min     │
//! │  tier table (ordered)  retention rule           range_3  open           │
//! │                                                                         │
//! │  margin_coefficients: alto 1.10 / estándar 1.00 / bajo 0.90             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tier and bracket tables are ordered lookup tables so the marginal walk
//! stays auditable per row. `Default` yields the CCD 2025 plan; deployments
//! override individual sections through serde (every field has a default).
//!
//! ## Usage
//! ```rust
//! use planilla_core::policy::CompensationPolicy;
//!
//! let policy = CompensationPolicy::default();
//! policy.validate().unwrap();
//! assert_eq!(policy.commission.profitability_point, 12367.68);
//! assert_eq!(policy.commission.tiers.len(), 5);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Rate;
use crate::tardiness::TardyCategory;
use crate::types::MarginType;

// =============================================================================
// Commission Policy
// =============================================================================

/// One row of the marginal commission table.
///
/// `to` is the inclusive upper cut point of the tier (`1999.99`,
/// `4999.99`, ...); the last tier is open-ended (`None`). The marginal walk
/// in [`crate::commission`] consumes the cut points in order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommissionTier {
    /// Lower bound of the tier in rentable revenue (S/).
    pub from: f64,

    /// Inclusive upper cut point (S/). `None` for the open last tier.
    pub to: Option<f64>,

    /// Marginal rate applied to the revenue slice inside this tier.
    pub rate: Rate,
}

/// Commission section of the plan.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct CommissionPolicy {
    /// PR: fixed monthly net collections before any commission accrues (S/).
    pub profitability_point: f64,

    /// Rentable-revenue level at which the first paying tier opens (S/).
    pub activation_threshold: f64,

    /// CAP: maximum share of rentable revenue payable as commission+bonuses.
    pub cap_rate: Rate,

    /// IGV rate used to derive NETO from BRUTO amounts.
    pub igv_rate: Rate,

    /// Minimum 2-hour lead coverage for the coverage gate.
    pub coverage_threshold: Rate,

    /// Ordered marginal tier table over rentable revenue.
    pub tiers: Vec<CommissionTier>,
}

impl CommissionPolicy {
    /// Whether rentable revenue has reached the first paying tier.
    ///
    /// Used by progress reporting; the marginal walk itself needs no
    /// separate activation check because tier 1 carries a 0% rate.
    #[inline]
    pub fn commission_active(&self, rentable_revenue: f64) -> bool {
        rentable_revenue >= self.activation_threshold
    }
}

impl Default for CommissionPolicy {
    fn default() -> Self {
        CommissionPolicy {
            profitability_point: 12367.68,
            activation_threshold: 2000.0,
            cap_rate: Rate::from_bps(4500),
            igv_rate: Rate::from_bps(1800),
            coverage_threshold: Rate::from_bps(9500),
            tiers: vec![
                CommissionTier {
                    from: 0.0,
                    to: Some(1999.99),
                    rate: Rate::zero(),
                },
                CommissionTier {
                    from: 2000.0,
                    to: Some(4999.99),
                    rate: Rate::from_bps(1000),
                },
                CommissionTier {
                    from: 5000.0,
                    to: Some(7999.99),
                    rate: Rate::from_bps(1500),
                },
                CommissionTier {
                    from: 8000.0,
                    to: Some(12999.99),
                    rate: Rate::from_bps(1800),
                },
                CommissionTier {
                    from: 13000.0,
                    to: None,
                    rate: Rate::from_bps(2200),
                },
            ],
        }
    }
}

// =============================================================================
// Margin Coefficients
// =============================================================================

/// Revenue coefficients per product margin class.
///
/// Applied to each valid sale's NETO amount when building
/// `adjusted_neto`: own portfolio weighs more than licensed portfolio.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct MarginCoefficients {
    pub alto_margen: f64,
    pub estandar: f64,
    pub bajo_margen: f64,
}

impl MarginCoefficients {
    /// Coefficient for a margin class.
    #[inline]
    pub fn for_margin(&self, margin: MarginType) -> f64 {
        match margin {
            MarginType::AltoMargen => self.alto_margen,
            MarginType::Estandar => self.estandar,
            MarginType::BajoMargen => self.bajo_margen,
        }
    }
}

impl Default for MarginCoefficients {
    fn default() -> Self {
        MarginCoefficients {
            alto_margen: 1.10,
            estandar: 1.00,
            bajo_margen: 0.90,
        }
    }
}

// =============================================================================
// Bonus Policy
// =============================================================================

/// Accelerator bonus rules.
///
/// Five independent bonuses; their sum is capped at `max_monthly_bonus`.
/// Thresholds compare exactly as the plan reads: ticket strictly above,
/// sales counts at-or-above, delinquency at-or-below, desertion strictly
/// below.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct BonusPolicy {
    /// Monthly ceiling over the sum of all five bonuses (S/).
    pub max_monthly_bonus: f64,

    /// Ticket saludable: average gross ticket strictly above this pays the
    /// upper amount (S/ 600 → S/ 200).
    pub ticket_upper_threshold: f64,
    pub ticket_upper_amount: f64,

    /// Ticket saludable lower level (S/ 500 → S/ 100).
    pub ticket_lower_threshold: f64,
    pub ticket_lower_amount: f64,

    /// Productividad only evaluates with delinquency at or below this.
    pub productivity_delinquency_ceiling: f64,

    /// Productividad upper level (45 valid sales → S/ 200).
    pub productivity_upper_sales: u32,
    pub productivity_upper_amount: f64,

    /// Productividad lower level (30 valid sales → S/ 100).
    pub productivity_lower_sales: u32,
    pub productivity_lower_amount: f64,

    /// Seguimiento perfecto: coverage gate met AND CRM complete (S/ 150).
    pub follow_up_amount: f64,

    /// Calidad: NPS at or above this pays the amount (4.4 → S/ 150).
    pub nps_threshold: f64,
    pub nps_amount: f64,

    /// Retención: desertion strictly below this pays the amount
    /// (0.05 → S/ 200).
    pub retention_desertion_ceiling: f64,
    pub retention_amount: f64,
}

impl Default for BonusPolicy {
    fn default() -> Self {
        BonusPolicy {
            max_monthly_bonus: 1200.0,
            ticket_upper_threshold: 600.0,
            ticket_upper_amount: 200.0,
            ticket_lower_threshold: 500.0,
            ticket_lower_amount: 100.0,
            productivity_delinquency_ceiling: 0.12,
            productivity_upper_sales: 45,
            productivity_upper_amount: 200.0,
            productivity_lower_sales: 30,
            productivity_lower_amount: 100.0,
            follow_up_amount: 150.0,
            nps_threshold: 4.4,
            nps_amount: 150.0,
            retention_desertion_ceiling: 0.05,
            retention_amount: 200.0,
        }
    }
}

// =============================================================================
// Tardiness Policy
// =============================================================================

/// One row of the tardiness bracket table.
///
/// `max_minutes_late` is the inclusive number of minutes past the
/// scheduled start the bracket tolerates; `None` marks the open last
/// bracket. Brackets are contiguous and walked in order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TardyBracket {
    /// Classification this bracket assigns.
    pub category: TardyCategory,

    /// Inclusive upper bound in minutes after scheduled start.
    pub max_minutes_late: Option<u32>,

    /// Payroll discount for the bracket (S/).
    pub discount: f64,

    /// Minutes of compensation work required to lift the discount.
    pub compensation_minutes: u32,
}

/// Tardiness section of the plan.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct TardinessPolicy {
    /// Scheduled start of the workday, minutes since midnight (540 = 09:00).
    pub scheduled_start_minutes: u32,

    /// Ordered bracket table.
    pub brackets: Vec<TardyBracket>,
}

impl Default for TardinessPolicy {
    fn default() -> Self {
        TardinessPolicy {
            scheduled_start_minutes: 540,
            brackets: vec![
                TardyBracket {
                    category: TardyCategory::OnTime,
                    max_minutes_late: Some(5),
                    discount: 0.0,
                    compensation_minutes: 0,
                },
                TardyBracket {
                    category: TardyCategory::Range1,
                    max_minutes_late: Some(29),
                    discount: 10.0,
                    compensation_minutes: 30,
                },
                TardyBracket {
                    category: TardyCategory::Range2,
                    max_minutes_late: Some(59),
                    discount: 20.0,
                    compensation_minutes: 60,
                },
                TardyBracket {
                    category: TardyCategory::Range3,
                    max_minutes_late: None,
                    discount: 30.0,
                    compensation_minutes: 90,
                },
            ],
        }
    }
}

// =============================================================================
// Compensation Policy (root)
// =============================================================================

/// The full tunable policy for one deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct CompensationPolicy {
    pub commission: CommissionPolicy,
    pub margin_coefficients: MarginCoefficients,
    pub bonuses: BonusPolicy,
    pub tardiness: TardinessPolicy,
}

impl CompensationPolicy {
    /// Checks the coherence of the loaded tables.
    ///
    /// ## Rules
    /// - tier table non-empty, cut points strictly ascending, only the
    ///   last tier open-ended, rates at most 100%
    /// - bracket table non-empty, bounds strictly ascending, only the
    ///   last bracket open-ended
    /// - margin coefficients strictly positive
    /// - bonus amounts and the monthly cap non-negative
    ///
    /// Deployments loading an external policy file must call this before
    /// the first payroll run.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let tiers = &self.commission.tiers;
        if tiers.is_empty() {
            return Err(ValidationError::Required {
                field: "commission.tiers".to_string(),
            });
        }
        let mut prev_cut = 0.0_f64;
        for (idx, tier) in tiers.iter().enumerate() {
            if tier.rate.bps() > 10000 {
                return Err(ValidationError::OutOfRange {
                    field: format!("commission.tiers[{idx}].rate"),
                    min: 0,
                    max: 10000,
                });
            }
            match tier.to {
                Some(to) => {
                    if idx == tiers.len() - 1 {
                        return Err(ValidationError::Inconsistent {
                            field: "commission.tiers".to_string(),
                            reason: "last tier must be open-ended".to_string(),
                        });
                    }
                    if to <= prev_cut && idx > 0 {
                        return Err(ValidationError::Inconsistent {
                            field: "commission.tiers".to_string(),
                            reason: format!("cut point {to} is not ascending"),
                        });
                    }
                    prev_cut = to;
                }
                None => {
                    if idx != tiers.len() - 1 {
                        return Err(ValidationError::Inconsistent {
                            field: "commission.tiers".to_string(),
                            reason: "only the last tier may be open-ended".to_string(),
                        });
                    }
                }
            }
        }

        let brackets = &self.tardiness.brackets;
        if brackets.is_empty() {
            return Err(ValidationError::Required {
                field: "tardiness.brackets".to_string(),
            });
        }
        let mut prev_bound: Option<u32> = None;
        for (idx, bracket) in brackets.iter().enumerate() {
            match bracket.max_minutes_late {
                Some(bound) => {
                    if idx == brackets.len() - 1 {
                        return Err(ValidationError::Inconsistent {
                            field: "tardiness.brackets".to_string(),
                            reason: "last bracket must be open-ended".to_string(),
                        });
                    }
                    if let Some(prev) = prev_bound {
                        if bound <= prev {
                            return Err(ValidationError::Inconsistent {
                                field: "tardiness.brackets".to_string(),
                                reason: format!("bound {bound} is not ascending"),
                            });
                        }
                    }
                    prev_bound = Some(bound);
                }
                None => {
                    if idx != brackets.len() - 1 {
                        return Err(ValidationError::Inconsistent {
                            field: "tardiness.brackets".to_string(),
                            reason: "only the last bracket may be open-ended".to_string(),
                        });
                    }
                }
            }
            if bracket.discount < 0.0 {
                return Err(ValidationError::MustBeNonNegative {
                    field: format!("tardiness.brackets[{idx}].discount"),
                });
            }
        }

        let coeffs = &self.margin_coefficients;
        for (name, value) in [
            ("alto_margen", coeffs.alto_margen),
            ("estandar", coeffs.estandar),
            ("bajo_margen", coeffs.bajo_margen),
        ] {
            if value <= 0.0 {
                return Err(ValidationError::OutOfRange {
                    field: format!("margin_coefficients.{name}"),
                    min: 0,
                    max: i64::MAX,
                });
            }
        }

        if self.bonuses.max_monthly_bonus < 0.0 {
            return Err(ValidationError::MustBeNonNegative {
                field: "bonuses.max_monthly_bonus".to_string(),
            });
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
