//! # Payslip Aggregator
//!
//! Combines base salary, bonuses, overtime, commission and deductions into
//! one monthly payslip.
//!
//! ## Payslip Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Payslip Lifecycle                                 │
//! │                                                                         │
//! │  1. BUILD DRAFT                                                         │
//! │     └── build_payslip() → Payslip { status: Draft }                     │
//! │         totals computed once from the draft inputs                      │
//! │                                                                         │
//! │  2. (OPTIONAL) RE-ATTACH COMMISSION                                     │
//! │     └── attach_commission() → totals recomputed (Draft only)            │
//! │                                                                         │
//! │  3. APPROVE                                                             │
//! │     └── approve() → Payslip { status: Approved }                        │
//! │                                                                         │
//! │  4. SEND                                                                │
//! │     └── mark_sent(email) → Payslip { status: Sent }                     │
//! │         records sent_to_email / sent_at; monetary fields frozen         │
//! │                                                                         │
//! │  Forward-only. Sent is terminal; recalculation starts a fresh draft.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `total_earnings = base_salary + Σ bonuses + overtime + commission`
//! - `total_deductions = Σ deductions + tardy_discounts`
//! - `net_pay = total_earnings - total_deductions`, bit-for-bit
//! - empty bonus/deduction lists sum to zero, never error
//! - non-advisor employees simply carry no commission

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::commission::CommissionCalculation;
use crate::error::{CoreError, CoreResult};
use crate::tardiness::TardyDiscount;
use crate::types::Department;
use crate::validation::validate_email;

// =============================================================================
// Payslip Components
// =============================================================================

/// A fixed or one-time bonus line (movilidad, alimentación, ...).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PayslipBonus {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Statutory or agreed deduction categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DeductionType {
    Tardiness,
    Absence,
    Loan,
    Afp,
    Onp,
    #[serde(rename = "rent_5ta")]
    Rent5ta,
    Other,
}

/// One deduction line.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PayslipDeduction {
    pub id: String,
    pub name: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: DeductionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payslip lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PayslipStatus {
    /// Amounts still open to recomputation.
    Draft,
    /// Reviewed by HR, ready for delivery.
    Approved,
    /// Delivered to the employee. Terminal and read-only.
    Sent,
}

impl Default for PayslipStatus {
    fn default() -> Self {
        PayslipStatus::Draft
    }
}

impl std::fmt::Display for PayslipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PayslipStatus::Draft => "draft",
            PayslipStatus::Approved => "approved",
            PayslipStatus::Sent => "sent",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// Payslip Draft (input)
// =============================================================================

/// Resolved inputs for one employee-month, ready for aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PayslipDraft {
    pub employee_id: String,
    pub employee_name: String,
    pub department: Department,
    pub position: String,

    /// Month in `YYYY-MM` form.
    pub month: String,

    /// Contract salary for the month (S/).
    pub base_salary: f64,

    /// Scheduled working days.
    pub work_days: u32,

    /// Days actually attended.
    pub worked_days: u32,

    /// Fixed and one-time bonuses.
    #[serde(default)]
    pub bonuses: Vec<PayslipBonus>,

    /// Overtime amount already valued in soles.
    #[serde(default)]
    pub overtime: f64,

    /// Commission run for commercial advisors; `None` for everyone else.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission: Option<CommissionCalculation>,

    /// Statutory and agreed deductions.
    #[serde(default)]
    pub deductions: Vec<PayslipDeduction>,

    /// Classified tardiness events for the month.
    #[serde(default)]
    pub tardy_events: Vec<TardyDiscount>,
}

// =============================================================================
// Payslip
// =============================================================================

/// One employee's monthly payslip.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Payslip {
    /// `pay-{employee}-{month}`, one per employee per month.
    pub id: String,

    pub employee_id: String,
    pub employee_name: String,
    pub department: Department,
    pub position: String,
    pub month: String,

    pub base_salary: f64,
    pub work_days: u32,
    pub worked_days: u32,

    pub bonuses: Vec<PayslipBonus>,
    pub overtime: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission: Option<CommissionCalculation>,
    pub total_earnings: f64,

    pub deductions: Vec<PayslipDeduction>,

    /// Sum of applied tardiness discounts (S/).
    pub tardy_discounts: f64,

    /// The classified events behind `tardy_discounts`, kept for audit.
    pub tardy_events: Vec<TardyDiscount>,

    pub total_deductions: f64,
    pub net_pay: f64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_to_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub sent_at: Option<DateTime<Utc>>,

    pub status: PayslipStatus,
}

/// Aggregates a draft into a payslip.
///
/// ## Errors
/// [`CoreError::AdvisorMismatch`] when the attached commission belongs to
/// a different employee. Everything else degrades to zero: missing
/// commission, empty lists, no tardiness.
///
/// ## Example
/// ```rust
/// use planilla_core::payslip::{build_payslip, PayslipDraft};
/// use planilla_core::types::Department;
///
/// let draft = PayslipDraft {
///     employee_id: "emp-7".into(),
///     employee_name: "Rosa Martín".into(),
///     department: Department::Soporte,
///     position: "Analista".into(),
///     month: "2024-12".into(),
///     base_salary: 2000.0,
///     work_days: 22,
///     worked_days: 22,
///     bonuses: vec![],
///     overtime: 0.0,
///     commission: None,
///     deductions: vec![],
///     tardy_events: vec![],
/// };
///
/// let payslip = build_payslip(draft).unwrap();
/// assert_eq!(payslip.net_pay, 2000.0);
/// assert_eq!(payslip.id, "pay-emp-7-2024-12");
/// ```
pub fn build_payslip(draft: PayslipDraft) -> CoreResult<Payslip> {
    if let Some(commission) = &draft.commission {
        if commission.advisor_id != draft.employee_id {
            return Err(CoreError::AdvisorMismatch {
                advisor_id: commission.advisor_id.clone(),
                employee_id: draft.employee_id.clone(),
            });
        }
    }

    let (total_earnings, tardy_discounts, total_deductions, net_pay) = totals(
        draft.base_salary,
        &draft.bonuses,
        draft.overtime,
        draft.commission.as_ref(),
        &draft.deductions,
        &draft.tardy_events,
    );

    Ok(Payslip {
        id: format!("pay-{}-{}", draft.employee_id, draft.month),
        employee_id: draft.employee_id,
        employee_name: draft.employee_name,
        department: draft.department,
        position: draft.position,
        month: draft.month,
        base_salary: draft.base_salary,
        work_days: draft.work_days,
        worked_days: draft.worked_days,
        bonuses: draft.bonuses,
        overtime: draft.overtime,
        commission: draft.commission,
        total_earnings,
        deductions: draft.deductions,
        tardy_discounts,
        tardy_events: draft.tardy_events,
        total_deductions,
        net_pay,
        created_at: Utc::now(),
        sent_to_email: None,
        sent_at: None,
        status: PayslipStatus::Draft,
    })
}

/// The single place the payslip arithmetic lives.
fn totals(
    base_salary: f64,
    bonuses: &[PayslipBonus],
    overtime: f64,
    commission: Option<&CommissionCalculation>,
    deductions: &[PayslipDeduction],
    tardy_events: &[TardyDiscount],
) -> (f64, f64, f64, f64) {
    let bonus_total: f64 = bonuses.iter().map(|b| b.amount).sum();
    let commission_amount = commission.map(|c| c.final_payment).unwrap_or(0.0);
    let tardy_discounts: f64 = tardy_events.iter().map(|t| t.applied_discount()).sum();
    let deduction_total: f64 = deductions.iter().map(|d| d.amount).sum();

    let total_earnings = base_salary + bonus_total + overtime + commission_amount;
    let total_deductions = deduction_total + tardy_discounts;
    let net_pay = total_earnings - total_deductions;

    (total_earnings, tardy_discounts, total_deductions, net_pay)
}

impl Payslip {
    /// Replaces the commission run and recomputes the totals.
    ///
    /// Only a draft is open to recomputation; an approved payslip must go
    /// back through a fresh draft and a sent one is frozen for good.
    pub fn attach_commission(&mut self, commission: CommissionCalculation) -> CoreResult<()> {
        match self.status {
            PayslipStatus::Draft => {}
            PayslipStatus::Approved => {
                return Err(CoreError::InvalidPayslipStatus {
                    payslip_id: self.id.clone(),
                    current_status: self.status.to_string(),
                })
            }
            PayslipStatus::Sent => {
                return Err(CoreError::PayslipImmutable {
                    payslip_id: self.id.clone(),
                })
            }
        }
        if commission.advisor_id != self.employee_id {
            return Err(CoreError::AdvisorMismatch {
                advisor_id: commission.advisor_id.clone(),
                employee_id: self.employee_id.clone(),
            });
        }

        self.commission = Some(commission);
        let (total_earnings, tardy_discounts, total_deductions, net_pay) = totals(
            self.base_salary,
            &self.bonuses,
            self.overtime,
            self.commission.as_ref(),
            &self.deductions,
            &self.tardy_events,
        );
        self.total_earnings = total_earnings;
        self.tardy_discounts = tardy_discounts;
        self.total_deductions = total_deductions;
        self.net_pay = net_pay;
        Ok(())
    }

    /// Draft → Approved.
    pub fn approve(&mut self) -> CoreResult<()> {
        match self.status {
            PayslipStatus::Draft => {
                self.status = PayslipStatus::Approved;
                Ok(())
            }
            _ => Err(CoreError::InvalidPayslipStatus {
                payslip_id: self.id.clone(),
                current_status: self.status.to_string(),
            }),
        }
    }

    /// Approved → Sent. Records the delivery address and timestamp.
    pub fn mark_sent(&mut self, email: &str) -> CoreResult<()> {
        validate_email(email)?;
        match self.status {
            PayslipStatus::Approved => {
                self.status = PayslipStatus::Sent;
                self.sent_to_email = Some(email.to_string());
                self.sent_at = Some(Utc::now());
                Ok(())
            }
            _ => Err(CoreError::InvalidPayslipStatus {
                payslip_id: self.id.clone(),
                current_status: self.status.to_string(),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
