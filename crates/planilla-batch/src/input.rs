//! Payroll run input shapes.
//!
//! Upstream collaborators (attendance uploads, the CRM, contract data)
//! resolve their own formats and hand this crate one JSON document per
//! month. Everything here is already clean data; only shape and coherence
//! checks remain before the engine runs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use planilla_core::payslip::{PayslipBonus, PayslipDeduction};
use planilla_core::policy::CompensationPolicy;
use planilla_core::types::{ComplianceSnapshot, Department, SaleRecord};
use planilla_core::validation::{
    validate_arrival_time, validate_base_salary, validate_employee_id, validate_month,
    validate_sale_amounts,
};

use crate::error::BatchResult;

// =============================================================================
// Input Shapes
// =============================================================================

/// One recorded arrival, straight from the validated attendance sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalRecord {
    /// Day the punch belongs to.
    pub date: NaiveDate,

    /// `HH:MM` punch, absent when no arrival was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,

    /// A supervisor justified this day's tardiness.
    #[serde(default)]
    pub is_justified: bool,

    /// The employee completed the compensation minutes for this day.
    #[serde(default)]
    pub compensation_completed: bool,
}

/// One employee's resolved month.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub employee_id: String,
    pub name: String,
    pub department: Department,

    #[serde(default = "default_position")]
    pub position: String,

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

    /// Daily arrivals for tardiness classification.
    #[serde(default)]
    pub arrivals: Vec<ArrivalRecord>,

    /// Statutory and agreed deductions.
    #[serde(default)]
    pub deductions: Vec<PayslipDeduction>,

    /// CRM compliance snapshot; present for commercial advisors only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance: Option<ComplianceSnapshot>,

    /// Delivery address for the sent payslip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

fn default_position() -> String {
    "Colaborador".to_string()
}

/// One month of resolved payroll input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollInput {
    /// Month in `YYYY-MM` form.
    pub month: String,

    /// Optional embedded policy override; the default plan applies when
    /// absent. A policy file given to `planilla-run` wins over this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<CompensationPolicy>,

    /// The month's sale records across all advisors.
    #[serde(default)]
    pub sales: Vec<SaleRecord>,

    /// Every employee to pay this month.
    pub employees: Vec<EmployeeInput>,
}

impl PayrollInput {
    /// Boundary validation of the whole document.
    ///
    /// Rejects the run before any calculation when a record is malformed:
    /// a payroll close over half-validated data is worse than no close.
    pub fn validate(&self, policy: &CompensationPolicy) -> BatchResult<()> {
        validate_month(&self.month)?;

        for sale in &self.sales {
            validate_sale_amounts(sale, policy.commission.igv_rate)?;
        }

        for employee in &self.employees {
            validate_employee_id(&employee.employee_id)?;
            validate_base_salary(employee.base_salary)?;
            for arrival in &employee.arrivals {
                if let Some(raw) = &arrival.arrival_time {
                    validate_arrival_time(raw)?;
                }
            }
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
