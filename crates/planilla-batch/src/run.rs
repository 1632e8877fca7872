//! Monthly payroll run orchestration.
//!
//! Walks the employee list once, driving the three engine stages per
//! employee: classify tardiness, derive metrics and commission for
//! commercial advisors, aggregate the payslip. Employees are independent
//! of each other; the loop carries no state between them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use planilla_core::commission::{calculate_commission, CommissionCalculation};
use planilla_core::metrics::derive_metrics;
use planilla_core::payslip::{build_payslip, Payslip, PayslipDraft};
use planilla_core::policy::CompensationPolicy;
use planilla_core::tardiness::classify_arrival;

use crate::error::BatchResult;
use crate::input::{EmployeeInput, PayrollInput};

// =============================================================================
// Run Report
// =============================================================================

/// The output of one monthly payroll run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRunReport {
    /// Unique id of this run.
    pub run_id: String,

    /// Month the run closed.
    pub month: String,

    /// When the report was generated.
    pub generated_at: DateTime<Utc>,

    /// One draft payslip per employee, in input order.
    pub payslips: Vec<Payslip>,

    /// Commission runs for the commercial advisors, in input order.
    pub commissions: Vec<CommissionCalculation>,

    /// Sum of net pay across all payslips (S/).
    pub total_net_pay: f64,

    /// Sum of applied tardiness discounts across all payslips (S/).
    pub total_tardy_discounts: f64,
}

// =============================================================================
// Run
// =============================================================================

/// Runs one monthly payroll close.
///
/// Validates the policy and the whole input document first; a run never
/// starts on half-valid data. Every produced payslip is a draft: approval
/// and delivery happen in later, human-driven steps.
pub fn run_payroll(
    input: &PayrollInput,
    policy: &CompensationPolicy,
) -> BatchResult<PayrollRunReport> {
    policy.validate()?;
    input.validate(policy)?;

    let run_id = Uuid::new_v4().to_string();
    info!(
        run_id = %run_id,
        month = %input.month,
        employees = input.employees.len(),
        sales = input.sales.len(),
        "starting payroll run"
    );

    let mut payslips = Vec::with_capacity(input.employees.len());
    let mut commissions = Vec::new();

    for employee in &input.employees {
        let span = info_span!("employee", id = %employee.employee_id);
        let _guard = span.enter();

        let payslip = close_employee(employee, input, policy, &mut commissions)?;
        info!(
            net_pay = payslip.net_pay,
            tardy_discounts = payslip.tardy_discounts,
            commission = payslip.commission.is_some(),
            "payslip drafted"
        );
        payslips.push(payslip);
    }

    let total_net_pay: f64 = payslips.iter().map(|p| p.net_pay).sum();
    let total_tardy_discounts: f64 = payslips.iter().map(|p| p.tardy_discounts).sum();
    info!(
        run_id = %run_id,
        payslips = payslips.len(),
        total_net_pay,
        "payroll run complete"
    );

    Ok(PayrollRunReport {
        run_id,
        month: input.month.clone(),
        generated_at: Utc::now(),
        payslips,
        commissions,
        total_net_pay,
        total_tardy_discounts,
    })
}

/// Closes one employee: tardiness, commission (advisors), payslip.
fn close_employee(
    employee: &EmployeeInput,
    input: &PayrollInput,
    policy: &CompensationPolicy,
    commissions: &mut Vec<CommissionCalculation>,
) -> BatchResult<Payslip> {
    let mut tardy_events = Vec::with_capacity(employee.arrivals.len());
    for arrival in &employee.arrivals {
        let mut event = classify_arrival(arrival.arrival_time.as_deref(), &policy.tardiness)?;
        event.is_justified = arrival.is_justified;
        event.compensation_completed = arrival.compensation_completed;
        tardy_events.push(event);
    }

    let commission = match &employee.compliance {
        Some(compliance) if employee.department.is_commissioned() => {
            let metrics = derive_metrics(
                &employee.employee_id,
                &input.month,
                &input.sales,
                *compliance,
                policy,
            );
            let calc = calculate_commission(&metrics, policy);
            debug!(
                rentable_revenue = calc.rentable_revenue,
                gates_passed = calc.gates_passed,
                final_payment = calc.final_payment,
                "commission calculated"
            );
            commissions.push(calc.clone());
            Some(calc)
        }
        Some(_) => {
            warn!("compliance snapshot on a non-commissioned employee, ignoring");
            None
        }
        None => None,
    };

    let draft = PayslipDraft {
        employee_id: employee.employee_id.clone(),
        employee_name: employee.name.clone(),
        department: employee.department,
        position: employee.position.clone(),
        month: input.month.clone(),
        base_salary: employee.base_salary,
        work_days: employee.work_days,
        worked_days: employee.worked_days,
        bonuses: employee.bonuses.clone(),
        overtime: employee.overtime,
        commission,
        deductions: employee.deductions.clone(),
        tardy_events,
    };

    Ok(build_payslip(draft)?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ArrivalRecord;
    use chrono::NaiveDate;
    use planilla_core::payslip::{DeductionType, PayslipDeduction, PayslipStatus};
    use planilla_core::tardiness::TardyCategory;
    use planilla_core::types::{
        ComplianceSnapshot, Department, MarginType, PaymentType, SaleRecord, SaleStatus,
    };

    fn sale(id: &str, advisor: &str, neto: f64) -> SaleRecord {
        SaleRecord {
            id: id.to_string(),
            advisor_id: advisor.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 12, 5).unwrap(),
            course_name: "Diplomado Project Management".to_string(),
            client_name: "Pedro Sánchez".to_string(),
            amount_bruto: neto * 1.18,
            amount_neto: neto,
            margin_type: MarginType::Estandar,
            payment_type: PaymentType::Contado,
            total_installments: None,
            paid_installments: None,
            status: SaleStatus::Paid,
        }
    }

    fn advisor(id: &str) -> EmployeeInput {
        EmployeeInput {
            employee_id: id.to_string(),
            name: "Diego Flores".to_string(),
            department: Department::Comercial,
            position: "Asesor Comercial".to_string(),
            base_salary: 2500.0,
            work_days: 22,
            worked_days: 22,
            bonuses: vec![],
            overtime: 0.0,
            arrivals: vec![],
            deductions: vec![PayslipDeduction {
                id: "d1".to_string(),
                name: "AFP".to_string(),
                amount: 250.0,
                kind: DeductionType::Afp,
                description: None,
            }],
            compliance: Some(ComplianceSnapshot {
                coverage_rate: 0.96,
                follow_up_complete: true,
                crm_complete: true,
                script_compliance: true,
                nps_score: 4.6,
                delinquency_rate: 0.08,
                desertion_rate: 0.02,
            }),
            email: Some("diego.flores@ccd.pe".to_string()),
        }
    }

    fn analyst(id: &str) -> EmployeeInput {
        EmployeeInput {
            employee_id: id.to_string(),
            name: "Rosa Martín".to_string(),
            department: Department::Soporte,
            position: "Analista".to_string(),
            base_salary: 2000.0,
            work_days: 22,
            worked_days: 22,
            bonuses: vec![],
            overtime: 0.0,
            arrivals: vec![ArrivalRecord {
                date: NaiveDate::from_ymd_opt(2024, 12, 2).unwrap(),
                arrival_time: Some("09:45".to_string()),
                is_justified: false,
                compensation_completed: false,
            }],
            deductions: vec![],
            compliance: None,
            email: None,
        }
    }

    fn december_input() -> PayrollInput {
        PayrollInput {
            month: "2024-12".to_string(),
            policy: None,
            // Three S/ 6,000 NETO sales: adjusted 18,000, RR 5,632.32
            sales: vec![
                sale("sr1", "a-001", 6000.0),
                sale("sr2", "a-001", 6000.0),
                sale("sr3", "a-001", 6000.0),
            ],
            employees: vec![advisor("a-001"), analyst("emp-5")],
        }
    }

    #[test]
    fn test_full_run_closes_both_employees() {
        let policy = CompensationPolicy::default();
        let report = run_payroll(&december_input(), &policy).unwrap();

        assert_eq!(report.month, "2024-12");
        assert_eq!(report.payslips.len(), 2);
        assert_eq!(report.commissions.len(), 1);
        assert!(report
            .payslips
            .iter()
            .all(|p| p.status == PayslipStatus::Draft));
    }

    #[test]
    fn test_advisor_numbers() {
        let policy = CompensationPolicy::default();
        let report = run_payroll(&december_input(), &policy).unwrap();
        let calc = &report.commissions[0];

        // RR = 18,000 - 12,367.68
        assert!((calc.rentable_revenue - 5632.32).abs() < 1e-9);
        // Tier 2 full (300) plus tier 3: (5,632.32 - 4,999.99) × 15%
        assert!((calc.base_commission - (300.0 + 632.33 * 0.15)).abs() < 1e-6);
        assert_eq!(calc.gates_passed, 4);
        // Ticket 7,080 avg → 200; 3 sales → no productividad;
        // seguimiento 150; NPS 4.6 → 150; desertion 2% → 200
        assert_eq!(calc.bonuses.total_bonuses, 700.0);

        let expected_final = calc.base_commission + 700.0;
        assert!((calc.final_payment - expected_final).abs() < 1e-9);

        let advisor_slip = &report.payslips[0];
        assert_eq!(advisor_slip.employee_id, "a-001");
        let expected_net = 2500.0 + calc.final_payment - 250.0;
        assert!((advisor_slip.net_pay - expected_net).abs() < 1e-9);
    }

    #[test]
    fn test_analyst_numbers() {
        let policy = CompensationPolicy::default();
        let report = run_payroll(&december_input(), &policy).unwrap();
        let slip = &report.payslips[1];

        assert_eq!(slip.employee_id, "emp-5");
        assert!(slip.commission.is_none());
        assert_eq!(slip.tardy_events[0].category, TardyCategory::Range2);
        assert_eq!(slip.tardy_discounts, 20.0);
        assert_eq!(slip.net_pay, 1980.0);
    }

    #[test]
    fn test_report_totals() {
        let policy = CompensationPolicy::default();
        let report = run_payroll(&december_input(), &policy).unwrap();

        let expected: f64 = report.payslips.iter().map(|p| p.net_pay).sum();
        assert_eq!(report.total_net_pay, expected);
        assert_eq!(report.total_tardy_discounts, 20.0);
    }

    #[test]
    fn test_justified_arrival_keeps_bracket_but_not_charge() {
        let policy = CompensationPolicy::default();
        let mut input = december_input();
        input.employees[1].arrivals[0].is_justified = true;

        let report = run_payroll(&input, &policy).unwrap();
        let slip = &report.payslips[1];
        assert_eq!(slip.tardy_events[0].category, TardyCategory::Range2);
        assert_eq!(slip.tardy_discounts, 0.0);
        assert_eq!(slip.net_pay, 2000.0);
    }

    #[test]
    fn test_incoherent_policy_override_aborts_run() {
        let mut policy = CompensationPolicy::default();
        policy.commission.tiers.clear();
        assert!(run_payroll(&december_input(), &policy).is_err());
    }

    #[test]
    fn test_bad_sale_aborts_run() {
        let policy = CompensationPolicy::default();
        let mut input = december_input();
        input.sales[0].amount_neto = input.sales[0].amount_bruto;
        assert!(run_payroll(&input, &policy).is_err());
    }

    #[test]
    fn test_compliance_on_non_advisor_is_ignored() {
        let policy = CompensationPolicy::default();
        let mut input = december_input();
        input.employees[1].compliance = input.employees[0].compliance;

        let report = run_payroll(&input, &policy).unwrap();
        assert_eq!(report.commissions.len(), 1);
        assert!(report.payslips[1].commission.is_none());
    }
}
