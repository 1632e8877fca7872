//! # Monthly Payroll Close
//!
//! Runs the compensation engine over one month of resolved inputs.
//!
//! ## Usage
//! ```bash
//! # Paths from the environment (see config.rs for defaults)
//! cargo run -p planilla-batch --bin planilla-run
//!
//! # Explicit paths
//! PLANILLA_INPUT=./2024-12.json PLANILLA_OUTPUT=./2024-12-report.json \
//!     cargo run -p planilla-batch --bin planilla-run
//!
//! # With a deployment policy override
//! PLANILLA_POLICY=./policy.json cargo run -p planilla-batch --bin planilla-run
//! ```
//!
//! The input document carries the month, the sale records and every
//! employee's resolved attendance/bonus/deduction data. The report holds
//! one draft payslip per employee plus the commission audit rows.

use std::fs;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use planilla_batch::{run_payroll, BatchConfig, BatchResult, PayrollInput};
use planilla_core::policy::CompensationPolicy;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match close_month() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "payroll run failed");
            ExitCode::FAILURE
        }
    }
}

fn close_month() -> BatchResult<()> {
    let config = BatchConfig::load()?;
    info!(input = %config.input_path, output = %config.output_path, "loading payroll input");

    let input: PayrollInput = serde_json::from_str(&fs::read_to_string(&config.input_path)?)?;

    // Policy precedence: override file, then the input's embedded policy,
    // then the default plan
    let policy: CompensationPolicy = match &config.policy_path {
        Some(path) => {
            info!(policy = %path, "loading policy override");
            serde_json::from_str(&fs::read_to_string(path)?)?
        }
        None => input.policy.clone().unwrap_or_default(),
    };

    let report = run_payroll(&input, &policy)?;

    fs::write(&config.output_path, serde_json::to_string_pretty(&report)?)?;
    info!(
        report = %config.output_path,
        payslips = report.payslips.len(),
        total_net_pay = report.total_net_pay,
        "report written"
    );

    Ok(())
}
