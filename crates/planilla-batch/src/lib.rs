//! # planilla-batch: Batch Payroll Runs
//!
//! The I/O shell around `planilla-core`: loads a month of resolved inputs,
//! runs the pure engine per employee, and writes the run report.
//!
//! ## Run Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Monthly Payroll Run                               │
//! │                                                                         │
//! │  payroll-input.json                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  input::PayrollInput ──► run::run_payroll()                             │
//! │                               │                                         │
//! │                               │  per employee (independent):            │
//! │                               │    classify tardiness                   │
//! │                               │    derive metrics → commission          │
//! │                               │    build payslip                        │
//! │                               ▼                                         │
//! │                          PayrollRunReport ──► payroll-report.json       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each employee's calculation depends only on that employee's records, so
//! the loop carries no shared mutable state and input order only affects
//! report order.

pub mod config;
pub mod error;
pub mod input;
pub mod run;

pub use config::BatchConfig;
pub use error::{BatchError, BatchResult};
pub use input::{ArrivalRecord, EmployeeInput, PayrollInput};
pub use run::{run_payroll, PayrollRunReport};
