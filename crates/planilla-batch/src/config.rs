//! Batch run configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults, so a plain `planilla-run` works in a checkout while
//! deployments point the paths wherever they need.

use serde::{Deserialize, Serialize};
use std::env;

/// Batch run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Path of the resolved payroll input JSON.
    pub input_path: String,

    /// Path the run report is written to.
    pub output_path: String,

    /// Optional path of a policy override file. When unset, the policy
    /// embedded in the input (or the default plan) applies.
    pub policy_path: Option<String>,
}

impl BatchConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = BatchConfig {
            input_path: env::var("PLANILLA_INPUT")
                .unwrap_or_else(|_| "payroll-input.json".to_string()),

            output_path: env::var("PLANILLA_OUTPUT")
                .unwrap_or_else(|_| "payroll-report.json".to_string()),

            policy_path: env::var("PLANILLA_POLICY").ok(),
        };

        if config.input_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue("PLANILLA_INPUT".to_string()));
        }
        if config.output_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue("PLANILLA_OUTPUT".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
