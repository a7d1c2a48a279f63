//! Billing configuration loading from billing.toml
//!
//! This module provides the billing policy knobs: the flat tax rate applied to
//! invoice subtotals and the policy controlling which invoices the unbilled
//! query offers for consolidation. Both have defaults matching long-standing
//! operational behavior, so a missing config file is not an error.

use crate::core::billing::UnbilledPolicy;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire billing.toml file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Flat tax rate applied to invoice subtotals (e.g., 0.10 for 10%)
    pub tax_rate: f64,
    /// Which invoices the unbilled query offers for consolidation
    pub unbilled_policy: UnbilledPolicy,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            tax_rate: 0.10,
            unbilled_policy: UnbilledPolicy::AnyStatus,
        }
    }
}

/// Loads billing configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BillingConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse billing.toml: {e}"),
    })
}

/// Loads billing configuration from the default location (./billing.toml),
/// falling back to defaults when the file does not exist.
pub fn load_default_config() -> Result<BillingConfig> {
    if Path::new("billing.toml").exists() {
        load_config("billing.toml")
    } else {
        Ok(BillingConfig::default())
    }
}
