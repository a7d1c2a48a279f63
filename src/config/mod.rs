/// Billing policy configuration loading from billing.toml
pub mod billing;

/// Database configuration and connection management
pub mod database;
