//! Core business logic - framework-agnostic billing operations.
//!
//! Every function here takes the database connection as an explicit argument,
//! so the same code runs against the production database and the in-memory
//! test databases.

/// Billing state machine - consolidation, payment, and status cascades
pub mod billing;
/// Client master data
pub mod client;
/// Duration parsing for pricing input
pub mod duration;
/// Invoice, item, and task lifecycle
pub mod invoice;
/// Partner master data
pub mod partner;
/// Two-tier partner cost resolution
pub mod partner_cost;
/// Pricing rule evaluation engine
pub mod pricing;
/// Pricing rule management and assignments
pub mod rule;
