//! Pricing rule entity - A named formula mapping a duration to a currency amount.
//!
//! Each rule follows exactly one pricing model (`fixed`, `stepped`, or
//! `linear`); the parameter columns of the other models are simply ignored,
//! never validated away. Revenue-side and cost-side parameters are defined
//! independently. Step lists are persisted as JSON (either a native array or
//! a string containing an encoded array - both forms occur in imported data).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which pricing model a rule follows
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum RuleType {
    /// Flat amount regardless of duration
    #[sea_orm(string_value = "fixed")]
    Fixed,
    /// Tiered price by duration bound, first-fit
    #[sea_orm(string_value = "stepped")]
    Stepped,
    /// Per-unit charge beyond a threshold, optionally layered on steps
    #[sea_orm(string_value = "linear")]
    Linear,
}

/// Pricing rule database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pricing_rules")]
pub struct Model {
    /// Unique identifier for the rule
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable rule name (e.g., "Short-form standard", "Rush rate")
    pub name: String,
    /// Pricing model this rule follows
    pub rule_type: RuleType,
    /// Flat revenue amount for `fixed` rules
    pub fixed_price: Option<f64>,
    /// Flat cost amount for `fixed` rules
    pub fixed_cost: Option<f64>,
    /// Revenue-side step list: JSON array of `{up_to_minutes, price}` pairs,
    /// or a JSON string containing such an array
    pub revenue_steps: Option<Json>,
    /// Cost-side step list, same representation as `revenue_steps`
    pub cost_steps: Option<Json>,
    /// Revenue-side duration threshold beyond which per-unit charges apply;
    /// falls back to the last step bound when unset
    pub increment_threshold: Option<f64>,
    /// Revenue-side unit size in minutes for per-unit charges
    pub incremental_unit: Option<f64>,
    /// Revenue-side price per started unit beyond the threshold
    pub incremental_unit_price: Option<f64>,
    /// Cost-side duration threshold for per-unit charges
    pub incremental_cost_threshold: Option<f64>,
    /// Cost-side unit size in minutes
    pub incremental_cost_unit: Option<f64>,
    /// Cost-side price per started unit beyond the threshold
    pub incremental_cost_unit_price: Option<f64>,
}

/// Defines relationships between `PricingRule` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One rule prices many outsourced tasks
    #[sea_orm(has_many = "super::task::Entity")]
    Tasks,
    /// One rule can be scoped to many clients
    #[sea_orm(has_many = "super::rule_client::Entity")]
    RuleClients,
    /// One rule can be associated with many partners
    #[sea_orm(has_many = "super::rule_partner::Entity")]
    RulePartners,
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
