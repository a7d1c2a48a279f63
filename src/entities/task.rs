//! Outsourced task entity - Work assigned to one partner under one invoice item.
//!
//! The leaf of the billing hierarchy. `revenue_amount` is what the task
//! contributes to the client-facing side, `cost_amount` is what the partner is
//! paid; both are computed once from the task's pricing rule when the task is
//! created.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::invoice::ProductionStatus;

/// Outsourced task database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    /// Unique identifier for the task
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Invoice item this task belongs to
    pub item_id: i64,
    /// Partner performing the work
    pub partner_id: i64,
    /// Pricing rule used to compute amounts, None for unpriced tasks
    pub rule_id: Option<i64>,
    /// What the partner is asked to do (e.g., "editing", "voice-over")
    pub description: String,
    /// Current lifecycle status
    pub status: ProductionStatus,
    /// Revenue-side amount computed from the rule
    pub revenue_amount: f64,
    /// Cost-side amount computed by the partner cost resolver
    pub cost_amount: f64,
    /// When the partner delivered the work
    pub delivered_at: Option<DateTimeUtc>,
    /// Where the partner delivered the work
    pub delivery_url: Option<String>,
}

/// Defines relationships between Task and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each task belongs to one invoice item
    #[sea_orm(
        belongs_to = "super::invoice_item::Entity",
        from = "Column::ItemId",
        to = "super::invoice_item::Column::Id"
    )]
    Item,
    /// Each task is performed by one partner
    #[sea_orm(
        belongs_to = "super::partner::Entity",
        from = "Column::PartnerId",
        to = "super::partner::Column::Id"
    )]
    Partner,
    /// Each task may be priced by one rule
    #[sea_orm(
        belongs_to = "super::pricing_rule::Entity",
        from = "Column::RuleId",
        to = "super::pricing_rule::Column::Id"
    )]
    PricingRule,
}

impl Related<super::invoice_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl Related<super::partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partner.def()
    }
}

impl Related<super::pricing_rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PricingRule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
