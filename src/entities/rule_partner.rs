//! Rule-partner association - Links a pricing rule to a partner.
//!
//! The `position` column preserves assignment order so that "the first
//! matching rule" is deterministic when resolving partner costs.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Rule-partner association database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rule_partners")]
pub struct Model {
    /// Unique identifier for the association
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Pricing rule being associated
    pub rule_id: i64,
    /// Partner the rule applies to
    pub partner_id: i64,
    /// Assignment order within the partner's rule list (0-based)
    pub position: i32,
}

/// Defines relationships between the association and its endpoints
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each association points to one pricing rule
    #[sea_orm(
        belongs_to = "super::pricing_rule::Entity",
        from = "Column::RuleId",
        to = "super::pricing_rule::Column::Id"
    )]
    PricingRule,
    /// Each association points to one partner
    #[sea_orm(
        belongs_to = "super::partner::Entity",
        from = "Column::PartnerId",
        to = "super::partner::Column::Id"
    )]
    Partner,
}

impl Related<super::pricing_rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PricingRule.def()
    }
}

impl Related<super::partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
