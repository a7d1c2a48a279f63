//! Rule-client association - Scopes a pricing rule to a specific client.
//!
//! A rule with one or more rows here is a client-specific override; a rule
//! with no rows is a generic rule applicable to any client.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Rule-client association database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rule_clients")]
pub struct Model {
    /// Unique identifier for the association
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Pricing rule being scoped
    pub rule_id: i64,
    /// Client the rule is scoped to
    pub client_id: i64,
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
    /// Each association points to one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
}

impl Related<super::pricing_rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PricingRule.def()
    }
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
