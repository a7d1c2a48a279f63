//! Client entity - Represents a customer commissioning production work.
//!
//! Clients own invoices and bills. Pricing rules can be scoped to specific
//! clients through the `rule_client` association table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    /// Unique identifier for the client
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Company or contact name
    pub name: String,
    /// Free-form note (billing contact, payment terms, etc.)
    pub note: Option<String>,
    /// Soft delete flag - if true, client is hidden but data is preserved
    pub is_deleted: bool,
}

/// Defines relationships between Client and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One client has many invoices
    #[sea_orm(has_many = "super::invoice::Entity")]
    Invoices,
    /// One client has many bills
    #[sea_orm(has_many = "super::bill::Entity")]
    Bills,
    /// One client can scope many pricing rules
    #[sea_orm(has_many = "super::rule_client::Entity")]
    RuleClients,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl Related<super::bill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bills.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
