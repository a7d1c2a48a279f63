//! Partner entity - Represents a freelancer or vendor performing outsourced work.
//!
//! Partners are assigned outsourced tasks and are paid according to the
//! pricing rules associated with them through the `rule_partner` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Partner database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partners")]
pub struct Model {
    /// Unique identifier for the partner
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Freelancer or vendor name
    pub name: String,
    /// Free-form note (specialty, contact, etc.)
    pub note: Option<String>,
    /// Soft delete flag - if true, partner is hidden but data is preserved
    pub is_deleted: bool,
}

/// Defines relationships between Partner and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One partner performs many outsourced tasks
    #[sea_orm(has_many = "super::task::Entity")]
    Tasks,
    /// One partner has many pricing-rule associations
    #[sea_orm(has_many = "super::rule_partner::Entity")]
    RulePartners,
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
