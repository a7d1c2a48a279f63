//! Invoice item entity - One billable line (e.g., one video deliverable).
//!
//! Items carry the raw duration string exactly as the operator entered it
//! ("mm:ss" or plain minutes); parsing happens in the pricing engine, which
//! treats unparseable input as zero.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::invoice::ProductionStatus;

/// Invoice item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Invoice this line belongs to
    pub invoice_id: i64,
    /// Deliverable name (e.g., "Product teaser 30s")
    pub name: String,
    /// Number of units billed
    pub quantity: f64,
    /// Price per unit
    pub unit_price: f64,
    /// Line amount: `unit_price * quantity`, or rule-computed
    pub amount: f64,
    /// Production status, mirrors the status of the item's tasks by convention
    pub production_status: ProductionStatus,
    /// Raw duration input ("mm:ss" or plain minutes), None when not duration-priced
    pub duration: Option<String>,
}

/// Defines relationships between `InvoiceItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one invoice
    #[sea_orm(
        belongs_to = "super::invoice::Entity",
        from = "Column::InvoiceId",
        to = "super::invoice::Column::Id"
    )]
    Invoice,
    /// One item has many outsourced tasks
    #[sea_orm(has_many = "super::task::Entity")]
    Tasks,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
