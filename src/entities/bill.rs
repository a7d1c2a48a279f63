//! Bill entity - A payment-collection consolidation of same-client invoices.
//!
//! A bill holds a non-owning reference to its member invoices (each invoice
//! points back via `bill_id`). Deleting a bill reverts its members to
//! unbilled; it never orphans their billed status.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment status of a bill
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum BillStatus {
    /// Raised and sent for collection
    #[sea_orm(string_value = "issued")]
    Issued,
    /// Payment confirmed
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Bill database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bills")]
pub struct Model {
    /// Unique identifier for the bill
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Client being billed; all member invoices belong to this client
    pub client_id: i64,
    /// Subject line shown on the bill
    pub subject: String,
    /// Free-form notes
    pub notes: Option<String>,
    /// Date the bill was raised
    pub issue_date: Date,
    /// Payment due date
    pub due_date: Date,
    /// Sum of member invoice totals
    pub total_amount: f64,
    /// Sum of member invoice tax amounts
    pub tax: f64,
    /// Current payment status
    pub status: BillStatus,
}

/// Defines relationships between Bill and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each bill belongs to one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    /// One bill consolidates many invoices
    #[sea_orm(has_many = "super::invoice::Entity")]
    Invoices,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
