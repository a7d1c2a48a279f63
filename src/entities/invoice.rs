//! Invoice entity - One production engagement with one client.
//!
//! An invoice owns its line items and carries derived money fields that are
//! recomputed whenever an item or task changes - stale totals never survive a
//! mutation. A nullable `bill_id` links the invoice to the bill that
//! consolidated it, if any.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Production/billing status shared by invoices, invoice items, and tasks.
///
/// Main chain: `Draft -> InProduction -> Delivered -> Billed -> Paid`.
/// `Completed` is an early-close side branch, reachable from any pre-`Billed`
/// state and terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ProductionStatus {
    /// Engagement created, work not started
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Work underway
    #[sea_orm(string_value = "in_production")]
    InProduction,
    /// Deliverables handed over to the client
    #[sea_orm(string_value = "delivered")]
    Delivered,
    /// Consolidated into a bill awaiting payment
    #[sea_orm(string_value = "billed")]
    Billed,
    /// Payment confirmed
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Closed early without billing
    #[sea_orm(string_value = "completed")]
    Completed,
}

/// Invoice database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    /// Unique identifier for the invoice
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Client this engagement belongs to
    pub client_id: i64,
    /// Current lifecycle status
    pub status: ProductionStatus,
    /// Date the engagement was opened
    pub issue_date: Date,
    /// Date the deliverables were handed over, set on delivery
    pub delivery_date: Option<Date>,
    /// Where the deliverables were handed over (download/review URL)
    pub delivery_url: Option<String>,
    /// Sum of item amounts, before tax
    pub subtotal: f64,
    /// Flat-rate tax on the subtotal
    pub tax: f64,
    /// Subtotal plus tax
    pub total_amount: f64,
    /// Sum of outsourced task costs under this invoice
    pub total_cost: f64,
    /// Subtotal minus total cost
    pub profit: f64,
    /// Profit as a fraction of the subtotal (0 when subtotal is 0)
    pub profit_margin: f64,
    /// Bill that consolidated this invoice, None while unbilled
    pub bill_id: Option<i64>,
}

/// Defines relationships between Invoice and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each invoice belongs to one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    /// Each invoice may be consolidated into one bill
    #[sea_orm(
        belongs_to = "super::bill::Entity",
        from = "Column::BillId",
        to = "super::bill::Column::Id"
    )]
    Bill,
    /// One invoice has many line items
    #[sea_orm(has_many = "super::invoice_item::Entity")]
    Items,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::bill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bill.def()
    }
}

impl Related<super::invoice_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
