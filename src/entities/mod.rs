//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod bill;
pub mod client;
pub mod invoice;
pub mod invoice_item;
pub mod partner;
pub mod pricing_rule;
pub mod rule_client;
pub mod rule_partner;
pub mod task;

// Re-export specific types to avoid conflicts
pub use bill::{BillStatus, Column as BillColumn, Entity as Bill, Model as BillModel};
pub use client::{Column as ClientColumn, Entity as Client, Model as ClientModel};
pub use invoice::{
    Column as InvoiceColumn, Entity as Invoice, Model as InvoiceModel, ProductionStatus,
};
pub use invoice_item::{Column as InvoiceItemColumn, Entity as InvoiceItem, Model as InvoiceItemModel};
pub use partner::{Column as PartnerColumn, Entity as Partner, Model as PartnerModel};
pub use pricing_rule::{
    Column as PricingRuleColumn, Entity as PricingRule, Model as PricingRuleModel, RuleType,
};
pub use rule_client::{Column as RuleClientColumn, Entity as RuleClient, Model as RuleClientModel};
pub use rule_partner::{
    Column as RulePartnerColumn, Entity as RulePartner, Model as RulePartnerModel,
};
pub use task::{Column as TaskColumn, Entity as Task, Model as TaskModel};
