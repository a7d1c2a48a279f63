//! Invoice business logic - Invoice, item, and task lifecycle.
//!
//! An invoice is created with its items and outsourced tasks in one nested,
//! atomic insert; items and tasks can also be appended later. Task amounts are
//! computed at entry time: the revenue side from the task's own rule, the cost
//! side through the partner cost resolver. The derived money fields on the
//! invoice are recomputed inside the same transaction as every mutation, so
//! stale totals are never observable.

use crate::core::duration::DurationInput;
use crate::core::partner_cost::calculate_partner_cost;
use crate::core::pricing::{Side, calculate_price};
use crate::entities::{
    Client, Invoice, InvoiceItem, Partner, PricingRule, ProductionStatus, Task, client, invoice,
    invoice_item, partner, task,
};
use crate::errors::{Error, Result};
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};

/// Input for one outsourced task under a new invoice item.
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Partner performing the work
    pub partner_id: i64,
    /// Rule pricing the task's revenue side, None for unpriced tasks
    pub rule_id: Option<i64>,
    /// What the partner is asked to do
    pub description: String,
}

/// Input for one billable line on a new invoice.
#[derive(Debug, Clone)]
pub struct NewItem {
    /// Deliverable name
    pub name: String,
    /// Number of units billed
    pub quantity: f64,
    /// Price per unit, used when no rule is given
    pub unit_price: f64,
    /// Raw duration input ("mm:ss" or plain minutes)
    pub duration: Option<String>,
    /// Rule computing the line amount from the duration; when set it
    /// replaces `unit_price * quantity`
    pub rule_id: Option<i64>,
    /// Outsourced tasks under this line
    pub tasks: Vec<NewTask>,
}

/// Creates an invoice with its items and tasks in one atomic nested insert.
///
/// The invoice starts in `Draft` with zeroed money fields; totals are
/// recomputed from the inserted children before the transaction commits.
pub async fn create_invoice(
    db: &DatabaseConnection,
    client_id: i64,
    issue_date: Date,
    items: Vec<NewItem>,
    tax_rate: f64,
) -> Result<invoice::Model> {
    let txn = db.begin().await?;

    Client::find_by_id(client_id)
        .filter(client::Column::IsDeleted.eq(false))
        .one(&txn)
        .await?
        .ok_or(Error::ClientNotFound { id: client_id })?;

    let invoice = invoice::ActiveModel {
        client_id: Set(client_id),
        status: Set(ProductionStatus::Draft),
        issue_date: Set(issue_date),
        delivery_date: Set(None),
        delivery_url: Set(None),
        subtotal: Set(0.0),
        tax: Set(0.0),
        total_amount: Set(0.0),
        total_cost: Set(0.0),
        profit: Set(0.0),
        profit_margin: Set(0.0),
        bill_id: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for item in items {
        insert_item_tree(&txn, invoice.id, client_id, item).await?;
    }

    recompute_totals(&txn, invoice.id, tax_rate).await?;
    txn.commit().await?;

    Invoice::find_by_id(invoice.id)
        .one(db)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice.id })
}

/// Appends an item (with its tasks) to an existing invoice and recomputes
/// the invoice totals in the same transaction.
pub async fn add_item(
    db: &DatabaseConnection,
    invoice_id: i64,
    item: NewItem,
    tax_rate: f64,
) -> Result<invoice_item::Model> {
    let txn = db.begin().await?;

    let invoice = Invoice::find_by_id(invoice_id)
        .one(&txn)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

    let inserted = insert_item_tree(&txn, invoice.id, invoice.client_id, item).await?;
    recompute_totals(&txn, invoice.id, tax_rate).await?;

    txn.commit().await?;
    Ok(inserted)
}

/// Appends an outsourced task to an existing item and recomputes the parent
/// invoice totals in the same transaction.
pub async fn add_task(
    db: &DatabaseConnection,
    item_id: i64,
    new_task: NewTask,
    tax_rate: f64,
) -> Result<task::Model> {
    let txn = db.begin().await?;

    let item = InvoiceItem::find_by_id(item_id)
        .one(&txn)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;
    let invoice = Invoice::find_by_id(item.invoice_id)
        .one(&txn)
        .await?
        .ok_or(Error::InvoiceNotFound { id: item.invoice_id })?;

    let duration = item.duration.clone().map(DurationInput::from);
    let inserted = insert_task(
        &txn,
        item.id,
        invoice.client_id,
        duration.as_ref(),
        new_task,
    )
    .await?;
    recompute_totals(&txn, invoice.id, tax_rate).await?;

    txn.commit().await?;
    Ok(inserted)
}

async fn insert_item_tree<C>(
    db: &C,
    invoice_id: i64,
    client_id: i64,
    item: NewItem,
) -> Result<invoice_item::Model>
where
    C: ConnectionTrait,
{
    if item.quantity < 0.0 || !item.quantity.is_finite() {
        return Err(Error::InvalidAmount {
            amount: item.quantity,
        });
    }
    if item.unit_price < 0.0 || !item.unit_price.is_finite() {
        return Err(Error::InvalidAmount {
            amount: item.unit_price,
        });
    }

    let duration = item.duration.clone().map(DurationInput::from);

    let amount = match item.rule_id {
        Some(rule_id) => {
            let rule = PricingRule::find_by_id(rule_id)
                .one(db)
                .await?
                .ok_or(Error::RuleNotFound { id: rule_id })?;
            calculate_price(&rule, duration.as_ref(), Side::Revenue)
        }
        None => item.unit_price * item.quantity,
    };

    let inserted = invoice_item::ActiveModel {
        invoice_id: Set(invoice_id),
        name: Set(item.name),
        quantity: Set(item.quantity),
        unit_price: Set(item.unit_price),
        amount: Set(amount),
        production_status: Set(ProductionStatus::Draft),
        duration: Set(item.duration),
        ..Default::default()
    }
    .insert(db)
    .await?;

    for new_task in item.tasks {
        insert_task(db, inserted.id, client_id, duration.as_ref(), new_task).await?;
    }

    Ok(inserted)
}

async fn insert_task<C>(
    db: &C,
    item_id: i64,
    client_id: i64,
    duration: Option<&DurationInput>,
    new_task: NewTask,
) -> Result<task::Model>
where
    C: ConnectionTrait,
{
    Partner::find_by_id(new_task.partner_id)
        .filter(partner::Column::IsDeleted.eq(false))
        .one(db)
        .await?
        .ok_or(Error::PartnerNotFound {
            id: new_task.partner_id,
        })?;

    let revenue_amount = match new_task.rule_id {
        Some(rule_id) => {
            let rule = PricingRule::find_by_id(rule_id)
                .one(db)
                .await?
                .ok_or(Error::RuleNotFound { id: rule_id })?;
            calculate_price(&rule, duration, Side::Revenue)
        }
        None => 0.0,
    };

    let cost_amount =
        calculate_partner_cost(db, new_task.partner_id, Some(client_id), duration).await?;

    let inserted = task::ActiveModel {
        item_id: Set(item_id),
        partner_id: Set(new_task.partner_id),
        rule_id: Set(new_task.rule_id),
        description: Set(new_task.description),
        status: Set(ProductionStatus::Draft),
        revenue_amount: Set(revenue_amount),
        cost_amount: Set(cost_amount),
        delivered_at: Set(None),
        delivery_url: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(inserted)
}

/// Recomputes the derived money fields of an invoice from its current items
/// and tasks. Runs inside the caller's transaction so a mutation and its
/// recomputation land together.
pub async fn recompute_totals<C>(db: &C, invoice_id: i64, tax_rate: f64) -> Result<()>
where
    C: ConnectionTrait,
{
    let invoice = Invoice::find_by_id(invoice_id)
        .one(db)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

    let items = InvoiceItem::find()
        .filter(invoice_item::Column::InvoiceId.eq(invoice_id))
        .all(db)
        .await?;

    let subtotal: f64 = items.iter().map(|i| i.amount).sum();

    let item_ids: Vec<i64> = items.iter().map(|i| i.id).collect();
    let total_cost: f64 = if item_ids.is_empty() {
        0.0
    } else {
        Task::find()
            .filter(task::Column::ItemId.is_in(item_ids))
            .all(db)
            .await?
            .iter()
            .map(|t| t.cost_amount)
            .sum()
    };

    let tax = subtotal * tax_rate;
    let profit = subtotal - total_cost;
    let profit_margin = if subtotal > 0.0 { profit / subtotal } else { 0.0 };

    let mut active: invoice::ActiveModel = invoice.into();
    active.subtotal = Set(subtotal);
    active.tax = Set(tax);
    active.total_amount = Set(subtotal + tax);
    active.total_cost = Set(total_cost);
    active.profit = Set(profit);
    active.profit_margin = Set(profit_margin);
    active.update(db).await?;

    Ok(())
}

/// Finds an invoice by its unique ID.
pub async fn get_invoice(
    db: &DatabaseConnection,
    invoice_id: i64,
) -> Result<Option<invoice::Model>> {
    Invoice::find_by_id(invoice_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all invoices for a client, newest engagement first.
pub async fn list_invoices_for_client(
    db: &DatabaseConnection,
    client_id: i64,
) -> Result<Vec<invoice::Model>> {
    Invoice::find()
        .filter(invoice::Column::ClientId.eq(client_id))
        .order_by_desc(invoice::Column::IssueDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the items of an invoice.
pub async fn items_for_invoice(
    db: &DatabaseConnection,
    invoice_id: i64,
) -> Result<Vec<invoice_item::Model>> {
    InvoiceItem::find()
        .filter(invoice_item::Column::InvoiceId.eq(invoice_id))
        .order_by_asc(invoice_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes an invoice together with its items and tasks in one transaction.
pub async fn delete_invoice(db: &DatabaseConnection, invoice_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let invoice = Invoice::find_by_id(invoice_id)
        .one(&txn)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

    let item_ids: Vec<i64> = InvoiceItem::find()
        .filter(invoice_item::Column::InvoiceId.eq(invoice.id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|i| i.id)
        .collect();

    if !item_ids.is_empty() {
        Task::delete_many()
            .filter(task::Column::ItemId.is_in(item_ids))
            .exec(&txn)
            .await?;
    }
    InvoiceItem::delete_many()
        .filter(invoice_item::Column::InvoiceId.eq(invoice.id))
        .exec(&txn)
        .await?;
    invoice.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}
