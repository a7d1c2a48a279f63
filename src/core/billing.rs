//! Billing state machine - Status orchestration across invoices, items,
//! tasks, and bills.
//!
//! The main chain is `Draft -> InProduction -> Delivered -> Billed -> Paid`,
//! with `Completed` as a terminal early-close branch. Consolidation pulls a
//! set of same-client, unbilled invoices under one bill; payment confirmation
//! cascades `Paid` three levels down. Every multi-entity mutation runs inside
//! one database transaction: either every status write lands or none do, and
//! a racing consolidation loses on the `bill_id` re-check inside the
//! transaction (first writer wins).

use crate::entities::{
    Bill, BillStatus, Client, Invoice, InvoiceItem, ProductionStatus, Task, bill, client, invoice,
    invoice_item, task,
};
use crate::errors::{Error, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::info;

/// Which invoices the unbilled query offers for consolidation.
///
/// Operationally, invoices have always been billable regardless of their
/// production status (early billing of in-production work is an accepted
/// exception), so `AnyStatus` is the default. `DeliveredOnly` restricts the
/// candidates to delivered work for shops that want the stricter policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnbilledPolicy {
    /// Any invoice without a bill is a candidate (default)
    AnyStatus,
    /// Only delivered invoices are candidates
    DeliveredOnly,
}

/// Retrieves the invoices eligible for consolidation: those not yet
/// referencing a bill, filtered by the configured policy.
pub async fn get_unbilled_invoices(
    db: &DatabaseConnection,
    policy: UnbilledPolicy,
) -> Result<Vec<invoice::Model>> {
    let mut query = Invoice::find().filter(invoice::Column::BillId.is_null());
    if policy == UnbilledPolicy::DeliveredOnly {
        query = query.filter(invoice::Column::Status.eq(ProductionStatus::Delivered));
    }
    query
        .order_by_asc(invoice::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Moves an invoice and its items into production.
pub async fn start_production(db: &DatabaseConnection, invoice_id: i64) -> Result<invoice::Model> {
    let txn = db.begin().await?;

    let invoice = Invoice::find_by_id(invoice_id)
        .one(&txn)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

    if matches!(
        invoice.status,
        ProductionStatus::Billed | ProductionStatus::Paid | ProductionStatus::Completed
    ) {
        return Err(Error::InvalidTransition {
            message: format!(
                "invoice {invoice_id} cannot re-enter production from {:?}",
                invoice.status
            ),
        });
    }

    let mut active: invoice::ActiveModel = invoice.into();
    active.status = Set(ProductionStatus::InProduction);
    let updated = active.update(&txn).await?;

    cascade_status(&txn, &[invoice_id], ProductionStatus::InProduction).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Marks an invoice as delivered. Both the delivery date and a non-empty
/// delivery URL are required; the invoice and its items move to `Delivered`,
/// tasks are untouched.
pub async fn deliver_invoice(
    db: &DatabaseConnection,
    invoice_id: i64,
    delivery_date: Date,
    delivery_url: &str,
) -> Result<invoice::Model> {
    if delivery_url.trim().is_empty() {
        return Err(Error::MissingDeliveryInfo { invoice_id });
    }

    let txn = db.begin().await?;

    let invoice = Invoice::find_by_id(invoice_id)
        .one(&txn)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

    let mut active: invoice::ActiveModel = invoice.into();
    active.status = Set(ProductionStatus::Delivered);
    active.delivery_date = Set(Some(delivery_date));
    active.delivery_url = Set(Some(delivery_url.trim().to_string()));
    let updated = active.update(&txn).await?;

    InvoiceItem::update_many()
        .col_expr(
            invoice_item::Column::ProductionStatus,
            Expr::value(ProductionStatus::Delivered),
        )
        .filter(invoice_item::Column::InvoiceId.eq(invoice_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(updated)
}

/// Records a partner's delivery on an outsourced task and marks it delivered.
pub async fn mark_task_delivered(
    db: &DatabaseConnection,
    task_id: i64,
    delivered_at: DateTimeUtc,
    delivery_url: Option<String>,
) -> Result<task::Model> {
    let task = Task::find_by_id(task_id)
        .one(db)
        .await?
        .ok_or(Error::TaskNotFound { id: task_id })?;

    let mut active: task::ActiveModel = task.into();
    active.status = Set(ProductionStatus::Delivered);
    active.delivered_at = Set(Some(delivered_at));
    active.delivery_url = Set(delivery_url);
    let updated = active.update(db).await?;
    Ok(updated)
}

/// Closes an invoice early without billing it. Terminal; rejected once the
/// invoice has been billed or paid.
pub async fn complete_invoice(db: &DatabaseConnection, invoice_id: i64) -> Result<invoice::Model> {
    let txn = db.begin().await?;

    let invoice = Invoice::find_by_id(invoice_id)
        .one(&txn)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

    if matches!(
        invoice.status,
        ProductionStatus::Billed | ProductionStatus::Paid
    ) {
        return Err(Error::InvalidTransition {
            message: format!("invoice {invoice_id} is already billed and cannot be closed early"),
        });
    }

    let mut active: invoice::ActiveModel = invoice.into();
    active.status = Set(ProductionStatus::Completed);
    let updated = active.update(&txn).await?;

    cascade_status(&txn, &[invoice_id], ProductionStatus::Completed).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Consolidates a set of unbilled, same-client invoices into a new bill.
///
/// All preconditions are checked inside the transaction: every invoice must
/// exist, belong to `client_id`, and have no bill yet. Any violation fails
/// the whole batch with no partial effect. On success the bill is issued with
/// the summed totals and `Billed` cascades to the invoices, their items, and
/// their tasks as one atomic unit.
#[allow(clippy::too_many_arguments)]
pub async fn create_consolidated_bill(
    db: &DatabaseConnection,
    client_id: i64,
    invoice_ids: &[i64],
    issue_date: Date,
    due_date: Date,
    subject: &str,
    notes: Option<String>,
) -> Result<bill::Model> {
    if invoice_ids.is_empty() {
        return Err(Error::Config {
            message: "A bill must consolidate at least one invoice".to_string(),
        });
    }

    let txn = db.begin().await?;

    Client::find_by_id(client_id)
        .filter(client::Column::IsDeleted.eq(false))
        .one(&txn)
        .await?
        .ok_or(Error::ClientNotFound { id: client_id })?;

    let mut total_amount = 0.0;
    let mut tax = 0.0;
    for &invoice_id in invoice_ids {
        let invoice = Invoice::find_by_id(invoice_id)
            .one(&txn)
            .await?
            .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

        if invoice.client_id != client_id {
            return Err(Error::ClientMismatch {
                invoice_id,
                expected: client_id,
                actual: invoice.client_id,
            });
        }
        if let Some(bill_id) = invoice.bill_id {
            // First writer wins: a racing consolidation already claimed it
            return Err(Error::AlreadyBilled {
                invoice_id,
                bill_id,
            });
        }

        total_amount += invoice.total_amount;
        tax += invoice.tax;
    }

    let bill = bill::ActiveModel {
        client_id: Set(client_id),
        subject: Set(subject.to_string()),
        notes: Set(notes),
        issue_date: Set(issue_date),
        due_date: Set(due_date),
        total_amount: Set(total_amount),
        tax: Set(tax),
        status: Set(BillStatus::Issued),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    Invoice::update_many()
        .col_expr(invoice::Column::BillId, Expr::value(Some(bill.id)))
        .col_expr(
            invoice::Column::Status,
            Expr::value(ProductionStatus::Billed),
        )
        .filter(invoice::Column::Id.is_in(invoice_ids.to_vec()))
        .exec(&txn)
        .await?;

    cascade_status(&txn, invoice_ids, ProductionStatus::Billed).await?;

    txn.commit().await?;
    info!(
        bill_id = bill.id,
        client_id,
        invoices = invoice_ids.len(),
        total_amount,
        "consolidated invoices into bill"
    );
    Ok(bill)
}

/// Updates a bill's payment status. Confirming payment cascades `Paid` to
/// every invoice currently referencing the bill, then to their items, then to
/// their tasks - the descendant set is re-read here, not taken from a
/// snapshot, so children added after issuance are never skipped. Idempotent.
pub async fn update_bill_status(
    db: &DatabaseConnection,
    bill_id: i64,
    status: BillStatus,
) -> Result<bill::Model> {
    let txn = db.begin().await?;

    let bill = Bill::find_by_id(bill_id)
        .one(&txn)
        .await?
        .ok_or(Error::BillNotFound { id: bill_id })?;

    let mut active: bill::ActiveModel = bill.into();
    active.status = Set(status);
    let updated = active.update(&txn).await?;

    if status == BillStatus::Paid {
        let invoice_ids: Vec<i64> = Invoice::find()
            .filter(invoice::Column::BillId.eq(bill_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|i| i.id)
            .collect();

        Invoice::update_many()
            .col_expr(invoice::Column::Status, Expr::value(ProductionStatus::Paid))
            .filter(invoice::Column::Id.is_in(invoice_ids.clone()))
            .exec(&txn)
            .await?;

        cascade_status(&txn, &invoice_ids, ProductionStatus::Paid).await?;
    }

    txn.commit().await?;
    info!(bill_id, ?status, "updated bill status");
    Ok(updated)
}

/// Finds a bill by its unique ID.
pub async fn get_bill(db: &DatabaseConnection, bill_id: i64) -> Result<Option<bill::Model>> {
    Bill::find_by_id(bill_id).one(db).await.map_err(Into::into)
}

/// Retrieves the invoices consolidated under a bill.
pub async fn invoices_for_bill(
    db: &DatabaseConnection,
    bill_id: i64,
) -> Result<Vec<invoice::Model>> {
    Invoice::find()
        .filter(invoice::Column::BillId.eq(bill_id))
        .order_by_asc(invoice::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a bill, reverting its member invoices to unbilled `Delivered` in
/// the same transaction - a deleted bill never leaves orphaned `Billed`
/// invoices behind.
pub async fn delete_bill(db: &DatabaseConnection, bill_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let bill = Bill::find_by_id(bill_id)
        .one(&txn)
        .await?
        .ok_or(Error::BillNotFound { id: bill_id })?;

    let invoice_ids: Vec<i64> = Invoice::find()
        .filter(invoice::Column::BillId.eq(bill_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|i| i.id)
        .collect();

    Invoice::update_many()
        .col_expr(invoice::Column::BillId, Expr::value(Option::<i64>::None))
        .col_expr(
            invoice::Column::Status,
            Expr::value(ProductionStatus::Delivered),
        )
        .filter(invoice::Column::Id.is_in(invoice_ids.clone()))
        .exec(&txn)
        .await?;

    cascade_status(&txn, &invoice_ids, ProductionStatus::Delivered).await?;

    bill.delete(&txn).await?;

    txn.commit().await?;
    info!(bill_id, "deleted bill and reverted member invoices");
    Ok(())
}

/// Cascades a status to all items under the given invoices and all tasks
/// under those items. The item and task sets are read at call time.
async fn cascade_status<C>(
    db: &C,
    invoice_ids: &[i64],
    status: ProductionStatus,
) -> Result<()>
where
    C: ConnectionTrait,
{
    if invoice_ids.is_empty() {
        return Ok(());
    }

    let item_ids: Vec<i64> = InvoiceItem::find()
        .filter(invoice_item::Column::InvoiceId.is_in(invoice_ids.to_vec()))
        .all(db)
        .await?
        .into_iter()
        .map(|i| i.id)
        .collect();

    InvoiceItem::update_many()
        .col_expr(invoice_item::Column::ProductionStatus, Expr::value(status))
        .filter(invoice_item::Column::InvoiceId.is_in(invoice_ids.to_vec()))
        .exec(db)
        .await?;

    if !item_ids.is_empty() {
        Task::update_many()
            .col_expr(task::Column::Status, Expr::value(status))
            .filter(task::Column::ItemId.is_in(item_ids))
            .exec(db)
            .await?;
    }

    Ok(())
}
