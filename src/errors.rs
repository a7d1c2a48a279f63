//! Unified error types for `studio-billing`.
//!
//! Malformed pricing input (bad duration strings, bad step-list JSON) is never
//! an error — the pricing engine degrades to zero instead. Errors here are
//! configuration problems, lookup failures, billing precondition violations,
//! and database failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Client not found: {id}")]
    ClientNotFound { id: i64 },

    #[error("Partner not found: {id}")]
    PartnerNotFound { id: i64 },

    #[error("Pricing rule not found: {id}")]
    RuleNotFound { id: i64 },

    #[error("Invoice not found: {id}")]
    InvoiceNotFound { id: i64 },

    #[error("Invoice item not found: {id}")]
    ItemNotFound { id: i64 },

    #[error("Task not found: {id}")]
    TaskNotFound { id: i64 },

    #[error("Bill not found: {id}")]
    BillNotFound { id: i64 },

    #[error("Invoice {invoice_id} is already consolidated into bill {bill_id}")]
    AlreadyBilled { invoice_id: i64, bill_id: i64 },

    #[error("Invoice {invoice_id} belongs to client {actual}, not client {expected}")]
    ClientMismatch {
        invoice_id: i64,
        expected: i64,
        actual: i64,
    },

    #[error("Invoice {invoice_id} is missing delivery date or delivery URL")]
    MissingDeliveryInfo { invoice_id: i64 },

    #[error("Invalid status transition: {message}")]
    InvalidTransition { message: String },

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: f64 },
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
