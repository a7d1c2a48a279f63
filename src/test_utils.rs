//! Shared test utilities for `studio-billing`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::core::invoice::{NewItem, NewTask, create_invoice};
use crate::core::rule::{NewRule, create_rule};
use crate::core::{client, partner};
use crate::entities::{self, RuleType};
use crate::errors::Result;
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Flat tax rate used throughout the tests.
pub const TEST_TAX_RATE: f64 = 0.10;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A fixed issue date for deterministic tests.
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
}

/// A fixed due date one month after [`test_date`].
pub fn test_due_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

/// Creates a test client with the given name.
pub async fn create_test_client(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::client::Model> {
    client::create_client(db, name.to_string(), None).await
}

/// Creates a test partner with the given name.
pub async fn create_test_partner(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::partner::Model> {
    partner::create_partner(db, name.to_string(), None).await
}

/// Creates a fixed-price rule with the given revenue and cost amounts.
pub async fn create_test_fixed_rule(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
    cost: f64,
) -> Result<entities::pricing_rule::Model> {
    create_rule(
        db,
        NewRule {
            name: name.to_string(),
            rule_type: RuleType::Fixed,
            fixed_price: Some(price),
            fixed_cost: Some(cost),
            ..NewRule::default()
        },
    )
    .await
}

/// Creates a test invoice with a single 100000-yen line and no tasks.
pub async fn create_test_invoice(
    db: &DatabaseConnection,
    client_id: i64,
) -> Result<entities::invoice::Model> {
    create_invoice(
        db,
        client_id,
        test_date(),
        vec![NewItem {
            name: "Test Deliverable".to_string(),
            quantity: 1.0,
            unit_price: 100000.0,
            duration: None,
            rule_id: None,
            tasks: Vec::new(),
        }],
        TEST_TAX_RATE,
    )
    .await
}

/// Creates a test invoice with `item_count` lines of 10000 yen each and
/// `tasks_per_item` outsourced tasks on every line, all assigned to the
/// given partner without a pricing rule.
pub async fn create_test_invoice_with_tasks(
    db: &DatabaseConnection,
    client_id: i64,
    partner_id: i64,
    item_count: usize,
    tasks_per_item: usize,
) -> Result<entities::invoice::Model> {
    let items = (0..item_count)
        .map(|i| NewItem {
            name: format!("Deliverable {i}"),
            quantity: 1.0,
            unit_price: 10000.0,
            duration: None,
            rule_id: None,
            tasks: (0..tasks_per_item)
                .map(|t| NewTask {
                    partner_id,
                    rule_id: None,
                    description: format!("task {t}"),
                })
                .collect(),
        })
        .collect();

    create_invoice(db, client_id, test_date(), items, TEST_TAX_RATE).await
}

/// Sets up a complete test environment with a client and one invoice.
/// Returns (db, client, invoice) for common test scenarios.
pub async fn setup_with_invoice() -> Result<(
    DatabaseConnection,
    entities::client::Model,
    entities::invoice::Model,
)> {
    let db = setup_test_db().await?;
    let client = create_test_client(&db, "Test Client").await?;
    let invoice = create_test_invoice(&db, client.id).await?;
    Ok((db, client, invoice))
}
