//! Database configuration module for `studio-billing`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary
//! tables based on the entity definitions. The module uses `SeaORM`'s
//! `Schema::create_table_from_entity` method to automatically generate SQL statements from
//! the entity models, ensuring that the database schema matches the Rust struct definitions
//! without requiring manual SQL.

use crate::entities::{
    Bill, Client, Invoice, InvoiceItem, Partner, PricingRule, RuleClient, RulePartner, Task,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/studio_billing.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
/// The connection is always passed down to the core modules explicitly; nothing in
/// this crate holds it as ambient global state.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url())
        .await
        .map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// This function uses the `DeriveEntityModel` macros to automatically generate proper SQL
/// statements for table creation, ensuring the database schema matches the Rust struct
/// definitions. It creates tables for clients, partners, pricing rules and their
/// associations, invoices, invoice items, tasks, and bills.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    db.execute(builder.build(&schema.create_table_from_entity(Client)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Partner)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(PricingRule)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(RuleClient)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(RulePartner)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Bill)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Invoice)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(InvoiceItem)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Task)))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{BillModel, ClientModel, InvoiceModel, TaskModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_connection() -> Result<()> {
        // Use in-memory database for testing to avoid schema conflicts with existing database
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that we can execute a query to verify the connection is working
        let _: Vec<ClientModel> = Client::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<ClientModel> = Client::find().limit(1).all(&db).await?;
        let _: Vec<InvoiceModel> = Invoice::find().limit(1).all(&db).await?;
        let _: Vec<TaskModel> = Task::find().limit(1).all(&db).await?;
        let _: Vec<BillModel> = Bill::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[test]
    fn test_get_database_url_default() {
        // Only meaningful when DATABASE_URL is not set in the environment
        if std::env::var("DATABASE_URL").is_err() {
            assert!(get_database_url().starts_with("sqlite://"));
        }
    }
}
