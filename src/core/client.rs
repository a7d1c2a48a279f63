//! Client business logic - Master data for customers commissioning work.

use crate::entities::{Client, client};
use crate::errors::{Error, Result};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates a new client, validating that the name is not empty.
pub async fn create_client(
    db: &DatabaseConnection,
    name: String,
    note: Option<String>,
) -> Result<client::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Client name cannot be empty".to_string(),
        });
    }

    let client = client::ActiveModel {
        name: Set(name.trim().to_string()),
        note: Set(note),
        is_deleted: Set(false),
        ..Default::default()
    };

    let result = client.insert(db).await?;
    Ok(result)
}

/// Finds an active client by its unique ID.
pub async fn get_client(db: &DatabaseConnection, client_id: i64) -> Result<Option<client::Model>> {
    Client::find_by_id(client_id)
        .filter(client::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all active (non-deleted) clients, ordered alphabetically by name.
pub async fn get_all_active_clients(db: &DatabaseConnection) -> Result<Vec<client::Model>> {
    Client::find()
        .filter(client::Column::IsDeleted.eq(false))
        .order_by_asc(client::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Soft-deletes a client. Historical invoices and bills keep referencing it.
pub async fn delete_client(db: &DatabaseConnection, client_id: i64) -> Result<()> {
    let client = Client::find_by_id(client_id)
        .one(db)
        .await?
        .ok_or(Error::ClientNotFound { id: client_id })?;

    let mut active: client::ActiveModel = client.into();
    active.is_deleted = Set(true);
    active.update(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_client_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_client(&db, "  ".to_string(), None).await;
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_get_client() -> Result<()> {
        let db = setup_test_db().await?;

        let client = create_client(&db, "Acme Media".to_string(), None).await?;
        assert_eq!(client.name, "Acme Media");
        assert!(!client.is_deleted);

        let found = get_client(&db, client.id).await?;
        assert_eq!(found.unwrap(), client);

        Ok(())
    }

    #[tokio::test]
    async fn test_soft_delete_hides_client() -> Result<()> {
        let db = setup_test_db().await?;

        let client = create_test_client(&db, "Acme Media").await?;
        delete_client(&db, client.id).await?;

        assert!(get_client(&db, client.id).await?.is_none());
        assert!(get_all_active_clients(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_active_clients_ordered_by_name() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_client(&db, "Beta Films").await?;
        create_test_client(&db, "Acme Media").await?;

        let clients = get_all_active_clients(&db).await?;
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].name, "Acme Media");
        assert_eq!(clients[1].name, "Beta Films");

        Ok(())
    }
}
