//! Partner business logic - Master data for freelancers and vendors.

use crate::entities::{Partner, partner};
use crate::errors::{Error, Result};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates a new partner, validating that the name is not empty.
pub async fn create_partner(
    db: &DatabaseConnection,
    name: String,
    note: Option<String>,
) -> Result<partner::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Partner name cannot be empty".to_string(),
        });
    }

    let partner = partner::ActiveModel {
        name: Set(name.trim().to_string()),
        note: Set(note),
        is_deleted: Set(false),
        ..Default::default()
    };

    let result = partner.insert(db).await?;
    Ok(result)
}

/// Finds an active partner by its unique ID.
pub async fn get_partner(
    db: &DatabaseConnection,
    partner_id: i64,
) -> Result<Option<partner::Model>> {
    Partner::find_by_id(partner_id)
        .filter(partner::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all active (non-deleted) partners, ordered alphabetically by name.
pub async fn get_all_active_partners(db: &DatabaseConnection) -> Result<Vec<partner::Model>> {
    Partner::find()
        .filter(partner::Column::IsDeleted.eq(false))
        .order_by_asc(partner::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Soft-deletes a partner. Historical tasks keep referencing it.
pub async fn delete_partner(db: &DatabaseConnection, partner_id: i64) -> Result<()> {
    let partner = Partner::find_by_id(partner_id)
        .one(db)
        .await?
        .ok_or(Error::PartnerNotFound { id: partner_id })?;

    let mut active: partner::ActiveModel = partner.into();
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
    async fn test_create_partner_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_partner(&db, String::new(), None).await;
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_soft_delete_partner() -> Result<()> {
        let db = setup_test_db().await?;

        let partner = create_partner(
            &db,
            "Jane Editor".to_string(),
            Some("Color grading specialist".to_string()),
        )
        .await?;
        assert_eq!(partner.name, "Jane Editor");

        delete_partner(&db, partner.id).await?;
        assert!(get_partner(&db, partner.id).await?.is_none());
        assert!(get_all_active_partners(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_partner_fails() -> Result<()> {
        let db = setup_test_db().await?;

        let result = delete_partner(&db, 999).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::PartnerNotFound { id: 999 }
        ));

        Ok(())
    }
}
