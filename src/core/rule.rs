//! Pricing rule business logic - Master data for rules and their scoping.
//!
//! Rules are created by operators, optionally scoped to clients (making them
//! client-specific overrides) and associated with partners in a deterministic
//! order. Rules referenced by historical invoices are never physically
//! deleted, so a rule with empty association lists is a normal state.

use crate::entities::{
    PricingRule, RuleClient, RulePartner, RuleType, pricing_rule, rule_client, rule_partner,
};
use crate::errors::{Error, Result};
use sea_orm::{ConnectionTrait, DatabaseConnection, QueryOrder, Set, prelude::*};

/// Input for creating a pricing rule. Only the fields of the chosen
/// `rule_type` are meaningful; the rest are stored but ignored.
#[derive(Debug, Clone)]
pub struct NewRule {
    /// Human-readable rule name
    pub name: String,
    /// Pricing model the rule follows
    pub rule_type: RuleType,
    /// Flat revenue amount (`fixed` rules)
    pub fixed_price: Option<f64>,
    /// Flat cost amount (`fixed` rules)
    pub fixed_cost: Option<f64>,
    /// Revenue-side step list (native JSON array or encoded string)
    pub revenue_steps: Option<Json>,
    /// Cost-side step list
    pub cost_steps: Option<Json>,
    /// Revenue-side increment threshold in minutes
    pub increment_threshold: Option<f64>,
    /// Revenue-side unit size in minutes
    pub incremental_unit: Option<f64>,
    /// Revenue-side price per started unit
    pub incremental_unit_price: Option<f64>,
    /// Cost-side increment threshold in minutes
    pub incremental_cost_threshold: Option<f64>,
    /// Cost-side unit size in minutes
    pub incremental_cost_unit: Option<f64>,
    /// Cost-side price per started unit
    pub incremental_cost_unit_price: Option<f64>,
}

impl Default for NewRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            rule_type: RuleType::Fixed,
            fixed_price: None,
            fixed_cost: None,
            revenue_steps: None,
            cost_steps: None,
            increment_threshold: None,
            incremental_unit: None,
            incremental_unit_price: None,
            incremental_cost_threshold: None,
            incremental_cost_unit: None,
            incremental_cost_unit_price: None,
        }
    }
}

/// Creates a new pricing rule, validating that the name is not empty.
pub async fn create_rule(db: &DatabaseConnection, new_rule: NewRule) -> Result<pricing_rule::Model> {
    if new_rule.name.trim().is_empty() {
        return Err(Error::Config {
            message: "Pricing rule name cannot be empty".to_string(),
        });
    }

    let rule = pricing_rule::ActiveModel {
        name: Set(new_rule.name.trim().to_string()),
        rule_type: Set(new_rule.rule_type),
        fixed_price: Set(new_rule.fixed_price),
        fixed_cost: Set(new_rule.fixed_cost),
        revenue_steps: Set(new_rule.revenue_steps),
        cost_steps: Set(new_rule.cost_steps),
        increment_threshold: Set(new_rule.increment_threshold),
        incremental_unit: Set(new_rule.incremental_unit),
        incremental_unit_price: Set(new_rule.incremental_unit_price),
        incremental_cost_threshold: Set(new_rule.incremental_cost_threshold),
        incremental_cost_unit: Set(new_rule.incremental_cost_unit),
        incremental_cost_unit_price: Set(new_rule.incremental_cost_unit_price),
        ..Default::default()
    };

    let result = rule.insert(db).await?;
    Ok(result)
}

/// Replaces a rule's parameters wholesale. The rule keeps its ID, so
/// historical tasks referencing it are re-priced only if re-entered.
pub async fn update_rule(
    db: &DatabaseConnection,
    rule_id: i64,
    new_rule: NewRule,
) -> Result<pricing_rule::Model> {
    if new_rule.name.trim().is_empty() {
        return Err(Error::Config {
            message: "Pricing rule name cannot be empty".to_string(),
        });
    }

    let rule = PricingRule::find_by_id(rule_id)
        .one(db)
        .await?
        .ok_or(Error::RuleNotFound { id: rule_id })?;

    let mut active: pricing_rule::ActiveModel = rule.into();
    active.name = Set(new_rule.name.trim().to_string());
    active.rule_type = Set(new_rule.rule_type);
    active.fixed_price = Set(new_rule.fixed_price);
    active.fixed_cost = Set(new_rule.fixed_cost);
    active.revenue_steps = Set(new_rule.revenue_steps);
    active.cost_steps = Set(new_rule.cost_steps);
    active.increment_threshold = Set(new_rule.increment_threshold);
    active.incremental_unit = Set(new_rule.incremental_unit);
    active.incremental_unit_price = Set(new_rule.incremental_unit_price);
    active.incremental_cost_threshold = Set(new_rule.incremental_cost_threshold);
    active.incremental_cost_unit = Set(new_rule.incremental_cost_unit);
    active.incremental_cost_unit_price = Set(new_rule.incremental_cost_unit_price);

    let result = active.update(db).await?;
    Ok(result)
}

/// Finds a pricing rule by its unique ID.
pub async fn get_rule(db: &DatabaseConnection, rule_id: i64) -> Result<Option<pricing_rule::Model>> {
    PricingRule::find_by_id(rule_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all pricing rules ordered alphabetically by name.
pub async fn list_rules(db: &DatabaseConnection) -> Result<Vec<pricing_rule::Model>> {
    PricingRule::find()
        .order_by_asc(pricing_rule::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Scopes a rule to a client, turning it into a client-specific override
/// for partners carrying it.
pub async fn assign_rule_to_client(
    db: &DatabaseConnection,
    rule_id: i64,
    client_id: i64,
) -> Result<rule_client::Model> {
    PricingRule::find_by_id(rule_id)
        .one(db)
        .await?
        .ok_or(Error::RuleNotFound { id: rule_id })?;

    let association = rule_client::ActiveModel {
        rule_id: Set(rule_id),
        client_id: Set(client_id),
        ..Default::default()
    };

    let result = association.insert(db).await?;
    Ok(result)
}

/// Associates a rule with a partner, appending it at the end of the partner's
/// rule list. Assignment order is what makes "the first matching rule"
/// deterministic during cost resolution.
pub async fn assign_rule_to_partner(
    db: &DatabaseConnection,
    rule_id: i64,
    partner_id: i64,
) -> Result<rule_partner::Model> {
    PricingRule::find_by_id(rule_id)
        .one(db)
        .await?
        .ok_or(Error::RuleNotFound { id: rule_id })?;

    let existing = RulePartner::find()
        .filter(rule_partner::Column::PartnerId.eq(partner_id))
        .all(db)
        .await?
        .len();

    let association = rule_partner::ActiveModel {
        rule_id: Set(rule_id),
        partner_id: Set(partner_id),
        position: Set(i32::try_from(existing).unwrap_or(i32::MAX)),
        ..Default::default()
    };

    let result = association.insert(db).await?;
    Ok(result)
}

/// Retrieves a partner's pricing rules in assignment order.
pub async fn rules_for_partner<C>(db: &C, partner_id: i64) -> Result<Vec<pricing_rule::Model>>
where
    C: ConnectionTrait,
{
    let associations = RulePartner::find()
        .filter(rule_partner::Column::PartnerId.eq(partner_id))
        .order_by_asc(rule_partner::Column::Position)
        .all(db)
        .await?;

    let mut rules = Vec::with_capacity(associations.len());
    for association in associations {
        if let Some(rule) = PricingRule::find_by_id(association.rule_id).one(db).await? {
            rules.push(rule);
        }
    }

    Ok(rules)
}

/// Retrieves the IDs of the clients a rule is scoped to. An empty result
/// means the rule is generic.
pub async fn clients_for_rule(db: &DatabaseConnection, rule_id: i64) -> Result<Vec<i64>> {
    let associations = RuleClient::find()
        .filter(rule_client::Column::RuleId.eq(rule_id))
        .all(db)
        .await?;

    Ok(associations.into_iter().map(|a| a.client_id).collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_rule_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_rule(
            &db,
            NewRule {
                name: "   ".to_string(),
                ..NewRule::default()
            },
        )
        .await;
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_rule_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let rule = create_rule(
            &db,
            NewRule {
                name: "Short-form standard".to_string(),
                rule_type: RuleType::Stepped,
                revenue_steps: Some(serde_json::json!([
                    {"up_to_minutes": 5.0, "price": 50000.0},
                ])),
                ..NewRule::default()
            },
        )
        .await?;

        assert_eq!(rule.name, "Short-form standard");
        assert_eq!(rule.rule_type, RuleType::Stepped);
        assert!(rule.fixed_price.is_none());

        let found = get_rule(&db, rule.id).await?;
        assert_eq!(found.unwrap(), rule);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_rule_replaces_parameters() -> Result<()> {
        let db = setup_test_db().await?;

        let rule = create_test_fixed_rule(&db, "Old rate", 1000.0, 500.0).await?;
        let updated = update_rule(
            &db,
            rule.id,
            NewRule {
                name: "New rate".to_string(),
                rule_type: RuleType::Fixed,
                fixed_price: Some(2000.0),
                ..NewRule::default()
            },
        )
        .await?;

        assert_eq!(updated.id, rule.id);
        assert_eq!(updated.name, "New rate");
        assert_eq!(updated.fixed_price, Some(2000.0));
        // Fields not carried over are cleared, not merged
        assert!(updated.fixed_cost.is_none());

        let missing = update_rule(&db, 999, NewRule {
            name: "x".to_string(),
            ..NewRule::default()
        })
        .await;
        assert!(matches!(
            missing.unwrap_err(),
            Error::RuleNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_rules_ordered_by_name() -> Result<()> {
        let db = setup_test_db().await?;

        create_rule(
            &db,
            NewRule {
                name: "Zeta rate".to_string(),
                ..NewRule::default()
            },
        )
        .await?;
        create_rule(
            &db,
            NewRule {
                name: "Alpha rate".to_string(),
                ..NewRule::default()
            },
        )
        .await?;

        let rules = list_rules(&db).await?;
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].name, "Alpha rate");
        assert_eq!(rules[1].name, "Zeta rate");

        Ok(())
    }

    #[tokio::test]
    async fn test_assign_rule_to_missing_rule_fails() -> Result<()> {
        let db = setup_test_db().await?;

        let result = assign_rule_to_client(&db, 999, 1).await;
        assert!(matches!(result.unwrap_err(), Error::RuleNotFound { id: 999 }));

        let result = assign_rule_to_partner(&db, 999, 1).await;
        assert!(matches!(result.unwrap_err(), Error::RuleNotFound { id: 999 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_partner_assignment_positions_increment() -> Result<()> {
        let db = setup_test_db().await?;
        let partner = create_test_partner(&db, "Editor A").await?;

        let rule_a = create_test_fixed_rule(&db, "Rate A", 1000.0, 500.0).await?;
        let rule_b = create_test_fixed_rule(&db, "Rate B", 2000.0, 900.0).await?;

        let first = assign_rule_to_partner(&db, rule_a.id, partner.id).await?;
        let second = assign_rule_to_partner(&db, rule_b.id, partner.id).await?;
        assert_eq!(first.position, 0);
        assert_eq!(second.position, 1);

        let rules = rules_for_partner(&db, partner.id).await?;
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].id, rule_a.id);
        assert_eq!(rules[1].id, rule_b.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_clients_for_rule_empty_means_generic() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Client X").await?;
        let rule = create_test_fixed_rule(&db, "Rate A", 1000.0, 500.0).await?;

        assert!(clients_for_rule(&db, rule.id).await?.is_empty());

        assign_rule_to_client(&db, rule.id, client.id).await?;
        assert_eq!(clients_for_rule(&db, rule.id).await?, vec![client.id]);

        Ok(())
    }
}
