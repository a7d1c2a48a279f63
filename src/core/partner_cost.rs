//! Partner cost resolution - Picks which pricing rule pays a partner for a job.
//!
//! A partner can carry several pricing rules. A rule scoped to the client of
//! the job at hand (via `rule_clients`) beats a generic rule with no client
//! scoping; within each tier, assignment order decides. A partner with no
//! applicable rule resolves to a cost of zero, not an error.

use crate::core::duration::DurationInput;
use crate::core::pricing::{Side, calculate_price};
use crate::core::rule::rules_for_partner;
use crate::entities::{RuleClient, rule_client};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, prelude::*};

/// Resolves the cost side of a job for a partner.
///
/// Selection is two-tier: the first of the partner's rules whose client
/// associations contain `client_id` wins; failing that, the first rule with no
/// client associations at all (a generic rule); failing that, `0.0`. The
/// chosen rule is evaluated with [`Side::Cost`].
pub async fn calculate_partner_cost<C>(
    db: &C,
    partner_id: i64,
    client_id: Option<i64>,
    duration: Option<&DurationInput>,
) -> Result<f64>
where
    C: ConnectionTrait,
{
    let rules = rules_for_partner(db, partner_id).await?;
    if rules.is_empty() {
        return Ok(0.0);
    }

    let mut client_sets = Vec::with_capacity(rules.len());
    for rule in &rules {
        let associations = RuleClient::find()
            .filter(rule_client::Column::RuleId.eq(rule.id))
            .all(db)
            .await?;
        client_sets.push(
            associations
                .into_iter()
                .map(|a| a.client_id)
                .collect::<Vec<_>>(),
        );
    }

    // Tier 1: client-specific override
    if let Some(client_id) = client_id {
        for (rule, clients) in rules.iter().zip(&client_sets) {
            if clients.contains(&client_id) {
                return Ok(calculate_price(rule, duration, Side::Cost));
            }
        }
    }

    // Tier 2: first generic rule (no client scoping)
    for (rule, clients) in rules.iter().zip(&client_sets) {
        if clients.is_empty() {
            return Ok(calculate_price(rule, duration, Side::Cost));
        }
    }

    Ok(0.0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::rule::{assign_rule_to_client, assign_rule_to_partner, create_rule, NewRule};
    use crate::entities::RuleType;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_client_specific_rule_beats_generic() -> Result<()> {
        let db = setup_test_db().await?;
        let client_x = create_test_client(&db, "Client X").await?;
        let partner = create_test_partner(&db, "Editor A").await?;

        let specific = create_rule(
            &db,
            NewRule {
                name: "Client X override".to_string(),
                rule_type: RuleType::Fixed,
                fixed_cost: Some(8000.0),
                ..NewRule::default()
            },
        )
        .await?;
        assign_rule_to_client(&db, specific.id, client_x.id).await?;
        assign_rule_to_partner(&db, specific.id, partner.id).await?;

        let generic = create_rule(
            &db,
            NewRule {
                name: "Generic rate".to_string(),
                rule_type: RuleType::Fixed,
                fixed_cost: Some(5000.0),
                ..NewRule::default()
            },
        )
        .await?;
        assign_rule_to_partner(&db, generic.id, partner.id).await?;

        let cost = calculate_partner_cost(&db, partner.id, Some(client_x.id), None).await?;
        assert_eq!(cost, 8000.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_unmatched_client_falls_back_to_generic() -> Result<()> {
        let db = setup_test_db().await?;
        let client_x = create_test_client(&db, "Client X").await?;
        let client_y = create_test_client(&db, "Client Y").await?;
        let partner = create_test_partner(&db, "Editor A").await?;

        let specific = create_rule(
            &db,
            NewRule {
                name: "Client X override".to_string(),
                rule_type: RuleType::Fixed,
                fixed_cost: Some(8000.0),
                ..NewRule::default()
            },
        )
        .await?;
        assign_rule_to_client(&db, specific.id, client_x.id).await?;
        assign_rule_to_partner(&db, specific.id, partner.id).await?;

        let generic = create_rule(
            &db,
            NewRule {
                name: "Generic rate".to_string(),
                rule_type: RuleType::Fixed,
                fixed_cost: Some(5000.0),
                ..NewRule::default()
            },
        )
        .await?;
        assign_rule_to_partner(&db, generic.id, partner.id).await?;

        let cost = calculate_partner_cost(&db, partner.id, Some(client_y.id), None).await?;
        assert_eq!(cost, 5000.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_absent_client_resolves_via_generic() -> Result<()> {
        let db = setup_test_db().await?;
        let partner = create_test_partner(&db, "Editor A").await?;

        let generic = create_rule(
            &db,
            NewRule {
                name: "Generic rate".to_string(),
                rule_type: RuleType::Fixed,
                fixed_cost: Some(5000.0),
                ..NewRule::default()
            },
        )
        .await?;
        assign_rule_to_partner(&db, generic.id, partner.id).await?;

        let cost = calculate_partner_cost(&db, partner.id, None, None).await?;
        assert_eq!(cost, 5000.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_no_rules_resolves_to_zero() -> Result<()> {
        let db = setup_test_db().await?;
        let partner = create_test_partner(&db, "Editor A").await?;

        let cost = calculate_partner_cost(&db, partner.id, Some(42), None).await?;
        assert_eq!(cost, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_only_scoped_rules_and_no_match_is_zero() -> Result<()> {
        let db = setup_test_db().await?;
        let client_x = create_test_client(&db, "Client X").await?;
        let client_y = create_test_client(&db, "Client Y").await?;
        let partner = create_test_partner(&db, "Editor A").await?;

        let specific = create_rule(
            &db,
            NewRule {
                name: "Client X override".to_string(),
                rule_type: RuleType::Fixed,
                fixed_cost: Some(8000.0),
                ..NewRule::default()
            },
        )
        .await?;
        assign_rule_to_client(&db, specific.id, client_x.id).await?;
        assign_rule_to_partner(&db, specific.id, partner.id).await?;

        let cost = calculate_partner_cost(&db, partner.id, Some(client_y.id), None).await?;
        assert_eq!(cost, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_assignment_order_breaks_ties() -> Result<()> {
        let db = setup_test_db().await?;
        let partner = create_test_partner(&db, "Editor A").await?;

        let first = create_rule(
            &db,
            NewRule {
                name: "First generic".to_string(),
                rule_type: RuleType::Fixed,
                fixed_cost: Some(4000.0),
                ..NewRule::default()
            },
        )
        .await?;
        assign_rule_to_partner(&db, first.id, partner.id).await?;

        let second = create_rule(
            &db,
            NewRule {
                name: "Second generic".to_string(),
                rule_type: RuleType::Fixed,
                fixed_cost: Some(6000.0),
                ..NewRule::default()
            },
        )
        .await?;
        assign_rule_to_partner(&db, second.id, partner.id).await?;

        let cost = calculate_partner_cost(&db, partner.id, None, None).await?;
        assert_eq!(cost, 4000.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_cost_uses_duration() -> Result<()> {
        let db = setup_test_db().await?;
        let partner = create_test_partner(&db, "Editor A").await?;

        let rule = create_rule(
            &db,
            NewRule {
                name: "Stepped cost".to_string(),
                rule_type: RuleType::Stepped,
                cost_steps: Some(serde_json::json!([
                    {"up_to_minutes": 5.0, "price": 20000.0},
                    {"up_to_minutes": 10.0, "price": 35000.0},
                ])),
                ..NewRule::default()
            },
        )
        .await?;
        assign_rule_to_partner(&db, rule.id, partner.id).await?;

        let short = calculate_partner_cost(&db, partner.id, None, Some(&"2:30".into())).await?;
        let long = calculate_partner_cost(&db, partner.id, None, Some(&8.0.into())).await?;
        assert_eq!(short, 20000.0);
        assert_eq!(long, 35000.0);

        Ok(())
    }
}
