//! Pricing engine - Turns a pricing rule and a duration into a currency amount.
//!
//! Pure computation over a `pricing_rule::Model`; no database access and no
//! shared state, safe to call from a tight loop or from concurrent callers.
//! Malformed step-list JSON degrades to an empty list and unparseable
//! durations degrade to zero - pricing never fails, it undercounts to zero.

use crate::core::duration::{DurationInput, parse_duration};
use crate::entities::{RuleType, pricing_rule};
use sea_orm::JsonValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Which side of a rule to evaluate: what the client is charged or what the
/// partner is paid. Field selection is an exhaustive match, not a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Amount billed to the client
    Revenue,
    /// Amount paid to the partner
    Cost,
}

/// One price tier: applies to durations up to (and including) its bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStep {
    /// Upper duration bound of this tier, in fractional minutes
    #[serde(alias = "upToMinutes")]
    pub up_to_minutes: f64,
    /// Price charged when this tier matches
    pub price: f64,
}

/// The parameters of one side of a rule, selected exhaustively.
struct SideParams<'a> {
    fixed: Option<f64>,
    steps: Option<&'a JsonValue>,
    threshold: Option<f64>,
    unit: Option<f64>,
    unit_price: Option<f64>,
}

fn side_params(rule: &pricing_rule::Model, side: Side) -> SideParams<'_> {
    match side {
        Side::Revenue => SideParams {
            fixed: rule.fixed_price,
            steps: rule.revenue_steps.as_ref(),
            threshold: rule.increment_threshold,
            unit: rule.incremental_unit,
            unit_price: rule.incremental_unit_price,
        },
        Side::Cost => SideParams {
            fixed: rule.fixed_cost,
            steps: rule.cost_steps.as_ref(),
            threshold: rule.incremental_cost_threshold,
            unit: rule.incremental_cost_unit,
            unit_price: rule.incremental_cost_unit_price,
        },
    }
}

/// Normalizes a persisted step list into structured steps.
///
/// Imported data carries step lists either as a native JSON array or as a JSON
/// string containing an encoded array; both are accepted here so the engine
/// below never branches on representation. Malformed JSON yields an empty
/// list, never an error.
#[must_use]
pub fn parse_steps(raw: Option<&JsonValue>) -> Vec<PriceStep> {
    match raw {
        None => Vec::new(),
        Some(JsonValue::String(encoded)) => serde_json::from_str(encoded).unwrap_or_default(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_default(),
    }
}

/// Computes the price of one side of a rule for a given duration.
///
/// * `Fixed` rules return their flat amount regardless of duration (`0.0`
///   when unset).
/// * `Stepped`/`Linear` rules sort their steps ascending by bound (stable, so
///   equal bounds keep their stored order) and return the price of the first
///   step whose bound covers the duration - a direct step match is final and
///   never gets an increment added.
/// * When the duration exceeds every step (or the rule has no steps), the last
///   step's price becomes the base and per-unit increment charges apply beyond
///   the threshold: explicit threshold if set, else the last step bound, else
///   zero. Started units always round up - billing never undercharges a
///   started unit.
#[must_use]
pub fn calculate_price(
    rule: &pricing_rule::Model,
    duration_input: Option<&DurationInput>,
    side: Side,
) -> f64 {
    let params = side_params(rule, side);

    match rule.rule_type {
        RuleType::Fixed => params.fixed.unwrap_or(0.0),
        RuleType::Stepped | RuleType::Linear => {
            let duration = parse_duration(duration_input);

            let mut steps = parse_steps(params.steps);
            steps.sort_by(|a, b| {
                a.up_to_minutes
                    .partial_cmp(&b.up_to_minutes)
                    .unwrap_or(Ordering::Equal)
            });

            let mut price = 0.0;
            if let Some(matched) = steps.iter().find(|s| s.up_to_minutes >= duration) {
                // First-fit: the matching tier's price is final
                return matched.price;
            }
            if let Some(last) = steps.last() {
                // Duration exceeds every step: carry the largest tier as base
                price = last.price;
            }

            if let Some(unit_price) = params.unit_price {
                let threshold = params
                    .threshold
                    .unwrap_or_else(|| steps.last().map_or(0.0, |s| s.up_to_minutes));
                if duration > threshold {
                    let unit = params.unit.filter(|u| *u > 0.0).unwrap_or(1.0);
                    let units_to_add = ((duration - threshold) / unit).ceil();
                    price += units_to_add * unit_price;
                }
            }

            price
        }
    }
}
