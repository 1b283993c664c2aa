//! Condition evaluation against event payloads.
//!
//! Evaluation is total: malformed documents, unknown operators, and
//! missing fields all evaluate to non-matching rather than erroring,
//! so one bad trigger can never wedge the dispatch pipeline.

use serde_json::Value;
use tracing::warn;

use crate::condition::{Condition, ConditionGroup, ConditionTree, GroupOperator};
use crate::value::{coerce_to_number, coerce_to_string, loose_eq, resolve_path};

/// Evaluate a single condition against a payload.
pub fn evaluate_condition(condition: &Condition, payload: &Value) -> bool {
    let resolved = resolve_path(payload, &condition.field);

    match condition.operator.as_str() {
        "equals" => eval_equals(resolved, &condition.value),
        "not_equals" => !eval_equals(resolved, &condition.value),
        "greater_than" => eval_ordered(resolved, &condition.value, |a, b| a > b),
        "less_than" => eval_ordered(resolved, &condition.value, |a, b| a < b),
        "greater_than_or_equal" => eval_ordered(resolved, &condition.value, |a, b| a >= b),
        "less_than_or_equal" => eval_ordered(resolved, &condition.value, |a, b| a <= b),
        "contains" => eval_string_test(resolved, &condition.value, |s, n| s.contains(n)),
        "not_contains" => !eval_string_test(resolved, &condition.value, |s, n| s.contains(n)),
        "starts_with" => eval_string_test(resolved, &condition.value, |s, n| s.starts_with(n)),
        "ends_with" => eval_string_test(resolved, &condition.value, |s, n| s.ends_with(n)),
        other => {
            warn!(
                operator = other,
                field = %condition.field,
                "Unknown condition operator, treating as non-match"
            );
            false
        }
    }
}

fn eval_equals(resolved: Option<&Value>, expected: &Value) -> bool {
    match resolved {
        Some(actual) => loose_eq(actual, expected),
        None => false,
    }
}

fn eval_ordered(resolved: Option<&Value>, expected: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
    let actual = match resolved.and_then(coerce_to_number) {
        Some(n) => n,
        None => return false,
    };
    let expected = match coerce_to_number(expected) {
        Some(n) => n,
        None => return false,
    };
    cmp(actual, expected)
}

fn eval_string_test(
    resolved: Option<&Value>,
    expected: &Value,
    test: impl Fn(&str, &str) -> bool,
) -> bool {
    let actual = match resolved {
        Some(v) if !v.is_null() => coerce_to_string(v).to_lowercase(),
        _ => return false,
    };
    let needle = coerce_to_string(expected).to_lowercase();
    test(&actual, &needle)
}

/// Evaluate a condition group: AND requires every condition to match,
/// OR requires at least one. An empty group is the fold identity
/// (AND matches, OR does not).
pub fn evaluate_group(group: &ConditionGroup, payload: &Value) -> bool {
    match group.operator {
        GroupOperator::And => group
            .conditions
            .iter()
            .all(|c| evaluate_condition(c, payload)),
        GroupOperator::Or => group
            .conditions
            .iter()
            .any(|c| evaluate_condition(c, payload)),
    }
}

/// Evaluate a full condition tree against a payload.
///
/// An empty tree never matches; a trigger with no conditions is
/// considered misconfigured rather than a match-everything rule.
pub fn evaluate_tree(tree: &ConditionTree, payload: &Value) -> bool {
    if tree.is_empty() {
        return false;
    }
    match tree {
        ConditionTree::Flat(conditions) => {
            conditions.iter().all(|c| evaluate_condition(c, payload))
        }
        ConditionTree::Grouped { operator, groups } => match operator {
            GroupOperator::And => groups.iter().all(|g| evaluate_group(g, payload)),
            GroupOperator::Or => groups.iter().any(|g| evaluate_group(g, payload)),
        },
    }
}

/// Parse and evaluate a stored condition document in one step.
///
/// A document that parses as neither shape logs a warning and does not
/// match.
pub fn evaluate_tree_value(document: &Value, payload: &Value) -> bool {
    match ConditionTree::from_value(document) {
        Ok(tree) => evaluate_tree(&tree, payload),
        Err(e) => {
            warn!(error = %e, "Malformed condition document, treating as non-match");
            false
        }
    }
}
