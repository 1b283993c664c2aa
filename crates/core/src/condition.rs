//! Trigger condition trees.
//!
//! A trigger's conditions are stored as JSON in one of two shapes: a
//! flat array of conditions (implicitly AND-combined) or a grouped
//! object with an outer operator over condition groups. Both shapes
//! deserialize into [`ConditionTree`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single field comparison.
///
/// The operator is kept as a free string so that condition documents
/// written against a newer engine still deserialize; evaluation treats
/// unknown operators as non-matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: String,
    pub value: Value,
}

/// How conditions within a group, or groups within a tree, combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupOperator {
    #[default]
    And,
    Or,
}

/// A set of conditions combined under one operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionGroup {
    #[serde(default)]
    pub operator: GroupOperator,
    pub conditions: Vec<Condition>,
}

/// The full condition document attached to a trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionTree {
    /// Legacy flat shape: a bare array of conditions, AND-combined.
    Flat(Vec<Condition>),
    /// Grouped shape: an outer operator over condition groups.
    Grouped {
        #[serde(default)]
        operator: GroupOperator,
        groups: Vec<ConditionGroup>,
    },
}

impl ConditionTree {
    /// Parse a condition document from its stored JSON form.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }

    /// True when the tree contains no conditions at the top level.
    pub fn is_empty(&self) -> bool {
        match self {
            ConditionTree::Flat(conditions) => conditions.is_empty(),
            ConditionTree::Grouped { groups, .. } => groups.is_empty(),
        }
    }
}
