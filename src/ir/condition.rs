//! Boolean predicates over execution state.
//!
//! Conditions appear in two places: as an optional extra gate on a rule's
//! trigger, and as the branch predicate of a gate effect. Both are evaluated
//! with the same dotted-path resolution against the execution context.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ValidationError;

/// How a condition judges the value its path resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// True when the resolved value equals the condition's `value`.
    Equals,
    /// True when the path resolves to any value at all.
    Exists,
}

/// A boolean predicate used by triggers and gate effects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Condition {
    /// Comparison mode.
    pub kind: ConditionKind,

    /// Dot-separated lookup path, resolved against the execution context.
    pub path: String,

    /// Comparison target for [`ConditionKind::Equals`].
    /// Ignored by [`ConditionKind::Exists`].
    pub value: Option<Value>,
}

impl Condition {
    /// Create an `equals` condition.
    pub fn equals(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            kind: ConditionKind::Equals,
            path: path.into(),
            value: Some(value.into()),
        }
    }

    /// Create an `exists` condition.
    pub fn exists(path: impl Into<String>) -> Self {
        Self {
            kind: ConditionKind::Exists,
            path: path.into(),
            value: None,
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.path.is_empty() {
            return Err(ValidationError::EmptyPath);
        }
        if self.kind == ConditionKind::Equals && self.value.is_none() {
            return Err(ValidationError::MissingValue {
                path: self.path.clone(),
            });
        }
        Ok(())
    }
}
