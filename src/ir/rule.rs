//! Top-level card rules and their modifiers.
//!
//! A `CardRule` couples a trigger with an effect tree and a list of
//! cross-cutting modifiers. Rules are immutable once constructed; their
//! canonical hash is their persistence identity (see [`super::hash`]).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;

use super::condition::Condition;
use super::effect::EffectNode;
use super::error::ValidationError;
use super::trigger::Trigger;

/// Kinds of execution modifiers.
///
/// Only once-per-turn limiting exists today; unknown kinds are rejected at
/// parse time, so the interpreter never sees an unsupported modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    /// The rule may execute at most once per turn identifier.
    OncePerTurn,
}

/// A cross-cutting execution constraint attached to a rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Modifier {
    /// Modifier kind.
    #[serde(rename = "type")]
    pub kind: ModifierKind,

    /// Ledger key the modifier claims at execution time.
    pub identifier: String,
}

impl Modifier {
    /// Create a once-per-turn modifier.
    pub fn once_per_turn(identifier: impl Into<String>) -> Self {
        Self {
            kind: ModifierKind::OncePerTurn,
            identifier: identifier.into(),
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.identifier.is_empty() {
            return Err(ValidationError::EmptyField("identifier"));
        }
        Ok(())
    }
}

/// Inline capacity for modifier lists; rules rarely carry more than one.
pub type Modifiers = SmallVec<[Modifier; 2]>;

/// Top-level rule definition for a single card ability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardRule {
    /// Stable identifier, `{card_id}.{slugified_ability_name}`.
    pub rule_id: String,

    /// Display name of the ability.
    pub name: String,

    /// Source version, `{set_id}-{release_date}` or `"unknown"`.
    pub version: String,

    /// Event requirement.
    pub trigger: Trigger,

    /// Executable effect tree.
    pub effect: EffectNode,

    /// Execution modifiers, applied in declaration order.
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl CardRule {
    /// Create a validated rule.
    pub fn new(
        rule_id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        trigger: Trigger,
        effect: EffectNode,
        modifiers: impl IntoIterator<Item = Modifier>,
    ) -> Result<Self, ValidationError> {
        let rule = Self {
            rule_id: rule_id.into(),
            name: name.into(),
            version: version.into(),
            trigger,
            effect,
            modifiers: modifiers.into_iter().collect(),
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Parse and validate a rule from a JSON value.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let rule: Self = serde_json::from_value(value)
            .map_err(|err| ValidationError::Malformed(err.to_string()))?;
        rule.validate()?;
        Ok(rule)
    }

    /// Parse and validate a rule from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let rule: Self = serde_json::from_str(json)
            .map_err(|err| ValidationError::Malformed(err.to_string()))?;
        rule.validate()?;
        Ok(rule)
    }

    /// The rule as a JSON value, in its persisted shape.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("rule is always JSON-representable")
    }

    /// Check structural invariants across the whole rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.rule_id.is_empty() {
            return Err(ValidationError::EmptyField("rule_id"));
        }
        if self.name.is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if self.version.is_empty() {
            return Err(ValidationError::EmptyField("version"));
        }
        self.trigger.validate()?;
        self.effect.validate()?;
        for modifier in &self.modifiers {
            modifier.validate()?;
        }
        Ok(())
    }

    /// The trigger's extra condition, if any.
    #[must_use]
    pub fn trigger_condition(&self) -> Option<&Condition> {
        self.trigger.condition.as_ref()
    }
}
