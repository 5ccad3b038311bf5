//! Trigger definitions.
//!
//! A trigger names the event category under which a rule may fire. Manual
//! triggers fire on demand; the other categories additionally require a
//! matching `event` variable in the execution context.

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::error::ValidationError;

/// Enumeration of supported trigger categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    /// Fires on demand, with no event requirement.
    Manual,
    /// Fires when the card is played.
    OnPlay,
    /// Fires when the card attacks.
    OnAttack,
    /// Fires when the card is knocked out.
    OnKnockOut,
}

impl TriggerType {
    /// The serialized name, as carried in the context's `event` variable.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TriggerType::Manual => "manual",
            TriggerType::OnPlay => "on_play",
            TriggerType::OnAttack => "on_attack",
            TriggerType::OnKnockOut => "on_knock_out",
        }
    }
}

impl std::fmt::Display for TriggerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The event requirement that activates a rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Trigger {
    /// Event category.
    #[serde(rename = "type")]
    pub kind: TriggerType,

    /// Optional extra predicate that must also hold for the rule to fire.
    pub condition: Option<Condition>,
}

impl Trigger {
    /// Create a trigger with no extra condition.
    #[must_use]
    pub fn new(kind: TriggerType) -> Self {
        Self {
            kind,
            condition: None,
        }
    }

    /// Create a manual trigger.
    #[must_use]
    pub fn manual() -> Self {
        Self::new(TriggerType::Manual)
    }

    /// Attach a condition (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.condition {
            Some(condition) => condition.validate(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_type_names() {
        assert_eq!(TriggerType::Manual.as_str(), "manual");
        assert_eq!(TriggerType::OnPlay.as_str(), "on_play");
        assert_eq!(TriggerType::OnAttack.as_str(), "on_attack");
        assert_eq!(TriggerType::OnKnockOut.as_str(), "on_knock_out");
    }

    #[test]
    fn test_serialized_name_matches_as_str() {
        for kind in [
            TriggerType::Manual,
            TriggerType::OnPlay,
            TriggerType::OnAttack,
            TriggerType::OnKnockOut,
        ] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json.as_str(), Some(kind.as_str()));
        }
    }

    #[test]
    fn test_trigger_uses_type_key() {
        let trigger = Trigger::new(TriggerType::OnPlay);
        let json = serde_json::to_value(&trigger).unwrap();
        assert_eq!(json["type"].as_str(), Some("on_play"));
    }

    #[test]
    fn test_unknown_trigger_type_rejected() {
        let result: Result<Trigger, _> =
            serde_json::from_str(r#"{"type": "on_discard"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_checks_condition() {
        let trigger = Trigger::manual().with_condition(Condition {
            kind: crate::ir::ConditionKind::Equals,
            path: "variables.ready".to_string(),
            value: None,
        });
        assert!(trigger.validate().is_err());
    }
}
