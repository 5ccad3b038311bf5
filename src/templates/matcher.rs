//! Rule templates.
//!
//! A template is a named matcher from ability text to an effect subtree.
//! Trigger and modifier inference run on the same text independently of
//! which template matched, so every template produces a complete rule.

use serde_json::Value;

use crate::ir::{CardRule, EffectNode, Modifier, Modifiers, Trigger, TriggerType};

use super::TemplateError;

/// A compiled rule together with the template that produced it.
#[derive(Clone, Debug)]
pub struct TemplateMatch {
    /// The validated rule.
    pub rule: CardRule,
    /// Description of the matching template.
    pub description: String,
}

/// A text-pattern template producing an effect subtree.
pub struct RuleTemplate {
    description: String,
    matcher: Box<dyn Fn(&str) -> Option<EffectNode>>,
}

impl RuleTemplate {
    /// Create a template from a matcher function.
    pub fn new(
        description: impl Into<String>,
        matcher: impl Fn(&str) -> Option<EffectNode> + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            matcher: Box::new(matcher),
        }
    }

    /// Human-readable description of what the template recognizes.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Try to build a rule for one ability of a card.
    ///
    /// Returns `Ok(None)` when the ability text does not match this
    /// template. A match infers the trigger and modifiers from the same
    /// text and validates the assembled rule.
    pub fn try_build(
        &self,
        card: &Value,
        ability: &Value,
        version: &str,
    ) -> Result<Option<TemplateMatch>, TemplateError> {
        let text = ability.get("text").and_then(Value::as_str).unwrap_or("");
        let Some(effect) = (self.matcher)(text) else {
            return Ok(None);
        };
        let rule_id = build_rule_id(card, ability);
        let name = ability
            .get("name")
            .and_then(Value::as_str)
            .or_else(|| card.get("name").and_then(Value::as_str))
            .unwrap_or("Ability");
        let rule = CardRule::new(
            rule_id.clone(),
            name,
            version,
            infer_trigger(text),
            effect,
            collect_modifiers(text, &rule_id),
        )?;
        Ok(Some(TemplateMatch {
            rule,
            description: self.description.clone(),
        }))
    }
}

impl std::fmt::Debug for RuleTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleTemplate")
            .field("description", &self.description)
            .finish()
    }
}

/// Derive a rule identifier: `{card_id}.{slug(ability_name)}`.
pub(crate) fn build_rule_id(card: &Value, ability: &Value) -> String {
    let card_id = string_field(card, "id").unwrap_or_else(|| "card".to_string());
    let ability_name = string_field(ability, "name").unwrap_or_else(|| "ability".to_string());
    format!("{card_id}.{}", slug(&ability_name))
}

/// Slugify a display name: lowercase, runs of non-alphanumerics collapse
/// to a single hyphen, trimmed, `"ability"` when nothing survives.
pub(crate) fn slug(name: &str) -> String {
    let mut out = String::new();
    let mut pending_hyphen = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    if out.is_empty() {
        "ability".to_string()
    } else {
        out
    }
}

/// Infer the trigger category from ability text.
pub(crate) fn infer_trigger(text: &str) -> Trigger {
    let lowered = text.to_lowercase();
    if lowered.contains("when you play this pokémon") || lowered.contains("when you play this pokemon")
    {
        return Trigger::new(TriggerType::OnPlay);
    }
    if lowered.contains("when this pokémon attacks") || lowered.contains("when this pokemon attacks")
    {
        return Trigger::new(TriggerType::OnAttack);
    }
    Trigger::manual()
}

/// Infer modifiers from ability text.
pub(crate) fn collect_modifiers(text: &str, rule_id: &str) -> Modifiers {
    let mut modifiers = Modifiers::new();
    if text.to_lowercase().contains("once during your turn") {
        modifiers.push(Modifier::once_per_turn(format!("{rule_id}.once")));
    }
    modifiers
}

/// Read a card field as a string, accepting numeric identifiers.
pub(crate) fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
