//! Template compiler.
//!
//! Compiles one card payload into zero-or-more IR rules by running each
//! ability through an ordered template list. Matching is all-or-nothing
//! per card: an ability no template recognizes rejects the whole card, as
//! does a card that produces no rules at all.

use serde_json::Value;
use thiserror::Error;

use crate::ir::ValidationError;

use super::builtin::builtin_templates;
use super::matcher::{string_field, RuleTemplate, TemplateMatch};

/// Failure modes while compiling card text into rules.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// No template recognized one of the card's abilities.
    #[error("no template could parse ability '{0}'")]
    UnmatchedAbility(String),

    /// The card produced no rules at all.
    #[error("card '{0}' did not match any template")]
    NoRules(String),

    /// A matched template assembled a structurally invalid rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Ordered template list applied to card abilities.
///
/// Templates are tried in order; the first match wins and no further
/// templates are consulted for that ability.
#[derive(Debug)]
pub struct TemplateCompiler {
    templates: Vec<RuleTemplate>,
}

impl TemplateCompiler {
    /// Create a compiler over a caller-supplied template list.
    #[must_use]
    pub fn new(templates: Vec<RuleTemplate>) -> Self {
        Self { templates }
    }

    /// Create a compiler with the built-in templates.
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::new(builtin_templates())
    }

    /// The template list, in match order.
    #[must_use]
    pub fn templates(&self) -> &[RuleTemplate] {
        &self.templates
    }

    /// Compile every ability on a card payload into rules.
    ///
    /// Ability entries that are not objects are skipped; a non-array (or
    /// absent) `abilities` field behaves as an empty list and therefore
    /// fails with [`TemplateError::NoRules`].
    pub fn compile(&self, card: &Value) -> Result<Vec<TemplateMatch>, TemplateError> {
        let version = resolve_version(card);
        let abilities = card
            .get("abilities")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut matches = Vec::new();
        for ability in abilities {
            if !ability.is_object() {
                continue;
            }
            let matched = self.compile_ability(card, ability, &version)?;
            match matched {
                Some(found) => matches.push(found),
                None => {
                    let name = ability
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or("Unnamed");
                    return Err(TemplateError::UnmatchedAbility(name.to_string()));
                }
            }
        }

        if matches.is_empty() {
            let card_id = string_field(card, "id").unwrap_or_else(|| "unknown".to_string());
            return Err(TemplateError::NoRules(card_id));
        }
        Ok(matches)
    }

    fn compile_ability(
        &self,
        card: &Value,
        ability: &Value,
        version: &str,
    ) -> Result<Option<TemplateMatch>, TemplateError> {
        for template in &self.templates {
            if let Some(matched) = template.try_build(card, ability, version)? {
                return Ok(Some(matched));
            }
        }
        Ok(None)
    }
}

impl Default for TemplateCompiler {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Derive a version string from the card's set metadata.
///
/// `{set_id}-{release_date}` when a `set` object is present (each field
/// falling back to `set` / `v1`), `"unknown"` otherwise.
pub(crate) fn resolve_version(card: &Value) -> String {
    match card.get("set") {
        Some(Value::Object(set)) => {
            let id = set.get("id").and_then(Value::as_str).unwrap_or("set");
            let release = set
                .get("releaseDate")
                .and_then(Value::as_str)
                .unwrap_or("v1");
            format!("{id}-{release}")
        }
        _ => "unknown".to_string(),
    }
}
