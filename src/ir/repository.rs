//! In-memory registry of validated rules.
//!
//! The repository caches parsed `CardRule`s keyed by `rule_id`, loading
//! them from JSON collections or from persisted records. Loaded payloads
//! are always re-validated; records carrying a `version` are cross-checked
//! against the parsed rule.

use rustc_hash::FxHashMap;
use serde_json::Value;
use thiserror::Error;

use super::error::ValidationError;
use super::rule::CardRule;

/// Failure modes when loading or resolving repository rules.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// No rule with the requested identifier.
    #[error("rule '{0}' not found")]
    NotFound(String),

    /// The stored version does not match the rule payload's version.
    #[error("rule '{rule_id}' version mismatch: expected {expected}, found {actual}")]
    VersionMismatch {
        /// Rule identifier.
        rule_id: String,
        /// Version requested or recorded alongside the payload.
        expected: String,
        /// Version carried inside the rule payload.
        actual: String,
    },

    /// The payload failed IR validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// In-memory registry of [`CardRule`]s keyed by `rule_id`.
#[derive(Clone, Debug, Default)]
pub struct RuleRepository {
    rules: FxHashMap<String, CardRule>,
}

impl RuleRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule, replacing any earlier rule with the same `rule_id`.
    ///
    /// Returns the replaced rule, if there was one.
    pub fn insert(&mut self, rule: CardRule) -> Option<CardRule> {
        self.rules.insert(rule.rule_id.clone(), rule)
    }

    /// Load rules from a JSON collection.
    ///
    /// Accepts either a bare array of rules or an object with a `rules`
    /// array. Returns the number of rules loaded.
    pub fn load_from_value(&mut self, payload: &Value) -> Result<usize, ValidationError> {
        let entries = match payload {
            Value::Array(entries) => entries.as_slice(),
            Value::Object(fields) => match fields.get("rules") {
                Some(Value::Array(entries)) => entries.as_slice(),
                _ => {
                    return Err(ValidationError::Malformed(
                        "expected an array of rules or an object with a 'rules' array"
                            .to_string(),
                    ))
                }
            },
            _ => {
                return Err(ValidationError::Malformed(
                    "expected an array of rules or an object with a 'rules' array".to_string(),
                ))
            }
        };
        let mut loaded = 0;
        for entry in entries {
            self.insert(CardRule::from_value(entry.clone())?);
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Load one persisted record's payload, cross-checking its version.
    pub fn load_record(
        &mut self,
        payload: &Value,
        expected_version: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let rule = CardRule::from_value(payload.clone())?;
        if let Some(expected) = expected_version {
            if rule.version != expected {
                return Err(RepositoryError::VersionMismatch {
                    rule_id: rule.rule_id,
                    expected: expected.to_string(),
                    actual: rule.version,
                });
            }
        }
        self.insert(rule);
        Ok(())
    }

    /// Look up a rule by identifier.
    pub fn get(&self, rule_id: &str) -> Result<&CardRule, RepositoryError> {
        self.rules
            .get(rule_id)
            .ok_or_else(|| RepositoryError::NotFound(rule_id.to_string()))
    }

    /// Look up a rule and require a specific version.
    pub fn get_version(&self, rule_id: &str, version: &str) -> Result<&CardRule, RepositoryError> {
        let rule = self.get(rule_id)?;
        if rule.version != version {
            return Err(RepositoryError::VersionMismatch {
                rule_id: rule_id.to_string(),
                expected: version.to_string(),
                actual: rule.version.clone(),
            });
        }
        Ok(rule)
    }

    /// Number of cached rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over all cached rules.
    pub fn iter(&self) -> impl Iterator<Item = &CardRule> {
        self.rules.values()
    }
}
