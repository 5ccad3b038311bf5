//! Pipeline result types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ir::CardRule;
use crate::store::StoredRule;

/// Outcome of the synthesized dry run for one compiled rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    /// Rule the report belongs to.
    pub rule_id: String,
    /// Whether the dry run completed with a genuine trigger fire.
    pub passed: bool,
    /// Failure detail, when the run did not pass.
    pub details: Option<String>,
}

impl TestReport {
    /// A passing report.
    pub fn pass(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            passed: true,
            details: None,
        }
    }

    /// A failing report with a reason.
    pub fn fail(rule_id: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            passed: false,
            details: Some(details.into()),
        }
    }
}

/// A compiled rule with its persistence and dry-run metadata.
#[derive(Clone, Debug)]
pub struct CompiledRule {
    /// The validated rule.
    pub rule: CardRule,
    /// Canonical content hash under which the rule was stored.
    pub version_hash: String,
    /// Descriptor of the persisted record.
    pub record: StoredRule,
    /// Dry-run outcome.
    pub test: TestReport,
}

/// Final result of compiling a single card.
#[derive(Clone, Debug)]
pub struct CompilationResult {
    /// The identifier the caller asked for (possibly an alias).
    pub card_id: String,
    /// The payload as fetched from the card source.
    pub raw_payload: Value,
    /// Every rule produced from the card's abilities.
    pub rules: Vec<CompiledRule>,
}

impl CompilationResult {
    /// Whether every produced rule passed its dry run.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.rules.iter().all(|rule| rule.test.passed)
    }
}
