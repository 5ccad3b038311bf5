//! Persisted record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Review lifecycle status of a persisted rule version.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Freshly compiled, awaiting review.
    #[default]
    Draft,
    /// Reviewed and accepted.
    Approved,
    /// Reviewed and rejected.
    Rejected,
}

impl ReviewStatus {
    /// The serialized name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ReviewStatus::Draft => "draft",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted representation of a raw card payload.
///
/// Keyed by `card_id`; re-fetching replaces the payload wholesale while
/// `fetched_at` keeps the first-seen time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// The card's own identifier, taken from the payload.
    pub card_id: String,
    /// Display name extracted from the payload.
    pub name: String,
    /// The raw payload as fetched.
    pub raw_payload: Value,
    /// When the card was first stored.
    pub fetched_at: DateTime<Utc>,
    /// When the card was last replaced.
    pub updated_at: DateTime<Utc>,
}

/// Persisted representation of a compiled rule version.
///
/// Identity is `(rule_id, version_hash)`: structurally identical rules
/// collapse to one record, changed content gets a new record, and older
/// versions are never overwritten.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    /// Card the rule was compiled from.
    pub card_id: String,
    /// Rule identifier.
    pub rule_id: String,
    /// Source version string carried by the rule.
    pub version: String,
    /// Canonical content hash; the record's true identity with `rule_id`.
    pub version_hash: String,
    /// The rule payload in its persisted JSON shape.
    pub payload: Value,
    /// Review lifecycle status.
    pub status: ReviewStatus,
    /// Reviewer identity, once reviewed.
    pub reviewer: Option<String>,
    /// Review time, once reviewed.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// When this version was first stored.
    pub created_at: DateTime<Utc>,
    /// When this version was last upserted or reviewed.
    pub updated_at: DateTime<Utc>,
}

impl RuleRecord {
    /// The lightweight descriptor for this record.
    #[must_use]
    pub fn descriptor(&self) -> StoredRule {
        StoredRule {
            rule_id: self.rule_id.clone(),
            version_hash: self.version_hash.clone(),
            status: self.status,
            reviewer: self.reviewer.clone(),
            reviewed_at: self.reviewed_at,
        }
    }
}

/// Lightweight descriptor of a persisted rule entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredRule {
    /// Rule identifier.
    pub rule_id: String,
    /// Canonical content hash.
    pub version_hash: String,
    /// Review lifecycle status.
    pub status: ReviewStatus,
    /// Reviewer identity, once reviewed.
    pub reviewer: Option<String>,
    /// Review time, once reviewed.
    pub reviewed_at: Option<DateTime<Utc>>,
}
