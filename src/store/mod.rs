//! Persistence contract and review workflow.
//!
//! The store is an external collaborator to the pipeline: anything with
//! atomic upsert-by-key semantics works. Card sources are keyed by the
//! card's own identifier (last write wins); rule versions are keyed by
//! `(rule_id, version_hash)`, so structurally identical rules collapse to
//! one record and older versions are never overwritten.
//!
//! ## Review workflow
//!
//! A persisted rule starts as a draft. `mark_reviewed` moves exactly one
//! `(rule_id, version_hash)` to a terminal status, stamping reviewer and
//! review time; sibling versions of the same rule are untouched. Review
//! failures are surfaced directly, never swallowed.

mod memory;
mod records;

use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryStore;
pub use records::{ReviewStatus, RuleRecord, SourceRecord, StoredRule};

/// Failure modes of store operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A card payload had no usable `id` field to key on.
    #[error("card payload does not contain an 'id' field")]
    MissingCardId,

    /// The backing engine failed.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Failure modes of the review workflow.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReviewError {
    /// Reviews require a reviewer identity.
    #[error("reviewer must be a non-empty string")]
    EmptyReviewer,

    /// No record under the exact `(rule_id, version_hash)` pair.
    #[error("rule '{rule_id}' with hash '{version_hash}' does not exist in storage")]
    UnknownVersion {
        /// Rule identifier.
        rule_id: String,
        /// Requested version hash.
        version_hash: String,
    },
}

/// Persistence contract consumed by the compilation pipeline.
pub trait RuleStore {
    /// Insert or replace a raw card payload, keyed by its own `id` field.
    fn upsert_source(&mut self, payload: &Value) -> Result<SourceRecord, StoreError>;

    /// Look up a stored card payload.
    fn get_source(&self, card_id: &str) -> Option<SourceRecord>;

    /// Insert or update a rule version keyed by `(rule_id, version_hash)`.
    ///
    /// Updating an existing key replaces payload and status in place;
    /// `created_at` and review metadata are preserved.
    fn upsert_rule(
        &mut self,
        card_id: &str,
        rule_id: &str,
        version: &str,
        version_hash: &str,
        payload: &Value,
        status: ReviewStatus,
    ) -> Result<StoredRule, StoreError>;

    /// Look up one rule version.
    fn get_rule(&self, rule_id: &str, version_hash: &str) -> Option<RuleRecord>;

    /// Transition one rule version to a terminal review status.
    fn mark_reviewed(
        &mut self,
        rule_id: &str,
        version_hash: &str,
        reviewer: &str,
        status: ReviewStatus,
    ) -> Result<StoredRule, ReviewError>;

    /// All stored rule versions, in a deterministic order.
    fn list_rules(&self) -> Vec<RuleRecord>;
}
