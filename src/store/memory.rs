//! In-memory store implementation.

use chrono::Utc;
use log::{debug, info};
use rustc_hash::FxHashMap;
use serde_json::Value;

use super::records::{ReviewStatus, RuleRecord, SourceRecord, StoredRule};
use super::{ReviewError, RuleStore, StoreError};

/// Reference [`RuleStore`] backed by hash maps.
///
/// Upserts are atomic per key, which is all the pipeline's concurrency
/// model asks of a store; content-hash identity makes concurrent writes
/// of the same rule convergent.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    sources: FxHashMap<String, SourceRecord>,
    rules: FxHashMap<(String, String), RuleRecord>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rule versions.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Number of stored card sources.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

impl RuleStore for MemoryStore {
    fn upsert_source(&mut self, payload: &Value) -> Result<SourceRecord, StoreError> {
        let card_id = payload
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or(StoreError::MissingCardId)?
            .to_string();
        let name = payload
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(&card_id)
            .to_string();
        let now = Utc::now();

        let record = self
            .sources
            .entry(card_id.clone())
            .and_modify(|existing| {
                existing.name = name.clone();
                existing.raw_payload = payload.clone();
                existing.updated_at = now;
            })
            .or_insert_with(|| SourceRecord {
                card_id: card_id.clone(),
                name,
                raw_payload: payload.clone(),
                fetched_at: now,
                updated_at: now,
            });
        debug!("upserted card source '{card_id}'");
        Ok(record.clone())
    }

    fn get_source(&self, card_id: &str) -> Option<SourceRecord> {
        self.sources.get(card_id).cloned()
    }

    fn upsert_rule(
        &mut self,
        card_id: &str,
        rule_id: &str,
        version: &str,
        version_hash: &str,
        payload: &Value,
        status: ReviewStatus,
    ) -> Result<StoredRule, StoreError> {
        let now = Utc::now();
        let key = (rule_id.to_string(), version_hash.to_string());

        let record = self
            .rules
            .entry(key)
            .and_modify(|existing| {
                existing.payload = payload.clone();
                existing.status = status;
                existing.updated_at = now;
            })
            .or_insert_with(|| RuleRecord {
                card_id: card_id.to_string(),
                rule_id: rule_id.to_string(),
                version: version.to_string(),
                version_hash: version_hash.to_string(),
                payload: payload.clone(),
                status,
                reviewer: None,
                reviewed_at: None,
                created_at: now,
                updated_at: now,
            });
        debug!("upserted rule '{rule_id}' @ {version_hash}");
        Ok(record.descriptor())
    }

    fn get_rule(&self, rule_id: &str, version_hash: &str) -> Option<RuleRecord> {
        self.rules
            .get(&(rule_id.to_string(), version_hash.to_string()))
            .cloned()
    }

    fn mark_reviewed(
        &mut self,
        rule_id: &str,
        version_hash: &str,
        reviewer: &str,
        status: ReviewStatus,
    ) -> Result<StoredRule, ReviewError> {
        if reviewer.is_empty() {
            return Err(ReviewError::EmptyReviewer);
        }
        let record = self
            .rules
            .get_mut(&(rule_id.to_string(), version_hash.to_string()))
            .ok_or_else(|| ReviewError::UnknownVersion {
                rule_id: rule_id.to_string(),
                version_hash: version_hash.to_string(),
            })?;

        let now = Utc::now();
        record.status = status;
        record.reviewer = Some(reviewer.to_string());
        record.reviewed_at = Some(now);
        record.updated_at = now;
        info!("rule '{rule_id}' @ {version_hash} marked {status} by {reviewer}");
        Ok(record.descriptor())
    }

    fn list_rules(&self) -> Vec<RuleRecord> {
        let mut records: Vec<_> = self.rules.values().cloned().collect();
        records.sort_by(|a, b| {
            (a.rule_id.as_str(), a.version_hash.as_str())
                .cmp(&(b.rule_id.as_str(), b.version_hash.as_str()))
        });
        records
    }
}
