//! Content-addressed rule versioning.
//!
//! A rule's persistence identity is the SHA-256 of its canonical JSON
//! encoding: object keys sorted lexicographically, no extraneous
//! whitespace, optional fields as explicit nulls, UTF-8 bytes, lowercase
//! hex digest. The encoding is a cross-implementation contract: any
//! implementation producing the same structure must produce the same hash.

use sha2::{Digest, Sha256};

use super::rule::CardRule;

/// Canonical JSON encoding of a rule.
///
/// Serializing through `serde_json::Value` sorts object keys (its map is
/// BTree-backed), and `Value::to_string` emits compact JSON. Optional
/// fields are kept as explicit `null`s so structurally identical rules
/// always encode identically.
#[must_use]
pub fn canonical_json(rule: &CardRule) -> String {
    rule.to_value().to_string()
}

/// Lowercase hex SHA-256 over the canonical encoding.
#[must_use]
pub fn version_hash(rule: &CardRule) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_json(rule).as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
