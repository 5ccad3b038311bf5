//! Card catalog contract.
//!
//! The compilation pipeline treats the raw card-data source as an external
//! collaborator: anything that can resolve a card identifier (or a fuzzy
//! name/set/number query) to a semi-structured payload. Network clients
//! implement [`CardSource`] outside this crate; [`MemoryCardSource`] is the
//! fixture-backed implementation used in tests and offline runs.

use serde_json::Value;
use thiserror::Error;

/// Failure modes when resolving card data.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The source could not be reached at all.
    #[error("card source unavailable: {0}")]
    Unavailable(String),

    /// No card under the requested identifier.
    #[error("card '{0}' not found")]
    UnknownCard(String),

    /// A search produced no candidates.
    #[error("search returned no cards")]
    EmptyResult,

    /// The source answered with something that is not card data.
    #[error("card source returned a malformed payload: {0}")]
    MalformedPayload(String),
}

/// A source of raw card payloads.
pub trait CardSource {
    /// Return the raw payload for a card identifier.
    fn fetch(&self, card_id: &str) -> Result<Value, FetchError>;

    /// Search for a card by name, optionally narrowed by set code and
    /// collector number. Returns the first match.
    fn search(
        &self,
        name: &str,
        set_code: Option<&str>,
        number: Option<&str>,
    ) -> Result<Value, FetchError>;
}

/// Fixture-backed card source.
///
/// Cards are stored in insertion order; `insert` replaces an existing
/// payload with the same `id`, mirroring a catalog re-sync.
#[derive(Clone, Debug, Default)]
pub struct MemoryCardSource {
    cards: Vec<Value>,
}

impl MemoryCardSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source preloaded with card payloads.
    pub fn with_cards(cards: impl IntoIterator<Item = Value>) -> Self {
        let mut source = Self::new();
        for card in cards {
            source.insert(card);
        }
        source
    }

    /// Insert or replace a card payload, keyed by its `id` field.
    pub fn insert(&mut self, payload: Value) {
        let id = payload.get("id").and_then(Value::as_str).map(str::to_string);
        if let Some(id) = id {
            if let Some(existing) = self
                .cards
                .iter_mut()
                .find(|card| card.get("id").and_then(Value::as_str) == Some(id.as_str()))
            {
                *existing = payload;
                return;
            }
        }
        self.cards.push(payload);
    }

    /// Number of stored cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the source is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl CardSource for MemoryCardSource {
    fn fetch(&self, card_id: &str) -> Result<Value, FetchError> {
        self.cards
            .iter()
            .find(|card| card.get("id").and_then(Value::as_str) == Some(card_id))
            .cloned()
            .ok_or_else(|| FetchError::UnknownCard(card_id.to_string()))
    }

    fn search(
        &self,
        name: &str,
        set_code: Option<&str>,
        number: Option<&str>,
    ) -> Result<Value, FetchError> {
        self.cards
            .iter()
            .find(|card| {
                let name_matches = card
                    .get("name")
                    .and_then(Value::as_str)
                    .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name));
                let set_matches = set_code.is_none_or(|code| {
                    let set = card.get("set");
                    let id = set.and_then(|s| s.get("id")).and_then(Value::as_str);
                    let ptcgo = set.and_then(|s| s.get("ptcgoCode")).and_then(Value::as_str);
                    id == Some(code) || ptcgo == Some(code)
                });
                let number_matches = number.is_none_or(|wanted| {
                    card.get("number").and_then(Value::as_str) == Some(wanted)
                });
                name_matches && set_matches && number_matches
            })
            .cloned()
            .ok_or(FetchError::EmptyResult)
    }
}
