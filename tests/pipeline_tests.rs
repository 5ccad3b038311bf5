//! Compilation pipeline integration tests.
//!
//! Full fetch → compile → persist → dry-run coverage over the in-memory
//! source and store, including idempotent persistence, per-rule test
//! isolation, and alias lookups.

use serde_json::{json, Value};

use card_ir::{
    CardSource, CompilationPipeline, FetchError, MemoryCardSource, MemoryStore, PipelineError,
    ReviewStatus, RuleStore,
};

fn gardevoir() -> Value {
    json!({
        "id": "xy7-54",
        "name": "Gardevoir",
        "set": {"id": "xy7", "releaseDate": "2015/08/12"},
        "abilities": [{
            "name": "Draw Power",
            "text": "Once during your turn, you may draw 2 cards."
        }]
    })
}

fn pipeline_with(cards: Vec<Value>) -> CompilationPipeline<MemoryCardSource, MemoryStore> {
    CompilationPipeline::new(MemoryCardSource::with_cards(cards), MemoryStore::new())
}

#[test]
fn test_compile_card_end_to_end() {
    let mut pipeline = pipeline_with(vec![gardevoir()]);
    let result = pipeline.compile_card("xy7-54").unwrap();

    assert_eq!(result.card_id, "xy7-54");
    assert_eq!(result.rules.len(), 1);
    assert!(result.all_passed());

    let compiled = &result.rules[0];
    assert_eq!(compiled.rule.rule_id, "xy7-54.draw-power");
    assert_eq!(compiled.record.status, ReviewStatus::Draft);
    assert!(compiled.test.passed);
    assert_eq!(compiled.version_hash.len(), 64);

    // Both the raw source and the draft rule were persisted.
    let store = pipeline.store();
    assert!(store.get_source("xy7-54").is_some());
    let record = store
        .get_rule("xy7-54.draw-power", &compiled.version_hash)
        .unwrap();
    assert_eq!(record.card_id, "xy7-54");
    assert_eq!(record.version, "xy7-2015/08/12");
    assert_eq!(record.payload, compiled.rule.to_value());
}

#[test]
fn test_recompilation_is_idempotent() {
    let mut pipeline = pipeline_with(vec![gardevoir()]);

    let first = pipeline.compile_card("xy7-54").unwrap();
    let second = pipeline.compile_card("xy7-54").unwrap();

    assert_eq!(first.rules[0].version_hash, second.rules[0].version_hash);
    assert_eq!(pipeline.store().rule_count(), 1);
    assert_eq!(pipeline.store().source_count(), 1);
}

#[test]
fn test_changed_ability_creates_new_version() {
    let mut source = MemoryCardSource::new();
    source.insert(gardevoir());
    let mut pipeline = CompilationPipeline::new(source, MemoryStore::new());

    let first = pipeline.compile_card("xy7-54").unwrap();
    let first_hash = first.rules[0].version_hash.clone();

    // The catalog re-syncs with reworded text.
    let mut updated = gardevoir();
    updated["abilities"][0]["text"] = json!("Once during your turn, you may draw 3 cards.");
    // Recompile over the same store with the re-synced payload.
    let mut pipeline = CompilationPipeline::new(
        MemoryCardSource::with_cards([updated]),
        pipeline.into_store(),
    );
    let second = pipeline.compile_card("xy7-54").unwrap();
    let second_hash = second.rules[0].version_hash.clone();

    assert_ne!(first_hash, second_hash);
    // Both versions coexist; the old record was never overwritten.
    assert_eq!(pipeline.store().rule_count(), 2);
    assert!(pipeline
        .store()
        .get_rule("xy7-54.draw-power", &first_hash)
        .is_some());
    assert!(pipeline
        .store()
        .get_rule("xy7-54.draw-power", &second_hash)
        .is_some());
}

#[test]
fn test_failing_dry_run_does_not_abort_siblings() {
    // The search rule fails its dry run (the synthesized deck holds no
    // "Basic Energy"), the draw rule passes; both are compiled and stored.
    let card = json!({
        "id": "xy7-61",
        "name": "Scholar",
        "set": {"id": "xy7", "releaseDate": "2015/08/12"},
        "abilities": [
            {"name": "Energy Call", "text": "Search your deck for 1 Basic Energy card."},
            {"name": "Draw Power", "text": "Draw 1 card."}
        ]
    });
    let mut pipeline = pipeline_with(vec![card]);
    let result = pipeline.compile_card("xy7-61").unwrap();

    assert_eq!(result.rules.len(), 2);
    assert!(!result.all_passed());

    let search = &result.rules[0];
    assert!(!search.test.passed);
    assert!(search
        .test
        .details
        .as_deref()
        .unwrap()
        .contains("Basic Energy"));

    let draw = &result.rules[1];
    assert!(draw.test.passed);
    assert!(draw.test.details.is_none());

    assert_eq!(pipeline.store().rule_count(), 2);
}

#[test]
fn test_coin_flip_rule_passes_dry_run() {
    let card = json!({
        "id": "xy7-62",
        "name": "Gambler",
        "abilities": [{
            "name": "Lucky Draw",
            "text": "Flip a coin. If heads, draw 3 cards."
        }]
    });
    let mut pipeline = pipeline_with(vec![card]);
    let result = pipeline.compile_card("xy7-62").unwrap();
    assert!(result.all_passed(), "coin_flip defaults to heads in the dry run");
}

#[test]
fn test_event_trigger_rule_passes_dry_run() {
    let card = json!({
        "id": "xy7-63",
        "name": "Greeter",
        "abilities": [{
            "name": "Warm Welcome",
            "text": "When you play this Pokémon, draw 1 card."
        }]
    });
    let mut pipeline = pipeline_with(vec![card]);
    let result = pipeline.compile_card("xy7-63").unwrap();
    assert!(result.all_passed(), "the dry run preloads the trigger event");
}

#[test]
fn test_unknown_card_is_fetch_error() {
    let mut pipeline = pipeline_with(vec![]);
    let result = pipeline.compile_card("missing-1");
    assert!(matches!(
        result.unwrap_err(),
        PipelineError::Fetch(FetchError::UnknownCard(_))
    ));
}

#[test]
fn test_unparseable_card_is_template_error() {
    let card = json!({
        "id": "xy7-64",
        "name": "Mystic",
        "abilities": [{"name": "Dark Ritual", "text": "Do something unprecedented."}]
    });
    let mut pipeline = pipeline_with(vec![card]);
    let result = pipeline.compile_card("xy7-64");
    assert!(matches!(result.unwrap_err(), PipelineError::Template(_)));
    // The raw source was persisted before template matching failed.
    assert!(pipeline.store().get_source("xy7-64").is_some());
    assert_eq!(pipeline.store().rule_count(), 0);
}

/// A source that resolves an alias to a payload carrying its own id;
/// persistence must key on the payload's id, not the lookup key.
struct AliasSource(MemoryCardSource);

impl CardSource for AliasSource {
    fn fetch(&self, card_id: &str) -> Result<Value, FetchError> {
        match card_id {
            "gardevoir-alias" => self.0.fetch("xy7-54"),
            other => self.0.fetch(other),
        }
    }

    fn search(
        &self,
        name: &str,
        set_code: Option<&str>,
        number: Option<&str>,
    ) -> Result<Value, FetchError> {
        self.0.search(name, set_code, number)
    }
}

#[test]
fn test_alias_lookup_persists_under_payload_id() {
    let source = AliasSource(MemoryCardSource::with_cards([gardevoir()]));
    let mut pipeline = CompilationPipeline::new(source, MemoryStore::new());

    let result = pipeline.compile_card("gardevoir-alias").unwrap();
    assert_eq!(result.card_id, "gardevoir-alias");

    assert!(pipeline.store().get_source("xy7-54").is_some());
    assert!(pipeline.store().get_source("gardevoir-alias").is_none());
    assert_eq!(
        pipeline
            .store()
            .get_rule("xy7-54.draw-power", &result.rules[0].version_hash)
            .unwrap()
            .card_id,
        "xy7-54"
    );
}
