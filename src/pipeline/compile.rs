//! Compilation pipeline.
//!
//! Orchestrates the full path from card identifier to reviewed-ready
//! drafts: fetch the raw payload, persist it, run the template compiler,
//! hash and upsert each produced rule, then execute it once against a
//! synthesized context and record the outcome. Dry-run failures are
//! captured per rule and never abort compilation of sibling rules.

use log::{debug, info, warn};
use serde_json::json;
use thiserror::Error;

use crate::core::ExecutionContext;
use crate::ir::{version_hash, CardRule, EffectNode, TriggerType};
use crate::rules::RuleInterpreter;
use crate::source::{CardSource, FetchError};
use crate::store::{ReviewStatus, RuleStore, StoreError};
use crate::templates::{TemplateCompiler, TemplateError, TemplateMatch};

use super::report::{CompilationResult, CompiledRule, TestReport};

/// Failure modes that abort a card's compilation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The card source failed or returned unusable data.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Template matching rejected the card.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The store rejected a write.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// End-to-end card compilation over a source and a store.
#[derive(Debug)]
pub struct CompilationPipeline<S, R> {
    source: S,
    store: R,
    compiler: TemplateCompiler,
    interpreter: RuleInterpreter,
}

impl<S: CardSource, R: RuleStore> CompilationPipeline<S, R> {
    /// Create a pipeline with the built-in templates and handlers.
    pub fn new(source: S, store: R) -> Self {
        Self {
            source,
            store,
            compiler: TemplateCompiler::with_builtins(),
            interpreter: RuleInterpreter::new(),
        }
    }

    /// Replace the template compiler (builder pattern).
    #[must_use]
    pub fn with_compiler(mut self, compiler: TemplateCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    /// Replace the interpreter (builder pattern).
    #[must_use]
    pub fn with_interpreter(mut self, interpreter: RuleInterpreter) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// The backing store.
    pub fn store(&self) -> &R {
        &self.store
    }

    /// The backing store, mutably (for review operations).
    pub fn store_mut(&mut self) -> &mut R {
        &mut self.store
    }

    /// Consume the pipeline and return its store.
    pub fn into_store(self) -> R {
        self.store
    }

    /// Compile one card end to end.
    ///
    /// `card_id` may be an alias lookup key; persistence is keyed by the
    /// identifier inside the fetched payload.
    pub fn compile_card(&mut self, card_id: &str) -> Result<CompilationResult, PipelineError> {
        let payload = self.source.fetch(card_id)?;
        if !payload.is_object() {
            return Err(FetchError::MalformedPayload(format!(
                "payload for card '{card_id}' is not a structured record"
            ))
            .into());
        }

        let source_record = self.store.upsert_source(&payload)?;
        debug!("stored card source '{}'", source_record.card_id);

        let matches = self.compiler.compile(&payload)?;
        info!(
            "card '{}' compiled into {} rule(s)",
            source_record.card_id,
            matches.len()
        );

        let mut rules = Vec::with_capacity(matches.len());
        for matched in matches {
            rules.push(self.persist_rule(&source_record.card_id, matched)?);
        }

        Ok(CompilationResult {
            card_id: card_id.to_string(),
            raw_payload: payload,
            rules,
        })
    }

    fn persist_rule(
        &mut self,
        card_id: &str,
        matched: TemplateMatch,
    ) -> Result<CompiledRule, PipelineError> {
        let rule = matched.rule;
        let version_hash = version_hash(&rule);
        let record = self.store.upsert_rule(
            card_id,
            &rule.rule_id,
            &rule.version,
            &version_hash,
            &rule.to_value(),
            ReviewStatus::Draft,
        )?;

        let test = self.dry_run(&rule);
        if !test.passed {
            warn!(
                "rule '{}' failed its dry run: {}",
                rule.rule_id,
                test.details.as_deref().unwrap_or("no details")
            );
        }

        Ok(CompiledRule {
            rule,
            version_hash,
            record,
            test,
        })
    }

    /// Execute a rule once against a synthesized context.
    ///
    /// Every failure is downgraded to a failing report so one malformed
    /// rule cannot abort its siblings: execution errors carry their
    /// message, and a non-firing trigger is reported as such.
    fn dry_run(&self, rule: &CardRule) -> TestReport {
        let context = build_test_context(rule);
        match self.interpreter.execute(rule, &context) {
            Ok(true) => TestReport::pass(&rule.rule_id),
            Ok(false) => TestReport::fail(&rule.rule_id, "trigger conditions not met"),
            Err(err) => TestReport::fail(&rule.rule_id, err.to_string()),
        }
    }
}

/// Synthesize the minimal context a rule needs to execute once.
///
/// Three placeholder cards in the deck, an empty hand, controller
/// `"player"`. Non-manual triggers get their event preloaded; rules whose
/// effect tree gates on a `coin_flip` variable get heads.
fn build_test_context(rule: &CardRule) -> ExecutionContext {
    let state = json!({
        "players": {
            "player": {
                "deck": ["card-a", "card-b", "card-c"],
                "hand": []
            }
        }
    });
    let mut context =
        ExecutionContext::new("player", state, "turn-1").with_source_rule(&rule.rule_id);
    if rule.trigger.kind != TriggerType::Manual {
        context.set_variable("event", rule.trigger.kind.as_str());
    }
    if requires_coin_flip(&rule.effect) && context.variable("coin_flip").is_none() {
        context.set_variable("coin_flip", "heads");
    }
    context
}

/// Whether any gate in the effect tree conditions on a coin flip.
///
/// Detection is a literal suffix check on gate condition paths; the
/// variable name is part of the built-in template vocabulary.
fn requires_coin_flip(node: &EffectNode) -> bool {
    match node {
        EffectNode::Atomic { .. } => false,
        EffectNode::Sequence { steps } => steps.iter().any(requires_coin_flip),
        EffectNode::Gate {
            condition,
            if_true,
            if_false,
        } => {
            condition.path.ends_with("coin_flip")
                || requires_coin_flip(if_true)
                || if_false.as_deref().is_some_and(requires_coin_flip)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ir::{Condition, Parameters};

    use super::*;

    fn draw_effect(count: u64) -> EffectNode {
        let mut parameters = Parameters::new();
        parameters.insert("count".to_string(), count.into());
        EffectNode::atomic("Draw", parameters)
    }

    #[test]
    fn test_requires_coin_flip_detects_nested_gates() {
        let plain = draw_effect(1);
        assert!(!requires_coin_flip(&plain));

        let gated = EffectNode::gate(
            Condition::equals("variables.coin_flip", "heads"),
            draw_effect(1),
            None,
        );
        assert!(requires_coin_flip(&gated));

        let nested = EffectNode::sequence([
            draw_effect(1),
            EffectNode::gate(
                Condition::exists("state.damage"),
                draw_effect(1),
                Some(EffectNode::gate(
                    Condition::equals("variables.coin_flip", "heads"),
                    draw_effect(1),
                    None,
                )),
            ),
        ]);
        assert!(requires_coin_flip(&nested));
    }

    #[test]
    fn test_context_synthesis_for_event_trigger() {
        let rule = CardRule::new(
            "r1.test",
            "Test",
            "v1",
            crate::ir::Trigger::new(TriggerType::OnAttack),
            draw_effect(1),
            [],
        )
        .unwrap();

        let context = build_test_context(&rule);
        assert_eq!(
            context.variable("event"),
            Some(&serde_json::json!("on_attack"))
        );
        assert_eq!(context.source_rule.as_deref(), Some("r1.test"));
        assert_eq!(
            context.resolve_path("state.players.player.deck"),
            Some(serde_json::json!(["card-a", "card-b", "card-c"]))
        );
    }

    #[test]
    fn test_context_synthesis_defaults_coin_flip() {
        let rule = CardRule::new(
            "r1.test",
            "Test",
            "v1",
            crate::ir::Trigger::manual(),
            EffectNode::gate(
                Condition::equals("variables.coin_flip", "heads"),
                draw_effect(2),
                Some(draw_effect(0)),
            ),
            [],
        )
        .unwrap();

        let context = build_test_context(&rule);
        assert_eq!(
            context.variable("coin_flip"),
            Some(&serde_json::json!("heads"))
        );
    }
}
