//! Tree-walking rule interpreter.
//!
//! Execution proceeds in three stages: the trigger gate (event match plus
//! optional condition), modifier claims in declaration order, then a
//! depth-first walk of the effect tree. A `false` return means the trigger
//! did not fire and no side effect was applied; errors from modifiers or
//! handlers abort execution at the failing node with no rollback of
//! earlier steps.

use serde_json::Value;

use crate::core::ExecutionContext;
use crate::effects::{EffectRegistry, ExecutionError};
use crate::ir::{CardRule, Condition, ConditionKind, EffectNode, Modifier, ModifierKind, TriggerType};

/// Evaluate a condition against the execution context.
///
/// `exists` holds when the path resolves to a present value; `equals`
/// holds when the resolved value structurally equals the condition's
/// target. Shared by trigger conditions and gate effects.
#[must_use]
pub fn evaluate_condition(condition: &Condition, context: &ExecutionContext) -> bool {
    let resolved = context.resolve_path(&condition.path);
    match condition.kind {
        ConditionKind::Exists => resolved.is_some(),
        ConditionKind::Equals => match (&resolved, &condition.value) {
            (Some(value), Some(expected)) => value == expected,
            _ => false,
        },
    }
}

/// Interprets [`CardRule`]s against an [`ExecutionContext`].
#[derive(Debug)]
pub struct RuleInterpreter {
    registry: EffectRegistry,
}

impl RuleInterpreter {
    /// Create an interpreter with the built-in effect handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: EffectRegistry::with_builtins(),
        }
    }

    /// Create an interpreter over a caller-supplied handler table.
    #[must_use]
    pub fn with_registry(registry: EffectRegistry) -> Self {
        Self { registry }
    }

    /// The handler table this interpreter dispatches to.
    #[must_use]
    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    /// Execute a rule if its trigger conditions are satisfied.
    ///
    /// Returns `Ok(false)` without side effects when the trigger does not
    /// fire. Returns `Ok(true)` once trigger, modifiers, and the whole
    /// effect tree complete. Modifier and handler failures propagate as
    /// [`ExecutionError`]s; steps already applied are not rolled back.
    pub fn execute(
        &self,
        rule: &CardRule,
        context: &ExecutionContext,
    ) -> Result<bool, ExecutionError> {
        if !self.can_trigger(rule, context) {
            return Ok(false);
        }
        self.apply_modifiers(&rule.modifiers, context)?;
        self.execute_node(&rule.effect, context)?;
        Ok(true)
    }

    fn can_trigger(&self, rule: &CardRule, context: &ExecutionContext) -> bool {
        let trigger = &rule.trigger;
        if trigger.kind != TriggerType::Manual {
            let event = context.variable("event").and_then(Value::as_str);
            if event != Some(trigger.kind.as_str()) {
                return false;
            }
        }
        match &trigger.condition {
            Some(condition) => evaluate_condition(condition, context),
            None => true,
        }
    }

    fn apply_modifiers(
        &self,
        modifiers: &[Modifier],
        context: &ExecutionContext,
    ) -> Result<(), ExecutionError> {
        for modifier in modifiers {
            match modifier.kind {
                ModifierKind::OncePerTurn => {
                    context.claim_once_per_turn(&modifier.identifier)?;
                }
            }
        }
        Ok(())
    }

    fn execute_node(
        &self,
        node: &EffectNode,
        context: &ExecutionContext,
    ) -> Result<(), ExecutionError> {
        match node {
            EffectNode::Atomic { effect, parameters } => {
                self.registry.apply(effect, context, parameters)
            }
            EffectNode::Sequence { steps } => {
                for step in steps {
                    self.execute_node(step, context)?;
                }
                Ok(())
            }
            EffectNode::Gate {
                condition,
                if_true,
                if_false,
            } => {
                if evaluate_condition(condition, context) {
                    self.execute_node(if_true, context)
                } else if let Some(node) = if_false {
                    self.execute_node(node, context)
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl Default for RuleInterpreter {
    fn default() -> Self {
        Self::new()
    }
}
