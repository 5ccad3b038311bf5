//! Execution context for rule interpretation.
//!
//! A context carries everything one interpreter invocation needs: the
//! controlling player, the mutable JSON state tree, a turn identifier,
//! scratch variables, and the once-per-turn ledger. Derived contexts
//! (via [`ExecutionContext::derive`]) overlay extra variables while
//! sharing the same state tree and ledger, so simulated trigger events
//! observe real claims without copying state.
//!
//! Contexts are single-threaded (`Rc<RefCell<..>>`); each simulated turn
//! gets its own context lineage.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

use crate::effects::ExecutionError;

/// Runtime-scoped usage ledger shared across derived contexts.
///
/// Tracks, per modifier identifier, the last turn in which it was claimed.
/// Claims are never rolled back, even when a later effect step fails.
#[derive(Clone, Debug, Default)]
pub struct RuntimeLedger {
    once_per_turn: FxHashMap<String, String>,
}

impl RuntimeLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a once-per-turn identifier for the given turn.
    ///
    /// Fails if the identifier was already claimed for this exact turn;
    /// claiming under a new turn identifier succeeds and supersedes the
    /// previous claim.
    pub fn claim_once_per_turn(
        &mut self,
        identifier: &str,
        turn_identifier: &str,
    ) -> Result<(), ExecutionError> {
        if self
            .once_per_turn
            .get(identifier)
            .is_some_and(|last| last == turn_identifier)
        {
            return Err(ExecutionError::OncePerTurnViolation {
                identifier: identifier.to_string(),
                turn: turn_identifier.to_string(),
            });
        }
        self.once_per_turn
            .insert(identifier.to_string(), turn_identifier.to_string());
        Ok(())
    }

    /// The turn in which an identifier was last claimed, if ever.
    #[must_use]
    pub fn last_claimed_turn(&self, identifier: &str) -> Option<&str> {
        self.once_per_turn.get(identifier).map(String::as_str)
    }
}

/// Runtime context passed to the interpreter and effect handlers.
#[derive(Clone, Debug)]
pub struct ExecutionContext {
    /// Player whose rule is executing. Handlers default to this player.
    pub controller: String,

    /// Identifier of the current turn, keyed by once-per-turn claims.
    pub turn_identifier: String,

    /// Identifier of the rule currently executing, when known.
    pub source_rule: Option<String>,

    state: Rc<RefCell<Value>>,
    variables: Map<String, Value>,
    runtime: Rc<RefCell<RuntimeLedger>>,
}

impl ExecutionContext {
    /// Create a context over a JSON state tree.
    pub fn new(
        controller: impl Into<String>,
        state: Value,
        turn_identifier: impl Into<String>,
    ) -> Self {
        Self {
            controller: controller.into(),
            turn_identifier: turn_identifier.into(),
            source_rule: None,
            state: Rc::new(RefCell::new(state)),
            variables: Map::new(),
            runtime: Rc::new(RefCell::new(RuntimeLedger::new())),
        }
    }

    /// Set a variable (builder pattern).
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Record the executing rule (builder pattern).
    #[must_use]
    pub fn with_source_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.source_rule = Some(rule_id.into());
        self
    }

    /// Change the turn identifier (builder pattern).
    ///
    /// Combined with [`ExecutionContext::derive`], this models successive
    /// turns over the same state tree and ledger.
    #[must_use]
    pub fn with_turn_identifier(mut self, turn_identifier: impl Into<String>) -> Self {
        self.turn_identifier = turn_identifier.into();
        self
    }

    /// Derive a new context with extra or overridden variables.
    ///
    /// The derived context shares this context's state tree and runtime
    /// ledger; only the variable overlay is copied.
    #[must_use]
    pub fn derive(&self, overrides: impl IntoIterator<Item = (String, Value)>) -> Self {
        let mut variables = self.variables.clone();
        variables.extend(overrides);
        Self {
            controller: self.controller.clone(),
            turn_identifier: self.turn_identifier.clone(),
            source_rule: self.source_rule.clone(),
            state: Rc::clone(&self.state),
            variables,
            runtime: Rc::clone(&self.runtime),
        }
    }

    /// Look up a variable.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Set a variable in place.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Borrow the shared state tree.
    #[must_use]
    pub fn state(&self) -> Ref<'_, Value> {
        self.state.borrow()
    }

    /// Mutably borrow the shared state tree.
    #[must_use]
    pub fn state_mut(&self) -> RefMut<'_, Value> {
        self.state.borrow_mut()
    }

    /// Clone the current state tree, for inspection.
    #[must_use]
    pub fn snapshot_state(&self) -> Value {
        self.state.borrow().clone()
    }

    /// Claim a once-per-turn identifier for this context's turn.
    pub fn claim_once_per_turn(&self, identifier: &str) -> Result<(), ExecutionError> {
        self.runtime
            .borrow_mut()
            .claim_once_per_turn(identifier, &self.turn_identifier)
    }

    /// Resolve a dotted path against this context.
    ///
    /// The first segment selects a namespace: `state` and `variables` pick
    /// the respective root explicitly; any other segment is looked up in
    /// the variables first, falling back to the state tree under the same
    /// key. Remaining segments are nested object lookups. Resolution
    /// returns `None` when any hop is missing, when an intermediate value
    /// is not an object, or when the final value is JSON `null`.
    #[must_use]
    pub fn resolve_path(&self, path: &str) -> Option<Value> {
        let mut segments = path.split('.');
        let head = segments.next()?;
        let mut current = match head {
            "state" => self.state.borrow().clone(),
            "variables" => Value::Object(self.variables.clone()),
            other => match self.variables.get(other) {
                Some(value) => value.clone(),
                None => {
                    let state = self.state.borrow();
                    state.get(other)?.clone()
                }
            },
        };
        for segment in segments {
            let next = current.as_object()?.get(segment)?.clone();
            current = next;
        }
        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }
}
