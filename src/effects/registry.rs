//! Effect handler registry.
//!
//! The registry maps effect names to state-mutating handler functions.
//! The interpreter is its only caller: atomic effect nodes dispatch here
//! by name. Registration is write-once per name; the table is built
//! explicitly by the caller (no process-wide default), so duplicate
//! registration is a constructor-time error rather than a silent override.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::core::ExecutionContext;
use crate::ir::{Parameters, ValidationError};

use super::builtin;

/// Failure modes while registering or executing effects.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// No handler registered under the requested name.
    #[error("unknown effect '{0}'")]
    UnknownEffect(String),

    /// A handler was already registered under this name.
    #[error("handler already registered for effect '{0}'")]
    DuplicateEffect(String),

    /// The affected player is absent from the context state.
    #[error("player '{0}' not found in context state")]
    PlayerNotFound(String),

    /// A searched-for card is not in the deck.
    #[error("card '{0}' not found in deck")]
    CardNotFound(String),

    /// A required handler parameter is missing or empty.
    #[error("{effect} requires '{parameter}'")]
    MissingParameter {
        /// Handler name.
        effect: &'static str,
        /// Missing parameter key.
        parameter: &'static str,
    },

    /// A handler parameter has the wrong shape.
    #[error("{effect} parameter '{parameter}' has an invalid value")]
    InvalidParameter {
        /// Handler name.
        effect: &'static str,
        /// Offending parameter key.
        parameter: &'static str,
    },

    /// A zone exists in the state tree but is not a list.
    #[error("zone '{0}' is not a list-like container")]
    MalformedZone(String),

    /// The state tree does not have the expected object shape.
    #[error("malformed state: {0}")]
    MalformedState(&'static str),

    /// A damage amount was negative.
    #[error("damage amount must be non-negative, got {0}")]
    NegativeAmount(i64),

    /// A once-per-turn modifier was claimed twice in the same turn.
    #[error("once-per-turn limit reached for modifier '{identifier}' in turn '{turn}'")]
    OncePerTurnViolation {
        /// Modifier identifier.
        identifier: String,
        /// Turn identifier of the rejected claim.
        turn: String,
    },

    /// An IR invariant was violated at execution time.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A registered effect handler.
///
/// Handlers mutate the context's shared state tree directly and are not
/// atomic with respect to each other; the interpreter applies them
/// strictly in tree order.
pub type EffectHandler =
    Box<dyn Fn(&ExecutionContext, &Parameters) -> Result<(), ExecutionError>>;

/// Name-keyed table of effect handlers.
pub struct EffectRegistry {
    handlers: FxHashMap<String, EffectHandler>,
}

impl EffectRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// Create a registry with the built-in handlers registered:
    /// `Draw`, `SearchDeck`, and `AddDamage`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register("Draw", builtin::draw)
            .expect("builtin handler names are unique");
        registry
            .register("SearchDeck", builtin::search_deck)
            .expect("builtin handler names are unique");
        registry
            .register("AddDamage", builtin::add_damage)
            .expect("builtin handler names are unique");
        registry
    }

    /// Register a handler under a name.
    ///
    /// Handlers are write-once: registering a name twice is an error.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: impl Fn(&ExecutionContext, &Parameters) -> Result<(), ExecutionError> + 'static,
    ) -> Result<(), ExecutionError> {
        let name = name.into();
        if self.handlers.contains_key(&name) {
            return Err(ExecutionError::DuplicateEffect(name));
        }
        self.handlers.insert(name, Box::new(handler));
        Ok(())
    }

    /// Check if a handler name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Apply a handler by name.
    pub fn apply(
        &self,
        name: &str,
        context: &ExecutionContext,
        parameters: &Parameters,
    ) -> Result<(), ExecutionError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| ExecutionError::UnknownEffect(name.to_string()))?;
        handler(context, parameters)
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("EffectRegistry")
            .field("handlers", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_builtins_registered() {
        let registry = EffectRegistry::with_builtins();
        assert!(registry.contains("Draw"));
        assert!(registry.contains("SearchDeck"));
        assert!(registry.contains("AddDamage"));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = EffectRegistry::with_builtins();
        let result = registry.register("Draw", |_, _| Ok(()));
        assert_eq!(
            result.unwrap_err(),
            ExecutionError::DuplicateEffect("Draw".to_string())
        );
    }

    #[test]
    fn test_unknown_effect_rejected() {
        let registry = EffectRegistry::new();
        let context = ExecutionContext::new("player", json!({}), "turn-1");
        let result = registry.apply("Heal", &context, &Parameters::new());
        assert_eq!(
            result.unwrap_err(),
            ExecutionError::UnknownEffect("Heal".to_string())
        );
    }

    #[test]
    fn test_custom_handler_dispatch() {
        let mut registry = EffectRegistry::new();
        registry
            .register("Mark", |context, _| {
                context
                    .state_mut()
                    .as_object_mut()
                    .ok_or(ExecutionError::MalformedState("state root is not an object"))?
                    .insert("marked".to_string(), json!(true));
                Ok(())
            })
            .unwrap();

        let context = ExecutionContext::new("player", json!({}), "turn-1");
        registry.apply("Mark", &context, &Parameters::new()).unwrap();
        assert_eq!(context.snapshot_state()["marked"], json!(true));
    }
}
