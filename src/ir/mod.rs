//! Intermediate representation for card ability rules.
//!
//! The IR is a small typed tree compiled from raw ability text:
//! - [`Trigger`]: the event category under which a rule fires
//! - [`Condition`]: dotted-path predicates for triggers and gates
//! - [`EffectNode`]: the atomic/sequence/gate effect tree
//! - [`Modifier`]: cross-cutting execution constraints
//! - [`CardRule`]: the validated top-level rule
//!
//! ## Invariants
//!
//! Schemas are closed and validated at construction: empty identifiers,
//! empty sequences, `equals` conditions without a value, unknown
//! discriminators, and unrecognized fields are all rejected with a
//! [`ValidationError`].
//!
//! ## Versioning
//!
//! Rules are immutable once constructed; [`hash::version_hash`] over the
//! canonical encoding is their persistence identity. Structurally identical
//! rules collapse to one hash, any content change produces a new one.

pub mod condition;
pub mod effect;
pub mod error;
pub mod hash;
pub mod repository;
pub mod rule;
pub mod trigger;

pub use condition::{Condition, ConditionKind};
pub use effect::{EffectNode, Parameters};
pub use error::ValidationError;
pub use hash::{canonical_json, version_hash};
pub use repository::{RepositoryError, RuleRepository};
pub use rule::{CardRule, Modifier, ModifierKind, Modifiers};
pub use trigger::{Trigger, TriggerType};
