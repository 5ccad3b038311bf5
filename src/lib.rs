//! # card-ir
//!
//! A template-based compiler from trading-card ability text to a
//! validated, executable intermediate representation, plus the
//! interpreter that runs that IR against game state.
//!
//! ## Design Principles
//!
//! 1. **Closed schemas**: the IR rejects unknown discriminators and extra
//!    fields at parse time; structural invariants are checked at
//!    construction. Invalid rules do not exist.
//!
//! 2. **Content-addressed versions**: a rule's identity is the SHA-256 of
//!    its canonical JSON encoding. Identical structure means identical
//!    hash, so persistence is idempotent and concurrent recompilation
//!    converges.
//!
//! 3. **Explicit configuration**: handler registries and template lists
//!    are values built by the caller and passed in at construction. There
//!    is no process-wide mutable state; duplicate registration is a
//!    constructor-time error.
//!
//! ## Architecture
//!
//! Text flows one way: ability text → template compiler → IR tree →
//! hashing and draft persistence → one dry run through the interpreter →
//! report. Review is a later transition on already-persisted versions.
//!
//! ## Modules
//!
//! - `core`: execution context, once-per-turn ledger, path resolution
//! - `ir`: the trigger/condition/effect/modifier/rule data model, canonical
//!   hashing, rule repository
//! - `effects`: effect handler registry and the built-in handlers
//! - `rules`: the tree-walking rule interpreter
//! - `templates`: text patterns and the template compiler
//! - `source`: card catalog contract (external collaborator)
//! - `store`: persistence contract and review workflow (external
//!   collaborator)
//! - `pipeline`: fetch → compile → persist → dry-run orchestration

pub mod core;
pub mod effects;
pub mod ir;
pub mod pipeline;
pub mod rules;
pub mod source;
pub mod store;
pub mod templates;

// Re-export commonly used types
pub use crate::core::{ExecutionContext, RuntimeLedger};

pub use crate::ir::{
    canonical_json, version_hash,
    CardRule, Condition, ConditionKind, EffectNode, Modifier, ModifierKind, Modifiers,
    Parameters, RepositoryError, RuleRepository, Trigger, TriggerType, ValidationError,
};

pub use crate::effects::{EffectHandler, EffectRegistry, ExecutionError};

pub use crate::rules::{evaluate_condition, RuleInterpreter};

pub use crate::templates::{
    builtin_templates, RuleTemplate, TemplateCompiler, TemplateError, TemplateMatch,
};

pub use crate::source::{CardSource, FetchError, MemoryCardSource};

pub use crate::store::{
    MemoryStore, ReviewError, ReviewStatus, RuleRecord, RuleStore, SourceRecord, StoreError,
    StoredRule,
};

pub use crate::pipeline::{
    CompilationPipeline, CompilationResult, CompiledRule, PipelineError, TestReport,
};
