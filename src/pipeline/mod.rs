//! Card compilation pipeline.
//!
//! Wires the card source, template compiler, interpreter, and store into
//! one operation: `compile_card`. Produced rules are persisted as drafts
//! keyed by their content hash and dry-run once each, with per-rule
//! reports instead of aborts. The review workflow then promotes stored
//! drafts through the store's `mark_reviewed`.

mod compile;
mod report;

pub use compile::{CompilationPipeline, PipelineError};
pub use report::{CompilationResult, CompiledRule, TestReport};
