//! Core runtime types: execution context and the once-per-turn ledger.
//!
//! The context is created once per interpreter invocation and discarded
//! afterwards; the ledger survives across invocations that share a context
//! lineage (via `derive`), which is how per-turn limits hold within a turn.

pub mod context;

pub use context::{ExecutionContext, RuntimeLedger};
