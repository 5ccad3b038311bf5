//! Rule interpretation.
//!
//! The interpreter walks a validated rule against an execution context:
//! trigger gate first, then modifier claims, then the effect tree. Atomic
//! nodes dispatch to the effect registry; sequences and gates structure
//! the walk.

mod engine;

pub use engine::{evaluate_condition, RuleInterpreter};
