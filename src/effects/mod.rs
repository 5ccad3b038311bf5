//! Effect handlers and their registry.
//!
//! Atomic effect nodes name a handler; the registry maps those names to
//! pure state-mutating functions. The interpreter is the registry's sole
//! caller and applies handlers strictly in effect-tree order.
//!
//! ## Extensibility
//!
//! New effects are added by registering a handler; the interpreter does
//! not change. Registries are explicit values owned by the interpreter,
//! with no process-wide default table.

mod builtin;
mod registry;

pub use builtin::{add_damage, draw, search_deck};
pub use registry::{EffectHandler, EffectRegistry, ExecutionError};
