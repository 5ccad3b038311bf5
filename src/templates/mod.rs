//! Template-based text-to-IR compilation.
//!
//! Templates recognize fixed textual patterns in ability text and emit
//! effect subtrees; the compiler runs an ordered template list over every
//! ability on a card. There is no natural-language understanding here:
//! text no template recognizes rejects the card.
//!
//! ## Key Components
//!
//! - [`RuleTemplate`]: one pattern, from text to an effect subtree
//! - [`builtin_templates`]: the draw / search / damage pattern set
//! - [`TemplateCompiler`]: ordered first-match compilation over a card

mod builtin;
mod compiler;
mod matcher;

pub use builtin::builtin_templates;
pub use compiler::{TemplateCompiler, TemplateError};
pub use matcher::{RuleTemplate, TemplateMatch};
