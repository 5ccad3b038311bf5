//! Structural validation errors for IR payloads.

use thiserror::Error;

/// A structural schema violation detected while constructing or parsing IR.
///
/// Schemas are closed: unknown discriminators and unrecognized extra fields
/// are rejected at parse time and surface as [`ValidationError::Malformed`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required string field was empty.
    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),

    /// A condition path was empty.
    #[error("condition path must not be empty")]
    EmptyPath,

    /// An `equals` condition was missing its comparison value.
    #[error("equals condition on '{path}' requires a value")]
    MissingValue {
        /// Path of the offending condition.
        path: String,
    },

    /// A sequence effect had no steps.
    #[error("sequence effect requires at least one step")]
    EmptySequence,

    /// The payload could not be parsed into the IR schema at all.
    #[error("malformed rule payload: {0}")]
    Malformed(String),
}
