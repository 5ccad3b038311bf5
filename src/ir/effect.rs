//! Effect tree nodes.
//!
//! An effect tree is the executable half of a rule: atomic leaves dispatch
//! to registered handlers, sequences run their children in order, and gates
//! branch on a condition. The interpreter matches exhaustively over the
//! three kinds, so adding a node kind is a compile-time checked change.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::condition::Condition;
use super::error::ValidationError;

/// Handler parameters carried by an atomic effect.
pub type Parameters = Map<String, Value>;

/// One node of an executable effect tree.
///
/// Serialized with a `kind` discriminator (`atomic`, `sequence`, `gate`).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectNode {
    /// Leaf node invoking a registered effect handler by name.
    Atomic {
        /// Registered handler name.
        effect: String,
        /// Parameters forwarded to the handler.
        parameters: Parameters,
    },

    /// Execute nested nodes in order; the first failure aborts the rest.
    Sequence {
        /// Child nodes, executed front to back. Must be non-empty.
        steps: Vec<EffectNode>,
    },

    /// Conditionally execute one of two branches.
    Gate {
        /// Branch predicate.
        condition: Condition,
        /// Executed when the condition holds.
        if_true: Box<EffectNode>,
        /// Executed when the condition does not hold. Optional; a gate with
        /// a false condition and no else-branch is a successful no-op.
        if_false: Option<Box<EffectNode>>,
    },
}

impl EffectNode {
    /// Create an atomic effect.
    pub fn atomic(effect: impl Into<String>, parameters: Parameters) -> Self {
        Self::Atomic {
            effect: effect.into(),
            parameters,
        }
    }

    /// Create a sequence of steps.
    pub fn sequence(steps: impl IntoIterator<Item = EffectNode>) -> Self {
        Self::Sequence {
            steps: steps.into_iter().collect(),
        }
    }

    /// Create a gate over a condition.
    pub fn gate(condition: Condition, if_true: EffectNode, if_false: Option<EffectNode>) -> Self {
        Self::Gate {
            condition,
            if_true: Box::new(if_true),
            if_false: if_false.map(Box::new),
        }
    }

    /// Check structural invariants, recursively.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            EffectNode::Atomic { effect, .. } => {
                if effect.is_empty() {
                    return Err(ValidationError::EmptyField("effect"));
                }
                Ok(())
            }
            EffectNode::Sequence { steps } => {
                if steps.is_empty() {
                    return Err(ValidationError::EmptySequence);
                }
                for step in steps {
                    step.validate()?;
                }
                Ok(())
            }
            EffectNode::Gate {
                condition,
                if_true,
                if_false,
            } => {
                condition.validate()?;
                if_true.validate()?;
                if let Some(node) = if_false {
                    node.validate()?;
                }
                Ok(())
            }
        }
    }
}

// Serde's internally tagged deserialization cannot reject unknown fields,
// so parsing is done by hand: pull the `kind` tag, then parse the remainder
// into closed per-variant shapes.
impl<'de> Deserialize<'de> for EffectNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct AtomicParts {
            effect: String,
            #[serde(default)]
            parameters: Parameters,
        }

        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct SequenceParts {
            steps: Vec<EffectNode>,
        }

        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct GateParts {
            condition: Condition,
            if_true: Box<EffectNode>,
            if_false: Option<Box<EffectNode>>,
        }

        let mut fields = Map::deserialize(deserializer)?;
        let kind = match fields.remove("kind") {
            Some(Value::String(kind)) => kind,
            Some(_) => return Err(D::Error::custom("effect node 'kind' must be a string")),
            None => return Err(D::Error::custom("effect node is missing 'kind'")),
        };
        let rest = Value::Object(fields);

        match kind.as_str() {
            "atomic" => {
                let parts: AtomicParts =
                    serde_json::from_value(rest).map_err(D::Error::custom)?;
                Ok(EffectNode::Atomic {
                    effect: parts.effect,
                    parameters: parts.parameters,
                })
            }
            "sequence" => {
                let parts: SequenceParts =
                    serde_json::from_value(rest).map_err(D::Error::custom)?;
                Ok(EffectNode::Sequence { steps: parts.steps })
            }
            "gate" => {
                let parts: GateParts =
                    serde_json::from_value(rest).map_err(D::Error::custom)?;
                Ok(EffectNode::Gate {
                    condition: parts.condition,
                    if_true: parts.if_true,
                    if_false: parts.if_false,
                })
            }
            other => Err(D::Error::custom(format!(
                "unknown effect node kind '{other}'"
            ))),
        }
    }
}
