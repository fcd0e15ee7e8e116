//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::NodePath;

/// Domain errors represent tagging rule violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("empty node path")]
    EmptyPath,

    #[error("path {given} does not match taxonomy path {expected}")]
    InvalidPath { given: NodePath, expected: NodePath },

    #[error("duplicate node name '{name}' at {first} and {second}")]
    DuplicateName {
        name: String,
        first: NodePath,
        second: NodePath,
    },

    #[error("empty node name below '{parent}'")]
    EmptyName { parent: String },

    /// Order entry that is no longer selected. Healed in place, only logged.
    #[error("order references unselected name: {name}")]
    InconsistentOrder { name: String },
}
