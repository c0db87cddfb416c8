//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::node::NodeId;

/// Domain errors represent catalog rule violations.
/// The tree builders never produce them; editing operations do.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("record not found: {0}")]
    NodeNotFound(NodeId),

    #[error("invalid parent {parent} for record {id}")]
    InvalidParent { id: NodeId, parent: NodeId },

    #[error("parent {parent} would make record {id} its own ancestor")]
    CycleDetected { id: NodeId, parent: NodeId },

    #[error("invalid record {id}: {message}")]
    InvalidNode { id: NodeId, message: String },

    #[error("record {0} is not selected")]
    NotSelected(NodeId),

    #[error("record {0} does not manage limits")]
    LimitNotManaged(NodeId),
}
