//! Tree-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Errors raised by tree operations.
///
/// Every operation validates its arguments before touching the tree, so a
/// returned error means the tree is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("{child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("moving {node} under {target} would make it its own ancestor")]
    CycleDetected { node: NodeId, target: NodeId },

    #[error("node listed more than once: {0}")]
    DuplicateChild(NodeId),
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
