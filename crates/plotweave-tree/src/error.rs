//! Error types for tree operations.

use plotweave_types::NodeId;
use thiserror::Error;

/// Errors that can occur while editing a tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// No node with this id exists in the tree.
    #[error("node not found: {id}")]
    NodeNotFound { id: NodeId },

    /// The target parent exists but is a file.
    #[error("not a folder: {id}")]
    NotAFolder { id: NodeId },

    /// The target node exists but is a folder.
    #[error("not a file: {id}")]
    NotAFile { id: NodeId },

    /// The name cannot be addressed by a `/`-separated path.
    #[error("invalid node name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// The new node would sit deeper than [`MAX_DEPTH`](crate::MAX_DEPTH).
    #[error("folders may nest at most {max} levels deep")]
    TooDeep { max: usize },

    /// Two nodes in one tree share an id.
    #[error("duplicate node id: {id}")]
    DuplicateId { id: NodeId },

    /// A node's `parent_id` does not name the folder it sits in.
    #[error("node {id} records parent {recorded:?} but sits under {actual:?}")]
    ParentMismatch {
        id: NodeId,
        recorded: Option<NodeId>,
        actual: Option<NodeId>,
    },
}

/// Convenience type alias for tree operations.
pub type TreeResult<T> = std::result::Result<T, TreeError>;
