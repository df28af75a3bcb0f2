//! Error types for history operations.

use plotweave_tree::TreeError;
use plotweave_types::CommitId;
use thiserror::Error;

/// Errors that can occur while reading or extending history.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// No branch with this id or name exists in the project.
    #[error("branch not found: {branch}")]
    BranchNotFound { branch: String },

    /// The branch has no commits yet.
    #[error("branch has no commits: {branch}")]
    EmptyHistory { branch: String },

    /// The branch head moved since the caller last looked at it.
    #[error("branch {branch} moved: expected head {expected:?}, found {actual:?}")]
    Conflict {
        branch: String,
        expected: Option<CommitId>,
        actual: Option<CommitId>,
    },

    /// The branch name is invalid.
    #[error("invalid branch name: {name}: {reason}")]
    InvalidBranchName { name: String, reason: String },

    /// A branch with this name already exists.
    #[error("branch already exists: {name}")]
    BranchExists { name: String },

    /// The active branch cannot be removed.
    #[error("cannot remove current branch: {name}")]
    CannotRemoveCurrentBranch { name: String },

    /// A loaded project violates a structural invariant.
    #[error("invalid project: {reason}")]
    InvalidProject { reason: String },

    /// A tree edit failed while building history.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Convenience type alias for history operations.
pub type HistoryResult<T> = std::result::Result<T, HistoryError>;
