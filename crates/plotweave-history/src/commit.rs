//! The [`Commit`] type.

use plotweave_tree::Tree;
use plotweave_types::{CommitId, Timestamp};
use serde::{Deserialize, Serialize};

/// Author recorded when none is given.
pub const DEFAULT_AUTHOR: &str = "user";

/// An immutable, timestamped record of a tree snapshot.
///
/// There are no setters: a commit is built once by [`Commit::new`] and only
/// read afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    id: CommitId,
    message: String,
    author: String,
    timestamp: Timestamp,
    snapshot: Tree,
}

impl Commit {
    /// Freeze `tree` into a new commit stamped with the current time.
    ///
    /// The message may be empty at this layer. Later edits of the caller's
    /// tree produce new tree values and never reach the snapshot.
    pub fn new(message: impl Into<String>, tree: &Tree, author: Option<&str>) -> Self {
        Self {
            id: CommitId::new(),
            message: message.into(),
            author: author.unwrap_or(DEFAULT_AUTHOR).to_string(),
            timestamp: Timestamp::now(),
            snapshot: tree.clone(),
        }
    }

    pub fn id(&self) -> &CommitId {
        &self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// The tree as it was when the commit was made.
    pub fn snapshot(&self) -> &Tree {
        &self.snapshot
    }

    pub fn short_id(&self) -> String {
        self.id.short_id()
    }
}
