use plotweave_history::{Branch, Commit};
use plotweave_types::{BranchId, CommitId, Timestamp};
use serde::{Deserialize, Serialize};

/// Summary of a commit for log display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub id: CommitId,
    pub short_id: String,
    pub message: String,
    pub author: String,
    pub timestamp: Timestamp,
}

impl From<&Commit> for CommitSummary {
    fn from(commit: &Commit) -> Self {
        Self {
            id: *commit.id(),
            short_id: commit.short_id(),
            message: commit.message().to_string(),
            author: commit.author().to_string(),
            timestamp: commit.timestamp(),
        }
    }
}

/// Summary information about a branch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchInfo {
    pub id: BranchId,
    pub name: String,
    /// Head commit id, `None` for an empty branch.
    pub head: Option<CommitId>,
    pub commit_count: usize,
    /// Whether this is the active branch.
    pub is_current: bool,
}

impl BranchInfo {
    pub(crate) fn of(branch: &Branch, current: &BranchId) -> Self {
        Self {
            id: *branch.id(),
            name: branch.name().to_string(),
            head: branch.head_id().copied(),
            commit_count: branch.len(),
            is_current: branch.id() == current,
        }
    }
}
