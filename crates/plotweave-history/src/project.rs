//! The [`Project`] aggregate: branches plus a pointer to the active one.

use std::collections::HashSet;
use std::sync::Arc;

use plotweave_tree::{NodeKind, Tree};
use plotweave_types::{BranchId, CommitId, ProjectId, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::branch::Branch;
use crate::commit::Commit;
use crate::error::{HistoryError, HistoryResult};
use crate::names::validate_branch_name;

/// Name of the branch every new project starts with.
pub const DEFAULT_BRANCH: &str = "main";

const STARTER_CHAPTER: &str = "Chapter 1.txt";
const STARTER_TEXT: &str = "It was a dark and stormy night...";
const STARTER_FOLDER: &str = "Characters";
const STARTER_MESSAGE: &str = "Initial commit";

fn starter_backstory_event() -> serde_json::Value {
    let now = Timestamp::now().as_millis();
    serde_json::json!({
        "id": uuid::Uuid::new_v4(),
        "title": "The Great Cataclysm",
        "content": "An ancient event that shaped the world.",
        "date": "1000-01-01",
        "tags": ["world-building", "history"],
        "createdAt": now,
        "updatedAt": now,
    })
}

/// A document project: the aggregate root owning every branch, and through
/// them every commit and snapshot.
///
/// All operations take `&self` and return a new project value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    id: ProjectId,
    name: String,
    created_at: Timestamp,
    current_branch_id: BranchId,
    branches: Vec<Branch>,
    /// Timeline entries owned by another feature; carried through unread.
    #[serde(default)]
    backstory: Vec<serde_json::Value>,
}

impl Project {
    /// A new project with a single, empty branch named `branch`.
    pub fn new(name: impl Into<String>, branch: &str) -> HistoryResult<Self> {
        validate_branch_name(branch)?;
        let first = Branch::create(branch, None);
        Ok(Self {
            id: ProjectId::new(),
            name: name.into(),
            created_at: Timestamp::now(),
            current_branch_id: *first.id(),
            branches: vec![first],
            backstory: Vec::new(),
        })
    }

    /// A new project whose first branch starts at an "Initial commit"
    /// holding a first chapter and an empty `Characters` folder.
    pub fn starter(name: impl Into<String>, branch: &str, author: Option<&str>) -> HistoryResult<Self> {
        let (tree, chapter) = Tree::new().insert(STARTER_CHAPTER, NodeKind::File, None)?;
        let tree = tree.set_file_content(&chapter, STARTER_TEXT)?;
        let (tree, _) = tree.insert(STARTER_FOLDER, NodeKind::Folder, None)?;

        let mut project = Self::new(name, branch)?.record_commit(STARTER_MESSAGE, &tree, author)?;
        project.backstory.push(starter_backstory_event());
        info!(project = %project.id, name = %project.name, "created starter project");
        Ok(project)
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn current_branch_id(&self) -> &BranchId {
        &self.current_branch_id
    }

    pub fn backstory(&self) -> &[serde_json::Value] {
        &self.backstory
    }

    pub fn branch(&self, id: &BranchId) -> Option<&Branch> {
        self.branches.iter().find(|b| b.id() == id)
    }

    pub fn branch_by_name(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.name() == name)
    }

    /// The active branch.
    pub fn current_branch(&self) -> HistoryResult<&Branch> {
        self.branch(&self.current_branch_id)
            .ok_or_else(|| HistoryError::BranchNotFound {
                branch: self.current_branch_id.to_string(),
            })
    }

    /// The active branch's head snapshot (empty for an empty branch).
    pub fn current_tree(&self) -> HistoryResult<Tree> {
        Ok(self.current_branch()?.tree())
    }

    /// Make `branch_id` the active branch.
    ///
    /// Callers holding a selection inside the old branch's tree must reset
    /// it: node ids from one branch need not exist on another.
    pub fn switch_branch(&self, branch_id: &BranchId) -> HistoryResult<Project> {
        let branch = self
            .branch(branch_id)
            .ok_or_else(|| HistoryError::BranchNotFound {
                branch: branch_id.to_string(),
            })?;
        debug!(branch = %branch.name(), "switched branch");
        Ok(Project {
            current_branch_id: *branch_id,
            ..self.clone()
        })
    }

    /// Freeze `working_tree` into a commit on the active branch.
    pub fn record_commit(
        &self,
        message: impl Into<String>,
        working_tree: &Tree,
        author: Option<&str>,
    ) -> HistoryResult<Project> {
        let branch = self.current_branch()?;
        let commit = Commit::new(message, working_tree, author);
        Ok(self.with_branch(branch.append_commit(commit)))
    }

    /// Like [`record_commit`](Self::record_commit), but fails with
    /// [`HistoryError::Conflict`] unless the active branch's head is still
    /// `expected_head`.
    pub fn record_commit_expecting(
        &self,
        expected_head: Option<&CommitId>,
        message: impl Into<String>,
        working_tree: &Tree,
        author: Option<&str>,
    ) -> HistoryResult<Project> {
        let branch = self.current_branch()?;
        let commit = Commit::new(message, working_tree, author);
        let next = branch.append_commit_expecting(expected_head, commit)?;
        Ok(self.with_branch(next))
    }

    /// Fork a new branch from the active branch's head. The active branch
    /// does not change.
    pub fn create_branch(&self, name: &str) -> HistoryResult<(Project, BranchId)> {
        validate_branch_name(name)?;
        if self.branch_by_name(name).is_some() {
            return Err(HistoryError::BranchExists {
                name: name.to_string(),
            });
        }
        let fork_point = Arc::clone(self.current_branch()?.head()?);
        let branch = Branch::create(name, Some(fork_point));
        let id = *branch.id();
        debug!(branch = %name, "created branch");

        let mut branches = self.branches.clone();
        branches.push(branch);
        Ok((
            Project {
                branches,
                ..self.clone()
            },
            id,
        ))
    }

    /// Drop a branch and its history. The active branch cannot be removed.
    pub fn remove_branch(&self, branch_id: &BranchId) -> HistoryResult<Project> {
        let branch = self
            .branch(branch_id)
            .ok_or_else(|| HistoryError::BranchNotFound {
                branch: branch_id.to_string(),
            })?;
        if branch_id == &self.current_branch_id {
            return Err(HistoryError::CannotRemoveCurrentBranch {
                name: branch.name().to_string(),
            });
        }
        debug!(branch = %branch.name(), "removed branch");
        Ok(Project {
            branches: self
                .branches
                .iter()
                .filter(|b| b.id() != branch_id)
                .cloned()
                .collect(),
            ..self.clone()
        })
    }

    /// Check the invariants a deserialized project may have lost: branch ids
    /// and names are unique, the active branch exists, and every snapshot is
    /// a well-formed tree (see [`Tree::validate`]).
    pub fn validate(&self) -> HistoryResult<()> {
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for branch in &self.branches {
            if !ids.insert(branch.id()) {
                return Err(HistoryError::InvalidProject {
                    reason: format!("duplicate branch id {}", branch.id()),
                });
            }
            if !names.insert(branch.name()) {
                return Err(HistoryError::InvalidProject {
                    reason: format!("duplicate branch name {}", branch.name()),
                });
            }
        }
        if !ids.contains(&self.current_branch_id) {
            return Err(HistoryError::InvalidProject {
                reason: format!("current branch {} is missing", self.current_branch_id),
            });
        }

        let mut checked = HashSet::new();
        let commits = self.branches.iter().flat_map(|b| b.commits());
        for commit in commits {
            if !checked.insert(*commit.id()) {
                continue;
            }
            commit
                .snapshot()
                .validate()
                .map_err(|e| HistoryError::InvalidProject {
                    reason: format!("snapshot of commit {}: {e}", commit.short_id()),
                })?;
        }
        Ok(())
    }

    // Replace the branch with the same id; every other branch is kept as is.
    fn with_branch(&self, branch: Branch) -> Project {
        let branches = self
            .branches
            .iter()
            .map(|b| if b.id() == branch.id() { branch.clone() } else { b.clone() })
            .collect();
        Project {
            branches,
            ..self.clone()
        }
    }
}
