//! The [`Branch`] type: a named, append-only sequence of commits.

use std::sync::Arc;

use plotweave_tree::Tree;
use plotweave_types::{BranchId, CommitId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commit::Commit;
use crate::error::{HistoryError, HistoryResult};

/// Where a branch is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchState {
    /// No commits yet. Only the first branch of a brand-new project.
    Empty,
    /// Exactly one commit: the fork point.
    JustForked,
    /// Two or more commits.
    Advancing,
}

/// A named pointer to an immutable, oldest-first chain of commits.
///
/// Appending never changes `self`; it returns a new branch that shares the
/// existing commits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    id: BranchId,
    name: String,
    commits: Vec<Arc<Commit>>,
}

impl Branch {
    /// Create a branch starting at `from`, or with empty history when no
    /// commit is given.
    pub fn create(name: impl Into<String>, from: Option<Arc<Commit>>) -> Self {
        Self {
            id: BranchId::new(),
            name: name.into(),
            commits: from.into_iter().collect(),
        }
    }

    pub fn id(&self) -> &BranchId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All commits, oldest first.
    pub fn commits(&self) -> &[Arc<Commit>] {
        &self.commits
    }

    /// Commits newest first, for history display.
    pub fn history(&self) -> impl DoubleEndedIterator<Item = &Arc<Commit>> + '_ {
        self.commits.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn state(&self) -> BranchState {
        match self.commits.len() {
            0 => BranchState::Empty,
            1 => BranchState::JustForked,
            _ => BranchState::Advancing,
        }
    }

    /// The most recent commit.
    pub fn head(&self) -> HistoryResult<&Arc<Commit>> {
        self.commits.last().ok_or_else(|| HistoryError::EmptyHistory {
            branch: self.name.clone(),
        })
    }

    /// The head commit's id, or `None` for an empty branch.
    pub fn head_id(&self) -> Option<&CommitId> {
        self.commits.last().map(|c| c.id())
    }

    /// The head snapshot, or an empty tree when there are no commits yet.
    pub fn tree(&self) -> Tree {
        self.commits
            .last()
            .map(|c| c.snapshot().clone())
            .unwrap_or_default()
    }

    /// Find a commit on this branch by id.
    pub fn commit(&self, id: &CommitId) -> Option<&Arc<Commit>> {
        self.commits.iter().find(|c| c.id() == id)
    }

    /// Return a new branch with `commit` appended.
    pub fn append_commit(&self, commit: impl Into<Arc<Commit>>) -> Branch {
        let commit = commit.into();
        debug!(
            branch = %self.name,
            commit = %commit.short_id(),
            len = self.commits.len() + 1,
            "appended commit"
        );
        let mut commits = Vec::with_capacity(self.commits.len() + 1);
        commits.extend(self.commits.iter().cloned());
        commits.push(commit);
        Branch {
            id: self.id,
            name: self.name.clone(),
            commits,
        }
    }

    /// Append only if the head is still `expected_head`.
    ///
    /// `None` expects an empty branch. Fails with
    /// [`HistoryError::Conflict`] when the head has moved.
    pub fn append_commit_expecting(
        &self,
        expected_head: Option<&CommitId>,
        commit: impl Into<Arc<Commit>>,
    ) -> HistoryResult<Branch> {
        let actual = self.head_id();
        if actual != expected_head {
            return Err(HistoryError::Conflict {
                branch: self.name.clone(),
                expected: expected_head.copied(),
                actual: actual.copied(),
            });
        }
        Ok(self.append_commit(commit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotweave_tree::NodeKind;

    fn commit(message: &str) -> Arc<Commit> {
        Arc::new(Commit::new(message, &Tree::new(), None))
    }

    #[test]
    fn create_from_commit_is_just_forked() {
        let x = commit("x");
        let branch = Branch::create("main", Some(x.clone()));
        assert_eq!(branch.state(), BranchState::JustForked);
        assert_eq!(branch.head().unwrap().id(), x.id());
    }

    #[test]
    fn create_without_commit_is_empty() {
        let branch = Branch::create("main", None);
        assert_eq!(branch.state(), BranchState::Empty);
        assert!(branch.is_empty());
        assert_eq!(
            branch.head().unwrap_err(),
            HistoryError::EmptyHistory {
                branch: "main".into()
            }
        );
        assert!(branch.tree().is_empty());
    }

    #[test]
    fn append_grows_by_one_and_leaves_original() {
        let branch = Branch::create("main", Some(commit("x")));
        let before = branch.clone();
        let next = branch.append_commit(commit("y"));

        assert_eq!(next.len(), branch.len() + 1);
        assert_eq!(branch, before);
        assert_eq!(next.id(), branch.id());
        assert_eq!(next.state(), BranchState::Advancing);
    }

    #[test]
    fn append_shares_prefix() {
        let branch = Branch::create("main", Some(commit("x")));
        let next = branch.append_commit(commit("y"));
        assert!(Arc::ptr_eq(&branch.commits()[0], &next.commits()[0]));
    }

    #[test]
    fn head_after_fork_and_append() {
        let x = commit("x");
        let y = commit("y");
        let branch = Branch::create("alt", Some(x.clone())).append_commit(y.clone());

        assert_eq!(branch.head().unwrap().id(), y.id());
        let ids: Vec<_> = branch.commits().iter().map(|c| *c.id()).collect();
        assert_eq!(ids, vec![*x.id(), *y.id()]);
    }

    #[test]
    fn history_is_newest_first() {
        let branch = Branch::create("main", Some(commit("one")))
            .append_commit(commit("two"))
            .append_commit(commit("three"));
        let messages: Vec<_> = branch.history().map(|c| c.message()).collect();
        assert_eq!(messages, vec!["three", "two", "one"]);
    }

    #[test]
    fn tree_is_head_snapshot() {
        let (tree, _) = Tree::new().insert("a.txt", NodeKind::File, None).unwrap();
        let branch = Branch::create("main", Some(commit("empty")))
            .append_commit(Commit::new("one file", &tree, None));
        assert_eq!(branch.tree(), tree);
    }

    #[test]
    fn expecting_current_head_appends() {
        let x = commit("x");
        let branch = Branch::create("main", Some(x.clone()));
        let next = branch
            .append_commit_expecting(Some(x.id()), commit("y"))
            .unwrap();
        assert_eq!(next.len(), 2);
    }

    #[test]
    fn expecting_stale_head_conflicts() {
        let x = commit("x");
        let y = commit("y");
        let branch = Branch::create("main", Some(x.clone())).append_commit(y.clone());

        let err = branch
            .append_commit_expecting(Some(x.id()), commit("z"))
            .unwrap_err();
        assert_eq!(
            err,
            HistoryError::Conflict {
                branch: "main".into(),
                expected: Some(*x.id()),
                actual: Some(*y.id()),
            }
        );
    }

    #[test]
    fn expecting_none_on_empty_branch_appends() {
        let branch = Branch::create("main", None);
        let next = branch.append_commit_expecting(None, commit("first")).unwrap();
        assert_eq!(next.state(), BranchState::JustForked);
    }

    #[test]
    fn find_commit_by_id() {
        let x = commit("x");
        let branch = Branch::create("main", Some(x.clone())).append_commit(commit("y"));
        assert_eq!(branch.commit(x.id()).unwrap().message(), "x");
        assert!(branch.commit(&CommitId::new()).is_none());
    }
}
