use std::sync::Arc;

use plotweave_history::{Branch, Commit, HistoryError, Project};
use plotweave_store::ProjectStore;
use plotweave_tree::{Node, NodeKind, Tree, TreeError};
use plotweave_types::{BranchId, CommitId, NodeId, ProjectId};
use tracing::{debug, info, warn};

use crate::config::PlotweaveConfig;
use crate::error::{SdkError, SdkResult};
use crate::summary::{BranchInfo, CommitSummary};

/// An editing session over one project.
///
/// Holds the current project value, the working tree being edited, and the
/// active file selection. Edits change only the working tree; `commit`
/// freezes it into history and saves the project to the store.
pub struct Session<S: ProjectStore> {
    store: S,
    config: PlotweaveConfig,
    project: Project,
    working_tree: Tree,
    /// Head of the active branch when the working tree was last reset.
    base_head: Option<CommitId>,
    active_file: Option<NodeId>,
}

impl<S: ProjectStore> Session<S> {
    /// Open the first project in the store, creating and saving a starter
    /// project when the store is empty.
    pub fn open(store: S, config: PlotweaveConfig) -> SdkResult<Self> {
        let first = store.list()?.into_iter().next();
        let existing = match first {
            Some(summary) => store.load(&summary.id)?,
            None => None,
        };
        match existing {
            Some(project) => Ok(Self::with_project(store, config, project)),
            None => {
                info!("no projects found; creating starter project");
                let name = config.project_name.clone();
                Self::create_project(store, config, &name)
            }
        }
    }

    /// Open a specific project.
    pub fn open_project(store: S, config: PlotweaveConfig, id: &ProjectId) -> SdkResult<Self> {
        let project = store
            .load(id)?
            .ok_or_else(|| SdkError::ProjectNotFound(id.to_string()))?;
        Ok(Self::with_project(store, config, project))
    }

    /// Create a starter project named `name`, save it and open it.
    pub fn create_project(store: S, config: PlotweaveConfig, name: &str) -> SdkResult<Self> {
        let project = Project::starter(name, &config.default_branch, Some(config.author()))?;
        store.save(&project)?;
        Ok(Self::with_project(store, config, project))
    }

    fn with_project(store: S, config: PlotweaveConfig, project: Project) -> Self {
        debug!(project = %project.id(), name = %project.name(), "opened session");
        let mut session = Self {
            store,
            config,
            project,
            working_tree: Tree::new(),
            base_head: None,
            active_file: None,
        };
        session.reset_working_tree();
        session
    }

    // ---- Accessors ----

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &PlotweaveConfig {
        &self.config
    }

    pub fn working_tree(&self) -> &Tree {
        &self.working_tree
    }

    pub fn current_branch(&self) -> SdkResult<&Branch> {
        Ok(self.project.current_branch()?)
    }

    /// Whether the working tree differs from the active branch's head.
    pub fn is_dirty(&self) -> bool {
        match self.project.current_branch() {
            Ok(branch) => branch.tree() != self.working_tree,
            Err(_) => true,
        }
    }

    // ---- Working tree ----

    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        self.working_tree.find(id)
    }

    /// Resolve a `/`-separated name path in the working tree.
    pub fn resolve(&self, path: &str) -> SdkResult<&Node> {
        self.working_tree
            .find_by_path(path)
            .ok_or_else(|| SdkError::PathNotFound(path.to_string()))
    }

    pub fn add(&mut self, name: &str, kind: NodeKind, parent: Option<&NodeId>) -> SdkResult<NodeId> {
        let (tree, id) = self.working_tree.insert(name, kind, parent)?;
        self.working_tree = tree;
        Ok(id)
    }

    pub fn add_file(&mut self, name: &str, parent: Option<&NodeId>) -> SdkResult<NodeId> {
        self.add(name, NodeKind::File, parent)
    }

    pub fn add_folder(&mut self, name: &str, parent: Option<&NodeId>) -> SdkResult<NodeId> {
        self.add(name, NodeKind::Folder, parent)
    }

    pub fn write_file(&mut self, id: &NodeId, content: &str) -> SdkResult<()> {
        self.working_tree = self.working_tree.set_file_content(id, content)?;
        Ok(())
    }

    pub fn rename(&mut self, id: &NodeId, name: &str) -> SdkResult<()> {
        self.working_tree = self.working_tree.rename(id, name)?;
        Ok(())
    }

    /// Remove a node; a missing id is a no-op. Clears the selection when the
    /// selected file goes away with it.
    pub fn remove(&mut self, id: &NodeId) {
        self.working_tree = self.working_tree.remove(id);
        if let Some(active) = self.active_file {
            if !self.working_tree.contains(&active) {
                self.active_file = None;
            }
        }
    }

    /// Throw away uncommitted edits.
    pub fn discard_changes(&mut self) {
        if self.is_dirty() {
            warn!("discarding uncommitted changes");
        }
        self.reset_working_tree();
    }

    // ---- Selection ----

    /// Select a file for editing.
    pub fn select_file(&mut self, id: &NodeId) -> SdkResult<()> {
        let node = self
            .working_tree
            .find(id)
            .ok_or(TreeError::NodeNotFound { id: *id })?;
        if !node.is_file() {
            return Err(TreeError::NotAFile { id: *id }.into());
        }
        self.active_file = Some(*id);
        Ok(())
    }

    pub fn active_file(&self) -> Option<&Node> {
        self.active_file.as_ref().and_then(|id| self.working_tree.find(id))
    }

    // ---- History ----

    /// Record the working tree on the active branch and save the project.
    pub fn commit(&mut self, message: &str) -> SdkResult<CommitSummary> {
        let message = message.trim();
        if message.is_empty() {
            return Err(SdkError::EmptyCommitMessage);
        }
        let project = self.project.record_commit_expecting(
            self.base_head.as_ref(),
            message,
            &self.working_tree,
            Some(self.config.author()),
        )?;
        self.store.save(&project)?;
        self.project = project;

        let head = self.project.current_branch()?.head()?;
        self.base_head = Some(*head.id());
        info!(commit = %head.short_id(), message, "committed");
        Ok(CommitSummary::from(head.as_ref()))
    }

    /// Newest-first summaries of the active branch, at most `limit`.
    pub fn log(&self, limit: usize) -> SdkResult<Vec<CommitSummary>> {
        Ok(self
            .current_branch()?
            .history()
            .take(limit)
            .map(|c| CommitSummary::from(c.as_ref()))
            .collect())
    }

    /// Find a commit on the active branch by id prefix.
    pub fn show(&self, prefix: &str) -> SdkResult<Arc<Commit>> {
        let branch = self.current_branch()?;
        let mut matches = branch
            .commits()
            .iter()
            .filter(|c| c.id().to_string().starts_with(prefix));
        let found = matches
            .next()
            .ok_or_else(|| SdkError::CommitNotFound(prefix.to_string()))?;
        let extra = matches.count();
        if extra > 0 {
            return Err(SdkError::AmbiguousCommit {
                prefix: prefix.to_string(),
                matches: extra + 1,
            });
        }
        Ok(Arc::clone(found))
    }

    // ---- Branches ----

    pub fn branches(&self) -> Vec<BranchInfo> {
        let current = self.project.current_branch_id();
        self.project
            .branches()
            .iter()
            .map(|b| BranchInfo::of(b, current))
            .collect()
    }

    /// Fork a branch from the active branch's head and save.
    pub fn create_branch(&mut self, name: &str) -> SdkResult<BranchId> {
        let (project, id) = self.project.create_branch(name)?;
        self.store.save(&project)?;
        self.project = project;
        Ok(id)
    }

    /// Remove a branch by name or id and save.
    pub fn delete_branch(&mut self, branch: &str) -> SdkResult<()> {
        let id = self.branch_id(branch)?;
        let project = self.project.remove_branch(&id)?;
        self.store.save(&project)?;
        self.project = project;
        Ok(())
    }

    /// Switch to a branch by name or id.
    ///
    /// Fails with [`SdkError::UncommittedChanges`] when the working tree has
    /// edits; use [`force_switch_branch`](Self::force_switch_branch) to drop
    /// them.
    pub fn switch_branch(&mut self, branch: &str) -> SdkResult<()> {
        if self.is_dirty() {
            return Err(SdkError::UncommittedChanges {
                branch: self.current_branch()?.name().to_string(),
            });
        }
        self.force_switch_branch(branch)
    }

    /// Switch to a branch, discarding any uncommitted edits.
    pub fn force_switch_branch(&mut self, branch: &str) -> SdkResult<()> {
        let id = self.branch_id(branch)?;
        let project = self.project.switch_branch(&id)?;
        self.store.save(&project)?;
        self.project = project;
        self.reset_working_tree();
        Ok(())
    }

    fn branch_id(&self, branch: &str) -> SdkResult<BranchId> {
        if let Some(found) = self.project.branch_by_name(branch) {
            return Ok(*found.id());
        }
        branch
            .parse::<BranchId>()
            .ok()
            .filter(|id| self.project.branch(id).is_some())
            .ok_or_else(|| {
                HistoryError::BranchNotFound {
                    branch: branch.to_string(),
                }
                .into()
            })
    }

    /// Working tree := active branch tree; selection := first root node if it
    /// is a file.
    fn reset_working_tree(&mut self) {
        let branch = self.project.current_branch().ok();
        self.working_tree = branch.map(Branch::tree).unwrap_or_default();
        self.base_head = branch.and_then(|b| b.head_id().copied());
        self.active_file = self
            .working_tree
            .roots()
            .first()
            .filter(|n| n.is_file())
            .map(|n| *n.id());
    }
}
