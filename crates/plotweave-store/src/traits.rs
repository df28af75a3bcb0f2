use plotweave_history::Project;
use plotweave_types::ProjectId;
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// Index entry for one stored project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
}

impl ProjectSummary {
    pub fn of(project: &Project) -> Self {
        Self {
            id: *project.id(),
            name: project.name().to_string(),
        }
    }
}

/// Whole-project persistence.
///
/// All implementations must satisfy these invariants:
/// - `save` atomically replaces the stored value and registers the project in
///   the index (keeping index order, updating the name).
/// - `load` returns exactly what the last `save` wrote, or `None`.
/// - `delete` removes both the value and the index entry.
pub trait ProjectStore: Send + Sync {
    /// Load a project by id.
    ///
    /// Returns `Ok(None)` if the project does not exist.
    fn load(&self, id: &ProjectId) -> StoreResult<Option<Project>>;

    /// Save (create or replace) a project.
    fn save(&self, project: &Project) -> StoreResult<()>;

    /// Delete a project. Returns `true` if it existed.
    fn delete(&self, id: &ProjectId) -> StoreResult<bool>;

    /// All stored projects, in the order they were first saved.
    fn list(&self) -> StoreResult<Vec<ProjectSummary>>;

    /// Whether a project with this id exists.
    fn exists(&self, id: &ProjectId) -> StoreResult<bool> {
        Ok(self.list()?.iter().any(|p| &p.id == id))
    }
}

/// Insert or rename `project` in an index, keeping first-save order.
pub(crate) fn upsert_summary(index: &mut Vec<ProjectSummary>, project: &Project) {
    match index.iter_mut().find(|p| &p.id == project.id()) {
        Some(entry) => entry.name = project.name().to_string(),
        None => index.push(ProjectSummary::of(project)),
    }
}
