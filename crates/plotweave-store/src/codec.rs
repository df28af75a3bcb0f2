//! JSON encoding of whole projects.

use plotweave_history::Project;

use crate::error::{StoreError, StoreResult};

/// Serialize a project to its stored form.
pub fn encode(project: &Project) -> StoreResult<Vec<u8>> {
    Ok(serde_json::to_vec(project)?)
}

/// Deserialize a stored project and check its invariants.
pub fn decode(bytes: &[u8]) -> StoreResult<Project> {
    let project: Project = serde_json::from_slice(bytes)?;
    project
        .validate()
        .map_err(|e| StoreError::CorruptProject {
            id: project.id().to_string(),
            reason: e.to_string(),
        })?;
    Ok(project)
}
