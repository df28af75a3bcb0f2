use std::collections::HashMap;
use std::sync::RwLock;

use plotweave_history::Project;
use plotweave_types::ProjectId;
use tracing::debug;

use crate::codec;
use crate::error::{StoreError, StoreResult};
use crate::traits::{upsert_summary, ProjectStore, ProjectSummary};

#[derive(Default)]
struct Inner {
    blobs: HashMap<ProjectId, Vec<u8>>,
    index: Vec<ProjectSummary>,
}

/// In-memory, HashMap-based project store.
///
/// Intended for tests and embedding. Projects are kept serialized, so a
/// loaded project never aliases the value that was saved.
pub struct InMemoryProjectStore {
    inner: RwLock<Inner>,
}

impl InMemoryProjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Number of projects currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.blobs.len())
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.blobs.is_empty())
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}

impl Default for InMemoryProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectStore for InMemoryProjectStore {
    fn load(&self, id: &ProjectId) -> StoreResult<Option<Project>> {
        let inner = self.read()?;
        inner.blobs.get(id).map(|bytes| codec::decode(bytes)).transpose()
    }

    fn save(&self, project: &Project) -> StoreResult<()> {
        let bytes = codec::encode(project)?;
        let mut inner = self.write()?;
        debug!(project = %project.id(), bytes = bytes.len(), "saved project");
        inner.blobs.insert(*project.id(), bytes);
        upsert_summary(&mut inner.index, project);
        Ok(())
    }

    fn delete(&self, id: &ProjectId) -> StoreResult<bool> {
        let mut inner = self.write()?;
        inner.index.retain(|p| &p.id != id);
        Ok(inner.blobs.remove(id).is_some())
    }

    fn list(&self) -> StoreResult<Vec<ProjectSummary>> {
        Ok(self.read()?.index.clone())
    }
}

impl std::fmt::Debug for InMemoryProjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len().unwrap_or_default();
        f.debug_struct("InMemoryProjectStore")
            .field("project_count", &count)
            .finish()
    }
}
