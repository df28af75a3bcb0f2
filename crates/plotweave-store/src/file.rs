//! Directory-backed project store.
//!
//! Layout:
//! ```text
//! <root>/projects.json            index: [{ "id": ..., "name": ... }, ...]
//! <root>/project_<id>.json        one serialized project
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use plotweave_history::Project;
use plotweave_types::ProjectId;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::codec;
use crate::error::{StoreError, StoreResult};
use crate::traits::{upsert_summary, ProjectStore, ProjectSummary};

const INDEX_FILE: &str = "projects.json";

/// Stores each project as a JSON file under a root directory.
#[derive(Debug)]
pub struct FileProjectStore {
    root: PathBuf,
    // Serializes index read-modify-write cycles within this process.
    index_lock: Mutex<()>,
}

impl FileProjectStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "opened project store");
        Ok(Self {
            root,
            index_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_path(&self, id: &ProjectId) -> PathBuf {
        self.root.join(format!("project_{id}.json"))
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    fn read_index(&self) -> StoreResult<Vec<ProjectSummary>> {
        match fs::read(self.index_path()) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_index(&self, index: &[ProjectSummary]) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(index)?;
        self.write_atomic(&self.index_path(), &bytes)
    }

    /// Write to a temp file in the same directory, then rename over `path`.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> StoreResult<()> {
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    fn lock_index(&self) -> StoreResult<std::sync::MutexGuard<'_, ()>> {
        self.index_lock
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}

impl ProjectStore for FileProjectStore {
    fn load(&self, id: &ProjectId) -> StoreResult<Option<Project>> {
        let path = self.project_path(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(project = %id, "project not found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let project = codec::decode(&bytes)?;
        debug!(project = %id, name = %project.name(), "loaded project");
        Ok(Some(project))
    }

    fn save(&self, project: &Project) -> StoreResult<()> {
        let bytes = codec::encode(project)?;
        let _guard = self.lock_index()?;
        self.write_atomic(&self.project_path(project.id()), &bytes)?;

        let mut index = self.read_index()?;
        upsert_summary(&mut index, project);
        self.write_index(&index)?;
        debug!(project = %project.id(), bytes = bytes.len(), "saved project");
        Ok(())
    }

    fn delete(&self, id: &ProjectId) -> StoreResult<bool> {
        let _guard = self.lock_index()?;
        // Data first: a failed removal must leave the project listed.
        let existed = match fs::remove_file(self.project_path(id)) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        let mut index = self.read_index()?;
        let before = index.len();
        index.retain(|p| &p.id != id);
        if index.len() != before {
            self.write_index(&index)?;
        }
        debug!(project = %id, existed, "deleted project");
        Ok(existed)
    }

    fn list(&self) -> StoreResult<Vec<ProjectSummary>> {
        let index = self.read_index()?;
        Ok(index
            .into_iter()
            .filter(|entry| {
                let present = self.project_path(&entry.id).exists();
                if !present {
                    warn!(project = %entry.id, "indexed project has no data file; skipping");
                }
                present
            })
            .collect())
    }
}
