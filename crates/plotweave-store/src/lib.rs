//! Whole-project persistence for Plotweave.
//!
//! A store is a key-value map from [`ProjectId`](plotweave_types::ProjectId)
//! to one serialized [`Project`](plotweave_history::Project), plus an index
//! of the projects it holds. Branches and commits are never stored on their
//! own: every save replaces the whole project value.
//!
//! # Storage Backends
//!
//! All backends implement the [`ProjectStore`] trait:
//!
//! - [`InMemoryProjectStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileProjectStore`] -- one JSON file per project plus `projects.json`
//!
//! # Design Rules
//!
//! 1. `save` and `load` are whole-value replace/read; no field-level writes.
//! 2. Loaded projects are checked with `Project::validate` before use.
//! 3. File writes go to a temp file in the same directory and are renamed
//!    into place, so a crash never leaves a half-written project.

pub mod codec;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileProjectStore;
pub use memory::InMemoryProjectStore;
pub use traits::{ProjectStore, ProjectSummary};
