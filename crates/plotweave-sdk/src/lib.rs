//! High-level SDK for Plotweave.
//!
//! [`Session`] is the main entry point for applications embedding Plotweave.
//! It is an explicit handle holding the current [`Project`] value and the
//! uncommitted working tree, backed by any [`ProjectStore`].

pub mod config;
pub mod error;
pub mod session;
pub mod summary;

pub use config::PlotweaveConfig;
pub use error::{SdkError, SdkResult};
pub use session::Session;
pub use summary::{BranchInfo, CommitSummary};

// Re-export key types
pub use plotweave_history::{Branch, Commit, Project};
pub use plotweave_store::{FileProjectStore, InMemoryProjectStore, ProjectStore, ProjectSummary};
pub use plotweave_tree::{Node, NodeKind, Tree};
pub use plotweave_types::{BranchId, CommitId, NodeId, ProjectId, Timestamp};
