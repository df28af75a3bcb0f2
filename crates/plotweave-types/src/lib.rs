//! Foundation types for Plotweave.
//!
//! Every other Plotweave crate depends on `plotweave-types`. It holds the
//! opaque identifiers used across the tree, history and storage layers, and
//! the millisecond [`Timestamp`] stamped on nodes and commits.
//!
//! # Key Types
//!
//! - [`NodeId`]: identifies a file or folder inside a tree
//! - [`CommitId`]: identifies an immutable commit
//! - [`BranchId`]: identifies a branch inside a project
//! - [`ProjectId`]: identifies a project in a store
//! - [`Timestamp`]: wall-clock milliseconds since the UNIX epoch

pub mod error;
pub mod id;
pub mod temporal;

pub use error::TypeError;
pub use id::{BranchId, CommitId, NodeId, ProjectId, SHORT_ID_LEN};
pub use temporal::Timestamp;
