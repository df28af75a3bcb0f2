//! Versioned history for Plotweave.
//!
//! A [`Project`] owns a set of [`Branch`]es; each branch is an append-only,
//! oldest-first sequence of [`Commit`]s; each commit freezes a snapshot of a
//! [`Tree`](plotweave_tree::Tree).
//!
//! # Architecture
//!
//! - **Commits** are immutable once built. The snapshot is a tree value, and
//!   tree values never change after creation.
//! - **Branches** are values too. Appending returns a new branch that shares
//!   the existing commits (`Arc<Commit>`) with the old one; the old value stays
//!   valid for anyone holding it.
//! - **Projects** replace one branch at a time when recording a commit;
//!   every other branch is carried over untouched.
//!
//! # Modules
//!
//! - [`error`]: Error types for history operations
//! - [`commit`]: [`Commit`] and the default author
//! - [`branch`]: [`Branch`] and its lifecycle states
//! - [`project`]: [`Project`], the aggregate root
//! - [`names`]: Branch name validation

pub mod branch;
pub mod commit;
pub mod error;
pub mod names;
pub mod project;

pub use branch::{Branch, BranchState};
pub use commit::{Commit, DEFAULT_AUTHOR};
pub use error::{HistoryError, HistoryResult};
pub use names::{validate_branch_name, MAX_BRANCH_NAME_LEN};
pub use project::{Project, DEFAULT_BRANCH};
