//! Hierarchical file/folder trees for Plotweave.
//!
//! A [`Tree`] is an ordered forest of root-level [`Node`]s. Each node is
//! either a file holding text or a folder holding ordered children; the two
//! shapes are variants of [`NodeBody`], so a node can never carry both.
//!
//! # Copy-on-write
//!
//! Every edit (`insert`, `set_file_content`, `rename`, `remove`) takes `&self`
//! and returns a new tree. Nodes live behind `Arc` and have no interior
//! mutability: an edit rebuilds only the nodes on the path from the root to
//! the edited node and shares every other subtree with the input. A tree
//! handed to someone else (a commit snapshot, for instance) can therefore
//! never change afterwards.

pub mod error;
pub mod names;
pub mod node;
pub mod tree;

pub use error::{TreeError, TreeResult};
pub use names::validate_node_name;
pub use node::{Node, NodeBody, NodeKind};
pub use tree::{Tree, Walk, MAX_DEPTH};
