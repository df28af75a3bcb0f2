//! The [`Node`] type: one file or one folder.

use std::fmt;
use std::sync::Arc;

use plotweave_types::{NodeId, Timestamp};
use serde::{Deserialize, Serialize};

/// Which of the two node shapes to create.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::File => write!(f, "file"),
            NodeKind::Folder => write!(f, "folder"),
        }
    }
}

/// Payload of a node, determined by its kind.
///
/// Serialized inline with the node as `"type": "file", "content": ...` or
/// `"type": "folder", "children": [...]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeBody {
    /// A text document.
    File { content: String },
    /// An ordered container of child nodes.
    Folder { children: Vec<Arc<Node>> },
}

/// A file or folder entry.
///
/// Fields are read-only; edits go through [`Tree`](crate::Tree) operations,
/// which produce new nodes rather than changing existing ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    id: NodeId,
    name: String,
    parent_id: Option<NodeId>,
    #[serde(flatten)]
    body: NodeBody,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Node {
    /// Create a fresh node: new id, both timestamps set to now, empty
    /// content for files and no children for folders.
    pub fn new(kind: NodeKind, name: impl Into<String>, parent_id: Option<NodeId>) -> Self {
        let now = Timestamp::now();
        let body = match kind {
            NodeKind::File => NodeBody::File {
                content: String::new(),
            },
            NodeKind::Folder => NodeBody::Folder {
                children: Vec::new(),
            },
        };
        Self {
            id: NodeId::new(),
            name: name.into(),
            parent_id,
            body,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The containing folder, or `None` for a root-level node.
    pub fn parent_id(&self) -> Option<&NodeId> {
        self.parent_id.as_ref()
    }

    pub fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::File { .. } => NodeKind::File,
            NodeBody::Folder { .. } => NodeKind::Folder,
        }
    }

    pub fn body(&self) -> &NodeBody {
        &self.body
    }

    pub fn is_file(&self) -> bool {
        matches!(self.body, NodeBody::File { .. })
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.body, NodeBody::Folder { .. })
    }

    /// File text, or `None` for a folder.
    pub fn content(&self) -> Option<&str> {
        match &self.body {
            NodeBody::File { content } => Some(content),
            NodeBody::Folder { .. } => None,
        }
    }

    /// Folder children, or `None` for a file (never an empty slice).
    pub fn children(&self) -> Option<&[Arc<Node>]> {
        match &self.body {
            NodeBody::File { .. } => None,
            NodeBody::Folder { children } => Some(children),
        }
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // Cloning a node is shallow: children are shared `Arc`s.
    pub(crate) fn with_children(&self, children: Vec<Arc<Node>>) -> Node {
        Node {
            body: NodeBody::Folder { children },
            ..self.clone()
        }
    }

    pub(crate) fn with_content(&self, content: String) -> Node {
        Node {
            body: NodeBody::File { content },
            updated_at: self.updated_at.advanced(),
            ..self.clone()
        }
    }

    pub(crate) fn with_name(&self, name: String) -> Node {
        Node {
            name,
            updated_at: self.updated_at.advanced(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_file_has_empty_content_and_no_children() {
        let node = Node::new(NodeKind::File, "Chapter 1.txt", None);
        assert_eq!(node.kind(), NodeKind::File);
        assert_eq!(node.content(), Some(""));
        assert!(node.children().is_none());
        assert_eq!(node.created_at(), node.updated_at());
    }

    #[test]
    fn new_folder_has_children_and_no_content() {
        let parent = NodeId::new();
        let node = Node::new(NodeKind::Folder, "Characters", Some(parent));
        assert!(node.is_folder());
        assert!(node.content().is_none());
        assert_eq!(node.children().map(<[_]>::len), Some(0));
        assert_eq!(node.parent_id(), Some(&parent));
    }

    #[test]
    fn with_content_advances_updated_at() {
        let node = Node::new(NodeKind::File, "a.txt", None);
        let edited = node.with_content("hello".into());
        assert_eq!(edited.id(), node.id());
        assert_eq!(edited.content(), Some("hello"));
        assert!(edited.updated_at() > node.updated_at());
        assert_eq!(edited.created_at(), node.created_at());
    }

    #[test]
    fn with_name_keeps_body() {
        let node = Node::new(NodeKind::File, "a.txt", None).with_content("x".into());
        let renamed = node.with_name("b.txt".into());
        assert_eq!(renamed.name(), "b.txt");
        assert_eq!(renamed.content(), Some("x"));
        assert!(renamed.updated_at() > node.updated_at());
    }

    #[test]
    fn file_serializes_with_type_tag() {
        let node = Node::new(NodeKind::File, "a.txt", None);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["content"], "");
        assert!(json.get("children").is_none());
        assert!(json.get("parentId").is_some());
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn folder_serde_roundtrip() {
        let child = Node::new(NodeKind::File, "inner.txt", None);
        let folder = Node::new(NodeKind::Folder, "dir", None).with_children(vec![Arc::new(child)]);
        let json = serde_json::to_string(&folder).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, folder);
    }
}
