//! The [`Tree`] type and its copy-on-write operations.

use std::collections::HashSet;
use std::sync::Arc;

use plotweave_types::NodeId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TreeError, TreeResult};
use crate::names::validate_node_name;
use crate::node::{Node, NodeKind};

/// Maximum nesting of nodes: root-level nodes are at level 1.
///
/// Stored projects are decoded with a bounded nesting depth; trees within
/// this limit always load back.
pub const MAX_DEPTH: usize = 32;

/// An ordered forest of root-level nodes.
///
/// Cloning a tree is cheap: it copies the root `Arc`s, not the nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    roots: Vec<Arc<Node>>,
}

impl Tree {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Root-level nodes in order.
    pub fn roots(&self) -> &[Arc<Node>] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Depth-first, pre-order traversal yielding `(depth, node)`.
    pub fn iter(&self) -> Walk<'_> {
        Walk::new(&self.roots)
    }

    /// Find a node by id, depth-first. The first match in traversal order
    /// wins.
    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        self.iter().map(|(_, node)| node).find(|node| node.id() == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.find(id).is_some()
    }

    /// Resolve a `/`-separated path of node names, e.g. `Characters/Ch1.txt`.
    ///
    /// Each segment matches the first child with that name. Empty segments
    /// are ignored; an empty path resolves to nothing.
    pub fn find_by_path(&self, path: &str) -> Option<&Node> {
        let mut level: &[Arc<Node>] = &self.roots;
        let mut found = None;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let node = level.iter().find(|n| n.name() == segment)?;
            level = node.children().unwrap_or(&[]);
            found = Some(node.as_ref());
        }
        found
    }

    /// The `/`-separated name path of a node.
    pub fn path_of(&self, id: &NodeId) -> Option<String> {
        fn search(nodes: &[Arc<Node>], id: &NodeId, prefix: &mut Vec<String>) -> bool {
            for node in nodes {
                prefix.push(node.name().to_string());
                if node.id() == id {
                    return true;
                }
                if let Some(children) = node.children() {
                    if search(children, id, prefix) {
                        return true;
                    }
                }
                prefix.pop();
            }
            false
        }

        let mut segments = Vec::new();
        search(&self.roots, id, &mut segments).then(|| segments.join("/"))
    }

    /// Create a new node and return a tree with it appended, plus the new
    /// node's id.
    ///
    /// With no `parent_id` the node goes to root level. Otherwise the parent
    /// must be a folder anywhere in the tree, at most `MAX_DEPTH - 1` levels
    /// deep. The name must pass [`validate_node_name`]. On failure `self` is
    /// left as it was.
    pub fn insert(
        &self,
        name: impl Into<String>,
        kind: NodeKind,
        parent_id: Option<&NodeId>,
    ) -> TreeResult<(Tree, NodeId)> {
        let name = name.into();
        validate_node_name(&name)?;
        if let Some(level) = parent_id.and_then(|id| self.level_of(id)) {
            if level >= MAX_DEPTH {
                return Err(TreeError::TooDeep { max: MAX_DEPTH });
            }
        }
        let node = Node::new(kind, name, parent_id.copied());
        let id = *node.id();
        let tree = self.insert_node(node)?;
        debug!(node = %id.short_id(), %kind, "inserted node");
        Ok((tree, id))
    }

    fn insert_node(&self, node: Node) -> TreeResult<Tree> {
        let Some(parent_id) = node.parent_id().copied() else {
            let mut roots = self.roots.clone();
            roots.push(Arc::new(node));
            return Ok(Tree { roots });
        };

        let mut node = Some(node);
        self.edit(&parent_id, |parent| {
            let Some(children) = parent.children() else {
                return Err(TreeError::NotAFolder { id: parent_id });
            };
            let mut children = children.to_vec();
            children.extend(node.take().map(Arc::new));
            Ok(parent.with_children(children))
        })
    }

    /// Replace a file's content, advancing its `updated_at`.
    pub fn set_file_content(&self, file_id: &NodeId, content: impl Into<String>) -> TreeResult<Tree> {
        let mut content = Some(content.into());
        self.edit(file_id, |node| {
            if !node.is_file() {
                return Err(TreeError::NotAFile { id: *file_id });
            }
            Ok(node.with_content(content.take().unwrap_or_default()))
        })
    }

    /// Rename a node, advancing its `updated_at`. The name must pass
    /// [`validate_node_name`].
    pub fn rename(&self, node_id: &NodeId, name: impl Into<String>) -> TreeResult<Tree> {
        let name = name.into();
        validate_node_name(&name)?;
        let mut name = Some(name);
        self.edit(node_id, |node| Ok(node.with_name(name.take().unwrap_or_default())))
    }

    /// Return a tree without the node (and, for a folder, its subtree).
    ///
    /// Removing an id that is not in the tree returns an equal tree.
    pub fn remove(&self, node_id: &NodeId) -> Tree {
        match remove_in(&self.roots, node_id) {
            Some(roots) => {
                debug!(node = %node_id.short_id(), "removed node");
                Tree { roots }
            }
            None => self.clone(),
        }
    }

    /// Check the structure of a tree built elsewhere, e.g. decoded from
    /// storage: node ids are unique, every `parent_id` names the folder the
    /// node sits in, and nesting stays within [`MAX_DEPTH`].
    pub fn validate(&self) -> TreeResult<()> {
        let mut seen = HashSet::new();
        let mut stack: Vec<(usize, Option<NodeId>, &Node)> =
            self.roots.iter().map(|n| (1, None, n.as_ref())).collect();
        while let Some((level, parent, node)) = stack.pop() {
            if !seen.insert(*node.id()) {
                return Err(TreeError::DuplicateId { id: *node.id() });
            }
            if node.parent_id() != parent.as_ref() {
                return Err(TreeError::ParentMismatch {
                    id: *node.id(),
                    recorded: node.parent_id().copied(),
                    actual: parent,
                });
            }
            if level > MAX_DEPTH {
                return Err(TreeError::TooDeep { max: MAX_DEPTH });
            }
            if let Some(children) = node.children() {
                stack.extend(children.iter().map(|c| (level + 1, Some(*node.id()), c.as_ref())));
            }
        }
        Ok(())
    }

    // 1-based nesting level of a node.
    fn level_of(&self, id: &NodeId) -> Option<usize> {
        self.iter()
            .find(|(_, node)| node.id() == id)
            .map(|(depth, _)| depth + 1)
    }

    /// Rebuild the path from the root to `id`, replacing that node with the
    /// result of `edit`. Every subtree off the path is shared.
    fn edit<F>(&self, id: &NodeId, mut edit: F) -> TreeResult<Tree>
    where
        F: FnMut(&Node) -> TreeResult<Node>,
    {
        match replace_in(&self.roots, id, &mut edit)? {
            Some(roots) => Ok(Tree { roots }),
            None => Err(TreeError::NodeNotFound { id: *id }),
        }
    }
}

impl FromIterator<Node> for Tree {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Tree {
            roots: iter.into_iter().map(Arc::new).collect(),
        }
    }
}

fn replace_in(
    nodes: &[Arc<Node>],
    id: &NodeId,
    edit: &mut dyn FnMut(&Node) -> TreeResult<Node>,
) -> TreeResult<Option<Vec<Arc<Node>>>> {
    for (idx, node) in nodes.iter().enumerate() {
        let replacement = if node.id() == id {
            edit(node.as_ref())?
        } else if let Some(children) = node.children() {
            match replace_in(children, id, edit)? {
                Some(children) => node.with_children(children),
                None => continue,
            }
        } else {
            continue;
        };
        let mut out = nodes.to_vec();
        out[idx] = Arc::new(replacement);
        return Ok(Some(out));
    }
    Ok(None)
}

fn remove_in(nodes: &[Arc<Node>], id: &NodeId) -> Option<Vec<Arc<Node>>> {
    for (idx, node) in nodes.iter().enumerate() {
        if node.id() == id {
            let mut out = nodes.to_vec();
            out.remove(idx);
            return Some(out);
        }
        if let Some(children) = node.children() {
            if let Some(children) = remove_in(children, id) {
                let mut out = nodes.to_vec();
                out[idx] = Arc::new(node.with_children(children));
                return Some(out);
            }
        }
    }
    None
}

/// Depth-first iterator over a tree. See [`Tree::iter`].
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Node)>,
}

impl<'a> Walk<'a> {
    fn new(roots: &'a [Arc<Node>]) -> Self {
        Self {
            stack: roots.iter().rev().map(|n| (0, n.as_ref())).collect(),
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        if let Some(children) = node.children() {
            self.stack
                .extend(children.iter().rev().map(|c| (depth + 1, c.as_ref())));
        }
        Some((depth, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds `[Characters/{Ch1.txt}, notes.txt]` and returns the ids.
    fn sample() -> (Tree, NodeId, NodeId, NodeId) {
        let (tree, folder) = Tree::new().insert("Characters", NodeKind::Folder, None).unwrap();
        let (tree, file) = tree.insert("Ch1.txt", NodeKind::File, Some(&folder)).unwrap();
        let (tree, notes) = tree.insert("notes.txt", NodeKind::File, None).unwrap();
        (tree, folder, file, notes)
    }

    #[test]
    fn find_missing_returns_none() {
        let (tree, ..) = sample();
        assert!(tree.find(&NodeId::new()).is_none());
        assert!(Tree::new().find(&NodeId::new()).is_none());
    }

    #[test]
    fn insert_at_root_appends() {
        let (tree, folder, _, notes) = sample();
        let ids: Vec<_> = tree.roots().iter().map(|n| *n.id()).collect();
        assert_eq!(ids, vec![folder, notes]);
    }

    #[test]
    fn insert_into_nested_folder() {
        let (tree, folder, ..) = sample();
        let (tree, sub) = tree.insert("Villains", NodeKind::Folder, Some(&folder)).unwrap();
        let (tree, deep) = tree.insert("Moriarty.txt", NodeKind::File, Some(&sub)).unwrap();

        let node = tree.find(&deep).unwrap();
        assert_eq!(node.parent_id(), Some(&sub));
        assert_eq!(tree.path_of(&deep).unwrap(), "Characters/Villains/Moriarty.txt");
    }

    #[test]
    fn insert_under_file_fails_and_leaves_tree() {
        let (tree, _, file, _) = sample();
        let before = tree.clone();
        let err = tree.insert("x", NodeKind::File, Some(&file)).unwrap_err();
        assert_eq!(err, TreeError::NotAFolder { id: file });
        assert_eq!(tree, before);
    }

    #[test]
    fn insert_under_missing_parent_fails() {
        let (tree, ..) = sample();
        let ghost = NodeId::new();
        let err = tree.insert("x", NodeKind::File, Some(&ghost)).unwrap_err();
        assert_eq!(err, TreeError::NodeNotFound { id: ghost });
    }

    #[test]
    fn insert_leaves_input_untouched() {
        let (tree, folder, ..) = sample();
        let count = tree.node_count();
        let (bigger, _) = tree.insert("more.txt", NodeKind::File, Some(&folder)).unwrap();
        assert_eq!(tree.node_count(), count);
        assert_eq!(bigger.node_count(), count + 1);
    }

    #[test]
    fn set_file_content_replaces_content() {
        let (tree, _, file, _) = sample();
        let edited = tree.set_file_content(&file, "draft").unwrap();
        let node = edited.find(&file).unwrap();
        assert_eq!(node.content(), Some("draft"));
        assert!(node.updated_at() > tree.find(&file).unwrap().updated_at());
        assert_eq!(tree.find(&file).unwrap().content(), Some(""));
    }

    #[test]
    fn set_file_content_on_folder_fails() {
        let (tree, folder, ..) = sample();
        let err = tree.set_file_content(&folder, "x").unwrap_err();
        assert_eq!(err, TreeError::NotAFile { id: folder });
    }

    #[test]
    fn set_file_content_on_missing_fails() {
        let (tree, ..) = sample();
        let ghost = NodeId::new();
        assert_eq!(
            tree.set_file_content(&ghost, "x").unwrap_err(),
            TreeError::NodeNotFound { id: ghost }
        );
    }

    #[test]
    fn edit_shares_untouched_subtrees() {
        let (tree, _, _, notes) = sample();
        let edited = tree.set_file_content(&notes, "changed").unwrap();
        // The Characters folder is off the edited path.
        assert!(Arc::ptr_eq(&tree.roots()[0], &edited.roots()[0]));
        assert!(!Arc::ptr_eq(&tree.roots()[1], &edited.roots()[1]));
    }

    #[test]
    fn rename_changes_name_only() {
        let (tree, folder, file, _) = sample();
        let renamed = tree.rename(&folder, "People").unwrap();
        let node = renamed.find(&folder).unwrap();
        assert_eq!(node.name(), "People");
        assert!(renamed.find(&file).is_some());
        assert_eq!(renamed.path_of(&file).unwrap(), "People/Ch1.txt");
    }

    #[test]
    fn remove_folder_removes_subtree() {
        let (tree, folder, file, notes) = sample();
        let pruned = tree.remove(&folder);
        assert!(pruned.find(&folder).is_none());
        assert!(pruned.find(&file).is_none());
        assert!(pruned.find(&notes).is_some());
        assert_eq!(pruned.roots().len(), 1);
    }

    #[test]
    fn remove_nested_keeps_ancestors() {
        let (tree, folder, file, _) = sample();
        let pruned = tree.remove(&file);
        let parent = pruned.find(&folder).unwrap();
        assert_eq!(parent.children().map(<[_]>::len), Some(0));
    }

    #[test]
    fn remove_missing_is_noop() {
        let (tree, ..) = sample();
        assert_eq!(tree.remove(&NodeId::new()), tree);
    }

    #[test]
    fn remove_one_root_among_many() {
        let (tree, folder, _, notes) = sample();
        let (tree, extra) = tree.insert("extra.txt", NodeKind::File, None).unwrap();
        let pruned = tree.remove(&notes);
        let ids: Vec<_> = pruned.roots().iter().map(|n| *n.id()).collect();
        assert_eq!(ids, vec![folder, extra]);
    }

    #[test]
    fn walk_is_preorder_with_depth() {
        let (tree, ..) = sample();
        let names: Vec<_> = tree.iter().map(|(d, n)| (d, n.name().to_string())).collect();
        assert_eq!(
            names,
            vec![
                (0, "Characters".to_string()),
                (1, "Ch1.txt".to_string()),
                (0, "notes.txt".to_string()),
            ]
        );
    }

    #[test]
    fn find_by_path_resolves_names() {
        let (tree, _, file, notes) = sample();
        assert_eq!(tree.find_by_path("Characters/Ch1.txt").unwrap().id(), &file);
        assert_eq!(tree.find_by_path("/notes.txt").unwrap().id(), &notes);
        assert!(tree.find_by_path("notes.txt/anything").is_none());
        assert!(tree.find_by_path("").is_none());
    }

    #[test]
    fn file_children_are_absent_not_empty() {
        let (tree, _, file, _) = sample();
        assert!(tree.find(&file).unwrap().children().is_none());
    }

    #[test]
    fn insert_rejects_unaddressable_names() {
        let (tree, folder, ..) = sample();
        for name in ["", "  ", "Act I/Ch1.txt"] {
            assert!(matches!(
                tree.insert(name, NodeKind::File, Some(&folder)),
                Err(TreeError::InvalidName { .. })
            ));
        }
    }

    #[test]
    fn rename_rejects_unaddressable_names() {
        let (tree, _, file, _) = sample();
        assert!(matches!(
            tree.rename(&file, "Act I/Chapter 1.txt"),
            Err(TreeError::InvalidName { .. })
        ));
        assert!(matches!(tree.rename(&file, ""), Err(TreeError::InvalidName { .. })));
        assert_eq!(tree.find_by_path("Characters/Ch1.txt").unwrap().id(), &file);
    }

    /// A chain of `levels` nested folders; returns the tree and the deepest id.
    fn nested(levels: usize) -> (Tree, NodeId) {
        let (mut tree, mut last) = Tree::new().insert("level", NodeKind::Folder, None).unwrap();
        for _ in 1..levels {
            let (next, id) = tree.insert("level", NodeKind::Folder, Some(&last)).unwrap();
            tree = next;
            last = id;
        }
        (tree, last)
    }

    #[test]
    fn insert_stops_at_max_depth() {
        let (tree, deepest) = nested(MAX_DEPTH);
        assert_eq!(tree.iter().map(|(d, _)| d + 1).max(), Some(MAX_DEPTH));
        assert_eq!(
            tree.insert("one-too-many.txt", NodeKind::File, Some(&deepest)).unwrap_err(),
            TreeError::TooDeep { max: MAX_DEPTH }
        );
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn validate_accepts_built_trees() {
        let (tree, ..) = sample();
        assert!(tree.validate().is_ok());
        assert!(Tree::new().validate().is_ok());
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let node = Node::new(NodeKind::File, "twin.txt", None);
        let id = *node.id();
        let tree: Tree = [node.clone(), node].into_iter().collect();
        assert_eq!(tree.validate().unwrap_err(), TreeError::DuplicateId { id });
    }

    #[test]
    fn validate_rejects_misplaced_parent() {
        let stray = Node::new(NodeKind::File, "stray.txt", Some(NodeId::new()));
        let id = *stray.id();
        let tree: Tree = std::iter::once(stray).collect();
        assert!(matches!(
            tree.validate(),
            Err(TreeError::ParentMismatch { id: bad, actual: None, .. }) if bad == id
        ));
    }

    #[test]
    fn tree_serializes_as_node_array() {
        let (tree, ..) = sample();
        let json = serde_json::to_value(&tree).unwrap();
        let roots = json.as_array().unwrap();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0]["type"], "folder");
        assert_eq!(roots[0]["children"][0]["name"], "Ch1.txt");
        let back: Tree = serde_json::from_value(json).unwrap();
        assert_eq!(back, tree);
    }
}
