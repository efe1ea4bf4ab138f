//! Core types for comment threading.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a comment. Unique within a commented entity.
pub type CommentId = u64;

/// Parent id used by top-level comments.
pub const ROOT: CommentId = 0;

/// Opaque key naming the entity a set of comments is attached to.
///
/// The library never interprets the key; it is carried for diagnostics so
/// log output can be tied back to the host's entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EntityKey {
    /// Host entity type (e.g. `"node"`)
    pub entity_type: String,
    /// Host entity id
    pub entity_id: u64,
}

impl EntityKey {
    /// Create a new entity key.
    pub fn new(entity_type: impl Into<String>, entity_id: u64) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id,
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity_type, self.entity_id)
    }
}

/// A flat comment snapshot as supplied by the host.
///
/// Only the fields threading depends on are carried. Subject, body and any
/// other content stay with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Comment id
    pub id: CommentId,
    /// Parent comment id, or [`ROOT`] for top-level comments
    #[serde(default)]
    pub parent_id: CommentId,
    /// Creation time (Unix seconds)
    pub created_at: i64,
}

impl CommentRecord {
    /// Create a new comment record.
    pub fn new(id: CommentId, parent_id: CommentId, created_at: i64) -> Self {
        Self {
            id,
            parent_id,
            created_at,
        }
    }

    /// Create a top-level comment record.
    pub fn top_level(id: CommentId, created_at: i64) -> Self {
        Self::new(id, ROOT, created_at)
    }

    /// Check if this comment is a reply (declares a parent).
    pub fn is_reply(&self) -> bool {
        self.parent_id != ROOT
    }
}

/// A node in the comment tree, containing a comment and its replies.
///
/// Children refer to their parent only through `parent_id`; there are no
/// back links.
///
/// Dropping a node releases its subtree without recursion. The derived
/// `Clone`, `PartialEq` and `Debug` impls still recurse once per level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    /// Comment id
    pub id: CommentId,
    /// Declared parent id as it appeared in the snapshot
    pub parent_id: CommentId,
    /// Creation time (Unix seconds)
    pub created_at: i64,
    /// Direct replies, oldest first
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    /// Create a new node with no children.
    pub fn new(record: CommentRecord) -> Self {
        Self {
            id: record.id,
            parent_id: record.parent_id,
            created_at: record.created_at,
            children: Vec::new(),
        }
    }

    /// The flat record this node was built from.
    pub fn record(&self) -> CommentRecord {
        CommentRecord::new(self.id, self.parent_id, self.created_at)
    }

    /// Get the number of direct replies.
    pub fn reply_count(&self) -> usize {
        self.children.len()
    }

    /// Check if this comment has any replies.
    pub fn has_replies(&self) -> bool {
        !self.children.is_empty()
    }

    /// Find a node by id in this subtree.
    pub fn find(&self, id: CommentId) -> Option<&CommentNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter());
        }
        None
    }

    /// Count all nodes in this subtree, including this one.
    pub fn count_nodes(&self) -> usize {
        self.iter().count()
    }

    /// Get the maximum depth of the subtree (0 if no replies).
    pub fn max_depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            for child in &node.children {
                stack.push((child, depth + 1));
            }
        }
        max
    }

    /// Iterate over this node and all descendants (depth-first, pre-order).
    pub fn iter(&self) -> CommentIterator<'_> {
        CommentIterator::new(std::slice::from_ref(self))
    }
}

impl Drop for CommentNode {
    fn drop(&mut self) {
        // Detach descendants onto a heap stack so each node drops childless
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// The comment tree of one entity: every top-level comment with its replies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentTree {
    roots: Vec<CommentNode>,
}

impl CommentTree {
    /// Create a tree from top-level nodes.
    pub fn new(roots: Vec<CommentNode>) -> Self {
        Self { roots }
    }

    /// Top-level comments, oldest first.
    pub fn roots(&self) -> &[CommentNode] {
        &self.roots
    }

    /// Consume the tree, returning its top-level nodes.
    pub fn into_roots(self) -> Vec<CommentNode> {
        self.roots
    }

    /// Total number of comments in the tree.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Check if the tree has no comments.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Find a comment by id anywhere in the tree.
    pub fn find(&self, id: CommentId) -> Option<&CommentNode> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    /// Depth of the deepest reply (0 when every comment is top-level).
    pub fn max_depth(&self) -> usize {
        self.roots.iter().map(|r| r.max_depth()).max().unwrap_or(0)
    }

    /// All comment ids in display order.
    pub fn ids(&self) -> Vec<CommentId> {
        self.iter().map(|n| n.id).collect()
    }

    /// Iterate over all comments in display order (depth-first, pre-order).
    pub fn iter(&self) -> CommentIterator<'_> {
        CommentIterator::new(&self.roots)
    }
}

impl<'a> IntoIterator for &'a CommentTree {
    type Item = &'a CommentNode;
    type IntoIter = CommentIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over comment nodes (depth-first, pre-order).
pub struct CommentIterator<'a> {
    stack: Vec<&'a CommentNode>,
}

impl<'a> CommentIterator<'a> {
    fn new(nodes: &'a [CommentNode]) -> Self {
        // Reverse so the first node is popped first
        Self {
            stack: nodes.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for CommentIterator<'a> {
    type Item = &'a CommentNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order so they're processed left-to-right
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}
