//! Tree building and sibling ordering.
//!
//! This module turns a flat snapshot of comments into a tree grouped by
//! parent id, with every level ordered by creation time.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::types::{CommentId, CommentNode, CommentRecord, CommentTree, ROOT};

/// Build the full comment tree of one entity.
///
/// Every comment whose declared parent is not part of the snapshot is
/// attached at root level, so no subtree is silently lost when a parent
/// has already been removed.
///
/// Steps:
/// 1. Indexes all comments by id, rejecting duplicate and self-parented ids
/// 2. Groups comments by their effective parent (declared parent, or root when absent)
/// 3. Checks that every comment is reachable from the root
/// 4. Constructs the tree bottom-up, sorting each level by creation time
///
/// # Example
///
/// ```
/// use comment_rethread::threading::{build_tree, CommentRecord};
///
/// let records = vec![
///     CommentRecord::top_level(1, 100),
///     CommentRecord::new(2, 1, 200),
///     CommentRecord::top_level(3, 300),
/// ];
///
/// let tree = build_tree(&records).unwrap();
/// assert_eq!(tree.roots().len(), 2);
/// assert_eq!(tree.ids(), vec![1, 2, 3]);
/// ```
pub fn build_tree(records: &[CommentRecord]) -> Result<CommentTree> {
    let roots = build_tree_from(records, ROOT)?;
    debug!(
        comments = records.len(),
        top_level = roots.len(),
        "built comment tree"
    );
    Ok(CommentTree::new(roots))
}

/// Build the subtrees hanging off `parent_id`.
///
/// Returns every comment whose effective parent is `parent_id`, each with
/// its replies attached recursively. For [`ROOT`] this includes comments
/// whose declared parent is missing from the snapshot.
pub fn build_tree_from(
    records: &[CommentRecord],
    parent_id: CommentId,
) -> Result<Vec<CommentNode>> {
    let index = ChildIndex::new(records)?;
    Ok(index.build(records, parent_id))
}

/// Sort sibling comments by creation time, oldest first.
///
/// The sort is stable: siblings created at the same instant keep their
/// relative order.
pub fn sort_siblings(nodes: &mut [CommentNode]) {
    nodes.sort_by_key(|node| node.created_at);
}

/// Borrowing variant of [`sort_siblings`] for read-only traversals.
pub(crate) fn sorted_siblings(nodes: &[CommentNode]) -> Vec<&CommentNode> {
    let mut sorted: Vec<&CommentNode> = nodes.iter().collect();
    sorted.sort_by_key(|node| node.created_at);
    sorted
}

/// Validated parent/child index over a slice of records.
///
/// Children are stored as positions into the record slice, grouped by
/// effective parent and kept in input order.
#[derive(Debug, Clone)]
pub(crate) struct ChildIndex {
    positions: HashMap<CommentId, usize>,
    children: HashMap<CommentId, Vec<usize>>,
    ids: Vec<CommentId>,
}

impl ChildIndex {
    pub(crate) fn new(records: &[CommentRecord]) -> Result<Self> {
        let mut positions: HashMap<CommentId, usize> = HashMap::with_capacity(records.len());

        for (idx, record) in records.iter().enumerate() {
            if record.id == ROOT {
                return Err(Error::InconsistentTree(format!(
                    "comment id {ROOT} is reserved for the root"
                )));
            }
            if record.id == record.parent_id {
                return Err(Error::InconsistentTree(format!(
                    "comment {} is its own parent",
                    record.id
                )));
            }
            if positions.insert(record.id, idx).is_some() {
                return Err(Error::InconsistentTree(format!(
                    "duplicate comment id {}",
                    record.id
                )));
            }
        }

        let mut children: HashMap<CommentId, Vec<usize>> = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let parent = if record.parent_id == ROOT || positions.contains_key(&record.parent_id) {
                record.parent_id
            } else {
                warn!(
                    comment_id = record.id,
                    parent_id = record.parent_id,
                    "parent missing from snapshot, attaching comment at root level"
                );
                ROOT
            };
            children.entry(parent).or_default().push(idx);
        }

        let index = Self {
            positions,
            children,
            ids: records.iter().map(|r| r.id).collect(),
        };

        // Anything the root cannot reach sits on a parent cycle
        let reachable = index.descendants(ROOT);
        if reachable.len() != records.len() {
            let mut seen = vec![false; records.len()];
            for (idx, _) in &reachable {
                seen[*idx] = true;
            }
            let mut stranded: Vec<CommentId> = seen
                .iter()
                .enumerate()
                .filter(|(_, reached)| !**reached)
                .map(|(idx, _)| index.ids[idx])
                .collect();
            stranded.sort_unstable();
            return Err(Error::InconsistentTree(format!(
                "parent cycle among comments {stranded:?}"
            )));
        }

        Ok(index)
    }

    /// Position of `id` in the record slice.
    pub(crate) fn position(&self, id: CommentId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Positions of the direct children of `parent`, in input order.
    pub(crate) fn children_of(&self, parent: CommentId) -> &[usize] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Positions and relative depths (1 for direct children) of every
    /// descendant of `parent`, pre-order, children in input order.
    pub(crate) fn descendants(&self, parent: CommentId) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        let mut stack: Vec<(usize, usize)> = self
            .children_of(parent)
            .iter()
            .rev()
            .map(|&idx| (idx, 1))
            .collect();

        while let Some((idx, depth)) = stack.pop() {
            out.push((idx, depth));
            for &child in self.children_of(self.ids[idx]).iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }

    /// Build the subtrees below `parent` bottom-up.
    ///
    /// Deep threads are handled without recursion.
    pub(crate) fn build(&self, records: &[CommentRecord], parent: CommentId) -> Vec<CommentNode> {
        // Phase 1: collect every node below the parent
        let mut nodes_to_build = self.descendants(parent);

        // Phase 2: deepest first so children exist before their parent
        nodes_to_build.sort_by(|a, b| b.1.cmp(&a.1));

        // Phase 3: build nodes bottom-up, storing completed nodes
        let mut built: HashMap<CommentId, CommentNode> =
            HashMap::with_capacity(nodes_to_build.len());
        for (idx, _depth) in nodes_to_build {
            let record = records[idx];
            let mut node = CommentNode::new(record);
            node.children = self.take_children(record.id, &mut built);
            built.insert(record.id, node);
        }

        self.take_children(parent, &mut built)
    }

    fn take_children(
        &self,
        parent: CommentId,
        built: &mut HashMap<CommentId, CommentNode>,
    ) -> Vec<CommentNode> {
        let mut children: Vec<CommentNode> = self
            .children_of(parent)
            .iter()
            .filter_map(|&idx| built.remove(&self.ids[idx]))
            .collect();
        sort_siblings(&mut children);
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: CommentId, parent_id: CommentId, created_at: i64) -> CommentRecord {
        CommentRecord::new(id, parent_id, created_at)
    }

    #[test]
    fn test_build_tree_empty() {
        let tree = build_tree(&[]).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_build_tree_single_comment() {
        let tree = build_tree(&[record(1, ROOT, 10)]).unwrap();
        assert_eq!(tree.roots().len(), 1);
        assert_eq!(tree.roots()[0].id, 1);
        assert!(!tree.roots()[0].has_replies());
    }

    #[test]
    fn test_build_tree_nested_replies() {
        let records = vec![
            record(1, ROOT, 10),
            record(2, 1, 20),
            record(3, 2, 30),
            record(4, ROOT, 40),
        ];

        let tree = build_tree(&records).unwrap();
        assert_eq!(tree.roots().len(), 2);
        assert_eq!(tree.max_depth(), 2);
        assert_eq!(tree.roots()[0].children[0].children[0].id, 3);
        assert_eq!(tree.ids(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_build_tree_sorts_each_level_by_creation_time() {
        // Input order deliberately scrambled
        let records = vec![
            record(5, 1, 50),
            record(3, ROOT, 30),
            record(4, 1, 40),
            record(1, ROOT, 10),
        ];

        let tree = build_tree(&records).unwrap();
        assert_eq!(tree.ids(), vec![1, 4, 5, 3]);
    }

    #[test]
    fn test_build_tree_orphan_attaches_at_root() {
        // Comment 2's parent was removed earlier; its reply keeps pointing at it
        let records = vec![record(1, ROOT, 10), record(3, 2, 30), record(4, 3, 40)];

        let tree = build_tree(&records).unwrap();
        assert_eq!(tree.roots().len(), 2);
        assert_eq!(tree.roots()[1].id, 3);
        assert_eq!(tree.roots()[1].parent_id, 2);
        assert_eq!(tree.roots()[1].children[0].id, 4);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_build_tree_from_subtree() {
        let records = vec![
            record(1, ROOT, 10),
            record(2, 1, 20),
            record(3, 2, 30),
            record(4, 1, 15),
        ];

        let subtree = build_tree_from(&records, 1).unwrap();
        let ids: Vec<CommentId> = subtree.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![4, 2]);
        assert_eq!(subtree[1].children[0].id, 3);

        assert!(build_tree_from(&records, 3).unwrap().is_empty());
    }

    #[test]
    fn test_build_tree_rejects_self_parent() {
        let err = build_tree(&[record(1, 1, 10)]).unwrap_err();
        assert!(matches!(err, Error::InconsistentTree(_)));
    }

    #[test]
    fn test_build_tree_rejects_duplicate_id() {
        let err = build_tree(&[record(1, ROOT, 10), record(1, ROOT, 20)]).unwrap_err();
        assert_eq!(
            err,
            Error::InconsistentTree("duplicate comment id 1".to_string())
        );
    }

    #[test]
    fn test_build_tree_rejects_root_sentinel_id() {
        let err = build_tree(&[record(ROOT, 5, 10)]).unwrap_err();
        assert!(matches!(err, Error::InconsistentTree(_)));
    }

    #[test]
    fn test_build_tree_detects_cycle() {
        let records = vec![record(1, ROOT, 10), record(2, 3, 20), record(3, 2, 30)];

        let err = build_tree(&records).unwrap_err();
        assert_eq!(
            err,
            Error::InconsistentTree("parent cycle among comments [2, 3]".to_string())
        );
    }

    #[test]
    fn test_sort_siblings_is_stable() {
        let mut nodes: Vec<CommentNode> = [(7, 20), (3, 10), (9, 20), (1, 20), (5, 10)]
            .iter()
            .map(|&(id, at)| CommentNode::new(record(id, ROOT, at)))
            .collect();

        sort_siblings(&mut nodes);
        let ids: Vec<CommentId> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![3, 5, 7, 9, 1]);

        // A second pass changes nothing
        sort_siblings(&mut nodes);
        let again: Vec<CommentId> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(again, ids);
    }

    #[test]
    fn test_build_tree_equal_timestamps_keep_input_order() {
        let records = vec![record(8, ROOT, 10), record(2, ROOT, 10), record(5, ROOT, 10)];
        let tree = build_tree(&records).unwrap();
        assert_eq!(tree.ids(), vec![8, 2, 5]);
    }

    #[test]
    fn test_build_tree_deeply_nested() {
        // Building, walking and dropping a deep chain stays off the call stack
        const DEPTH: u64 = 200_000;

        let mut records = vec![record(1, ROOT, 0)];
        for id in 2..=DEPTH {
            records.push(record(id, id - 1, id as i64));
        }

        let tree = build_tree(&records).unwrap();
        assert_eq!(tree.len(), DEPTH as usize);
        assert_eq!(tree.max_depth(), DEPTH as usize - 1);
        assert!(tree.find(DEPTH).is_some());
        drop(tree);

        let subtree = build_tree_from(&records, DEPTH / 2).unwrap();
        assert_eq!(subtree[0].count_nodes(), (DEPTH / 2) as usize);
    }

    #[test]
    fn test_child_index_descendants_pre_order() {
        let records = vec![
            record(1, ROOT, 10),
            record(2, 1, 20),
            record(3, 2, 30),
            record(4, 1, 40),
        ];
        let index = ChildIndex::new(&records).unwrap();

        let ids: Vec<(CommentId, usize)> = index
            .descendants(1)
            .into_iter()
            .map(|(idx, depth)| (records[idx].id, depth))
            .collect();
        assert_eq!(ids, vec![(2, 1), (3, 2), (4, 1)]);
        assert_eq!(index.position(4), Some(3));
        assert_eq!(index.position(99), None);
    }
}
