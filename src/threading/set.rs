//! Entity-scoped comment snapshots.
//!
//! A [`CommentSet`] holds every comment attached to one entity, validated
//! once and indexed by id so that deletion planning can answer parent and
//! descendant queries without rebuilding the tree.

use crate::error::{Error, Result};

use super::algorithm::ChildIndex;
use super::types::{CommentId, CommentRecord, CommentTree, EntityKey, ROOT};

/// A validated snapshot of the comments attached to one entity.
///
/// Construction rejects duplicate ids, self-parented comments and parent
/// cycles. The snapshot is immutable; planning a deletion never changes it.
///
/// # Example
///
/// ```
/// use comment_rethread::threading::{CommentRecord, CommentSet, EntityKey, ROOT};
///
/// let set = CommentSet::new(
///     EntityKey::new("node", 42),
///     vec![
///         CommentRecord::top_level(1, 100),
///         CommentRecord::new(2, 1, 200),
///         CommentRecord::new(3, 2, 300),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(set.children_of(1), vec![2]);
/// assert_eq!(set.descendants_of(1), vec![2, 3]);
/// assert_eq!(set.effective_parent(1), Some(ROOT));
/// ```
#[derive(Debug, Clone)]
pub struct CommentSet {
    entity: EntityKey,
    records: Vec<CommentRecord>,
    index: ChildIndex,
}

impl CommentSet {
    /// Create a snapshot from the comments of one entity.
    ///
    /// The input order is kept and breaks ties between comments created at
    /// the same instant.
    pub fn new(entity: EntityKey, records: Vec<CommentRecord>) -> Result<Self> {
        let index = ChildIndex::new(&records)?;
        Ok(Self {
            entity,
            records,
            index,
        })
    }

    /// Key of the entity these comments belong to.
    pub fn entity(&self) -> &EntityKey {
        &self.entity
    }

    /// All records, in input order.
    pub fn records(&self) -> &[CommentRecord] {
        &self.records
    }

    /// Number of comments in the snapshot.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the snapshot has no comments.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check if a comment is present.
    pub fn contains(&self, id: CommentId) -> bool {
        self.index.position(id).is_some()
    }

    /// Get a comment by id.
    pub fn get(&self, id: CommentId) -> Option<&CommentRecord> {
        self.index.position(id).map(|idx| &self.records[idx])
    }

    /// Get a comment by id, failing with [`Error::NotFound`] when absent.
    pub fn require(&self, id: CommentId) -> Result<&CommentRecord> {
        self.get(id).ok_or(Error::NotFound(id))
    }

    /// The parent a comment is threaded under.
    ///
    /// This is the declared parent, or [`ROOT`] when the declared parent is
    /// not part of the snapshot. Returns `None` for unknown ids.
    pub fn effective_parent(&self, id: CommentId) -> Option<CommentId> {
        let record = self.get(id)?;
        if record.parent_id == ROOT || self.contains(record.parent_id) {
            Some(record.parent_id)
        } else {
            Some(ROOT)
        }
    }

    /// Ids of the direct replies to `id`, in input order.
    ///
    /// Passing [`ROOT`] lists the top-level comments.
    pub fn children_of(&self, id: CommentId) -> Vec<CommentId> {
        self.index
            .children_of(id)
            .iter()
            .map(|&idx| self.records[idx].id)
            .collect()
    }

    /// Ids of every comment below `id`, depth-first.
    pub fn descendants_of(&self, id: CommentId) -> Vec<CommentId> {
        self.index
            .descendants(id)
            .into_iter()
            .map(|(idx, _)| self.records[idx].id)
            .collect()
    }

    /// Build the comment tree of this snapshot.
    pub fn tree(&self) -> CommentTree {
        CommentTree::new(self.index.build(&self.records, ROOT))
    }
}
