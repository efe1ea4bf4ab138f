//! Comment snapshot fixtures for testing.
//!
//! This module provides a small builder for the flat snapshots hosts hand
//! to the library, so tests and host integrations can describe a thread
//! in a few lines.

use std::collections::BTreeMap;

use crate::threading::{CommentId, CommentRecord, CommentSet, EntityKey, ThreadPosition, ROOT};
use crate::Result;

/// Builder for a comment snapshot of one entity.
///
/// Comments are kept in the order they are added, which is also the
/// tie-break order for equal timestamps.
///
/// # Example
///
/// ```
/// use comment_rethread::fixture::CommentFixture;
///
/// let set = CommentFixture::new()
///     .comment(1, 100)
///     .reply(2, 1, 200)
///     .comment(3, 300)
///     .build()
///     .unwrap();
///
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.children_of(1), vec![2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommentFixture {
    entity: EntityKey,
    records: Vec<CommentRecord>,
}

impl CommentFixture {
    /// Create an empty fixture for a default entity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty fixture for the given entity.
    pub fn for_entity(entity: EntityKey) -> Self {
        Self {
            entity,
            records: Vec::new(),
        }
    }

    /// Add a top-level comment.
    pub fn comment(self, id: CommentId, created_at: i64) -> Self {
        self.reply(id, ROOT, created_at)
    }

    /// Add a reply to `parent_id`.
    pub fn reply(mut self, id: CommentId, parent_id: CommentId, created_at: i64) -> Self {
        self.records.push(CommentRecord::new(id, parent_id, created_at));
        self
    }

    /// Add a chain of `len` nested replies below `parent_id`.
    ///
    /// Ids and timestamps count up from `first_id` and `created_at`.
    pub fn chain(
        mut self,
        parent_id: CommentId,
        first_id: CommentId,
        len: u64,
        created_at: i64,
    ) -> Self {
        let mut parent = parent_id;
        for offset in 0..len {
            let id = first_id + offset;
            self.records.push(CommentRecord::new(id, parent, created_at + offset as i64));
            parent = id;
        }
        self
    }

    /// The records added so far.
    pub fn records(&self) -> &[CommentRecord] {
        &self.records
    }

    /// Consume the fixture, returning its records.
    pub fn into_records(self) -> Vec<CommentRecord> {
        self.records
    }

    /// Validate the records into a [`CommentSet`].
    pub fn build(self) -> Result<CommentSet> {
        CommentSet::new(self.entity, self.records)
    }
}

/// Comment ids ordered by thread position, i.e. as a thread is displayed.
pub fn display_order(positions: &BTreeMap<CommentId, ThreadPosition>) -> Vec<CommentId> {
    let mut ordered: Vec<(&ThreadPosition, CommentId)> =
        positions.iter().map(|(id, position)| (position, *id)).collect();
    ordered.sort();
    ordered.into_iter().map(|(_, id)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threading::{rethread, ThreadingOptions};

    #[test]
    fn test_fixture_keeps_order() {
        let fixture = CommentFixture::new()
            .comment(5, 10)
            .reply(6, 5, 20)
            .comment(1, 30);

        let ids: Vec<CommentId> = fixture.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 6, 1]);
    }

    #[test]
    fn test_fixture_chain() {
        let records = CommentFixture::new()
            .comment(1, 0)
            .chain(1, 10, 3, 100)
            .into_records();

        assert_eq!(
            records[1..],
            [
                CommentRecord::new(10, 1, 100),
                CommentRecord::new(11, 10, 101),
                CommentRecord::new(12, 11, 102),
            ]
        );
    }

    #[test]
    fn test_fixture_entity() {
        let set = CommentFixture::for_entity(EntityKey::new("article", 9))
            .comment(1, 0)
            .build()
            .unwrap();
        assert_eq!(set.entity().to_string(), "article/9");
    }

    #[test]
    fn test_display_order() {
        let records = CommentFixture::new()
            .comment(3, 30)
            .comment(1, 10)
            .reply(2, 1, 20)
            .into_records();

        let positions = rethread(&records, &ThreadingOptions::default()).unwrap();
        assert_eq!(display_order(&positions), vec![1, 2, 3]);
    }
}
