//! Property tests for tree building, sibling ordering and position assignment.

use std::collections::HashMap;

use comment_rethread::alphadecimal::{capacity, decode, encode};
use comment_rethread::fixture::display_order;
use comment_rethread::threading::{assign_positions, build_tree, CommentNode};
use comment_rethread::{
    CommentId, CommentRecord, CommentSet, DeletionAction, DeletionConfig, DeletionEngine,
    EntityKey, ThreadingOptions, ROOT,
};
use proptest::prelude::*;
use proptest::sample::Index;

/// Acyclic snapshots: every comment replies to the root or to an earlier
/// comment. Timestamps are drawn from a tiny range so ties are common, and
/// the input order is shuffled.
fn arb_records() -> impl Strategy<Value = Vec<CommentRecord>> {
    prop::collection::vec((any::<Index>(), 0i64..6), 0..40)
        .prop_map(|entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(i, (parent, created_at))| {
                    let id = i as CommentId + 1;
                    // 0 is the root, anything else an earlier comment
                    let parent_id = parent.index(id as usize) as CommentId;
                    CommentRecord::new(id, parent_id, created_at)
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

fn arb_action() -> impl Strategy<Value = DeletionAction> {
    prop::sample::select(DeletionAction::ALL.to_vec())
}

fn input_order(records: &[CommentRecord]) -> HashMap<CommentId, usize> {
    records
        .iter()
        .enumerate()
        .map(|(idx, r)| (r.id, idx))
        .collect()
}

fn sibling_levels(roots: &[CommentNode]) -> Vec<&[CommentNode]> {
    let mut levels = vec![roots];
    let mut stack: Vec<&CommentNode> = roots.iter().collect();
    while let Some(node) = stack.pop() {
        levels.push(&node.children);
        stack.extend(node.children.iter());
    }
    levels
}

proptest! {
    /// Building then flattening recovers exactly the input ids.
    #[test]
    fn tree_flatten_recovers_ids(records in arb_records()) {
        let tree = build_tree(&records).unwrap();

        let mut flattened = tree.ids();
        flattened.sort_unstable();
        let mut expected: Vec<CommentId> = records.iter().map(|r| r.id).collect();
        expected.sort_unstable();

        prop_assert_eq!(flattened, expected);
    }

    /// Siblings are ordered by creation time, equal timestamps in input order.
    #[test]
    fn siblings_sorted_and_stable(records in arb_records()) {
        let order = input_order(&records);
        let tree = build_tree(&records).unwrap();

        for level in sibling_levels(tree.roots()) {
            for pair in level.windows(2) {
                prop_assert!(pair[0].created_at <= pair[1].created_at);
                if pair[0].created_at == pair[1].created_at {
                    prop_assert!(order[&pair[0].id] < order[&pair[1].id]);
                }
            }
        }
    }

    /// Every position is prefixed by its parent's; siblings sort by age.
    #[test]
    fn positions_respect_tree(records in arb_records()) {
        let tree = build_tree(&records).unwrap();
        let positions = assign_positions(tree.roots(), &ThreadingOptions::default()).unwrap();

        prop_assert_eq!(positions.len(), records.len());

        for record in &records {
            let position = &positions[&record.id];
            if record.parent_id == ROOT {
                prop_assert_eq!(position.depth(), 0);
            } else {
                let parent = &positions[&record.parent_id];
                prop_assert!(parent.is_ancestor_of(position));
                prop_assert!(parent < position);
                let position_parent = position.parent();
                prop_assert_eq!(position_parent.as_ref(), Some(parent));
            }
        }

        for level in sibling_levels(tree.roots()) {
            for pair in level.windows(2) {
                prop_assert!(positions[&pair[0].id] < positions[&pair[1].id]);
            }
        }

        prop_assert_eq!(display_order(&positions), tree.ids());
    }

    /// Assigning twice over the same snapshot gives the same mapping.
    #[test]
    fn positions_idempotent(records in arb_records()) {
        let tree = build_tree(&records).unwrap();
        let options = ThreadingOptions::default();

        let first = assign_positions(tree.roots(), &options).unwrap();
        let second = assign_positions(tree.roots(), &options).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Same-width encodings are injective and order-preserving.
    #[test]
    fn encoding_preserves_order(a in 0..capacity(3), b in 0..capacity(3)) {
        let (ea, eb) = (encode(a, 3), encode(b, 3));
        prop_assert_eq!(a.cmp(&b), ea.cmp(&eb));
        prop_assert_eq!(decode(&ea).unwrap(), a);
    }

    /// Every planned deletion leaves a consistent snapshot behind.
    #[test]
    fn deletion_outcome_consistent(
        records in arb_records().prop_filter("need a target", |r| !r.is_empty()),
        pick in any::<Index>(),
        action in arb_action(),
        soft_delete in any::<bool>(),
    ) {
        let target = records[pick.index(records.len())].id;
        let set = CommentSet::new(EntityKey::new("node", 1), records.clone()).unwrap();
        let config = DeletionConfig::default().with_soft_delete(soft_delete);
        let engine = DeletionEngine::new(config).unwrap();

        let outcome = engine.plan(&set, target, Some(action)).unwrap();
        let survivors = outcome.apply(&records);

        // Soft deletion never removes anything
        if soft_delete {
            prop_assert!(outcome.removed.is_empty());
        }
        prop_assert!(outcome.removed.contains(&target) || outcome.scrubbed.contains(&target));
        prop_assert_eq!(survivors.len(), records.len() - outcome.removed.len());

        // The result is still a valid snapshot
        let after = CommentSet::new(EntityKey::new("node", 1), survivors.clone());
        prop_assert!(after.is_ok());

        if outcome.rethreaded() {
            prop_assert_eq!(action, DeletionAction::PromoteReplies);
            let ids: Vec<CommentId> = outcome.threads.keys().copied().collect();
            let mut expected: Vec<CommentId> = survivors.iter().map(|r| r.id).collect();
            expected.sort_unstable();
            prop_assert_eq!(ids, expected);

            let tree = build_tree(&survivors).unwrap();
            prop_assert_eq!(display_order(&outcome.threads), tree.ids());
        }
    }
}
