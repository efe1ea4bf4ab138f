//! Deletion planning.
//!
//! The engine decides, for one target comment and one [`DeletionAction`],
//! which comments are removed, which are scrubbed, which replies move to a
//! new parent and, when replies moved, the fresh thread position of every
//! surviving comment. It only plans: the host applies the outcome to its
//! storage inside whatever transaction it holds.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::threading::{rethread, CommentId, CommentRecord, CommentSet, ThreadPosition, ROOT};

use super::action::DeletionAction;
use super::config::DeletionConfig;

/// A reply moved to a new parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reparent {
    /// Reply being moved
    pub id: CommentId,
    /// Its new parent, or [`ROOT`] for top level
    pub new_parent_id: CommentId,
}

/// The changes a deletion requires, for the host to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionOutcome {
    /// Action that was applied
    pub action: DeletionAction,
    /// Comment the deletion was requested for
    pub target: CommentId,
    /// Replies whose parent pointer changes, in input order
    pub reparented: Vec<Reparent>,
    /// Comments to delete permanently, target first then depth-first
    pub removed: Vec<CommentId>,
    /// Comments whose subject and body must be emptied, target first then depth-first
    pub scrubbed: Vec<CommentId>,
    /// New thread position of every surviving comment; empty when the tree
    /// shape did not change
    pub threads: BTreeMap<CommentId, ThreadPosition>,
}

impl DeletionOutcome {
    fn new(action: DeletionAction, target: CommentId) -> Self {
        Self {
            action,
            target,
            reparented: Vec::new(),
            removed: Vec::new(),
            scrubbed: Vec::new(),
            threads: BTreeMap::new(),
        }
    }

    /// Check whether new thread positions must be persisted.
    pub fn rethreaded(&self) -> bool {
        !self.threads.is_empty()
    }

    /// Produce the snapshot as it looks after this outcome is applied.
    ///
    /// Removed comments are dropped and reparented comments get their new
    /// parent. Scrubbed comments are kept unchanged since only their content
    /// differs. Input order is preserved.
    pub fn apply(&self, records: &[CommentRecord]) -> Vec<CommentRecord> {
        let removed: HashSet<CommentId> = self.removed.iter().copied().collect();
        let moves: HashMap<CommentId, CommentId> = self
            .reparented
            .iter()
            .map(|r| (r.id, r.new_parent_id))
            .collect();

        records
            .iter()
            .filter(|record| !removed.contains(&record.id))
            .map(|record| match moves.get(&record.id) {
                Some(&new_parent_id) => CommentRecord {
                    parent_id: new_parent_id,
                    ..*record
                },
                None => *record,
            })
            .collect()
    }
}

/// Plans comment deletions under a [`DeletionConfig`].
///
/// # Example
///
/// ```
/// use comment_rethread::deletion::{DeletionAction, DeletionConfig, DeletionEngine};
/// use comment_rethread::threading::{CommentRecord, CommentSet, EntityKey, ROOT};
///
/// let set = CommentSet::new(
///     EntityKey::new("node", 7),
///     vec![
///         CommentRecord::top_level(1, 100),
///         CommentRecord::new(2, 1, 200),
///         CommentRecord::top_level(3, 300),
///     ],
/// )
/// .unwrap();
///
/// let engine = DeletionEngine::new(DeletionConfig::default()).unwrap();
/// let outcome = engine
///     .plan(&set, 1, Some(DeletionAction::PromoteReplies))
///     .unwrap();
///
/// assert_eq!(outcome.removed, vec![1]);
/// assert_eq!(outcome.reparented[0].new_parent_id, ROOT);
/// assert_eq!(outcome.threads[&2].as_str(), "01");
/// assert_eq!(outcome.threads[&3].as_str(), "02");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeletionEngine {
    config: DeletionConfig,
}

impl DeletionEngine {
    /// Create an engine, validating the configuration.
    pub fn new(config: DeletionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &DeletionConfig {
        &self.config
    }

    /// Plan the deletion of `target`.
    ///
    /// `action` falls back to the configured default. Fails with
    /// [`Error::NotFound`] when the target is not in the snapshot and
    /// [`Error::InvalidAction`] when the action is disabled. On error no
    /// outcome is produced.
    pub fn plan(
        &self,
        set: &CommentSet,
        target: CommentId,
        action: Option<DeletionAction>,
    ) -> Result<DeletionOutcome> {
        let action = action.unwrap_or(self.config.default_action);
        if !self.config.allows(action) {
            return Err(Error::InvalidAction(format!("{action} is not enabled")));
        }
        set.require(target)?;

        let mut outcome = DeletionOutcome::new(action, target);
        match action {
            DeletionAction::RemoveWithReplies => {
                let mut doomed = vec![target];
                doomed.extend(set.descendants_of(target));
                self.discard(&mut outcome, doomed);
            }
            DeletionAction::PromoteReplies => {
                let new_parent_id = set.effective_parent(target).unwrap_or(ROOT);
                outcome.reparented = set
                    .children_of(target)
                    .into_iter()
                    .map(|id| Reparent { id, new_parent_id })
                    .collect();
                self.discard(&mut outcome, vec![target]);

                if !outcome.reparented.is_empty() {
                    let survivors = outcome.apply(set.records());
                    outcome.threads = rethread(&survivors, &self.config.threading)?;
                }
            }
            DeletionAction::KeepReplies => {
                if set.children_of(target).is_empty() {
                    self.discard(&mut outcome, vec![target]);
                } else {
                    // Replies still hang off it, so it stays as a placeholder
                    outcome.scrubbed.push(target);
                }
            }
        }

        debug!(
            entity = %set.entity(),
            comment_id = target,
            action = %action,
            removed = outcome.removed.len(),
            scrubbed = outcome.scrubbed.len(),
            reparented = outcome.reparented.len(),
            rethreaded = outcome.rethreaded(),
            "planned comment deletion"
        );
        Ok(outcome)
    }

    /// Plan the deletion of `target` with an action given as text.
    ///
    /// Accepts the names and legacy codes understood by the
    /// [`FromStr`](std::str::FromStr) impl of [`DeletionAction`].
    pub fn plan_str(
        &self,
        set: &CommentSet,
        target: CommentId,
        action: &str,
    ) -> Result<DeletionOutcome> {
        let action: DeletionAction = action.parse()?;
        self.plan(set, target, Some(action))
    }

    fn discard(&self, outcome: &mut DeletionOutcome, ids: Vec<CommentId>) {
        if self.config.soft_delete {
            outcome.scrubbed = ids;
        } else {
            outcome.removed = ids;
        }
    }
}
