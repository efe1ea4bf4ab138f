//! # comment-rethread
//!
//! A sans-io library for deleting threaded comments and re-threading the
//! replies that survive.
//!
//! Threaded comment systems store, next to each comment's parent pointer, a
//! thread-position string such as `"01.00.03"` whose plain string order is
//! the display order of the thread. Deleting a comment can change the shape
//! of the tree, after which every comment of the entity needs a fresh
//! position. This library plans those changes.
//!
//! ## Design Philosophy
//!
//! This library follows the "sans-io" design pattern:
//! - **Pure Logic**: tree building, ordering and deletion planning work on an in-memory snapshot
//! - **Storage Separation**: loading, permission checks and persistence stay with the host
//! - **Determinism**: the same snapshot always yields the same plan
//!
//! The host supplies every comment of one entity as `{id, parent_id, created_at}`
//! records and receives the ids to remove, the ids to scrub, the reparent
//! operations and the new thread positions. The host is expected to hold a
//! lock or transaction around loading the snapshot and applying the result.
//!
//! ## Example
//!
//! ```rust
//! use comment_rethread::{
//!     CommentRecord, CommentSet, DeletionAction, DeletionConfig, DeletionEngine, EntityKey,
//! };
//!
//! let set = CommentSet::new(
//!     EntityKey::new("node", 1),
//!     vec![
//!         CommentRecord::top_level(1, 100),
//!         CommentRecord::new(2, 1, 200),
//!         CommentRecord::top_level(3, 300),
//!     ],
//! )?;
//!
//! let engine = DeletionEngine::new(DeletionConfig::default().with_soft_delete(true))?;
//! let outcome = engine.plan(&set, 1, Some(DeletionAction::PromoteReplies))?;
//!
//! // The deleted comment is scrubbed, not removed, and still holds its place
//! assert_eq!(outcome.scrubbed, vec![1]);
//! assert_eq!(outcome.threads[&1].as_str(), "01");
//! assert_eq!(outcome.threads[&2].as_str(), "02");
//! assert_eq!(outcome.threads[&3].as_str(), "03");
//! # Ok::<(), comment_rethread::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod alphadecimal;
pub mod deletion;
pub mod error;
pub mod threading;

// Snapshot builder for tests and host integrations
pub mod fixture;

pub use deletion::{DeletionAction, DeletionConfig, DeletionEngine, DeletionOutcome, Reparent};
pub use error::{Error, Result};
pub use threading::{
    rethread, CommentId, CommentRecord, CommentSet, EntityKey, ThreadPosition, ThreadingOptions,
    ROOT,
};
