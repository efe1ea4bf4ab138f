//! Comment threading.
//!
//! This module organizes the comments of one entity into a reply tree and
//! assigns each comment a sortable thread position:
//!
//! - **Tree building**: grouping a flat snapshot by parent id
//! - **Sibling ordering**: stable ordering of replies by creation time
//! - **Position assignment**: dot-separated alphadecimal rank strings
//!
//! # Overview
//!
//! - [`CommentRecord`]: a flat `{id, parent_id, created_at}` snapshot supplied by the host
//! - [`CommentNode`]: a node in the tree containing a comment and its replies
//! - [`CommentTree`]: every top-level comment of an entity with its replies
//! - [`CommentSet`]: a validated, indexed snapshot used for deletion planning
//! - [`ThreadPosition`]: a comment's sortable position string
//!
//! # Example
//!
//! ```
//! use comment_rethread::threading::{rethread, CommentRecord, ThreadingOptions};
//!
//! let records = vec![
//!     CommentRecord::top_level(1, 100),
//!     CommentRecord::new(2, 1, 200),
//!     CommentRecord::top_level(3, 300),
//! ];
//!
//! let positions = rethread(&records, &ThreadingOptions::default()).unwrap();
//! assert!(positions[&1] < positions[&2]);
//! assert!(positions[&2] < positions[&3]);
//! assert!(positions[&1].is_ancestor_of(&positions[&2]));
//! ```

mod algorithm;
mod position;
mod set;
mod types;

// Re-export public types
pub use algorithm::{build_tree, build_tree_from, sort_siblings};
pub use position::{
    assign_positions, assign_positions_from, rethread, ThreadPosition, ThreadingOptions, SEPARATOR,
};
pub use set::CommentSet;
pub use types::{
    CommentId, CommentIterator, CommentNode, CommentRecord, CommentTree, EntityKey, ROOT,
};
