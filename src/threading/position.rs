//! Thread-position strings.
//!
//! A thread position is a dot-separated list of fixed-width alphadecimal
//! segments, one per level, naming a comment's rank among its siblings at
//! that level. Sorting positions as plain strings yields the display order:
//! each parent first, then its replies oldest first, then the next sibling.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alphadecimal;
use crate::error::{Error, Result};

use super::algorithm::{build_tree, sorted_siblings};
use super::types::{CommentId, CommentNode, CommentRecord};

/// Separator between the segments of a thread position.
pub const SEPARATOR: char = '.';

/// A comment's position in its thread, e.g. `"01.00.03"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadPosition(String);

impl ThreadPosition {
    /// Parse a thread position, checking every segment is lowercase
    /// alphadecimal.
    ///
    /// Uppercase digits are rejected: they sort before every lowercase
    /// letter and would break string ordering against generated positions.
    ///
    /// # Example
    ///
    /// ```
    /// use comment_rethread::threading::ThreadPosition;
    ///
    /// let position = ThreadPosition::parse("01.00.0a").unwrap();
    /// assert_eq!(position.depth(), 2);
    /// assert_eq!(position.ranks().unwrap(), vec![1, 0, 10]);
    /// assert!(ThreadPosition::parse("01..02").is_err());
    /// assert!(ThreadPosition::parse("0A").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        for segment in s.split(SEPARATOR) {
            if segment.chars().any(|c| c.is_ascii_uppercase()) {
                return Err(Error::InvalidEncoding(format!(
                    "uppercase digit in segment {segment:?} of {s:?}"
                )));
            }
            alphadecimal::decode(segment)?;
        }
        Ok(Self(s.to_string()))
    }

    /// Check every segment is exactly `width` digits long.
    fn check_width(&self, width: usize) -> Result<()> {
        match self.segments().find(|segment| segment.len() != width) {
            Some(segment) => Err(Error::InvalidEncoding(format!(
                "segment {segment:?} of {self} is not {width} digits wide"
            ))),
            None => Ok(()),
        }
    }

    fn child(parent: Option<&ThreadPosition>, segment: &str) -> Self {
        match parent {
            Some(parent) => Self(format!("{}{SEPARATOR}{segment}", parent.0)),
            None => Self(segment.to_string()),
        }
    }

    /// The position as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the segments, top level first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR)
    }

    /// Decode every segment into its sibling rank.
    pub fn ranks(&self) -> Result<Vec<u64>> {
        self.segments().map(alphadecimal::decode).collect()
    }

    /// Nesting depth (0 for top-level comments).
    pub fn depth(&self) -> usize {
        self.0.matches(SEPARATOR).count()
    }

    /// Position of the parent comment, or `None` at top level.
    pub fn parent(&self) -> Option<ThreadPosition> {
        self.0
            .rfind(SEPARATOR)
            .map(|end| ThreadPosition(self.0[..end].to_string()))
    }

    /// Check whether `other` lies strictly below this position.
    pub fn is_ancestor_of(&self, other: &ThreadPosition) -> bool {
        other
            .0
            .strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest.starts_with(SEPARATOR))
    }
}

impl fmt::Display for ThreadPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ThreadPosition {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ThreadPosition> for String {
    fn from(position: ThreadPosition) -> Self {
        position.0
    }
}

/// Options controlling how sibling ranks are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadingOptions {
    /// Number of alphadecimal digits per segment
    pub segment_width: usize,
    /// Rank given to the first top-level comment
    pub root_base: u64,
    /// Rank given to the first reply at every nested level
    pub nested_base: u64,
}

impl Default for ThreadingOptions {
    fn default() -> Self {
        // Top-level ranks start at 1 so "00" never names a top-level comment
        Self {
            segment_width: 2,
            root_base: 1,
            nested_base: 0,
        }
    }
}

impl ThreadingOptions {
    /// Check that the options can produce at least one position per level.
    pub fn validate(&self) -> Result<()> {
        if self.segment_width == 0 {
            return Err(Error::Config("segment_width must be at least 1".to_string()));
        }
        let capacity = alphadecimal::capacity(self.segment_width);
        for (name, base) in [("root_base", self.root_base), ("nested_base", self.nested_base)] {
            if base >= capacity {
                return Err(Error::Config(format!(
                    "{name} {base} does not fit in {} digits",
                    self.segment_width
                )));
            }
        }
        Ok(())
    }

    /// Maximum number of siblings a level can hold.
    pub fn max_siblings(&self, top_level: bool) -> u64 {
        let base = if top_level {
            self.root_base
        } else {
            self.nested_base
        };
        alphadecimal::capacity(self.segment_width).saturating_sub(base)
    }

    fn segment(&self, index: usize, top_level: bool) -> Result<String> {
        let base = if top_level {
            self.root_base
        } else {
            self.nested_base
        };
        let rank = base.saturating_add(index as u64);
        if !alphadecimal::fits(rank, self.segment_width) {
            return Err(Error::SegmentOverflow {
                rank,
                width: self.segment_width,
            });
        }
        Ok(alphadecimal::encode(rank, self.segment_width))
    }
}

/// Assign a thread position to every comment in a tree.
///
/// Each level is re-sorted by creation time before ranks are handed out,
/// so the result does not depend on how the tree was ordered. The mapping
/// covers every node exactly once.
///
/// # Example
///
/// ```
/// use comment_rethread::threading::{
///     assign_positions, build_tree, CommentRecord, ThreadingOptions,
/// };
///
/// let records = vec![
///     CommentRecord::top_level(1, 100),
///     CommentRecord::new(2, 1, 200),
///     CommentRecord::top_level(3, 300),
/// ];
/// let tree = build_tree(&records).unwrap();
///
/// let positions = assign_positions(tree.roots(), &ThreadingOptions::default()).unwrap();
/// assert_eq!(positions[&1].as_str(), "01");
/// assert_eq!(positions[&2].as_str(), "01.00");
/// assert_eq!(positions[&3].as_str(), "02");
/// ```
pub fn assign_positions(
    roots: &[CommentNode],
    options: &ThreadingOptions,
) -> Result<BTreeMap<CommentId, ThreadPosition>> {
    assign_positions_from(roots, "", options)
}

/// Assign thread positions below an existing position.
///
/// With an empty `prefix` this is [`assign_positions`]; otherwise `nodes`
/// are numbered as replies nested under `prefix`, which must be a lowercase
/// position whose segments all have the configured width.
pub fn assign_positions_from(
    nodes: &[CommentNode],
    prefix: &str,
    options: &ThreadingOptions,
) -> Result<BTreeMap<CommentId, ThreadPosition>> {
    options.validate()?;
    let parent = if prefix.is_empty() {
        None
    } else {
        let parent = ThreadPosition::parse(prefix)?;
        parent.check_width(options.segment_width)?;
        Some(parent)
    };

    let mut positions: BTreeMap<CommentId, ThreadPosition> = BTreeMap::new();
    let mut stack: Vec<(&CommentNode, ThreadPosition)> = Vec::new();
    push_level(&mut stack, nodes, parent.as_ref(), options)?;

    while let Some((node, position)) = stack.pop() {
        push_level(&mut stack, &node.children, Some(&position), options)?;
        match positions.entry(node.id) {
            Entry::Vacant(entry) => {
                entry.insert(position);
            }
            Entry::Occupied(entry) => {
                return Err(Error::InconsistentTree(format!(
                    "comment {} appears twice (at {} and {})",
                    node.id,
                    entry.get(),
                    position
                )));
            }
        }
    }

    Ok(positions)
}

/// Number the siblings of one level and push them so the first is popped first.
fn push_level<'a>(
    stack: &mut Vec<(&'a CommentNode, ThreadPosition)>,
    siblings: &'a [CommentNode],
    parent: Option<&ThreadPosition>,
    options: &ThreadingOptions,
) -> Result<()> {
    let top_level = parent.is_none();
    let mut level = Vec::with_capacity(siblings.len());
    for (index, node) in sorted_siblings(siblings).into_iter().enumerate() {
        let segment = options.segment(index, top_level)?;
        level.push((node, ThreadPosition::child(parent, &segment)));
    }
    stack.extend(level.into_iter().rev());
    Ok(())
}

/// Rebuild the tree of a comment snapshot and assign fresh positions.
///
/// This is the full re-threading pass: tree building, sibling ordering and
/// position assignment.
pub fn rethread(
    records: &[CommentRecord],
    options: &ThreadingOptions,
) -> Result<BTreeMap<CommentId, ThreadPosition>> {
    let tree = build_tree(records)?;
    let positions = assign_positions(tree.roots(), options)?;
    debug!(
        comments = positions.len(),
        max_depth = tree.max_depth(),
        "re-threaded comments"
    );
    Ok(positions)
}
