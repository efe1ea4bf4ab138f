//! Error types for the comment re-threading library.

use crate::threading::CommentId;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur when planning a deletion or re-threading comments.
///
/// Every operation either returns a complete result or one of these errors;
/// nothing is partially applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Target comment is absent from the supplied snapshot
    #[error("Comment not found: {0}")]
    NotFound(CommentId),

    /// Unrecognized or disabled deletion action
    #[error("Invalid deletion action: {0}")]
    InvalidAction(String),

    /// Parent relationships in the snapshot are inconsistent
    #[error("Inconsistent comment tree: {0}")]
    InconsistentTree(String),

    /// A sibling rank does not fit in the configured segment width
    #[error("Rank {rank} does not fit in {width} alphadecimal digits")]
    SegmentOverflow {
        /// Rank that was being encoded
        rank: u64,
        /// Configured segment width
        width: usize,
    },

    /// Malformed alphadecimal string
    #[error("Invalid alphadecimal encoding: {0}")]
    InvalidEncoding(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
