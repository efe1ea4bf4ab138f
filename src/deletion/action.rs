//! Deletion actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What happens to the replies of a deleted comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionAction {
    /// Delete the comment together with every reply below it
    #[default]
    RemoveWithReplies,

    /// Delete the comment and move its direct replies up one level
    PromoteReplies,

    /// Delete the comment but leave its replies in place
    ///
    /// A comment with replies is scrubbed and kept as a placeholder.
    KeepReplies,
}

impl DeletionAction {
    /// Every action, in the order hosts present them.
    pub const ALL: [DeletionAction; 3] = [
        DeletionAction::RemoveWithReplies,
        DeletionAction::PromoteReplies,
        DeletionAction::KeepReplies,
    ];

    /// Canonical name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletionAction::RemoveWithReplies => "remove_with_replies",
            DeletionAction::PromoteReplies => "promote_replies",
            DeletionAction::KeepReplies => "keep_replies",
        }
    }

    /// Legacy numeric option value (`0`, `1` or `2`).
    pub fn code(&self) -> u8 {
        match self {
            DeletionAction::RemoveWithReplies => 0,
            DeletionAction::PromoteReplies => 1,
            DeletionAction::KeepReplies => 2,
        }
    }
}

impl fmt::Display for DeletionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for DeletionAction {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(DeletionAction::RemoveWithReplies),
            1 => Ok(DeletionAction::PromoteReplies),
            2 => Ok(DeletionAction::KeepReplies),
            other => Err(Error::InvalidAction(other.to_string())),
        }
    }
}

impl FromStr for DeletionAction {
    type Err = Error;

    /// Parse a canonical action name or a legacy numeric option value.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Self::try_from(code);
        }
        Self::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidAction(s.to_string()))
    }
}
