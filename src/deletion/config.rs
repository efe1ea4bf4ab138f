//! Deletion policy configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::threading::ThreadingOptions;

use super::action::DeletionAction;

/// Site policy for comment deletion.
///
/// Hosts usually keep this in their settings store; it can also be loaded
/// from TOML:
///
/// ```
/// use comment_rethread::deletion::{DeletionAction, DeletionConfig};
///
/// let config = DeletionConfig::from_toml_str(r#"
///     soft_delete = true
///     default_action = "keep_replies"
///     allowed_actions = ["keep_replies", "promote_replies"]
///
///     [threading]
///     segment_width = 3
/// "#).unwrap();
///
/// assert!(config.soft_delete);
/// assert_eq!(config.default_action, DeletionAction::KeepReplies);
/// assert_eq!(config.threading.segment_width, 3);
/// assert_eq!(config.threading.root_base, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeletionConfig {
    /// Scrub content instead of removing records
    pub soft_delete: bool,
    /// Action used when the caller does not pick one
    pub default_action: DeletionAction,
    /// Actions users may choose from
    pub allowed_actions: Vec<DeletionAction>,
    /// Thread-position format used when re-threading
    pub threading: ThreadingOptions,
}

impl Default for DeletionConfig {
    fn default() -> Self {
        Self {
            soft_delete: false,
            default_action: DeletionAction::default(),
            allowed_actions: DeletionAction::ALL.to_vec(),
            threading: ThreadingOptions::default(),
        }
    }
}

impl DeletionConfig {
    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Enable or disable soft deletion.
    pub fn with_soft_delete(mut self, soft_delete: bool) -> Self {
        self.soft_delete = soft_delete;
        self
    }

    /// Set the default action.
    pub fn with_default_action(mut self, action: DeletionAction) -> Self {
        self.default_action = action;
        self
    }

    /// Restrict the actions users may choose from.
    pub fn with_allowed_actions(
        mut self,
        actions: impl IntoIterator<Item = DeletionAction>,
    ) -> Self {
        self.allowed_actions = actions.into_iter().collect();
        self
    }

    /// Check whether an action is enabled.
    pub fn allows(&self, action: DeletionAction) -> bool {
        self.allowed_actions.contains(&action)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.allowed_actions.is_empty() {
            return Err(Error::Config("no deletion actions are allowed".to_string()));
        }
        if !self.allows(self.default_action) {
            return Err(Error::Config(format!(
                "default action {} is not allowed",
                self.default_action
            )));
        }
        self.threading.validate()
    }
}
