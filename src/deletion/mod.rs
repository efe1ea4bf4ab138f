//! Comment deletion planning.
//!
//! Deleting a comment affects its replies in one of three ways, chosen per
//! request from the actions the site allows:
//!
//! - [`DeletionAction::RemoveWithReplies`]: the whole subtree goes
//! - [`DeletionAction::PromoteReplies`]: direct replies move up one level and
//!   the entity is re-threaded
//! - [`DeletionAction::KeepReplies`]: replies stay; a comment that still has
//!   replies is scrubbed and kept as a placeholder
//!
//! With soft deletion enabled, every comment that would be removed is
//! scrubbed instead.

mod action;
mod config;
mod engine;

pub use action::DeletionAction;
pub use config::DeletionConfig;
pub use engine::{DeletionEngine, DeletionOutcome, Reparent};
