//! modsync - keep a mods folder on the latest release of every listed mod
//!
//! Resolves each identifier in the mod list to the provider's current file,
//! downloads what is missing, removes files replaced upstream and remembers
//! the result in a small JSON cache.

pub mod artifact;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod resolver;
pub mod ui;

pub use error::{ModsyncError, ModsyncResult};
