//! Artifacts tracked by modsync
//!
//! An [`Identifier`] names a project on the remote provider, a [`Filename`]
//! names the concrete file that project currently ships. The two are kept as
//! distinct types so cache keys and values cannot be swapped by accident.

pub mod desired;
pub mod store;
pub mod types;

pub use desired::DesiredSet;
pub use store::{ArtifactStore, Snapshot};
pub use types::{Filename, Identifier};
