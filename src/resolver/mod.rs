//! Remote resolution of identifiers to their current artifact
//!
//! Resolution is split in two so the reconciler can skip the download when
//! the resolved file is already on disk:
//! - `resolve` finds the canonical filename (cheap)
//! - `fetch` downloads the content (only when needed)

pub mod http;

pub use http::HttpResolver;

use crate::artifact::{Filename, Identifier};
use crate::error::ModsyncResult;
use async_trait::async_trait;
use serde::Serialize;

/// Result of resolving one identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    /// Identifier that was resolved
    pub identifier: Identifier,

    /// Canonical filename the provider currently serves
    pub filename: Filename,

    /// Where the content can be fetched from (resolver specific)
    pub location: String,
}

/// Remote provider interface
///
/// Implementations report every failure as `ModsyncError::Resolution` for the
/// identifier involved. Calls are never retried by the caller.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Find the current canonical filename for an identifier
    async fn resolve(&self, id: &Identifier) -> ModsyncResult<Resolved>;

    /// Download the content of a resolved artifact
    async fn fetch(&self, resolved: &Resolved) -> ModsyncResult<Vec<u8>>;

    /// Human-readable provider name for display
    fn name(&self) -> &str;
}
