//! HTTP resolver for "latest file" endpoints
//!
//! The provider answers `GET/HEAD <endpoint>` with a redirect chain ending at
//! the download URL of the newest file. The last path segment of that URL is
//! the canonical filename.

use super::{Resolved, Resolver};
use crate::artifact::{Filename, Identifier};
use crate::config::schema::RemoteConfig;
use crate::error::{ModsyncError, ModsyncResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use ureq::{Agent, ResponseExt};

/// Placeholder replaced by the identifier in the endpoint template
pub const ID_PLACEHOLDER: &str = "{id}";

/// Resolver backed by a blocking `ureq` agent
pub struct HttpResolver {
    agent: Agent,
    endpoint: String,
    max_bytes: u64,
}

impl HttpResolver {
    /// Build a resolver from the `[remote]` config section
    pub fn new(config: &RemoteConfig) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .max_redirects(config.max_redirects)
            .user_agent(config.user_agent.as_str())
            .build();

        Self {
            agent: Agent::new_with_config(agent_config),
            endpoint: config.endpoint.clone(),
            max_bytes: config.max_artifact_mb.saturating_mul(1024 * 1024),
        }
    }

    /// URL queried for an identifier
    pub fn url_for(&self, id: &Identifier) -> String {
        self.endpoint.replace(ID_PLACEHOLDER, id.as_str())
    }
}

#[async_trait]
impl Resolver for HttpResolver {
    async fn resolve(&self, id: &Identifier) -> ModsyncResult<Resolved> {
        let url = self.url_for(id);
        let agent = self.agent.clone();
        debug!("Resolving {} via {}", id, url);

        let request_url = url.clone();
        let final_uri = tokio::task::spawn_blocking(move || {
            agent
                .head(&request_url)
                .call()
                .map(|response| response.get_uri().clone())
        })
        .await
        .map_err(|e| ModsyncError::resolution(id.as_str(), e.to_string()))?
        .map_err(|e| ModsyncError::resolution(id.as_str(), describe(&e)))?;

        let segment = last_path_segment(final_uri.path()).ok_or_else(|| {
            ModsyncError::resolution(id.as_str(), format!("{} has no file name", final_uri))
        })?;
        let filename = Filename::new(segment)
            .map_err(|e| ModsyncError::resolution(id.as_str(), e.to_string()))?;

        debug!("{} resolved to {}", id, filename);
        Ok(Resolved {
            identifier: id.clone(),
            filename,
            location: final_uri.to_string(),
        })
    }

    async fn fetch(&self, resolved: &Resolved) -> ModsyncResult<Vec<u8>> {
        let agent = self.agent.clone();
        let url = resolved.location.clone();
        let limit = self.max_bytes;
        debug!("Downloading {}", url);

        tokio::task::spawn_blocking(move || {
            let mut response = agent.get(&url).call()?;
            response.body_mut().with_config().limit(limit).read_to_vec()
        })
        .await
        .map_err(|e| ModsyncError::resolution(resolved.identifier.as_str(), e.to_string()))?
        .map_err(|e| ModsyncError::resolution(resolved.identifier.as_str(), describe(&e)))
    }

    fn name(&self) -> &str {
        &self.endpoint
    }
}

/// Last non-empty segment of a URL path
fn last_path_segment(path: &str) -> Option<&str> {
    path.rsplit('/').next().filter(|s| !s.is_empty())
}

fn describe(err: &ureq::Error) -> String {
    match err {
        ureq::Error::StatusCode(404) => "project not found (HTTP 404)".to_string(),
        ureq::Error::StatusCode(code) => format!("provider returned HTTP {}", code),
        ureq::Error::Timeout(_) => "request timed out".to_string(),
        other => other.to_string(),
    }
}
