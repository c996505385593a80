//! Catalog fetch collaborator.
//!
//! The coordinator never talks HTTP itself; it goes through the
//! [`NodeFetcher`] trait so the runtime can swap in a scripted fetcher for
//! tests. Transport failures and malformed payloads are reported as
//! distinct errors: both are recovered by silent retry, governed by
//! [`RetryPolicy`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::catalog::RawNode;
use crate::config::Config;
use crate::{nlog_debug, nlog_trace, Error, Result};

/// Fetches the raw node catalog.
#[async_trait]
pub trait NodeFetcher: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RawNode>>;
}

/// Retry policy for failed catalog fetches: unbounded attempts with a fixed
/// delay. A manual retry is always available to the user, so no circuit
/// breaker is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            delay: config.retry_delay(),
        }
    }
}

/// HTTP fetcher against the catalog endpoint.
pub struct HttpNodeFetcher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpNodeFetcher {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.effective_endpoint(), config.fetch_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl NodeFetcher for HttpNodeFetcher {
    async fn fetch(&self) -> Result<Vec<RawNode>> {
        nlog_debug!("Fetching node catalog from {}", self.endpoint);
        let payload: Value = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        nlog_trace!("Catalog payload: {}", payload);
        parse_catalog(payload)
    }
}

/// Validate and deserialize a catalog payload. The endpoint must return a
/// JSON array; anything else is a malformed response, not a node list.
pub fn parse_catalog(payload: Value) -> Result<Vec<RawNode>> {
    if !payload.is_array() {
        return Err(Error::MalformedResponse(format!(
            "expected a JSON array, got {}",
            json_kind(&payload)
        )));
    }
    serde_json::from_value(payload)
        .map_err(|e| Error::MalformedResponse(format!("bad node record: {}", e)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
