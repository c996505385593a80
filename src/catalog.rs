//! Node catalog normalization.
//!
//! Turns the raw JSON records served by the catalog endpoint into typed
//! [`Node`] values ready for selection and display. Pure transforms only;
//! fetching lives in [`crate::fetch`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Reserved key for the synthetic Auto node.
pub const AUTO_KEY: &str = "auto";

/// An option declared by a processing node (name, default value, metadata).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Wire shape of one catalog record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    pub id: i64,
    pub hostname: String,
    pub port: u16,
    pub queue_count: u32,
    pub online: bool,
    #[serde(default)]
    pub available_options: Vec<OptionSchema>,
}

/// Selection key: either a concrete node id or the Auto pseudo-node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Auto,
    Id(i64),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Auto => write!(f, "{}", AUTO_KEY),
            NodeKey::Id(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for NodeKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case(AUTO_KEY) {
            return Ok(NodeKey::Auto);
        }
        s.parse::<i64>()
            .map(NodeKey::Id)
            .map_err(|_| Error::Validation(format!("invalid node key: {}", s)))
    }
}

/// A normalized processing node.
///
/// Disabled nodes stay in the list (they are shown to the user) but are
/// excluded from selection downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: i64,
    #[serde(skip)]
    pub key: NodeKey,
    pub label: String,
    pub options: Vec<OptionSchema>,
    pub queue_count: u32,
    pub enabled: bool,
    pub url: String,
}

impl Node {
    fn from_raw(raw: &RawNode) -> Self {
        Self {
            id: raw.id,
            key: NodeKey::Id(raw.id),
            label: format!("{}:{} (queue: {})", raw.hostname, raw.port, raw.queue_count),
            options: raw.available_options.clone(),
            queue_count: raw.queue_count,
            enabled: raw.online,
            url: format!("http://{}:{}", raw.hostname, raw.port),
        }
    }
}

/// Normalize a raw catalog payload into typed nodes.
///
/// Fails with [`Error::EmptyCatalog`] when the endpoint returned nothing;
/// offline nodes are kept with `enabled = false`.
pub fn normalize(raw: &[RawNode]) -> Result<Vec<Node>> {
    if raw.is_empty() {
        return Err(Error::EmptyCatalog);
    }
    Ok(raw.iter().map(Node::from_raw).collect())
}
