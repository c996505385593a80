//! Messages for the TEA pattern.
//!
//! Messages are inputs to the update function - they come from the fetch
//! collaborator or from renderer callbacks (name edits, node selection,
//! option edits, the advanced-options toggle, the retry action).

use serde_json::Value;

use crate::catalog::{NodeKey, RawNode};

/// Input messages to the update function.
#[derive(Debug)]
pub enum Message {
    // From the fetch collaborator
    /// Catalog fetch succeeded with a raw (possibly empty) node list.
    NodesFetched(Vec<RawNode>),
    /// Catalog fetch failed (transport error or malformed payload).
    FetchFailed(String),

    // Renderer callbacks
    NameChanged(String),
    SelectNode(NodeKey),
    SetAdvancedOptions(bool),
    /// Latest value for one option of the current schema; `None` reverts
    /// the option to its default.
    OptionChanged(String, Option<Value>),
    /// Explicit user retry from the error state.
    Retry,
}
