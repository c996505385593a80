//! Task records: prior-task input and the assembled output configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::Node;

/// A saved override for one option of a historical task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOptionValue {
    pub name: String,
    pub value: Value,
}

/// A previously saved task being edited, as handed in by the host.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriorTask {
    #[serde(default)]
    pub name: Option<String>,
    /// Concrete node the task was assigned to, if any.
    #[serde(default)]
    pub processing_node: Option<i64>,
    /// Whether that assignment came from Auto selection.
    #[serde(default)]
    pub auto_processing_node: bool,
    #[serde(default)]
    pub options: Vec<TaskOptionValue>,
}

/// The assembled task configuration exposed to the host.
#[derive(Debug, Clone, Serialize)]
pub struct TaskConfig {
    pub name: String,
    pub selected_node: Node,
    pub options: Vec<TaskOptionValue>,
}
