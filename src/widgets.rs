//! Option-widget handles.
//!
//! The rendering collaborator owns the actual input widgets; the
//! coordinator only holds capability handles it can poll for values when
//! assembling the final task. The registry is scoped to the current node's
//! option schema and cleared on every node switch, so handles from a
//! previous schema can never leak into the next one.

use std::collections::HashMap;

use serde_json::Value;

use crate::task::TaskOptionValue;

/// Handle to one live option widget. `value()` returns `None` while the
/// widget is still showing the default (nothing explicitly set).
pub trait OptionWidget: Send {
    fn name(&self) -> &str;
    fn value(&self) -> Option<Value>;
}

/// A plain widget holding a preset value. Used by the CLI (where values
/// come from `--set` flags) and by tests.
#[derive(Debug, Clone)]
pub struct ValueWidget {
    name: String,
    value: Option<Value>,
}

impl ValueWidget {
    pub fn new(name: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl OptionWidget for ValueWidget {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Option<Value> {
        self.value.clone()
    }
}

/// Coordinator-owned map from option name to widget handle.
#[derive(Default)]
pub struct WidgetRegistry {
    widgets: HashMap<String, Box<dyn OptionWidget>>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the handle for one option.
    pub fn register(&mut self, widget: Box<dyn OptionWidget>) {
        self.widgets.insert(widget.name().to_string(), widget);
    }

    /// Drop every handle. Called on node switch: the old handles belong to
    /// the previous node's schema.
    pub fn clear(&mut self) {
        self.widgets.clear();
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Collect every currently-set override, skipping widgets that still
    /// report no explicit value.
    pub fn collect(&self) -> Vec<TaskOptionValue> {
        let mut options: Vec<TaskOptionValue> = self
            .widgets
            .values()
            .filter_map(|w| {
                w.value().map(|value| TaskOptionValue {
                    name: w.name().to_string(),
                    value,
                })
            })
            .collect();
        // HashMap iteration order is arbitrary; keep output stable.
        options.sort_by(|a, b| a.name.cmp(&b.name));
        options
    }
}
