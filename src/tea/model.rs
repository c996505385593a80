//! Model for the TEA pattern.
//!
//! The FormModel is pure form state - no channels, no handles to the
//! runtime. Merged options are recomputed on demand from the selected
//! node's schema and the prior task, never cached across selection changes.

use crate::catalog::{Node, NodeKey};
use crate::config::Config;
use crate::merge::{self, MergedOption};
use crate::task::{PriorTask, TaskConfig};
use crate::widgets::{OptionWidget, WidgetRegistry};
use crate::{Error, Result};

/// Lifecycle phase of the form.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Catalog fetch in flight (initial state, and during silent retries).
    Loading,
    /// Catalog loaded but unusable; holds the nodes that were considered
    /// so the renderer can list them next to the retry action.
    Error {
        message: String,
        considered: Vec<Node>,
    },
    /// Catalog loaded, a node is selected.
    Ready,
}

/// Pure form state - the single source of truth.
pub struct FormModel {
    pub phase: Phase,
    pub name: String,
    /// Session-unique fallback name, fixed at construction.
    pub name_placeholder: String,
    pub advanced_options: bool,

    /// Presented node list: the Auto node first, then the catalog in fetch
    /// order. Rebuilt from scratch on every successful load.
    pub nodes: Vec<Node>,
    pub selected: Option<NodeKey>,
    pub prior: Option<PriorTask>,

    /// Live option-widget handles for the current node's schema.
    pub widgets: WidgetRegistry,

    /// Whether the host completion callback has fired.
    pub loaded_once: bool,
    /// Set when state changes and a render is needed.
    pub dirty: bool,

    pub config: Config,
}

impl FormModel {
    pub fn new(config: Config, prior: Option<PriorTask>) -> Self {
        let name = prior
            .as_ref()
            .and_then(|t| t.name.clone())
            .unwrap_or_default();
        // Editing a task that saved options reopens in advanced mode.
        let advanced_options = prior.as_ref().is_some_and(|t| !t.options.is_empty());

        Self {
            phase: Phase::Loading,
            name,
            name_placeholder: format!("Task of {}", chrono::Utc::now().to_rfc3339()),
            advanced_options,
            nodes: Vec::new(),
            selected: None,
            prior,
            widgets: WidgetRegistry::new(),
            loaded_once: false,
            dirty: true,
            config,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    pub fn selected_node(&self) -> Option<&Node> {
        let key = self.selected?;
        self.nodes.iter().find(|n| n.key == key)
    }

    /// Display-ready options for the selected node: its schema merged with
    /// the prior task's saved overrides. Length always equals the schema's.
    pub fn merged_options(&self) -> Vec<MergedOption> {
        let Some(node) = self.selected_node() else {
            return Vec::new();
        };
        let prior = self.prior.as_ref().map(|t| t.options.as_slice());
        merge::merge(&node.options, prior)
    }

    /// Register a live widget handle for one option of the current schema.
    /// Called by the renderer when it mounts a widget.
    pub fn register_widget(&mut self, widget: Box<dyn OptionWidget>) {
        self.widgets.register(widget);
    }

    /// Assemble the final task configuration.
    ///
    /// The name falls back to the construction-time placeholder; option
    /// overrides are only collected in advanced mode.
    pub fn assemble(&self) -> Result<TaskConfig> {
        let node = self
            .selected_node()
            .ok_or_else(|| Error::Validation("no processing node selected".to_string()))?;

        let name = if self.name.is_empty() {
            self.name_placeholder.clone()
        } else {
            self.name.clone()
        };

        let options = if self.advanced_options {
            self.widgets.collect()
        } else {
            Vec::new()
        };

        Ok(TaskConfig {
            name,
            selected_node: node.clone(),
            options,
        })
    }

    /// Immutable snapshot for the rendering collaborator.
    pub fn snapshot(&self) -> FormView {
        let (loading, error) = match &self.phase {
            Phase::Loading => (true, None),
            Phase::Error {
                message,
                considered,
            } => (
                false,
                Some(ErrorView {
                    message: message.clone(),
                    considered: considered.clone(),
                }),
            ),
            Phase::Ready => (false, None),
        };

        FormView {
            loading,
            error,
            name: self.name.clone(),
            name_placeholder: self.name_placeholder.clone(),
            processing_nodes: self.nodes.clone(),
            selected: self.selected,
            advanced_options: self.advanced_options,
            options: self.merged_options(),
        }
    }
}

/// Catalog error as shown to the user, with the diagnostic node list.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorView {
    pub message: String,
    pub considered: Vec<Node>,
}

/// Snapshot consumed by the rendering collaborator.
#[derive(Debug, Clone)]
pub struct FormView {
    pub loading: bool,
    pub error: Option<ErrorView>,
    pub name: String,
    pub name_placeholder: String,
    pub processing_nodes: Vec<Node>,
    pub selected: Option<NodeKey>,
    pub advanced_options: bool,
    pub options: Vec<MergedOption>,
}
