//! Pure update function for the TEA pattern.
//!
//! Takes the model and a message, mutates the model, and returns the
//! commands to execute. All I/O (fetching, retry timing, the host
//! callback) happens in the runtime via the returned commands.

use crate::catalog::{self, Node, NodeKey, RawNode};
use crate::selector;
use crate::widgets::ValueWidget;
use crate::{nlog, nlog_debug, nlog_warn, Error};

use super::command::Command;
use super::message::Message;
use super::model::{FormModel, Phase};

/// Pure update function: FormModel + Message → Commands
pub fn update(model: &mut FormModel, msg: Message) -> Vec<Command> {
    let mut cmds = Vec::new();

    match msg {
        Message::NodesFetched(raw) => on_nodes_fetched(model, raw, &mut cmds),

        Message::FetchFailed(reason) => {
            // Transport failures and malformed payloads are never surfaced;
            // stay in Loading and try again after the policy delay.
            nlog_warn!("Catalog fetch failed, scheduling retry: {}", reason);
            cmds.push(Command::ScheduleRetry);
        }

        Message::Retry => {
            if matches!(model.phase, Phase::Error { .. }) {
                nlog!("User retry: re-fetching node catalog");
                model.phase = Phase::Loading;
                model.dirty = true;
                cmds.push(Command::FetchNodes);
            }
        }

        Message::NameChanged(name) => {
            model.name = name;
            model.dirty = true;
        }

        Message::SelectNode(key) => {
            // Disabled nodes are listed for visibility but not selectable.
            if model.nodes.iter().any(|n| n.key == key && n.enabled) {
                // Widget handles belong to the previous node's schema.
                model.widgets.clear();
                model.selected = Some(key);
                model.dirty = true;
                nlog_debug!("Selected node key={}", key);
            } else {
                nlog_warn!("Ignoring selection of unknown or disabled node key={}", key);
            }
        }

        Message::SetAdvancedOptions(flag) => {
            model.advanced_options = flag;
            model.dirty = true;
        }

        Message::OptionChanged(name, value) => {
            // Stored as a value-snapshot handle; overrides only surface in
            // assemble(), so no render is needed.
            model
                .widgets
                .register(Box::new(ValueWidget::new(name, value)));
        }
    }

    cmds
}

fn on_nodes_fetched(model: &mut FormModel, raw: Vec<RawNode>, cmds: &mut Vec<Command>) {
    let presented = catalog::normalize(&raw)
        .and_then(|nodes| selector::present(&nodes, model.prior.as_ref()));

    match presented {
        Ok(nodes) => {
            nlog!("Catalog loaded: {} nodes (auto included)", nodes.len());
            model.nodes = nodes;
            model.widgets.clear();
            model.selected = Some(initial_selection(model));
            model.phase = Phase::Ready;
            model.dirty = true;

            if !model.loaded_once {
                model.loaded_once = true;
                cmds.push(Command::NotifyLoaded);
            }
        }
        Err(Error::EmptyCatalog) => {
            nlog_warn!("Catalog fetch returned no nodes");
            enter_error(model, Vec::new());
        }
        Err(Error::NoUsableNodes { considered }) => {
            nlog_warn!(
                "Catalog has {} nodes but none are usable",
                considered.len()
            );
            enter_error(model, considered);
        }
        Err(e) => {
            // Not reachable from normalize/present today; treat like a
            // failed fetch rather than losing the form.
            nlog_warn!("Unexpected catalog error, scheduling retry: {}", e);
            cmds.push(Command::ScheduleRetry);
        }
    }
}

/// Initial selection after a successful load: a prior task's concrete node
/// by direct id lookup (bypassing the selector), otherwise Auto.
fn initial_selection(model: &FormModel) -> NodeKey {
    if let Some(prior) = &model.prior {
        if let Some(id) = prior.processing_node {
            if !prior.auto_processing_node {
                if model.nodes.iter().any(|n| n.key == NodeKey::Id(id)) {
                    return NodeKey::Id(id);
                }
                nlog_warn!(
                    "Prior node id={} not in catalog, falling back to auto",
                    id
                );
            }
        }
    }
    NodeKey::Auto
}

fn enter_error(model: &mut FormModel, considered: Vec<Node>) {
    model.phase = Phase::Error {
        message: no_usable_nodes_message(&considered),
        considered,
    };
    model.dirty = true;
}

fn no_usable_nodes_message(considered: &[Node]) -> String {
    let mut message = String::from("There are no usable processing nodes.");
    if !considered.is_empty() {
        message.push_str(" We tried to reach: ");
        let tried: Vec<String> = considered
            .iter()
            .map(|n| format!("{} ({})", n.label, n.url))
            .collect();
        message.push_str(&tried.join(", "));
        message.push('.');
    }
    message.push_str(" Make sure that at least one processing node is reachable, then retry.");
    message
}
