//! Auto-node resolution.
//!
//! Decides which concrete node the "Auto" pseudo-node stands for:
//! a historically auto-assigned node wins if it is still in the catalog,
//! otherwise the least-loaded enabled node, ties broken uniformly at random.

use rand::seq::SliceRandom;

use crate::catalog::{Node, NodeKey};
use crate::task::PriorTask;
use crate::{nlog_debug, Error, Result};

/// Resolve the Auto pseudo-node to a concrete node.
///
/// Priority: a prior auto-assignment pins its node if still present (even
/// when offline or no longer least-loaded); otherwise the enabled node with
/// the lowest queue count wins, chosen at random among ties. A pinned node
/// that vanished from the catalog falls through to least-loaded selection.
pub fn resolve<'a>(nodes: &'a [Node], prior: Option<&PriorTask>) -> Result<&'a Node> {
    if let Some(prior) = prior {
        if prior.auto_processing_node {
            if let Some(id) = prior.processing_node {
                if let Some(node) = nodes.iter().find(|n| n.id == id) {
                    nlog_debug!("Auto resolution pinned to prior node id={}", id);
                    return Ok(node);
                }
                nlog_debug!("Prior auto node id={} no longer in catalog", id);
            }
        }
    }

    let enabled: Vec<&Node> = nodes.iter().filter(|n| n.enabled).collect();
    let Some(min_queue) = enabled.iter().map(|n| n.queue_count).min() else {
        return Err(Error::NoUsableNodes {
            considered: nodes.to_vec(),
        });
    };

    let candidates: Vec<&Node> = enabled
        .into_iter()
        .filter(|n| n.queue_count == min_queue)
        .collect();

    // Cannot be empty given min_queue came from the same set, but checked anyway.
    let chosen = candidates
        .choose(&mut rand::thread_rng())
        .copied()
        .ok_or_else(|| Error::NoUsableNodes {
            considered: nodes.to_vec(),
        })?;

    nlog_debug!(
        "Auto resolved to node id={} (queue: {})",
        chosen.id,
        chosen.queue_count
    );
    Ok(chosen)
}

/// Build the presented node list: the resolved Auto node first, then every
/// catalog node in fetch order.
///
/// The Auto node mirrors the options of whatever node it resolves to; it is
/// rebuilt from scratch on every catalog load.
pub fn present(nodes: &[Node], prior: Option<&PriorTask>) -> Result<Vec<Node>> {
    let resolved = resolve(nodes, prior)?;
    let auto = Node {
        id: resolved.id,
        key: NodeKey::Auto,
        label: "Auto".to_string(),
        options: resolved.options.clone(),
        queue_count: resolved.queue_count,
        enabled: true,
        url: resolved.url.clone(),
    };

    let mut presented = Vec::with_capacity(nodes.len() + 1);
    presented.push(auto);
    presented.extend(nodes.iter().cloned());
    Ok(presented)
}
