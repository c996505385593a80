//! End-to-end form flow tests: load, silent retry, error state, user
//! retry, selection, and assembly.

use serde_json::json;

use nodeform::app::FormRuntime;
use nodeform::tea::{Message, Phase};
use nodeform::widgets::ValueWidget;
use nodeform::{Error, NodeKey};

use crate::fixtures::{fast_config, raw_node, raw_node_with_options, ScriptedFetcher};

#[tokio::test]
async fn test_load_resolves_auto_to_least_loaded() {
    // Queues 5/2/2, node 3 offline -> Auto resolves to node 2.
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![
        raw_node(1, 5, true),
        raw_node(2, 2, true),
        raw_node(3, 2, false),
    ])]);
    let mut runtime = FormRuntime::new(fast_config(), None, fetcher);
    runtime.run_until_settled().await.unwrap();

    assert_eq!(runtime.model().phase, Phase::Ready);
    assert_eq!(runtime.model().selected, Some(NodeKey::Auto));
    assert_eq!(runtime.model().selected_node().unwrap().id, 2);

    // Auto first, then the three catalog nodes in fetch order.
    let nodes = &runtime.model().nodes;
    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[0].key, NodeKey::Auto);
    assert_eq!(nodes[0].label, "Auto");
    assert_eq!(
        nodes.iter().skip(1).map(|n| n.id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[tokio::test]
async fn test_transport_failures_retry_silently_until_success() {
    let fetcher = ScriptedFetcher::new(vec![
        Err(Error::MalformedResponse("payload was an object".to_string())),
        Err(Error::MalformedResponse("payload was an object".to_string())),
        Err(Error::MalformedResponse("payload was an object".to_string())),
        Ok(vec![raw_node(1, 0, true)]),
    ]);
    let mut runtime = FormRuntime::new(fast_config(), None, fetcher);
    runtime.run_until_settled().await.unwrap();
    assert_eq!(runtime.model().phase, Phase::Ready);
}

#[tokio::test]
async fn test_empty_catalog_is_user_visible_error() {
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![])]);
    let mut runtime = FormRuntime::new(fast_config(), None, fetcher);
    runtime.run_until_settled().await.unwrap();

    match &runtime.model().phase {
        Phase::Error {
            message,
            considered,
        } => {
            assert!(considered.is_empty(), "nothing was fetched at all");
            assert!(message.contains("no usable processing nodes"));
        }
        other => panic!("expected Error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_all_offline_error_lists_considered_nodes() {
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![
        raw_node(1, 0, false),
        raw_node(2, 4, false),
    ])]);
    let mut runtime = FormRuntime::new(fast_config(), None, fetcher);
    runtime.run_until_settled().await.unwrap();

    match &runtime.model().phase {
        Phase::Error {
            message,
            considered,
        } => {
            assert_eq!(considered.len(), 2);
            assert!(message.contains("http://node1:3000"));
            assert!(message.contains("http://node2:3000"));
        }
        other => panic!("expected Error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_user_retry_clears_error_and_refetches() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(vec![]),
        Ok(vec![raw_node(5, 1, true)]),
    ]);
    let mut runtime = FormRuntime::new(fast_config(), None, fetcher);
    runtime.run_until_settled().await.unwrap();
    assert!(matches!(runtime.model().phase, Phase::Error { .. }));

    runtime.handle().on_retry();
    runtime.run_until_settled().await.unwrap();
    assert_eq!(runtime.model().phase, Phase::Ready);
    assert_eq!(runtime.model().selected_node().unwrap().id, 5);
}

#[tokio::test]
async fn test_assemble_with_advanced_overrides() {
    let options = json!([
        {"name": "dsm", "value": false, "type": "bool"},
        {"name": "mesh-size", "value": 200000, "type": "int"}
    ]);
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![raw_node_with_options(
        1, 0, true, options,
    )])]);
    let mut runtime = FormRuntime::new(fast_config(), None, fetcher);
    runtime.run_until_settled().await.unwrap();

    runtime.apply(Message::NameChanged("Bridge inspection".to_string()));
    runtime.apply(Message::SetAdvancedOptions(true));
    runtime
        .model_mut()
        .register_widget(Box::new(ValueWidget::new("dsm", Some(json!(true)))));
    runtime
        .model_mut()
        .register_widget(Box::new(ValueWidget::new("mesh-size", None)));

    let task = runtime.model().assemble().unwrap();
    assert_eq!(task.name, "Bridge inspection");
    assert_eq!(task.selected_node.id, 1);
    // Only explicitly-set widgets contribute overrides.
    assert_eq!(task.options.len(), 1);
    assert_eq!(task.options[0].name, "dsm");
    assert_eq!(task.options[0].value, json!(true));
}

#[tokio::test]
async fn test_assemble_without_advanced_mode_has_no_options() {
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![raw_node(1, 0, true)])]);
    let mut runtime = FormRuntime::new(fast_config(), None, fetcher);
    runtime.run_until_settled().await.unwrap();

    runtime
        .model_mut()
        .register_widget(Box::new(ValueWidget::new("dsm", Some(json!(true)))));

    let task = runtime.model().assemble().unwrap();
    assert!(task.options.is_empty());
    assert!(task.name.starts_with("Task of "), "placeholder name used");
}

#[tokio::test]
async fn test_node_switch_discards_widget_overrides() {
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![
        raw_node(1, 0, true),
        raw_node(2, 3, true),
    ])]);
    let mut runtime = FormRuntime::new(fast_config(), None, fetcher);
    runtime.run_until_settled().await.unwrap();

    runtime.apply(Message::SetAdvancedOptions(true));
    runtime
        .model_mut()
        .register_widget(Box::new(ValueWidget::new("dsm", Some(json!(true)))));

    runtime.apply(Message::SelectNode(NodeKey::Id(2)));
    let task = runtime.model().assemble().unwrap();
    assert_eq!(task.selected_node.id, 2);
    assert!(
        task.options.is_empty(),
        "overrides belonged to the previous node's schema"
    );
}

#[tokio::test]
async fn test_refetch_rebuilds_auto_node_options() {
    // First load: auto resolves to node 1. Second load: node 1 is gone and
    // node 2 declares different options; the Auto entry must mirror them.
    let first = json!([{"name": "dsm", "value": false}]);
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![raw_node_with_options(1, 0, true, first)])]);
    let mut runtime = FormRuntime::new(fast_config(), None, fetcher);
    runtime.run_until_settled().await.unwrap();
    assert_eq!(runtime.model().nodes[0].options[0].name, "dsm");

    // Force a re-fetch by way of the error path: apply a fetched message
    // directly, as the runtime would after a refresh.
    let refreshed = vec![raw_node_with_options(
        2,
        0,
        true,
        json!([{"name": "orthophoto-resolution", "value": 5}]),
    )];
    runtime.apply(Message::NodesFetched(refreshed));
    assert_eq!(
        runtime.model().nodes[0].options[0].name,
        "orthophoto-resolution"
    );
    assert_eq!(runtime.model().selected_node().unwrap().id, 2);
}
