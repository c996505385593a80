//! Editing a previously saved task: auto-pin preservation, direct node
//! re-selection, and option merging against the saved overrides.

use serde_json::json;

use nodeform::app::FormRuntime;
use nodeform::tea::Phase;
use nodeform::{NodeKey, PriorTask};

use crate::fixtures::{fast_config, raw_node, raw_node_with_options, ScriptedFetcher};

fn prior(value: serde_json::Value) -> PriorTask {
    serde_json::from_value(value).expect("valid prior task fixture")
}

#[tokio::test]
async fn test_prior_auto_assignment_pins_auto_resolution() {
    // Prior {processing_node: 1, auto} with queues 5/2/2 -> Auto resolves
    // to node 1 regardless of queue counts.
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![
        raw_node(1, 5, true),
        raw_node(2, 2, true),
        raw_node(3, 2, false),
    ])]);
    let task = prior(json!({"processing_node": 1, "auto_processing_node": true}));
    let mut runtime = FormRuntime::new(fast_config(), Some(task), fetcher);
    runtime.run_until_settled().await.unwrap();

    assert_eq!(runtime.model().selected, Some(NodeKey::Auto));
    assert_eq!(runtime.model().selected_node().unwrap().id, 1);
}

#[tokio::test]
async fn test_prior_concrete_node_selected_directly() {
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![
        raw_node(1, 0, true),
        raw_node(2, 9, true),
    ])]);
    let task = prior(json!({"processing_node": 2, "auto_processing_node": false}));
    let mut runtime = FormRuntime::new(fast_config(), Some(task), fetcher);
    runtime.run_until_settled().await.unwrap();

    // Direct id lookup, bypassing least-loaded selection.
    assert_eq!(runtime.model().selected, Some(NodeKey::Id(2)));
}

#[tokio::test]
async fn test_vanished_auto_pin_falls_back_to_least_loaded() {
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![
        raw_node(1, 5, true),
        raw_node(2, 2, true),
    ])]);
    let task = prior(json!({"processing_node": 77, "auto_processing_node": true}));
    let mut runtime = FormRuntime::new(fast_config(), Some(task), fetcher);
    runtime.run_until_settled().await.unwrap();

    assert_eq!(runtime.model().selected, Some(NodeKey::Auto));
    assert_eq!(runtime.model().selected_node().unwrap().id, 2);
}

#[tokio::test]
async fn test_saved_task_seeds_name_and_advanced_mode() {
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![raw_node(1, 0, true)])]);
    let task = prior(json!({
        "name": "Vineyard rows",
        "options": [{"name": "dsm", "value": true}]
    }));
    let mut runtime = FormRuntime::new(fast_config(), Some(task), fetcher);
    runtime.run_until_settled().await.unwrap();

    assert_eq!(runtime.model().name, "Vineyard rows");
    assert!(runtime.model().advanced_options);

    let assembled = runtime.model().assemble().unwrap();
    assert_eq!(assembled.name, "Vineyard rows");
}

#[tokio::test]
async fn test_saved_overrides_show_up_in_merged_options() {
    // Schema [a=10, b="x"] with saved override [a=99] merges to
    // [{a, value: 99, default: 10}, {b, default: "x", no value}].
    let options = json!([
        {"name": "a", "value": 10},
        {"name": "b", "value": "x"}
    ]);
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![raw_node_with_options(
        1, 0, true, options,
    )])]);
    let task = prior(json!({"options": [{"name": "a", "value": 99}]}));
    let mut runtime = FormRuntime::new(fast_config(), Some(task), fetcher);
    runtime.run_until_settled().await.unwrap();
    assert_eq!(runtime.model().phase, Phase::Ready);

    let merged = runtime.model().merged_options();
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].name, "a");
    assert_eq!(merged[0].value, Some(json!(99)));
    assert_eq!(merged[0].default_value, json!(10));
    assert_eq!(merged[1].name, "b");
    assert_eq!(merged[1].value, None);
    assert_eq!(merged[1].default_value, json!("x"));

    // The snapshot hands the same merged list to the renderer.
    let view = runtime.model().snapshot();
    assert_eq!(view.options, merged);
    assert!(view.advanced_options, "saved options reopen advanced mode");
}
