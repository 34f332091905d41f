use super::test_engine;
use crate::*;
use serde_json::json;

fn base_graph(engine: &Engine) -> (Vec<GraphNode>, Vec<GraphEdge>) {
    let out = engine
        .parse_and_layout("canvas LR\n@shape node1 \"One\"\n@shape node2 \"Two\"\nnode1 -> node2")
        .unwrap();
    (out.nodes, out.edges)
}

fn ids(nodes: &[GraphNode]) -> Vec<String> {
    nodes.iter().map(|n| n.id.clone()).collect()
}

#[test]
fn parses_all_seven_commands() {
    let engine = test_engine();
    let ops = engine
        .parse_patch(
            "@update node1 { color: \"red\" }\n\
             @delete node2\n\
             @add [shape:node3] \"Three\" { pinned: true }\n\
             @connect node1 -> node3 : \"link\"\n\
             @disconnect node1 -> node2\n\
             @move node1 { x: 10, y: 20 }\n\
             @resize node1 { width: 100, height: 50 }",
        )
        .unwrap();

    assert_eq!(ops.len(), 7);
    assert!(matches!(&ops[0], PatchOp::Update { target_id, .. } if target_id == "node1"));
    assert!(matches!(&ops[1], PatchOp::Delete { target_id } if target_id == "node2"));
    assert!(
        matches!(&ops[2], PatchOp::Add { target_id, node_type, label, .. }
            if target_id == "node3" && node_type == "shape" && label == "Three")
    );
    assert!(matches!(&ops[3], PatchOp::Connect { target_id, to, label, .. }
        if target_id == "node1" && to == "node3" && label.as_deref() == Some("link")));
    assert!(matches!(&ops[4], PatchOp::Disconnect { target_id, to }
        if target_id == "node1" && to.as_deref() == Some("node2")));
    assert!(matches!(&ops[5], PatchOp::Move { position, .. }
        if *position == Position::new(10.0, 20.0)));
    assert!(matches!(&ops[6], PatchOp::Resize { size, .. }
        if *size == Size::new(100.0, 50.0)));
}

#[test]
fn patch_custom_properties_use_schema_id_shape() {
    let engine = test_engine();
    let ops = engine
        .parse_patch("@update node1 { $priority: \"high\" }")
        .unwrap();
    match &ops[0] {
        PatchOp::Update {
            custom_properties, ..
        } => {
            assert_eq!(custom_properties[0].schema_id, "priority");
        }
        other => panic!("expected update, got {other:?}"),
    }
}

#[test]
fn move_without_numeric_fields_is_a_syntax_error() {
    let engine = test_engine();
    let err = engine.parse_patch("@move node1 { x: \"ten\", y: 5 }").unwrap_err();
    match err {
        Error::Syntax(list) => assert!(list.to_string().contains("numeric `x` and `y`")),
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn patch_parser_collects_multiple_errors() {
    let engine = test_engine();
    let err = engine
        .parse_patch("@update\n@delete\n@move node1 { x: 1, y: 2 }")
        .unwrap_err();
    match err {
        Error::Syntax(list) => assert_eq!(list.0.len(), 2),
        other => panic!("expected syntax errors, got {other:?}"),
    }
}

#[test]
fn validate_flags_missing_targets() {
    let engine = test_engine();
    let ops = engine.parse_patch("@update ghost { color: \"red\" }").unwrap();
    let result = engine.validate_patch(&ops, &["node1".into()]);
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains("ghost"));
}

#[test]
fn validate_accepts_targets_pending_addition() {
    let engine = test_engine();
    let ops = engine
        .parse_patch("@add [shape:new1] \"New\"\n@connect node1 -> new1\n@move new1 { x: 1, y: 2 }")
        .unwrap();
    let result = engine.validate_patch(&ops, &["node1".into()]);
    assert!(result.valid, "{:?}", result.errors);
}

#[test]
fn delete_cannot_target_a_pending_addition() {
    let engine = test_engine();
    let ops = engine
        .parse_patch("@add [shape:new1] \"New\"\n@delete new1")
        .unwrap();
    let result = engine.validate_patch(&ops, &[]);
    assert!(!result.valid);
    assert!(matches!(result.errors[0].operation, PatchOp::Delete { .. }));
}

#[test]
fn validate_flags_unregistered_add_type() {
    let engine = test_engine();
    let ops = engine.parse_patch("@add [widget:w1] \"W\"").unwrap();
    let result = engine.validate_patch(&ops, &[]);
    assert!(!result.valid);
    assert!(result.errors[0].message.contains("not registered"));
}

#[test]
fn second_add_of_the_same_id_fails_validation() {
    let engine = test_engine();
    let ops = engine
        .parse_patch("@add [shape:n] \"N\"\n@add [shape:n] \"N2\"")
        .unwrap();
    let result = engine.validate_patch(&ops, &[]);
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    // The violation points at the second add, not the first.
    assert!(matches!(&result.errors[0].operation, PatchOp::Add { label, .. } if label == "N2"));
    assert!(result.errors[0].message.contains("already exists"));
}

#[test]
fn non_positive_resize_fails_validation() {
    let engine = test_engine();
    let ops = engine
        .parse_patch("@resize node1 { width: -10, height: 5 }")
        .unwrap();
    let result = engine.validate_patch(&ops, &["node1".into()]);
    assert!(!result.valid);
    assert!(result.errors[0].message.contains("positive"));
}

#[test]
fn apply_update_merges_into_data() {
    let engine = test_engine();
    let (nodes, edges) = base_graph(&engine);
    let ops = engine
        .parse_patch("@update node1 { color: \"red\", title: \"Renamed\" }")
        .unwrap();

    let patched = engine
        .apply_patch(&ops, nodes, edges, &ApplyOptions::new(Direction::LR))
        .unwrap();
    let node1 = patched.nodes.iter().find(|n| n.id == "node1").unwrap();
    assert_eq!(node1.data.get("color"), Some(&json!("red")));
    assert_eq!(node1.data.get("title"), Some(&json!("Renamed")));
}

#[test]
fn apply_update_upserts_custom_properties() {
    let engine = test_engine();
    let (nodes, edges) = base_graph(&engine);
    let ops = engine
        .parse_patch("@update node1 { $priority: \"high\" }")
        .unwrap();
    let patched = engine
        .apply_patch(&ops, nodes, edges, &ApplyOptions::new(Direction::LR))
        .unwrap();

    let node1 = patched.nodes.iter().find(|n| n.id == "node1").unwrap();
    assert_eq!(
        node1.data.get("customProperties"),
        Some(&json!([{"schemaId": "priority", "value": "high"}]))
    );

    // A second update to the same schema id replaces, not duplicates.
    let ops = engine
        .parse_patch("@update node1 { $priority: \"low\" }")
        .unwrap();
    let patched = engine
        .apply_patch(
            &ops,
            patched.nodes,
            patched.edges,
            &ApplyOptions::new(Direction::LR),
        )
        .unwrap();
    let node1 = patched.nodes.iter().find(|n| n.id == "node1").unwrap();
    assert_eq!(
        node1.data.get("customProperties"),
        Some(&json!([{"schemaId": "priority", "value": "low"}]))
    );
}

#[test]
fn update_transform_hook_replaces_the_default_merge() {
    let engine = test_engine();
    let (nodes, edges) = base_graph(&engine);
    let ops = engine.parse_patch("@update node1 { title: \"T\" }").unwrap();

    let options = ApplyOptions::new(Direction::LR).with_update_transform(|node, properties, _| {
        // Store updates under a nested key instead of merging flat.
        node.data
            .insert("pending".into(), serde_json::Value::Object(properties.clone()));
    });
    let patched = engine.apply_patch(&ops, nodes, edges, &options).unwrap();

    let node1 = patched.nodes.iter().find(|n| n.id == "node1").unwrap();
    assert_eq!(node1.data.get("title"), None);
    assert_eq!(node1.data.get("pending"), Some(&json!({"title": "T"})));
}

#[test]
fn apply_delete_removes_node_and_touching_edges() {
    let engine = test_engine();
    let (nodes, edges) = base_graph(&engine);
    let ops = engine.parse_patch("@delete node1").unwrap();
    let patched = engine
        .apply_patch(&ops, nodes, edges, &ApplyOptions::new(Direction::LR))
        .unwrap();
    assert_eq!(ids(&patched.nodes), vec!["node2"]);
    assert!(patched.edges.is_empty());
}

#[test]
fn apply_add_builds_through_the_registry() {
    let engine = test_engine();
    let (nodes, edges) = base_graph(&engine);
    let ops = engine
        .parse_patch("@add [shape:node3] \"Three\" { color: \"blue\" }")
        .unwrap();
    let patched = engine
        .apply_patch(&ops, nodes, edges, &ApplyOptions::new(Direction::LR))
        .unwrap();

    let node3 = patched.nodes.iter().find(|n| n.id == "node3").unwrap();
    assert_eq!(node3.block_type, "shape");
    assert_eq!(node3.size, Size::new(200.0, 100.0));
    assert_eq!(node3.position, Position::new(0.0, 0.0));
    assert_eq!(node3.data.get("color"), Some(&json!("blue")));
}

#[test]
fn apply_add_of_existing_id_is_an_error() {
    let engine = test_engine();
    let (nodes, edges) = base_graph(&engine);
    let ops = engine.parse_patch("@add [shape:node1] \"Again\"").unwrap();
    let err = engine
        .apply_patch(&ops, nodes, edges, &ApplyOptions::new(Direction::LR))
        .unwrap_err();
    assert!(matches!(err, Error::NodeAlreadyExists { id } if id == "node1"));
}

#[test]
fn apply_connect_creates_an_edge_with_direction_handles() {
    let engine = test_engine();
    let (nodes, edges) = base_graph(&engine);
    let ops = engine.parse_patch("@connect node2 -> node1 : \"back\"").unwrap();
    let patched = engine
        .apply_patch(&ops, nodes, edges, &ApplyOptions::new(Direction::TB))
        .unwrap();

    let edge = patched.edges.iter().find(|e| e.id == "node2-node1").unwrap();
    assert_eq!(edge.label.as_deref(), Some("back"));
    assert_eq!(edge.source_handle.as_deref(), Some("bottom"));
    assert_eq!(edge.target_handle.as_deref(), Some("top"));
}

#[test]
fn apply_connect_updates_an_existing_edge() {
    let engine = test_engine();
    let (nodes, edges) = base_graph(&engine);
    assert_eq!(edges.len(), 1);
    let ops = engine
        .parse_patch("@connect node1 -> node2 : \"renamed\" { weight: 2 }")
        .unwrap();
    let patched = engine
        .apply_patch(&ops, nodes, edges, &ApplyOptions::new(Direction::LR))
        .unwrap();

    assert_eq!(patched.edges.len(), 1);
    assert_eq!(patched.edges[0].label.as_deref(), Some("renamed"));
    assert_eq!(patched.edges[0].data.get("weight"), Some(&json!(2)));
}

#[test]
fn apply_disconnect_removes_one_edge_or_all_outgoing() {
    let engine = test_engine();
    let (nodes, edges) = base_graph(&engine);

    let ops = engine.parse_patch("@disconnect node1 -> node2").unwrap();
    let patched = engine
        .apply_patch(&ops, nodes.clone(), edges.clone(), &ApplyOptions::new(Direction::LR))
        .unwrap();
    assert!(patched.edges.is_empty());

    let ops = engine.parse_patch("@disconnect node1").unwrap();
    let patched = engine
        .apply_patch(&ops, nodes, edges, &ApplyOptions::new(Direction::LR))
        .unwrap();
    assert!(patched.edges.is_empty());
}

#[test]
fn apply_move_and_resize_overwrite_unconditionally() {
    let engine = test_engine();
    let (nodes, edges) = base_graph(&engine);
    let ops = engine
        .parse_patch("@move node1 { x: 400, y: -25 }\n@resize node1 { width: 42, height: 24 }")
        .unwrap();
    let patched = engine
        .apply_patch(&ops, nodes, edges, &ApplyOptions::new(Direction::LR))
        .unwrap();

    let node1 = patched.nodes.iter().find(|n| n.id == "node1").unwrap();
    assert_eq!(node1.position, Position::new(400.0, -25.0));
    assert_eq!(node1.size, Size::new(42.0, 24.0));
}

#[test]
fn apply_sees_cumulative_results_in_order() {
    let engine = test_engine();
    let (nodes, edges) = base_graph(&engine);
    let ops = engine
        .parse_patch("@add [shape:node3] \"Three\"\n@connect node2 -> node3\n@update node3 { ready: true }")
        .unwrap();
    let patched = engine
        .apply_patch(&ops, nodes, edges, &ApplyOptions::new(Direction::LR))
        .unwrap();

    assert_eq!(patched.nodes.len(), 3);
    assert!(patched.edges.iter().any(|e| e.id == "node2-node3"));
    let node3 = patched.nodes.iter().find(|n| n.id == "node3").unwrap();
    assert_eq!(node3.data.get("ready"), Some(&json!(true)));
}

#[test]
fn apply_missing_target_is_an_error() {
    let engine = test_engine();
    let (nodes, edges) = base_graph(&engine);
    let ops = engine.parse_patch("@move ghost { x: 0, y: 0 }").unwrap();
    let err = engine
        .apply_patch(&ops, nodes, edges, &ApplyOptions::new(Direction::LR))
        .unwrap_err();
    assert!(matches!(err, Error::PatchTargetMissing { .. }));
}
