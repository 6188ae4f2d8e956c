use mindmap::json::CanvasData;
use mindmap::model::BBox;
use mindmap::{Canvas, Config, Error, MemoryCanvas, Node, NodeId, Settings};
use serde_json::json;

#[test]
fn settings_merge_over_defaults() {
    assert_eq!(Settings::from_json_value(None).unwrap(), Settings::default());
    assert_eq!(Settings::from_json_value(Some(json!(null))).unwrap(), Settings::default());
    assert_eq!(Settings::from_json_value(Some(json!({}))).unwrap(), Settings { auto_focus: false });
    let s = Settings::from_json_value(Some(json!({"autoFocus": true, "mySetting": "default"}))).unwrap();
    assert!(s.auto_focus);
    assert_eq!(s.to_json_value(), json!({"autoFocus": true}));
}

#[test]
fn settings_reject_wrong_types() {
    let err = Settings::from_json_value(Some(json!({"autoFocus": "yes"}))).unwrap_err();
    assert!(matches!(err, Error::Settings(_)));
    assert_eq!(err.code(), "settings");
}

#[test]
fn config_defaults_and_partial_override() {
    let d = Config::default();
    assert_eq!((d.row_gap, d.column_gap, d.offset_weight, d.edit_delay_ms), (20.0, 200.0, 1.1, 50));
    let c: Config = serde_json::from_value(json!({"rowGap": 8.0, "debounceMs": 0.0})).unwrap();
    assert_eq!(c.row_gap, 8.0);
    assert_eq!(c.debounce_ms, 0.0);
    assert_eq!(c.column_gap, 200.0);
}

#[test]
fn canvas_data_uses_host_edge_format() {
    let mut c = MemoryCanvas::new(BBox::default());
    let a = c.add_node(Node::new("a", 0.0, 0.0, 10.0, 10.0));
    let b = c.add_node(Node::new("b", 50.0, 0.0, 10.0, 10.0));
    c.add_edge("e1", &a, &b);
    let v = serde_json::to_value(c.data().unwrap()).unwrap();
    assert_eq!(
        v["edges"][0],
        json!({"id": "e1", "fromNode": "a", "fromSide": "right", "toNode": "b", "toSide": "left"})
    );
    assert_eq!(v["nodes"][1]["type"], json!("text"));
}

#[test]
fn import_rejects_dangling_edges() {
    let mut c = MemoryCanvas::new(BBox::default());
    c.add_node(Node::new("a", 0.0, 0.0, 10.0, 10.0));
    let data: CanvasData = serde_json::from_value(json!({
        "nodes": [{"id": "a", "x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0}],
        "edges": [{"id": "e", "fromNode": "a", "fromSide": "right", "toNode": "ghost", "toSide": "left"}]
    }))
    .unwrap();
    let err = c.import_data(data).unwrap_err();
    assert!(matches!(err, Error::UnknownNode(ref id) if *id == NodeId::new("ghost")));
    assert!(c.edges().is_empty());

    let bad = CanvasData { nodes: vec![json!({"id": "x"})], edges: vec![] };
    assert!(matches!(c.import_data(bad), Err(Error::Data(_))));
}
