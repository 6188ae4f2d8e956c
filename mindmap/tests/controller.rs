use serde_json::json;
use mindmap::model::{BBox, FocusState};
use mindmap::{
    Canvas, Chord, Config, Deferred, Direction, Error, MemoryCanvas, Mindmap, Mode, Modifiers, Node,
    NodeId, Outcome, Placement, Scheduled, Settings,
};

fn viewport() -> BBox {
    BBox { min_x: -1000.0, max_x: 1000.0, min_y: -1000.0, max_y: 1000.0 }
}

fn mindmap() -> Mindmap {
    Mindmap::seeded(Config::default(), 7)
}

/// root with two children `a` (above) and `b` (below), already reflowed.
fn family() -> (MemoryCanvas, NodeId, NodeId, NodeId) {
    let mut c = MemoryCanvas::new(viewport());
    let root = c.add_node(Node::new("root", 0.0, 0.0, 100.0, 50.0));
    let a = c.add_node(Node::new("a", 300.0, -35.0, 100.0, 50.0));
    let b = c.add_node(Node::new("b", 300.0, 35.0, 100.0, 50.0));
    c.add_edge("e1", &root, &a);
    c.add_edge("e2", &root, &b);
    (c, root, a, b)
}

fn y_of(c: &MemoryCanvas, id: &NodeId) -> f64 {
    c.node(id).unwrap().y
}

#[test]
fn create_child_on_leaf_centers_it_and_connects() {
    let mut c = MemoryCanvas::new(viewport());
    let root = c.add_node(Node::new("root", 0.0, 0.0, 100.0, 50.0));
    c.select_only(&root).unwrap();
    let mut mm = mindmap();

    let out = mm.create_child(&mut c).unwrap();
    let Outcome::Created(child) = out else { panic!("expected a new node, got {:?}", out) };
    let n = c.node(&child).unwrap();
    assert_eq!((n.x, n.y, n.width, n.height), (300.0, 0.0, 100.0, 50.0));

    assert_eq!(c.edges().len(), 1);
    let e = &c.edges()[0];
    assert_eq!((&e.from.node, &e.to.node), (&root, &child));
    assert_eq!(e.id.len(), 6);
    assert!(e.id.chars().all(|ch| ch.is_ascii_alphanumeric()));

    // the new node is now the focused selection
    assert_eq!(c.selection().single().map(|n| n.id.clone()), Some(child));
    assert_eq!(mm.mode(&c), Mode::Navigate);
    assert!(mm.take_scheduled().is_empty());
}

#[test]
fn create_child_appends_below_existing_children() {
    let (mut c, root, a, b) = family();
    c.select_only(&root).unwrap();
    let mut mm = mindmap();
    let Outcome::Created(new) = mm.create_child(&mut c).unwrap() else { panic!() };
    // column of three 50-high nodes, 20 apart, centered on y = 25
    assert_eq!(y_of(&c, &a), -70.0);
    assert_eq!(y_of(&c, &b), 0.0);
    assert_eq!(y_of(&c, &new), 70.0);
    assert_eq!(c.node(&new).unwrap().x, 300.0);
}

#[test]
fn create_sibling_below_and_above() {
    let (mut c, _root, a, b) = family();
    c.select_only(&a).unwrap();
    let mut mm = mindmap();
    let Outcome::Created(below) = mm.create_sibling(&mut c, Placement::Below).unwrap() else { panic!() };
    assert_eq!(y_of(&c, &a), -70.0);
    assert_eq!(y_of(&c, &below), 0.0);
    assert_eq!(y_of(&c, &b), 70.0);

    let (mut c, root, a, b) = family();
    c.select_only(&a).unwrap();
    let Outcome::Created(above) = mm.create_sibling(&mut c, Placement::Above).unwrap() else { panic!() };
    assert_eq!(y_of(&c, &above), -70.0);
    assert_eq!(y_of(&c, &a), 0.0);
    assert_eq!(y_of(&c, &b), 70.0);
    let last = c.edges().last().unwrap();
    assert_eq!((&last.from.node, &last.to.node), (&root, &above));
}

#[test]
fn create_sibling_without_parent_is_noop() {
    let (mut c, root, _, _) = family();
    c.select_only(&root).unwrap();
    let mut mm = mindmap();
    assert_eq!(mm.create_sibling(&mut c, Placement::Below).unwrap(), Outcome::Noop);
    assert_eq!(c.nodes().len(), 3);
    assert_eq!(c.edges().len(), 2);
}

#[test]
fn creation_needs_a_single_non_editing_selection() {
    let (mut c, root, a, _) = family();
    let mut mm = mindmap();
    // nothing selected
    assert_eq!(mm.create_child(&mut c).unwrap(), Outcome::Noop);
    // two selected
    c.select(&[root.clone(), a.clone()]);
    assert_eq!(mm.create_child(&mut c).unwrap(), Outcome::Noop);
    assert_eq!(mm.mode(&c), Mode::Invalid);
    // editing
    c.select_only(&a).unwrap();
    c.start_editing(&a).unwrap();
    assert_eq!(mm.create_child(&mut c).unwrap(), Outcome::Noop);
    assert_eq!(mm.create_sibling(&mut c, Placement::Above).unwrap(), Outcome::Noop);
    assert_eq!(mm.navigate(&mut c, Direction::Left).unwrap(), Outcome::Noop);
    assert_eq!(c.nodes().len(), 3);
}

#[test]
fn navigate_between_family_members() {
    let (mut c, root, a, b) = family();
    c.select_only(&root).unwrap();
    let mut mm = mindmap();
    assert_eq!(mm.navigate(&mut c, Direction::Right).unwrap(), Outcome::Navigated(a.clone()));
    assert_eq!(mm.navigate(&mut c, Direction::Down).unwrap(), Outcome::Navigated(b.clone()));
    assert_eq!(mm.navigate(&mut c, Direction::Left).unwrap(), Outcome::Navigated(root.clone()));
    assert_eq!(mm.navigate(&mut c, Direction::Up).unwrap(), Outcome::Noop);
    assert_eq!(c.selection().single().map(|n| n.id.clone()), Some(root));
}

#[test]
fn dispatch_routes_and_debounces() {
    let (mut c, root, _, _) = family();
    c.select_only(&root).unwrap();
    let mut mm = mindmap();
    let tab = Chord::new(Modifiers::NONE, "Tab");
    assert!(matches!(mm.dispatch(&mut c, &tab, 0.0).unwrap(), Outcome::Created(_)));
    assert_eq!(mm.dispatch(&mut c, &tab, 50.0).unwrap(), Outcome::Suppressed);
    assert!(matches!(mm.dispatch(&mut c, &tab, 150.0).unwrap(), Outcome::Created(_)));
    assert_eq!(c.nodes().len(), 5);

    assert_eq!(mm.dispatch(&mut c, &Chord::new(Modifiers::NONE, "q"), 200.0).unwrap(), Outcome::Unbound);
    // mode actions are never debounced
    let esc = Chord::new(Modifiers::META, "Escape");
    assert_eq!(mm.dispatch(&mut c, &esc, 300.0).unwrap(), Outcome::ModeChanged(Mode::Touch));
    assert_eq!(mm.dispatch(&mut c, &esc, 301.0).unwrap(), Outcome::Noop);
}

#[test]
fn mode_cycle_touch_navigate_create_and_back() {
    let (mut c, root, _, _) = family();
    let mut mm = mindmap();
    assert_eq!(mm.mode(&c), Mode::Touch);

    // viewport center (0, 0) sits on root's top-left corner
    assert_eq!(mm.advance(&mut c).unwrap(), Outcome::ModeChanged(Mode::Navigate));
    assert_eq!(c.selection().single().map(|n| n.id.clone()), Some(root.clone()));
    assert_eq!(mm.mode(&c), Mode::Navigate);

    assert_eq!(mm.advance(&mut c).unwrap(), Outcome::ModeChanged(Mode::Create));
    let queued = mm.take_scheduled();
    assert_eq!(queued, vec![Scheduled { delay_ms: 50, task: Deferred::StartEditing(root.clone()) }]);
    // editing only starts once the host runs the deferred task
    assert_eq!(mm.mode(&c), Mode::Navigate);
    for s in queued {
        assert_eq!(mm.run_deferred(&mut c, s.task).unwrap(), Outcome::ModeChanged(Mode::Create));
    }
    assert_eq!(mm.mode(&c), Mode::Create);
    assert_eq!(mm.advance(&mut c).unwrap(), Outcome::Noop);

    assert_eq!(mm.retreat(&mut c).unwrap(), Outcome::ModeChanged(Mode::Navigate));
    assert_eq!(mm.mode(&c), Mode::Navigate);
    assert_eq!(c.node(&root).unwrap().state, FocusState::Focused);

    assert_eq!(mm.retreat(&mut c).unwrap(), Outcome::ModeChanged(Mode::Touch));
    assert_eq!(mm.mode(&c), Mode::Touch);

    // navigate-only actions do nothing in touch mode
    assert_eq!(mm.retreat(&mut c).unwrap(), Outcome::Noop);
    assert_eq!(mm.navigate(&mut c, Direction::Right).unwrap(), Outcome::Noop);
    assert_eq!(mm.mode(&c), Mode::Touch);
}

#[test]
fn advance_with_empty_viewport_is_noop() {
    let mut c = MemoryCanvas::new(viewport());
    c.add_node(Node::new("far", 5000.0, 5000.0, 10.0, 10.0));
    let mut mm = mindmap();
    assert_eq!(mm.advance(&mut c).unwrap(), Outcome::Noop);
    assert_eq!(mm.mode(&c), Mode::Touch);
}

#[test]
fn deferred_edit_is_dropped_when_selection_moved() {
    let (mut c, root, a, _) = family();
    c.select_only(&root).unwrap();
    let mut mm = mindmap();
    mm.advance(&mut c).unwrap();
    c.select_only(&a).unwrap();
    for s in mm.take_scheduled() {
        assert_eq!(mm.run_deferred(&mut c, s.task).unwrap(), Outcome::Noop);
    }
    assert_eq!(c.node(&a).unwrap().state, FocusState::Focused);
    assert_eq!(c.node(&root).unwrap().state, FocusState::Idle);
}

#[test]
fn auto_focus_queues_edit_after_zoom() {
    let (mut c, root, a, _) = family();
    c.select_only(&root).unwrap();
    let mut mm = mindmap();
    mm.set_settings(Settings { auto_focus: true });
    assert_eq!(mm.navigate(&mut c, Direction::Right).unwrap(), Outcome::Navigated(a.clone()));
    let queued = mm.take_scheduled();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].task, Deferred::StartEditing(a.clone()));
    mm.run_deferred(&mut c, queued[0].task.clone()).unwrap();
    assert_eq!(mm.mode(&c), Mode::Create);
}

#[test]
fn host_failure_propagates() {
    let (mut c, root, _, _) = family();
    c.select_only(&root).unwrap();
    c.reject_creation(true);
    let mut mm = mindmap();
    let err = mm.create_child(&mut c).unwrap_err();
    assert!(matches!(err, Error::Host(_)));
    assert_eq!(err.code(), "host");
    assert_eq!(c.edges().len(), 2);
}

#[test]
fn seeded_controllers_generate_identical_edge_ids() {
    let run = || {
        let (mut c, root, _, _) = family();
        c.select_only(&root).unwrap();
        let mut mm = mindmap();
        mm.create_child(&mut c).unwrap();
        c.edges().last().unwrap().id.clone()
    };
    assert_eq!(run(), run());
}

#[test]
fn create_child_keeps_host_edge_records_intact() {
    let mut c = MemoryCanvas::new(viewport());
    let root = c.add_node(Node::new("root", 0.0, 0.0, 100.0, 50.0));
    let a = c.add_node(Node::new("a", 300.0, 0.0, 100.0, 50.0));
    let labelled = json!({
        "id": "e1", "fromNode": "root", "fromSide": "right", "toNode": "a", "toSide": "left",
        "color": "4", "label": "why", "toEnd": "none"
    });
    let vertical = json!({"id": "e2", "fromNode": "a", "fromSide": "bottom", "toNode": "root", "toSide": "top"});
    let mut data = c.data().unwrap();
    data.edges = vec![labelled.clone(), vertical.clone()];
    c.import_data(data).unwrap();
    // only the left/right edge takes part in layout
    assert_eq!(c.edges().len(), 1);

    c.select_only(&root).unwrap();
    let mut mm = mindmap();
    let Outcome::Created(child) = mm.create_child(&mut c).unwrap() else { panic!() };

    let edges = c.data().unwrap().edges;
    assert_eq!(edges.len(), 3);
    assert_eq!(edges[0], labelled);
    assert_eq!(edges[1], vertical);
    assert_eq!(edges[2]["fromNode"], json!("root"));
    assert_eq!(edges[2]["fromSide"], json!("right"));
    assert_eq!(edges[2]["toNode"], json!(child.as_str()));
    assert_eq!(edges[2]["toSide"], json!("left"));
    // `a` was re-stacked with the new child
    assert_eq!(y_of(&c, &a), -35.0);
}

#[test]
fn unconnectable_node_is_removed_again() {
    let (mut c, root, _, _) = family();
    c.select_only(&root).unwrap();
    c.reject_data(true);
    let mut mm = mindmap();
    assert!(matches!(mm.create_child(&mut c).unwrap_err(), Error::Host(_)));
    assert_eq!(c.nodes().len(), 3);
    assert_eq!(c.edges().len(), 2);

    let (mut c, _, a, _) = family();
    c.select_only(&a).unwrap();
    c.reject_data(true);
    assert!(mm.create_sibling(&mut c, Placement::Below).is_err());
    assert_eq!(c.nodes().len(), 3);
}

#[test]
fn sibling_placements_share_a_debounce_window() {
    let (mut c, _, a, _) = family();
    c.select_only(&a).unwrap();
    let mut mm = mindmap();
    let below = Chord::new(Modifiers::NONE, "Enter");
    let above = Chord::new(Modifiers::SHIFT, "Enter");
    assert!(matches!(mm.dispatch(&mut c, &below, 0.0).unwrap(), Outcome::Created(_)));
    assert_eq!(mm.dispatch(&mut c, &above, 50.0).unwrap(), Outcome::Suppressed);
    assert_eq!(c.nodes().len(), 4);
    // a different operation has its own window
    assert!(matches!(mm.dispatch(&mut c, &Chord::new(Modifiers::NONE, "Tab"), 60.0).unwrap(), Outcome::Created(_)));
}

#[test]
fn advance_picks_node_nearest_viewport_center() {
    let (mut c, _, _, b) = family();
    c.set_viewport(BBox { min_x: 250.0, max_x: 450.0, min_y: 0.0, max_y: 200.0 });
    let mut mm = mindmap();
    assert_eq!(mm.advance(&mut c).unwrap(), Outcome::ModeChanged(Mode::Navigate));
    assert_eq!(c.selection().single().map(|n| n.id.clone()), Some(b));
}
