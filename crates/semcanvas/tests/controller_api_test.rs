//! Integration tests for the DiagramController action and gesture API.

use indexmap::IndexMap;

use semcanvas::{
    DiagramCallbacks, DiagramController,
    config::{AppConfig, CanvasConfig, ExportConfig, StyleConfig},
    export::svg::SvgExporter,
    geometry::{Bounds, Point, Size},
    highlight::HighlightLevel,
    identifier::Id,
    menu::{CanvasAction, EdgeAction, MenuItem, NodeAction},
    model::{Edge, EdgeType, Group, Node, NodeItem, Position},
};

#[derive(Debug, Default)]
struct Recorder {
    positions: Vec<IndexMap<Id, Position>>,
    selections: Vec<(Vec<Id>, Vec<Id>)>,
    added_waypoints: Vec<(Id, usize, Point)>,
    deleted_waypoints: Vec<(Id, usize)>,
    waypoint_changes: Vec<IndexMap<Id, Vec<Point>>>,
    connections_to_node: Vec<(Id, Id)>,
    connections_to_nothing: Vec<(Id, Point)>,
    generalization_dialogs: Vec<(Id, bool)>,
    edited_nodes: Vec<Id>,
    deleted_edges: Vec<Id>,
    removed_attributes: Vec<(Id, Id)>,
    anchor_toggles: Vec<Id>,
    created_classes: Vec<Point>,
}

impl DiagramCallbacks for Recorder {
    fn on_change_nodes_positions(&mut self, changes: &IndexMap<Id, Position>) {
        self.positions.push(changes.clone());
    }

    fn on_selection_did_change(&mut self, nodes: &[Id], edges: &[Id]) {
        self.selections.push((nodes.to_vec(), edges.to_vec()));
    }

    fn on_add_waypoint(&mut self, edge: &Edge, index: usize, waypoint: Point) {
        self.added_waypoints.push((edge.identifier, index, waypoint));
    }

    fn on_delete_waypoint(&mut self, edge: &Edge, index: usize) {
        self.deleted_waypoints.push((edge.identifier, index));
    }

    fn on_change_waypoint_positions(&mut self, changes: &IndexMap<Id, Vec<Point>>) {
        self.waypoint_changes.push(changes.clone());
    }

    fn on_create_connection_to_node(&mut self, source: &Node, target: &Node) {
        self.connections_to_node
            .push((source.identifier, target.identifier));
    }

    fn on_create_connection_to_nothing(&mut self, source: &Node, position: Point) {
        self.connections_to_nothing
            .push((source.identifier, position));
    }

    fn on_canvas_open_create_class_dialog_with_generalization(
        &mut self,
        source: &Node,
        _position: Point,
        new_class_is_parent: bool,
    ) {
        self.generalization_dialogs
            .push((source.identifier, new_class_is_parent));
    }

    fn on_edit_node(&mut self, node: &Node) {
        self.edited_nodes.push(node.identifier);
    }

    fn on_delete_edge(&mut self, edge: &Edge) {
        self.deleted_edges.push(edge.identifier);
    }

    fn on_remove_attribute(&mut self, attribute: Id, node: &Node) {
        self.removed_attributes.push((attribute, node.identifier));
    }

    fn on_toggle_anchor_for_node(&mut self, node: &Node) {
        self.anchor_toggles.push(node.identifier);
    }

    fn on_canvas_open_create_class_dialog(&mut self, position: Point) {
        self.created_classes.push(position);
    }
}

fn node(id: &str, x: f32, y: f32) -> Node {
    Node::new(id, format!("http://example.com/{id}").as_str(), id, Position::new(x, y))
}

/// A at (0, 0), B at (400, 0), C at (0, 300), all 100x50, edge A -> B.
fn controller_with(config: AppConfig) -> DiagramController<Recorder> {
    let mut controller = DiagramController::new(config, Recorder::default());
    controller.set_content(
        vec![node("a", 0.0, 0.0), node("b", 400.0, 0.0), node("c", 0.0, 300.0)],
        vec![Edge::new(
            EdgeType::Association,
            "ab",
            "http://example.com/ab",
            "a",
            "b",
        )],
        vec![],
    );
    for id in ["a", "b", "c"] {
        controller.set_node_dimensions(Id::new(id), Size::new(100.0, 50.0));
    }
    controller
}

fn controller() -> DiagramController<Recorder> {
    controller_with(AppConfig::default())
}

#[test]
fn test_render_two_nodes_to_svg() {
    let mut controller = DiagramController::new(AppConfig::default(), ());
    assert_eq!(controller.render_to_svg_string(), None);

    controller.set_content(
        vec![node("a", 0.0, 0.0), node("b", 200.0, 0.0)],
        vec![Edge::new(
            EdgeType::Association,
            "ab",
            "http://example.com/ab",
            "a",
            "b",
        )],
        vec![],
    );

    let svg = controller
        .render_to_svg_string()
        .expect("diagram with nodes renders");
    assert!(svg.contains("viewBox=\"0 0 800 550\""));
    assert!(svg.contains("id=\"node-a\""));
    assert!(svg.contains("id=\"node-b\""));
    assert!(svg.contains("id=\"edge-ab\""));

    // Both node boxes land inside the document after the fit transform.
    let scene = controller.scene();
    let config = controller.config();
    let viewport = SvgExporter::new(config.export(), config.style())
        .viewport_for(&scene)
        .unwrap();
    for view in &scene.nodes {
        for corner in [
            view.bounds.min_point(),
            Point::new(view.bounds.max_x(), view.bounds.max_y()),
        ] {
            let x = corner.x() * viewport.zoom + viewport.x;
            let y = corner.y() * viewport.zoom + viewport.y;
            assert!((0.0..=800.0).contains(&x), "x {x} outside the document");
            assert!((0.0..=550.0).contains(&y), "y {y} outside the document");
        }
    }
}

#[test]
fn test_edge_views_are_stable() {
    let controller = controller();
    let first = controller.edge_views();
    let second = controller.edge_views();
    assert_eq!(first, second);
    assert_eq!(first[0].path.len(), 2);
}

#[test]
fn test_unmeasured_edge_ends_on_drawn_box() {
    let mut controller = DiagramController::new(AppConfig::default(), ());
    controller.set_content(
        vec![node("a", 0.0, 0.0), node("b", 400.0, 0.0)],
        vec![Edge::new(
            EdgeType::Association,
            "ab",
            "http://example.com/ab",
            "a",
            "b",
        )],
        vec![],
    );

    let scene = controller.scene();
    let a = &scene.nodes[0].bounds;
    assert_eq!(a.max_x(), 200.0);
    assert_eq!(a.max_y(), 80.0);

    // Default 200x80 boxes, borders inflated by 4
    let path = &scene.edges[0].path;
    assert!((path[0].x() - 202.0).abs() < 1e-3, "source end {:?}", path[0]);
    assert!((path[0].y() - 40.0).abs() < 1e-3, "source end {:?}", path[0]);
    assert!((path[1].x() - 398.0).abs() < 1e-3, "target end {:?}", path[1]);
    assert!((path[1].y() - 40.0).abs() < 1e-3, "target end {:?}", path[1]);
}

#[test]
fn test_edge_with_missing_node_is_skipped_until_it_arrives() {
    let mut controller = controller();
    controller.add_edges(vec![Edge::new(
        EdgeType::Generalization,
        "a-ghost",
        "http://example.com/a-ghost",
        "a",
        "ghost",
    )]);
    assert_eq!(controller.edge_views().len(), 1);

    controller.add_nodes(vec![node("ghost", 800.0, 0.0)]);
    assert_eq!(controller.edge_views().len(), 2);
}

#[test]
fn test_single_node_drag_reports_positions_once() {
    let mut controller = controller();
    let a = Id::new("a");

    controller.drag_node_start(a);
    controller.drag_node(a, Point::new(10.0, 10.0));
    controller.drag_node(a, Point::new(20.0, 20.0));
    assert!(controller.callbacks().positions.is_empty());
    controller.drag_node_stop(a);

    let positions = &controller.callbacks().positions;
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].len(), 1);
    assert_eq!(positions[0][&a].point(), Point::new(20.0, 20.0));
    assert!(!controller.is_dragging_node());
}

#[test]
fn test_drag_snaps_to_aligned_node() {
    let mut controller = DiagramController::new(AppConfig::default(), Recorder::default());
    controller.set_content(
        vec![
            node("n0", 0.0, 0.0),
            node("n100", 100.0, 500.0),
            node("n250", 250.0, 1000.0),
            node("dragged", 600.0, 2000.0),
        ],
        vec![],
        vec![],
    );
    let dragged = Id::new("dragged");

    controller.drag_node_start(dragged);
    controller.drag_node(dragged, Point::new(101.0, 1503.0));
    assert_eq!(controller.node(dragged).unwrap().position.x, 100.0);
    assert!(controller.helper_lines().vertical.is_some());

    controller.drag_node(dragged, Point::new(300.0, 1503.0));
    assert_eq!(controller.node(dragged).unwrap().position.x, 300.0);
    assert!(controller.helper_lines().vertical.is_none());

    controller.drag_node_stop(dragged);
    let positions = &controller.callbacks().positions;
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0][&dragged].point(), Point::new(300.0, 1503.0));
}

#[test]
fn test_group_moves_and_selects_together() {
    let mut controller = controller();
    let (a, b, g) = (Id::new("a"), Id::new("b"), Id::new("g"));
    controller.add_groups(vec![Group::new("g", vec![a, b])]);
    assert_eq!(controller.node(a).unwrap().group, Some(g));

    controller.click_node(b, false);
    assert_eq!(controller.selection().nodes(), &[a, b]);
    assert_eq!(controller.callbacks().selections.len(), 1);

    controller.drag_node_start(a);
    controller.drag_node(a, Point::new(50.0, 50.0));
    controller.drag_node_stop(a);

    let positions = &controller.callbacks().positions;
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0][&a].point(), Point::new(50.0, 50.0));
    assert_eq!(positions[0][&b].point(), Point::new(450.0, 50.0));

    controller.remove_groups(&[g]);
    assert!(controller.get_groups().is_empty());
    assert_eq!(controller.node(a).unwrap().group, None);
    assert_eq!(controller.node(b).unwrap().group, None);
}

#[test]
fn test_node_update_keeps_group_membership() {
    let mut controller = controller();
    let (a, b, g) = (Id::new("a"), Id::new("b"), Id::new("g"));
    controller.add_groups(vec![Group::new("g", vec![a, b])]);

    let mut renamed = controller.node(a).unwrap().clone();
    renamed.label = "Renamed".to_string();
    renamed.group = None;
    controller.update_nodes(vec![renamed]);
    assert_eq!(controller.node(a).unwrap().label, "Renamed");
    assert_eq!(controller.node(a).unwrap().group, Some(g));

    // Re-adding a listed node picks its group back up.
    let mut readded = controller.node(b).unwrap().clone();
    readded.group = None;
    controller.add_nodes(vec![readded]);
    assert_eq!(controller.node(b).unwrap().group, Some(g));

    controller.drag_node_start(a);
    controller.drag_node(a, Point::new(50.0, 50.0));
    controller.drag_node_stop(a);

    let positions = &controller.callbacks().positions;
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0][&b].point(), Point::new(450.0, 50.0));
}

#[test]
fn test_selection_callback_only_on_change() {
    let mut controller = controller();
    let (a, ab) = (Id::new("a"), Id::new("ab"));

    controller.click_node(a, false);
    controller.click_node(a, false);
    assert_eq!(controller.callbacks().selections, vec![(vec![a], vec![])]);

    controller.click_edge(ab, true);
    assert_eq!(controller.callbacks().selections.len(), 2);
    assert_eq!(controller.get_selected_edges()[0].identifier, ab);

    controller.click_canvas();
    controller.click_canvas();
    assert_eq!(controller.callbacks().selections.len(), 3);
    assert_eq!(controller.callbacks().selections[2], (vec![], vec![]));

    // Owner-driven selection is silent.
    controller.set_selected_nodes(&[a, Id::new("unknown")]);
    assert_eq!(controller.callbacks().selections.len(), 3);
    assert_eq!(controller.get_selected_nodes().len(), 1);
}

#[test]
fn test_box_selection() {
    let mut controller = controller();
    let area = Bounds::new_from_top_left(Point::new(-10.0, -10.0), Size::new(520.0, 70.0));

    controller.select_in_bounds(area, false);

    assert_eq!(controller.selection().nodes(), &[Id::new("a"), Id::new("b")]);
    assert_eq!(controller.selection().edges(), &[Id::new("ab")]);
    assert_eq!(controller.callbacks().selections.len(), 1);
}

#[test]
fn test_waypoint_click_deletes() {
    let mut controller = controller();
    let ab = Id::new("ab");
    controller.set_edges_waypoint_position([(ab, vec![Point::new(250.0, 200.0)])]);

    controller.waypoint_press(ab, 0);
    controller.waypoint_release();

    assert!(controller.edge(ab).unwrap().waypoints.is_empty());
    assert_eq!(controller.callbacks().deleted_waypoints, vec![(ab, 0)]);
    assert!(controller.callbacks().waypoint_changes.is_empty());
}

#[test]
fn test_waypoint_drag_moves_without_deleting() {
    let mut controller = controller();
    let ab = Id::new("ab");
    controller.set_edges_waypoint_position([(ab, vec![Point::new(250.0, 200.0)])]);

    controller.waypoint_press(ab, 0);
    controller.waypoint_move(Point::new(260.0, 210.0));
    controller.waypoint_release();

    assert_eq!(
        controller.edge(ab).unwrap().waypoints,
        vec![Point::new(260.0, 210.0)]
    );
    assert!(controller.callbacks().deleted_waypoints.is_empty());
    let changes = &controller.callbacks().waypoint_changes;
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0][&ab], vec![Point::new(260.0, 210.0)]);
}

#[test]
fn test_waypoint_dragged_back_to_start_is_kept() {
    let mut controller = controller();
    let ab = Id::new("ab");
    controller.set_edges_waypoint_position([(ab, vec![Point::new(250.0, 200.0)])]);

    controller.waypoint_press(ab, 0);
    controller.waypoint_move(Point::new(300.0, 260.0));
    controller.waypoint_move(Point::new(250.0, 200.0));
    controller.waypoint_release();

    assert_eq!(
        controller.edge(ab).unwrap().waypoints,
        vec![Point::new(250.0, 200.0)]
    );
    assert!(controller.callbacks().deleted_waypoints.is_empty());
    let changes = &controller.callbacks().waypoint_changes;
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0][&ab], vec![Point::new(250.0, 200.0)]);
}

#[test]
fn test_waypoint_click_kept_when_deletion_disabled() {
    let config = AppConfig::new(
        CanvasConfig::default().with_delete_waypoint_on_click(false),
        ExportConfig::default(),
        StyleConfig::default(),
    );
    let mut controller = controller_with(config);
    let ab = Id::new("ab");
    controller.set_edges_waypoint_position([(ab, vec![Point::new(250.0, 200.0)])]);

    controller.waypoint_press(ab, 0);
    controller.waypoint_release();

    assert_eq!(controller.edge(ab).unwrap().waypoints.len(), 1);
    assert!(controller.callbacks().deleted_waypoints.is_empty());
}

#[test]
fn test_candidate_press_inserts_waypoint() {
    let mut controller = controller();
    let ab = Id::new("ab");
    let candidate = controller.edge_views()[0].candidates[0];

    controller.candidate_press(ab, candidate.index);
    assert!(controller.is_dragging_waypoint());
    controller.waypoint_leave();

    assert!(!controller.is_dragging_waypoint());
    assert_eq!(controller.edge(ab).unwrap().waypoints, vec![candidate.position]);
    assert_eq!(
        controller.callbacks().added_waypoints,
        vec![(ab, 0, candidate.position)]
    );
    assert!(controller.callbacks().deleted_waypoints.is_empty());
}

#[test]
fn test_double_click_inserts_waypoint_on_closest_segment() {
    let mut controller = controller();
    let ab = Id::new("ab");
    controller.set_edges_waypoint_position([(ab, vec![Point::new(250.0, 200.0)])]);

    // On the way from the waypoint to B
    controller.double_click_edge(ab, Point::new(300.0, 150.0));

    assert_eq!(
        controller.edge(ab).unwrap().waypoints,
        vec![Point::new(250.0, 200.0), Point::new(300.0, 150.0)]
    );
    assert_eq!(
        controller.callbacks().added_waypoints,
        vec![(ab, 1, Point::new(300.0, 150.0))]
    );

    controller.double_click_edge(Id::new("missing"), Point::new(0.0, 0.0));
    assert_eq!(controller.callbacks().added_waypoints.len(), 1);
}

#[test]
fn test_connection_resolution() {
    let mut controller = controller();
    let (a, b, c) = (Id::new("a"), Id::new("b"), Id::new("c"));

    controller.connect_end(a, None, Point::new(450.0, 25.0));
    controller.connect_end(a, Some(c), Point::new(450.0, 25.0));
    controller.connect_end(a, None, Point::new(250.0, 200.0));

    assert_eq!(controller.callbacks().connections_to_node, vec![(a, b), (a, c)]);
    assert_eq!(
        controller.callbacks().connections_to_nothing,
        vec![(a, Point::new(250.0, 200.0))]
    );
}

#[test]
fn test_drag_edge_to_canvas_menu() {
    let mut controller = controller();
    let a = Id::new("a");

    controller.open_drag_edge_to_canvas_menu(a, Point::new(250.0, 200.0));
    controller.choose_menu_item(MenuItem::DissolveGroup);
    assert!(controller.open_menu().is_some());

    controller.choose_menu_item(MenuItem::CreateParent);
    assert!(controller.open_menu().is_none());
    assert_eq!(controller.callbacks().generalization_dialogs, vec![(a, true)]);
}

#[test]
fn test_group_menu_toggles_member_anchors() {
    let mut controller = controller();
    let (a, c) = (Id::new("a"), Id::new("c"));
    controller.add_groups(vec![Group::new("g", vec![a, c])]);

    controller.node_toolbar_action(a, NodeAction::OpenGroupMenu);
    controller.choose_menu_item(MenuItem::ToggleGroupAnchors);

    assert_eq!(controller.callbacks().anchor_toggles, vec![a, c]);
}

#[test]
fn test_edge_toolbar_closes_silently() {
    let mut controller = controller();
    let ab = Id::new("ab");

    controller.open_edge_toolbar(ab);
    assert_eq!(controller.edge_toolbar(), None);

    controller.click_edge(ab, false);
    controller.open_edge_toolbar(ab);
    assert_eq!(controller.edge_toolbar(), Some(ab));
    controller.edge_toolbar_action(EdgeAction::Delete);
    assert_eq!(controller.callbacks().deleted_edges, vec![ab]);

    controller.remove_edges(&[ab]);
    assert_eq!(controller.edge_toolbar(), None);
    controller.edge_toolbar_action(EdgeAction::Delete);
    assert_eq!(controller.callbacks().deleted_edges.len(), 1);
}

#[test]
fn test_node_and_attribute_actions() {
    let mut controller = controller();
    let a = Id::new("a");
    let mut with_items = node("a", 0.0, 0.0);
    with_items.items = vec![NodeItem::new("a-name", "name")];
    controller.update_nodes(vec![with_items]);

    controller.node_toolbar_action(a, NodeAction::Edit);
    controller.node_toolbar_action(Id::new("unknown"), NodeAction::Edit);
    controller.attribute_action(a, Id::new("a-name"), semcanvas::menu::AttributeAction::Remove);
    controller.attribute_action(a, Id::new("a-age"), semcanvas::menu::AttributeAction::Remove);

    assert_eq!(controller.callbacks().edited_nodes, vec![a]);
    assert_eq!(
        controller.callbacks().removed_attributes,
        vec![(Id::new("a-name"), a)]
    );
}

#[test]
fn test_canvas_actions() {
    let mut controller = controller();

    controller.canvas_action(CanvasAction::CreateClass, Point::new(5.0, 6.0));
    assert_eq!(controller.callbacks().created_classes, vec![Point::new(5.0, 6.0)]);

    controller.canvas_action(CanvasAction::ToggleExplorationMode, Point::default());
    assert!(controller.exploration().is_mode_enabled());

    controller.canvas_action(CanvasAction::FitToView, Point::default());
    assert!(controller.viewport().zoom > 0.0);
}

#[test]
fn test_exploration_hover_and_catalog() {
    let mut controller = controller();
    let (a, b, c) = (Id::new("a"), Id::new("b"), Id::new("c"));

    controller.node_mouse_enter(a);
    assert!(!controller.exploration().is_highlighting());

    controller.set_exploration_mode(true);
    controller.node_mouse_enter(a);
    let exploration = controller.exploration();
    assert_eq!(exploration.node_level(a), Some(HighlightLevel::Primary));
    assert_eq!(exploration.node_level(b), Some(HighlightLevel::Neighbour));
    assert_eq!(exploration.node_level(c), None);
    assert!(exploration.should_shrink_catalog());

    let scene = controller.scene();
    let dimmed = scene.nodes.iter().find(|view| view.identifier == c).unwrap();
    assert_eq!(dimmed.style.opacity, controller.config().style().dimmed_opacity());

    controller.node_mouse_leave();
    assert!(!controller.exploration().is_highlighting());

    controller.highlight_nodes_in_exploration_mode_from_catalog(&[Id::new("http://example.com/b")]);
    assert_eq!(controller.exploration().node_level(b), Some(HighlightLevel::Primary));
    assert!(!controller.exploration().should_shrink_catalog());

    controller.set_exploration_suppressed(true);
    assert!(!controller.exploration().is_highlighting());
    controller.set_exploration_suppressed(false);
    assert!(controller.exploration().is_highlighting());
}

#[test]
fn test_viewport_actions() {
    let mut controller = controller();
    controller.set_canvas_size(Size::new(800.0, 600.0));

    let animation = controller.center_viewport_to_node(Id::new("b")).unwrap();
    assert_eq!(animation.duration_ms, 1000);
    assert_eq!(animation.target.zoom, 1.0);
    // Center of b (450, 25) ends up in the middle of the screen.
    assert_eq!(animation.target.x, 400.0 - 450.0);
    assert_eq!(animation.target.y, 300.0 - 25.0);
    assert!(controller.center_viewport_to_node(Id::new("unknown")).is_none());

    controller.set_viewport_to_position(Point::new(100.0, 50.0));
    let visible = controller.get_viewport();
    assert_eq!(visible.position, Point::new(100.0, 50.0));
    assert_eq!(visible.width, 800.0);

    let fitted = controller.fit_to_view(&[Id::new("a")]).unwrap();
    assert_eq!(fitted.zoom, 2.0);
    let visible = controller.get_viewport();
    assert_eq!(visible.width, 400.0);
    assert_eq!(visible.height, 300.0);
}

#[test]
fn test_set_content_resets_interaction_state() {
    let mut controller = controller();
    let a = Id::new("a");
    controller.click_node(a, false);
    controller.drag_node_start(a);

    controller.set_content(vec![node("z", 0.0, 0.0)], vec![], vec![]);

    assert!(!controller.is_dragging_node());
    assert!(controller.selection().is_empty());
    assert_eq!(controller.get_nodes().len(), 1);
    assert!(controller.get_edges().is_empty());
}
