//! Owner callbacks fired by the diagram controller.

use indexmap::IndexMap;

use semcanvas_core::{
    geometry::Point,
    identifier::Id,
    model::{Edge, Node, Position},
};

/// Receiver of user intents recognized on the canvas.
///
/// The controller never mutates semantic data on its own. It reports what
/// the user asked for and lets the owner decide, usually by calling back into
/// the controller's actions. Every method has an empty default so owners
/// only implement what they handle.
///
/// # Examples
///
/// ```
/// use semcanvas::DiagramCallbacks;
/// use semcanvas::model::Node;
///
/// #[derive(Default)]
/// struct Owner {
///     edited: Vec<String>,
/// }
///
/// impl DiagramCallbacks for Owner {
///     fn on_edit_node(&mut self, node: &Node) {
///         self.edited.push(node.label.clone());
///     }
/// }
/// ```
#[allow(unused_variables)]
pub trait DiagramCallbacks {
    // Nodes

    fn on_show_node_detail(&mut self, node: &Node) {}

    fn on_edit_node(&mut self, node: &Node) {}

    fn on_create_node_profile(&mut self, node: &Node) {}

    fn on_duplicate_node(&mut self, node: &Node) {}

    fn on_hide_node(&mut self, node: &Node) {}

    fn on_delete_node(&mut self, node: &Node) {}

    /// Final positions of every node moved by one drag gesture.
    fn on_change_nodes_positions(&mut self, changes: &IndexMap<Id, Position>) {}

    fn on_toggle_anchor_for_node(&mut self, node: &Node) {}

    // Attributes

    fn on_add_attribute_for_node(&mut self, node: &Node) {}

    fn on_edit_attribute(&mut self, attribute: Id, node: &Node) {}

    fn on_remove_attribute(&mut self, attribute: Id, node: &Node) {}

    fn on_move_attribute_up(&mut self, attribute: Id, node: &Node) {}

    fn on_move_attribute_down(&mut self, attribute: Id, node: &Node) {}

    // Edges

    fn on_show_edge_detail(&mut self, edge: &Edge) {}

    fn on_edit_edge(&mut self, edge: &Edge) {}

    fn on_create_edge_profile(&mut self, edge: &Edge) {}

    fn on_hide_edge(&mut self, edge: &Edge) {}

    fn on_delete_edge(&mut self, edge: &Edge) {}

    /// A waypoint was inserted at `index` of the edge's waypoint list.
    fn on_add_waypoint(&mut self, edge: &Edge, index: usize, waypoint: Point) {}

    fn on_delete_waypoint(&mut self, edge: &Edge, index: usize) {}

    /// New waypoint lists, keyed by edge identifier.
    fn on_change_waypoint_positions(&mut self, changes: &IndexMap<Id, Vec<Point>>) {}

    // Selection

    fn on_selection_did_change(&mut self, nodes: &[Id], edges: &[Id]) {}

    fn on_show_selection_actions_menu(&mut self, anchor: &Node, nodes: &[Id], edges: &[Id]) {}

    fn on_layout_selection(&mut self, nodes: &[Id], edges: &[Id]) {}

    fn on_create_group(&mut self, nodes: &[Id]) {}

    fn on_dissolve_group(&mut self, group: Id) {}

    fn on_show_expand_selection(&mut self, nodes: &[Id]) {}

    fn on_show_filter_selection(&mut self, nodes: &[Id], edges: &[Id]) {}

    fn on_create_new_view_from_selection(&mut self, nodes: &[Id], edges: &[Id]) {}

    fn on_profile_selection(&mut self, nodes: &[Id], edges: &[Id]) {}

    fn on_hide_selection(&mut self, nodes: &[Id], edges: &[Id]) {}

    fn on_remove_selection(&mut self, nodes: &[Id], edges: &[Id]) {}

    // Connections and class creation

    fn on_create_connection_to_node(&mut self, source: &Node, target: &Node) {}

    /// A connection was dropped on empty canvas at `position`.
    fn on_create_connection_to_nothing(&mut self, source: &Node, position: Point) {}

    fn on_canvas_open_create_class_dialog(&mut self, position: Point) {}

    /// `new_class_is_target` tells which end of the association the new
    /// class takes.
    fn on_canvas_open_create_class_dialog_with_association(
        &mut self,
        source: &Node,
        position: Point,
        new_class_is_target: bool,
    ) {
    }

    fn on_canvas_open_create_class_dialog_with_generalization(
        &mut self,
        source: &Node,
        position: Point,
        new_class_is_parent: bool,
    ) {
    }
}

/// Callbacks that ignore everything.
impl DiagramCallbacks for () {}
