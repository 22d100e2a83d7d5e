//! Pointer gestures forwarded by the host.
//!
//! Each method handles one discrete input event. Sessions that span several
//! events (node drags, waypoint drags) are owned values stored on the
//! controller and taken out on every exit path.

use indexmap::IndexMap;
use log::{debug, trace};

use semcanvas_core::{
    geometry::{Bounds, Point, find_closest_line},
    identifier::Id,
    model::Position,
};

use super::{
    DiagramCallbacks, DiagramController, NodeDrag, find_edge, find_edge_mut, find_group,
    find_node, find_node_mut,
};
use crate::{
    alignment::PositionChange,
    error::CanvasError,
    menu::{AttributeAction, CanvasAction, EdgeAction, Menu, MenuItem, NodeAction},
    routing::{WaypointDrag, WaypointRelease, candidate_waypoints, create_waypoints},
    selection::Selection,
};

impl<C: DiagramCallbacks> DiagramController<C> {
    // Node drag

    /// Starts dragging a node.
    ///
    /// Members of the node's group move with it, and so do the other
    /// selected nodes when the grabbed node is selected. Alignment is armed
    /// only when a single node moves.
    pub fn drag_node_start(&mut self, id: Id) {
        let moving = match self.moving_nodes(id) {
            Ok(moving) => moving,
            Err(err) => {
                debug!(err:%; "Ignoring drag start");
                return;
            }
        };
        let origins: IndexMap<Id, Point> = moving
            .into_iter()
            .filter_map(|member| {
                self.nodes
                    .get(&member)
                    .map(|node| (member, node.position.point()))
            })
            .collect();

        if origins.len() == 1 {
            let size = self.node_size(id);
            let others = self
                .nodes
                .values()
                .map(|node| (node.identifier, node.position.point()));
            self.alignment.start_drag(id, size, others);
        } else {
            self.alignment.reset();
        }

        debug!(node_id:% = id, moving = origins.len(); "Node drag started");
        self.node_drag = Some(NodeDrag {
            grabbed: id,
            origins,
        });
    }

    /// Moves the grabbed node's top-left corner to `position`; every node in
    /// the drag follows by the same offset.
    pub fn drag_node(&mut self, id: Id, position: Point) {
        let Some(drag) = self.node_drag.as_ref() else {
            trace!(node_id:% = id; "Drag event without drag session");
            return;
        };
        if drag.grabbed != id {
            debug!(node_id:% = id, grabbed:% = drag.grabbed; "Drag event for another node");
            return;
        }
        let Some(origin) = drag.origins.get(&id).copied() else {
            return;
        };

        let offset = position.sub_point(origin);
        let mut changes: Vec<PositionChange> = drag
            .origins
            .iter()
            .map(|(node, start)| PositionChange {
                node: *node,
                position: start.add_point(offset),
            })
            .collect();
        self.alignment.apply(&mut changes);

        for change in changes {
            match find_node_mut(&mut self.nodes, change.node) {
                Ok(node) => node.position = node.position.with_point(change.position),
                Err(err) => debug!(err:%; "Node vanished during drag"),
            }
        }
    }

    /// Ends the drag and reports the final positions of all moved nodes in
    /// one callback. Nothing is reported when no node moved.
    pub fn drag_node_stop(&mut self, id: Id) {
        let Some(drag) = self.node_drag.take() else {
            trace!(node_id:% = id; "Drag stop without drag session");
            return;
        };

        if drag.origins.len() == 1 {
            if let Some(node) = self.nodes.get_mut(&drag.grabbed) {
                if let Some(aligned) = self.alignment.finish_drag(node.position.point()) {
                    node.position = node.position.with_point(aligned);
                }
            }
        }
        self.alignment.reset();

        let changes: IndexMap<Id, Position> = drag
            .origins
            .iter()
            .filter_map(|(member, origin)| {
                let node = self.nodes.get(member)?;
                (node.position.point() != *origin).then_some((*member, node.position))
            })
            .collect();

        debug!(node_id:% = drag.grabbed, moved = changes.len(); "Node drag stopped");
        if !changes.is_empty() {
            self.callbacks.on_change_nodes_positions(&changes);
        }
    }

    /// Whether a node drag is in progress.
    pub fn is_dragging_node(&self) -> bool {
        self.node_drag.is_some()
    }

    fn moving_nodes(&self, grabbed: Id) -> Result<Vec<Id>, CanvasError> {
        find_node(&self.nodes, grabbed)?;

        let mut seeds = vec![grabbed];
        if self.selection.contains_node(grabbed) {
            seeds.extend(self.selection.nodes().iter().copied());
        }

        let mut moving: Vec<Id> = Vec::new();
        for seed in seeds {
            let group = self
                .nodes
                .get(&seed)
                .and_then(|node| node.group)
                .and_then(|group| self.groups.get(&group));
            let members = match group {
                Some(group) => group.content.clone(),
                None => vec![seed],
            };
            for member in std::iter::once(seed).chain(members) {
                if !moving.contains(&member) {
                    moving.push(member);
                }
            }
        }
        Ok(moving)
    }

    // Hover

    /// Highlights the hovered node and its neighbourhood in exploration mode.
    pub fn node_mouse_enter(&mut self, id: Id) {
        if !self.exploration.is_active() {
            return;
        }
        if !self.nodes.contains_key(&id) {
            debug!(node_id:% = id; "Ignoring hover of unknown node");
            return;
        }
        self.exploration
            .highlight_from_canvas(&[id], self.nodes.values(), self.edges.values());
    }

    pub fn node_mouse_leave(&mut self) {
        if self.exploration.is_active() {
            self.exploration.reset();
        }
    }

    // Selection

    /// Selects a node; `additive` toggles it within the current selection.
    ///
    /// Clicking a group member selects the whole group with the clicked node
    /// last.
    pub fn click_node(&mut self, id: Id, additive: bool) {
        let Ok(node) = find_node(&self.nodes, id) else {
            debug!(node_id:% = id; "Ignoring click on unknown node");
            return;
        };
        let mut ids: Vec<Id> = node
            .group
            .and_then(|group| self.groups.get(&group))
            .map(|group| {
                group
                    .content
                    .iter()
                    .copied()
                    .filter(|member| *member != id)
                    .collect()
            })
            .unwrap_or_default();
        ids.push(id);

        let previous = self.selection.clone();
        if !additive {
            self.selection.clear();
            self.selection.set_nodes(ids);
        } else if self.selection.contains_node(id) {
            self.selection.remove_nodes(&ids);
        } else {
            self.selection.add_nodes(ids);
        }
        self.open_menu = None;
        self.finish_selection_gesture(previous);
    }

    /// Selects an edge; `additive` toggles it within the current selection.
    pub fn click_edge(&mut self, id: Id, additive: bool) {
        if !self.edges.contains_key(&id) {
            debug!(edge_id:% = id; "Ignoring click on unknown edge");
            return;
        }

        let previous = self.selection.clone();
        if !additive {
            self.selection.clear();
            self.selection.add_edge(id);
        } else if self.selection.contains_edge(id) {
            self.selection.remove_edges(&[id]);
        } else {
            self.selection.add_edge(id);
        }
        self.open_menu = None;
        self.finish_selection_gesture(previous);
    }

    /// Clears the selection and closes menus and toolbars.
    pub fn click_canvas(&mut self) {
        let previous = self.selection.clone();
        self.selection.clear();
        self.open_menu = None;
        self.edge_toolbar = None;
        self.finish_selection_gesture(previous);
    }

    /// Box selection: selects every node fully inside `area` and every edge
    /// between two such nodes.
    pub fn select_in_bounds(&mut self, area: Bounds, additive: bool) {
        let nodes: Vec<Id> = self
            .nodes
            .keys()
            .copied()
            .filter(|id| {
                self.node_bounds(*id)
                    .is_ok_and(|bounds| area.contains_bounds(bounds))
            })
            .collect();
        let edges: Vec<Id> = self
            .edges
            .values()
            .filter(|edge| nodes.contains(&edge.source) && nodes.contains(&edge.target))
            .map(|edge| edge.identifier)
            .collect();
        debug!(nodes = nodes.len(), edges = edges.len(); "Box selection");

        let previous = self.selection.clone();
        if !additive {
            self.selection.clear();
        }
        self.selection.add_nodes(nodes);
        for edge in edges {
            self.selection.add_edge(edge);
        }
        self.finish_selection_gesture(previous);
    }

    /// Reports the selection to the owner when the gesture changed it.
    fn finish_selection_gesture(&mut self, previous: Selection) {
        if previous == self.selection {
            return;
        }
        if self
            .edge_toolbar
            .is_some_and(|edge| !self.selection.contains_edge(edge))
        {
            self.edge_toolbar = None;
        }
        trace!(nodes = self.selection.nodes().len(), edges = self.selection.edges().len(); "Selection changed");
        self.callbacks
            .on_selection_did_change(self.selection.nodes(), self.selection.edges());
    }

    // Waypoints

    /// Presses an existing waypoint, starting a waypoint drag.
    pub fn waypoint_press(&mut self, edge: Id, index: usize) {
        match self.waypoint(edge, index) {
            Ok(origin) => self.waypoint_drag = Some(WaypointDrag::new(edge, index, origin)),
            Err(err) => debug!(err:%; "Ignoring waypoint press"),
        }
    }

    /// Presses a candidate handle: a waypoint is inserted there right away
    /// and dragged from then on.
    pub fn candidate_press(&mut self, edge_id: Id, index: usize) {
        let position = match self.candidate(edge_id, index) {
            Ok(position) => position,
            Err(err) => {
                debug!(err:%; "Ignoring candidate press");
                return;
            }
        };
        let Ok(edge) = find_edge_mut(&mut self.edges, edge_id) else {
            return;
        };
        edge.waypoints.insert(index, position);
        debug!(edge_id:% = edge_id, index = index; "Waypoint inserted");
        self.callbacks.on_add_waypoint(edge, index, position);
        self.waypoint_drag = Some(WaypointDrag::inserted(edge_id, index, position));
    }

    /// Moves the dragged waypoint.
    pub fn waypoint_move(&mut self, position: Point) {
        let Some(drag) = self.waypoint_drag.as_mut() else {
            return;
        };
        drag.move_to(position);
        let (edge, index) = (drag.edge(), drag.index());

        let waypoint = find_edge_mut(&mut self.edges, edge).and_then(|found| {
            found
                .waypoints
                .get_mut(index)
                .ok_or(CanvasError::WaypointNotFound { edge, index })
        });
        match waypoint {
            Ok(waypoint) => *waypoint = position,
            Err(err) => {
                debug!(err:%; "Dropping waypoint drag");
                self.waypoint_drag = None;
            }
        }
    }

    /// Releases the dragged waypoint.
    ///
    /// A waypoint that moved at any point of the drag reports the edge's new
    /// waypoint list, even when it ends where it started. One that never
    /// left its press position counts as a click and is deleted, unless
    /// `canvas.delete_waypoint_on_click` is off. A freshly inserted waypoint
    /// released in place stays.
    pub fn waypoint_release(&mut self) {
        let Some(drag) = self.waypoint_drag.take() else {
            return;
        };
        let (edge_id, index) = (drag.edge(), drag.index());
        let release = drag.finish();

        let edge = match find_edge_mut(&mut self.edges, edge_id) {
            Ok(edge) => edge,
            Err(err) => {
                debug!(err:%; "Edge vanished during waypoint drag");
                return;
            }
        };

        match release {
            WaypointRelease::Moved => {
                let changes = IndexMap::from([(edge_id, edge.waypoints.clone())]);
                self.callbacks.on_change_waypoint_positions(&changes);
            }
            WaypointRelease::Click if self.config.canvas().delete_waypoint_on_click() => {
                if index < edge.waypoints.len() {
                    edge.waypoints.remove(index);
                    self.callbacks.on_delete_waypoint(edge, index);
                }
            }
            WaypointRelease::Click => trace!(edge_id:% = edge_id, index = index; "Waypoint click ignored"),
            WaypointRelease::Inserted => {}
        }
    }

    /// The pointer left the canvas during a waypoint drag; the drag ends as
    /// if released.
    pub fn waypoint_leave(&mut self) {
        if self.waypoint_drag.is_some() {
            trace!("Pointer left canvas during waypoint drag");
            self.waypoint_release();
        }
    }

    pub fn is_dragging_waypoint(&self) -> bool {
        self.waypoint_drag.is_some()
    }

    fn waypoint(&self, edge: Id, index: usize) -> Result<Point, CanvasError> {
        find_edge(&self.edges, edge)?
            .waypoints
            .get(index)
            .copied()
            .ok_or(CanvasError::WaypointNotFound { edge, index })
    }

    fn candidate(&self, edge_id: Id, index: usize) -> Result<Point, CanvasError> {
        let edge = find_edge(&self.edges, edge_id)?;
        let (source, target) = self.edge_frames(edge)?;
        let path = create_waypoints(
            source,
            &edge.waypoints,
            target,
            self.config.canvas().border_inflation(),
        );
        candidate_waypoints(&path)
            .into_iter()
            .find(|candidate| candidate.index == index)
            .map(|candidate| candidate.position)
            .ok_or(CanvasError::WaypointNotFound {
                edge: edge_id,
                index,
            })
    }

    // Edges and connections

    /// Inserts a waypoint at `position` on the path segment closest to it.
    pub fn double_click_edge(&mut self, id: Id, position: Point) {
        let index = match self.closest_segment(id, position) {
            Ok(index) => index,
            Err(err) => {
                debug!(err:%; "Ignoring double click");
                return;
            }
        };
        let Ok(edge) = find_edge_mut(&mut self.edges, id) else {
            return;
        };
        let index = index.min(edge.waypoints.len());
        edge.waypoints.insert(index, position);
        debug!(edge_id:% = id, index = index; "Waypoint inserted by double click");
        self.callbacks.on_add_waypoint(edge, index, position);
    }

    /// Index of the routed path segment of an edge nearest to `point`.
    /// Segment `i` ends at waypoint `i`, so it is also the insertion index.
    fn closest_segment(&self, edge_id: Id, point: Point) -> Result<usize, CanvasError> {
        let edge = find_edge(&self.edges, edge_id)?;
        let (source, target) = self.edge_frames(edge)?;
        let path = create_waypoints(
            source,
            &edge.waypoints,
            target,
            self.config.canvas().border_inflation(),
        );
        Ok(find_closest_line(&path, point))
    }

    /// A connection drag from `source` ended at `position`.
    ///
    /// `target` is the node the host resolved under the pointer, if any.
    /// Without one, the first node whose bounds contain `position` is used;
    /// when there is none the connection goes to nothing.
    pub fn connect_end(&mut self, source: Id, target: Option<Id>, position: Point) {
        let Ok(source_node) = find_node(&self.nodes, source) else {
            debug!(node_id:% = source; "Ignoring connection from unknown node");
            return;
        };
        let resolved = target
            .filter(|target| self.nodes.contains_key(target))
            .or_else(|| self.node_at(position));

        match resolved.and_then(|target| self.nodes.get(&target)) {
            Some(target_node) => {
                debug!(source:% = source, target:% = target_node.identifier; "Connection to node");
                self.callbacks
                    .on_create_connection_to_node(source_node, target_node);
            }
            None => {
                debug!(source:% = source, position:?; "Connection to nothing");
                self.callbacks
                    .on_create_connection_to_nothing(source_node, position);
            }
        }
    }

    /// First node whose bounds contain `point`.
    fn node_at(&self, point: Point) -> Option<Id> {
        self.nodes.keys().copied().find(|id| {
            self.node_bounds(*id)
                .is_ok_and(|bounds| bounds.contains(point))
        })
    }

    // Toolbars

    pub fn node_toolbar_action(&mut self, id: Id, action: NodeAction) {
        let Ok(node) = find_node(&self.nodes, id) else {
            debug!(node_id:% = id, action:?; "Ignoring toolbar action on unknown node");
            return;
        };
        match action {
            NodeAction::ShowDetail => self.callbacks.on_show_node_detail(node),
            NodeAction::Edit => self.callbacks.on_edit_node(node),
            NodeAction::CreateProfile => self.callbacks.on_create_node_profile(node),
            NodeAction::Duplicate => self.callbacks.on_duplicate_node(node),
            NodeAction::Hide => self.callbacks.on_hide_node(node),
            NodeAction::Delete => self.callbacks.on_delete_node(node),
            NodeAction::ToggleAnchor => self.callbacks.on_toggle_anchor_for_node(node),
            NodeAction::AddAttribute => self.callbacks.on_add_attribute_for_node(node),
            NodeAction::ShowSelectionActions => self.callbacks.on_show_selection_actions_menu(
                node,
                self.selection.nodes(),
                self.selection.edges(),
            ),
            NodeAction::OpenGroupMenu => {
                let group = node.group;
                match group {
                    Some(group) => self.open_group_menu(group, id),
                    None => debug!(node_id:% = id; "Node has no group"),
                }
            }
        }
    }

    pub fn attribute_action(&mut self, node_id: Id, attribute: Id, action: AttributeAction) {
        let Ok(node) = find_node(&self.nodes, node_id) else {
            debug!(node_id:% = node_id; "Ignoring attribute action on unknown node");
            return;
        };
        if !node.items.iter().any(|item| item.identifier == attribute) {
            debug!(node_id:% = node_id, attribute:% = attribute; "Ignoring unknown attribute");
            return;
        }
        match action {
            AttributeAction::Edit => self.callbacks.on_edit_attribute(attribute, node),
            AttributeAction::Remove => self.callbacks.on_remove_attribute(attribute, node),
            AttributeAction::MoveUp => self.callbacks.on_move_attribute_up(attribute, node),
            AttributeAction::MoveDown => self.callbacks.on_move_attribute_down(attribute, node),
        }
    }

    /// Opens the toolbar of a selected edge.
    pub fn open_edge_toolbar(&mut self, id: Id) {
        if self.edges.contains_key(&id) && self.selection.contains_edge(id) {
            self.edge_toolbar = Some(id);
        } else {
            debug!(edge_id:% = id; "Edge toolbar needs a selected edge");
            self.edge_toolbar = None;
        }
    }

    /// Edge whose toolbar is shown. A toolbar whose edge was removed or
    /// deselected counts as closed.
    pub fn edge_toolbar(&self) -> Option<Id> {
        self.edge_toolbar
            .filter(|id| self.edges.contains_key(id) && self.selection.contains_edge(*id))
    }

    pub fn close_edge_toolbar(&mut self) {
        self.edge_toolbar = None;
    }

    /// Runs an edge toolbar button. A stale toolbar closes silently.
    pub fn edge_toolbar_action(&mut self, action: EdgeAction) {
        let Some(id) = self.edge_toolbar() else {
            trace!(action:?; "Edge toolbar no longer valid, closing");
            self.edge_toolbar = None;
            return;
        };
        let Ok(edge) = find_edge(&self.edges, id) else {
            self.edge_toolbar = None;
            return;
        };
        match action {
            EdgeAction::ShowDetail => self.callbacks.on_show_edge_detail(edge),
            EdgeAction::Edit => self.callbacks.on_edit_edge(edge),
            EdgeAction::CreateProfile => self.callbacks.on_create_edge_profile(edge),
            EdgeAction::Hide => self.callbacks.on_hide_edge(edge),
            EdgeAction::Delete => self.callbacks.on_delete_edge(edge),
        }
    }

    /// Runs a canvas toolbar button; `position` is the canvas point the
    /// action refers to.
    pub fn canvas_action(&mut self, action: CanvasAction, position: Point) {
        match action {
            CanvasAction::CreateClass => {
                self.callbacks.on_canvas_open_create_class_dialog(position)
            }
            CanvasAction::ToggleExplorationMode => {
                let enabled = !self.exploration.is_mode_enabled();
                self.set_exploration_mode(enabled);
            }
            CanvasAction::FitToView => {
                self.fit_to_view(&[]);
            }
        }
    }

    // Menus

    /// Picks an item of the open menu and closes it. Items the menu does not
    /// offer are ignored and leave the menu open.
    pub fn choose_menu_item(&mut self, item: MenuItem) {
        let Some(menu) = self.open_menu.take() else {
            debug!(item:?; "No menu open");
            return;
        };
        if !menu.offers(item) {
            debug!(item:?, menu:?; "Item not offered by the open menu");
            self.open_menu = Some(menu);
            return;
        }

        match menu {
            Menu::DragEdgeToCanvas { source, position } => {
                let Ok(node) = find_node(&self.nodes, source) else {
                    debug!(node_id:% = source; "Drag source vanished");
                    return;
                };
                match item {
                    MenuItem::CreateAssociationTarget => self
                        .callbacks
                        .on_canvas_open_create_class_dialog_with_association(node, position, true),
                    MenuItem::CreateAssociationSource => self
                        .callbacks
                        .on_canvas_open_create_class_dialog_with_association(node, position, false),
                    MenuItem::CreateChild => self
                        .callbacks
                        .on_canvas_open_create_class_dialog_with_generalization(
                            node, position, false,
                        ),
                    MenuItem::CreateParent => self
                        .callbacks
                        .on_canvas_open_create_class_dialog_with_generalization(
                            node, position, true,
                        ),
                    other => debug!(item:? = other; "Unhandled menu item"),
                }
            }
            Menu::SelectionActions { .. } => {
                let nodes = self.selection.nodes();
                let edges = self.selection.edges();
                match item {
                    MenuItem::LayoutSelection => self.callbacks.on_layout_selection(nodes, edges),
                    MenuItem::CreateGroup => self.callbacks.on_create_group(nodes),
                    MenuItem::ExpandSelection => self.callbacks.on_show_expand_selection(nodes),
                    MenuItem::FilterSelection => {
                        self.callbacks.on_show_filter_selection(nodes, edges)
                    }
                    MenuItem::CreateViewFromSelection => {
                        self.callbacks.on_create_new_view_from_selection(nodes, edges)
                    }
                    MenuItem::ProfileSelection => self.callbacks.on_profile_selection(nodes, edges),
                    MenuItem::HideSelection => self.callbacks.on_hide_selection(nodes, edges),
                    MenuItem::RemoveSelection => self.callbacks.on_remove_selection(nodes, edges),
                    other => debug!(item:? = other; "Unhandled menu item"),
                }
            }
            Menu::Group { group, .. } => match item {
                MenuItem::DissolveGroup => self.callbacks.on_dissolve_group(group),
                MenuItem::ToggleGroupAnchors => match find_group(&self.groups, group) {
                    Ok(found) => {
                        for member in &found.content {
                            if let Some(node) = self.nodes.get(member) {
                                self.callbacks.on_toggle_anchor_for_node(node);
                            }
                        }
                    }
                    Err(err) => debug!(err:%; "Group vanished"),
                },
                other => debug!(item:? = other; "Unhandled menu item"),
            },
        }
    }
}
