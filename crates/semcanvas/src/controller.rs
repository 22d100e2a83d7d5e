//! The per-diagram state holder and its action API.
//!
//! [`DiagramController`] owns the visual state of one diagram: nodes, edges,
//! groups, measured node sizes, the selection, exploration highlighting,
//! alignment and the viewport. The owner drives it through two surfaces:
//!
//! - *actions*, the public methods defined in this module, which replace or
//!   patch state and answer queries;
//! - *gestures*, defined in `gestures`, which the host forwards from pointer
//!   input and which the controller turns into [`DiagramCallbacks`] calls.
//!
//! Nothing on either surface returns an error or panics because of stale
//! identifiers. Lookups fail with [`CanvasError`] internally and are logged
//! and dropped at the boundary.

mod callbacks;
mod gestures;

pub use callbacks::DiagramCallbacks;

use std::{collections::HashMap, io::Write};

use indexmap::IndexMap;
use log::{debug, error, info, trace, warn};

use semcanvas_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    model::{Edge, Group, Node, Position, ViewportDimensions},
};

use crate::{
    alignment::{AlignmentController, HelperLines},
    config::AppConfig,
    error::CanvasError,
    export::{Exporter, svg::SvgExporter},
    highlight::{ExplorationHighlighter, HighlightLevel},
    menu::Menu,
    render::{EdgeView, NodeView, Scene},
    routing::{NodeFrame, WaypointDrag},
    selection::{Selection, SelectionStyles, compute_selection_levels, compute_selection_styles},
    style::{EdgeStyle, NodeStyle, StyleDelta},
    viewport::{Viewport, ViewportAnimation},
};

/// A node drag in progress: every node moving with the grabbed one and the
/// position each had when the drag started.
#[derive(Debug)]
struct NodeDrag {
    grabbed: Id,
    origins: IndexMap<Id, Point>,
}

/// Interaction and layout state of one diagram.
///
/// # Examples
///
/// ```
/// use semcanvas::{DiagramController, config::AppConfig};
/// use semcanvas::model::{Edge, EdgeType, Node, Position};
///
/// let mut controller = DiagramController::new(AppConfig::default(), ());
/// controller.set_content(
///     vec![
///         Node::new("a", "http://example.com/A", "A", Position::new(0.0, 0.0)),
///         Node::new("b", "http://example.com/B", "B", Position::new(200.0, 0.0)),
///     ],
///     vec![Edge::new(EdgeType::Association, "ab", "http://example.com/ab", "a", "b")],
///     vec![],
/// );
///
/// let svg = controller.render_to_svg_string().unwrap();
/// assert!(svg.contains("<svg"));
/// ```
pub struct DiagramController<C: DiagramCallbacks> {
    config: AppConfig,
    callbacks: C,
    nodes: IndexMap<Id, Node>,
    edges: IndexMap<Id, Edge>,
    groups: IndexMap<Id, Group>,
    dimensions: HashMap<Id, Size>,
    selection: Selection,
    exploration: ExplorationHighlighter,
    alignment: AlignmentController,
    viewport: Viewport,
    canvas_size: Size,
    node_drag: Option<NodeDrag>,
    waypoint_drag: Option<WaypointDrag>,
    open_menu: Option<Menu>,
    edge_toolbar: Option<Id>,
}

impl<C: DiagramCallbacks> DiagramController<C> {
    /// Creates an empty diagram reporting to `callbacks`.
    pub fn new(config: AppConfig, callbacks: C) -> Self {
        let alignment = AlignmentController::new(
            config.canvas().snap_grid(),
            config.canvas().helper_line_margin(),
        );
        let canvas_size = Size::new(config.export().width(), config.export().height());
        Self {
            config,
            callbacks,
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            groups: IndexMap::new(),
            dimensions: HashMap::new(),
            selection: Selection::new(),
            exploration: ExplorationHighlighter::new(),
            alignment,
            viewport: Viewport::default(),
            canvas_size,
            node_drag: None,
            waypoint_drag: None,
            open_menu: None,
            edge_toolbar: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn callbacks(&self) -> &C {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut C {
        &mut self.callbacks
    }

    // Content

    /// Replaces all nodes, edges and groups.
    ///
    /// Transient interaction state (drags, alignment, selection, highlight,
    /// menus) is dropped. Measured sizes of nodes that survive are kept.
    pub fn set_content(&mut self, nodes: Vec<Node>, edges: Vec<Edge>, groups: Vec<Group>) {
        info!(nodes = nodes.len(), edges = edges.len(), groups = groups.len(); "Setting diagram content");

        self.nodes = nodes.into_iter().map(|node| (node.identifier, node)).collect();
        self.edges = edges.into_iter().map(|edge| (edge.identifier, edge)).collect();
        self.groups.clear();
        for node in self.nodes.values_mut() {
            node.group = None;
        }
        self.dimensions.retain(|id, _| self.nodes.contains_key(id));

        self.alignment.reset();
        self.node_drag = None;
        self.waypoint_drag = None;
        self.selection.clear();
        self.exploration.reset();
        self.open_menu = None;
        self.edge_toolbar = None;

        self.add_groups(groups);
    }

    /// Adds nodes. A node whose identifier is already present replaces the
    /// existing one.
    ///
    /// Group membership is owned by the group table, so the incoming
    /// `group` field is overwritten with the group that lists the node.
    pub fn add_nodes(&mut self, nodes: Vec<Node>) {
        for mut node in nodes {
            if self.nodes.contains_key(&node.identifier) {
                warn!(node_id:% = node.identifier; "Node already present, replacing");
            }
            node.group = group_of(&self.groups, node.identifier);
            self.nodes.insert(node.identifier, node);
        }
    }

    /// Replaces nodes matched by identifier. Unknown nodes are ignored.
    ///
    /// The `group` field is kept; membership changes go through
    /// [`add_groups`](Self::add_groups) and [`remove_groups`](Self::remove_groups).
    pub fn update_nodes(&mut self, nodes: Vec<Node>) {
        for mut node in nodes {
            match self.nodes.get_mut(&node.identifier) {
                Some(existing) => {
                    if node.group != existing.group {
                        debug!(node_id:% = node.identifier; "Ignoring group change in node update");
                    }
                    node.group = existing.group;
                    *existing = node;
                }
                None => debug!(node_id:% = node.identifier; "Ignoring update of unknown node"),
            }
        }
    }

    /// Moves nodes. Unknown nodes are ignored.
    pub fn update_nodes_position(&mut self, positions: impl IntoIterator<Item = (Id, Position)>) {
        for (id, position) in positions {
            match find_node_mut(&mut self.nodes, id) {
                Ok(node) => node.position = position,
                Err(err) => debug!(err:%; "Ignoring position update"),
            }
        }
    }

    /// Removes nodes together with their measurements, selection entries and
    /// group memberships. Edges referring to them stay until the owner
    /// removes them and are skipped when rendering.
    pub fn remove_nodes(&mut self, ids: &[Id]) {
        for id in ids {
            if self.nodes.shift_remove(id).is_none() {
                debug!(node_id:% = id; "Ignoring removal of unknown node");
            }
            self.dimensions.remove(id);
        }
        for group in self.groups.values_mut() {
            group.content.retain(|member| !ids.contains(member));
        }
        self.groups.retain(|_, group| !group.content.is_empty());
        self.selection.remove_nodes(ids);
        self.exploration.reset();
    }

    /// Adds edges. An edge whose identifier is already present replaces the
    /// existing one.
    pub fn add_edges(&mut self, edges: Vec<Edge>) {
        for edge in edges {
            if self.edges.contains_key(&edge.identifier) {
                warn!(edge_id:% = edge.identifier; "Edge already present, replacing");
            }
            self.edges.insert(edge.identifier, edge);
        }
    }

    /// Replaces edges matched by identifier. Unknown edges are ignored.
    pub fn update_edges(&mut self, edges: Vec<Edge>) {
        for edge in edges {
            match self.edges.get_mut(&edge.identifier) {
                Some(existing) => *existing = edge,
                None => debug!(edge_id:% = edge.identifier; "Ignoring update of unknown edge"),
            }
        }
    }

    pub fn remove_edges(&mut self, ids: &[Id]) {
        for id in ids {
            if self.edges.shift_remove(id).is_none() {
                debug!(edge_id:% = id; "Ignoring removal of unknown edge");
            }
        }
        self.selection.remove_edges(ids);
        if self.edge_toolbar.is_some_and(|edge| ids.contains(&edge)) {
            self.edge_toolbar = None;
        }
    }

    /// Replaces the waypoints of edges. Unknown edges are ignored.
    pub fn set_edges_waypoint_position(
        &mut self,
        waypoints: impl IntoIterator<Item = (Id, Vec<Point>)>,
    ) {
        for (id, points) in waypoints {
            match find_edge_mut(&mut self.edges, id) {
                Ok(edge) => edge.waypoints = points,
                Err(err) => debug!(err:%; "Ignoring waypoint update"),
            }
        }
    }

    pub fn get_nodes(&self) -> Vec<Node> {
        self.nodes.values().cloned().collect()
    }

    pub fn get_edges(&self) -> Vec<Edge> {
        self.edges.values().cloned().collect()
    }

    pub fn get_groups(&self) -> Vec<Group> {
        self.groups.values().cloned().collect()
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: Id) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Adds groups and writes the group identifier onto each member.
    ///
    /// A node belongs to at most one group, so members are taken out of any
    /// group they were in before. Unknown members are dropped.
    pub fn add_groups(&mut self, groups: Vec<Group>) {
        for mut group in groups {
            group.content.retain(|member| {
                let known = self.nodes.contains_key(member);
                if !known {
                    debug!(group_id:% = group.identifier, node_id:% = member; "Dropping unknown group member");
                }
                known
            });

            for other in self.groups.values_mut() {
                other.content.retain(|member| !group.content.contains(member));
            }
            self.groups.retain(|_, other| !other.content.is_empty());

            for member in &group.content {
                if let Some(node) = self.nodes.get_mut(member) {
                    node.group = Some(group.identifier);
                }
            }
            debug!(group_id:% = group.identifier, members = group.content.len(); "Group added");
            self.groups.insert(group.identifier, group);
        }
    }

    /// Dissolves groups, clearing the group field of all their members.
    pub fn remove_groups(&mut self, ids: &[Id]) {
        for id in ids {
            let Some(group) = self.groups.shift_remove(id) else {
                debug!(group_id:% = id; "Ignoring removal of unknown group");
                continue;
            };
            for member in &group.content {
                if let Some(node) = self.nodes.get_mut(member) {
                    node.group = None;
                }
            }
        }
    }

    /// Records the size the host measured for a node.
    pub fn set_node_dimensions(&mut self, id: Id, size: Size) {
        if !self.nodes.contains_key(&id) {
            debug!(node_id:% = id; "Ignoring dimensions of unknown node");
            return;
        }
        trace!(node_id:% = id, size:?; "Node measured");
        self.dimensions.insert(id, size);
    }

    // Selection

    pub fn get_selected_nodes(&self) -> Vec<Node> {
        self.selection
            .nodes()
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .cloned()
            .collect()
    }

    pub fn get_selected_edges(&self) -> Vec<Edge> {
        self.selection
            .edges()
            .iter()
            .filter_map(|id| self.edges.get(id))
            .cloned()
            .collect()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selects exactly the given nodes. Owner-initiated, so no selection
    /// callback fires.
    pub fn set_selected_nodes(&mut self, ids: &[Id]) {
        let ids = ids.iter().copied().filter(|id| self.nodes.contains_key(id));
        self.selection.set_nodes(ids);
    }

    /// Selects exactly the given edges. Owner-initiated, so no selection
    /// callback fires.
    pub fn set_selected_edges(&mut self, ids: &[Id]) {
        let ids = ids.iter().copied().filter(|id| self.edges.contains_key(id));
        self.selection.set_edges(ids);
    }

    /// Styles derived from the selection alone.
    pub fn selection_styles(&self) -> SelectionStyles {
        compute_selection_styles(
            &self.selection,
            self.nodes.values(),
            self.edges.values(),
            self.config.style(),
        )
    }

    // Exploration

    pub fn exploration(&self) -> &ExplorationHighlighter {
        &self.exploration
    }

    pub fn set_exploration_mode(&mut self, enabled: bool) {
        self.exploration.set_mode(enabled);
    }

    /// Hides or restores highlighting without changing the exploration mode.
    pub fn set_exploration_suppressed(&mut self, suppressed: bool) {
        self.exploration.set_suppressed(suppressed);
    }

    /// Highlights every visual occurrence of the given semantic entities and
    /// their one-hop neighbourhood.
    pub fn highlight_nodes_in_exploration_mode_from_catalog(&mut self, external_ids: &[Id]) {
        self.exploration
            .highlight_from_catalog(external_ids, self.nodes.values(), self.edges.values());
    }

    // Viewport

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Size of the host's drawing surface in screen pixels.
    pub fn set_canvas_size(&mut self, size: Size) {
        self.canvas_size = size;
    }

    /// Visible canvas area in canvas coordinates.
    pub fn get_viewport(&self) -> ViewportDimensions {
        self.viewport.dimensions(self.canvas_size)
    }

    /// Scrolls so that canvas point `position` is at the top-left corner.
    pub fn set_viewport_to_position(&mut self, position: Point) {
        self.viewport = self.viewport.with_top_left(position);
    }

    /// Centers the view on a node and returns the animation to play.
    pub fn center_viewport_to_node(&mut self, id: Id) -> Option<ViewportAnimation> {
        let bounds = match self.node_bounds(id) {
            Ok(bounds) => bounds,
            Err(err) => {
                debug!(err:%; "Cannot center viewport");
                return None;
            }
        };
        let canvas = self.config.canvas();
        let target = Viewport::centered_on(bounds.center(), canvas.center_zoom(), self.canvas_size);
        self.viewport = target;
        debug!(node_id:% = id, target:?; "Viewport centered on node");
        Some(ViewportAnimation {
            target,
            duration_ms: canvas.center_duration_ms(),
        })
    }

    /// Fits the given nodes into view, or every node when `ids` is empty.
    ///
    /// Returns the new viewport, or `None` when there is nothing to fit.
    pub fn fit_to_view(&mut self, ids: &[Id]) -> Option<Viewport> {
        let bounds: Vec<Bounds> = if ids.is_empty() {
            self.nodes
                .keys()
                .filter_map(|id| self.node_bounds(*id).ok())
                .collect()
        } else {
            ids.iter()
                .filter_map(|id| self.node_bounds(*id).ok())
                .collect()
        };
        let mut bounds = bounds.into_iter();
        let first = bounds.next()?;
        let bounds = bounds.fold(first, |acc, next| acc.merge(&next));

        let canvas = self.config.canvas();
        let (min_zoom, max_zoom) = canvas.fit_zoom_range();
        self.viewport = Viewport::for_bounds(
            bounds,
            self.canvas_size.width(),
            self.canvas_size.height(),
            min_zoom,
            max_zoom,
            canvas.fit_padding(),
        );
        debug!(viewport:? = self.viewport; "Fitted view");
        Some(self.viewport)
    }

    // Menus

    pub fn open_menu(&self) -> Option<&Menu> {
        self.open_menu.as_ref()
    }

    /// Opens the menu offered after a connection was dropped on empty canvas.
    pub fn open_drag_edge_to_canvas_menu(&mut self, source: Id, position: Point) {
        if !self.nodes.contains_key(&source) {
            debug!(node_id:% = source; "Not opening menu for unknown node");
            return;
        }
        self.open_menu = Some(Menu::DragEdgeToCanvas { source, position });
    }

    /// Opens the bulk actions menu for the current selection next to `anchor`.
    pub fn open_selection_actions_menu(&mut self, anchor: Id) {
        if !self.nodes.contains_key(&anchor) {
            debug!(node_id:% = anchor; "Not opening menu for unknown node");
            return;
        }
        self.open_menu = Some(Menu::SelectionActions { anchor });
    }

    /// Opens the menu of a group next to one of its members.
    pub fn open_group_menu(&mut self, group: Id, anchor: Id) {
        if !self.groups.contains_key(&group) {
            debug!(group_id:% = group; "Not opening menu for unknown group");
            return;
        }
        self.open_menu = Some(Menu::Group { group, anchor });
    }

    pub fn close_menu(&mut self) {
        self.open_menu = None;
    }

    // Rendering

    /// Helper lines of the node currently being dragged.
    pub fn helper_lines(&self) -> HelperLines {
        self.alignment.helper_lines()
    }

    /// Views of all nodes and of every edge whose endpoints exist, styled by
    /// selection and exploration highlight.
    pub fn scene(&self) -> Scene {
        let style = self.config.style();
        let selection_levels = compute_selection_levels(&self.selection, self.edges.values());
        let exploring = self.exploration.is_highlighting();
        let combine = |selected: Option<HighlightLevel>, explored: Option<HighlightLevel>| {
            let delta = StyleDelta::for_selection(selected, style);
            if exploring {
                delta.overlay(StyleDelta::for_exploration(explored, style))
            } else {
                delta
            }
        };

        let default_size = self.config.canvas().default_node_size();
        let nodes = self
            .nodes
            .values()
            .map(|node| {
                NodeView::new(
                    node,
                    self.dimensions.get(&node.identifier).copied(),
                    default_size,
                    NodeStyle::from_delta(combine(
                        selection_levels.node(node.identifier),
                        self.exploration.node_level(node.identifier),
                    )),
                )
            })
            .collect();

        let inflation = self.config.canvas().border_inflation();
        let edges = self
            .edges
            .values()
            .filter_map(|edge| match self.edge_frames(edge) {
                Ok((source, target)) => Some(EdgeView::new(
                    edge,
                    source,
                    target,
                    inflation,
                    EdgeStyle::from_delta(
                        edge.color,
                        combine(
                            selection_levels.edge(edge.identifier),
                            self.exploration.edge_level(edge.identifier),
                        ),
                    ),
                )),
                Err(err) => {
                    warn!(edge_id:% = edge.identifier, err:%; "Skipping edge");
                    None
                }
            })
            .collect();

        Scene { nodes, edges }
    }

    pub fn node_views(&self) -> Vec<NodeView> {
        self.scene().nodes
    }

    pub fn edge_views(&self) -> Vec<EdgeView> {
        self.scene().edges
    }

    /// Renders the diagram to a standalone SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Export`] when the diagram has no nodes or the
    /// style configuration cannot be applied.
    pub fn export_svg(&self) -> Result<String, CanvasError> {
        let scene = self.scene();
        let mut exporter = SvgExporter::new(self.config.export(), self.config.style());
        Ok(exporter.export_scene(&scene)?)
    }

    /// Renders the diagram to SVG and writes it to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Export`] as [`export_svg`](Self::export_svg)
    /// does, or [`CanvasError::Io`] when writing fails.
    pub fn write_svg(&self, mut writer: impl Write) -> Result<(), CanvasError> {
        let svg = self.export_svg()?;
        writer.write_all(svg.as_bytes())?;
        writer.flush()?;
        info!(bytes = svg.len(); "SVG written");
        Ok(())
    }

    /// Renders the diagram to SVG, `None` for an empty diagram.
    pub fn render_to_svg_string(&self) -> Option<String> {
        if self.nodes.is_empty() {
            debug!("Nothing to render");
            return None;
        }
        match self.export_svg() {
            Ok(svg) => Some(svg),
            Err(err) => {
                error!(err:%; "SVG rendering failed");
                None
            }
        }
    }

    // Internal lookups

    fn node_size(&self, id: Id) -> Size {
        self.dimensions
            .get(&id)
            .copied()
            .unwrap_or_else(|| self.config.canvas().default_node_size())
    }

    /// Frame used for routing; unmeasured nodes get the size their box is
    /// drawn with so edges end on the drawn border.
    fn node_frame(&self, id: Id) -> Result<NodeFrame, CanvasError> {
        let node = find_node(&self.nodes, id)?;
        Ok(NodeFrame::new(
            node.position.point(),
            Some(self.node_size(id)),
        ))
    }

    /// Frames of both endpoints of an edge.
    fn edge_frames(&self, edge: &Edge) -> Result<(NodeFrame, NodeFrame), CanvasError> {
        Ok((self.node_frame(edge.source)?, self.node_frame(edge.target)?))
    }

    /// Bounds of a node, using the default size until it is measured.
    fn node_bounds(&self, id: Id) -> Result<Bounds, CanvasError> {
        let node = find_node(&self.nodes, id)?;
        Ok(Bounds::new_from_top_left(
            node.position.point(),
            self.node_size(id),
        ))
    }
}

fn find_node(nodes: &IndexMap<Id, Node>, id: Id) -> Result<&Node, CanvasError> {
    nodes.get(&id).ok_or(CanvasError::NodeNotFound(id))
}

fn find_node_mut(nodes: &mut IndexMap<Id, Node>, id: Id) -> Result<&mut Node, CanvasError> {
    nodes.get_mut(&id).ok_or(CanvasError::NodeNotFound(id))
}

fn find_edge(edges: &IndexMap<Id, Edge>, id: Id) -> Result<&Edge, CanvasError> {
    edges.get(&id).ok_or(CanvasError::EdgeNotFound(id))
}

fn find_edge_mut(edges: &mut IndexMap<Id, Edge>, id: Id) -> Result<&mut Edge, CanvasError> {
    edges.get_mut(&id).ok_or(CanvasError::EdgeNotFound(id))
}

fn find_group(groups: &IndexMap<Id, Group>, id: Id) -> Result<&Group, CanvasError> {
    groups.get(&id).ok_or(CanvasError::GroupNotFound(id))
}

/// Identifier of the group listing `node`, if any.
fn group_of(groups: &IndexMap<Id, Group>, node: Id) -> Option<Id> {
    groups
        .values()
        .find(|group| group.content.contains(&node))
        .map(|group| group.identifier)
}
