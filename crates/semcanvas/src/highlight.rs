//! Exploration highlighting.
//!
//! While exploration mode is on, hovering a node on the canvas (or an entity
//! in the owner's catalog) highlights it together with its one-hop
//! neighbourhood and dims everything else. Levels are recomputed from
//! scratch on every call, so repeated calls with the same input yield the
//! same state.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::graphmap::UnGraphMap;

use semcanvas_core::{
    identifier::Id,
    model::{Edge, Node},
};

/// Highlight level of a node or edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HighlightLevel {
    /// The highlighted entity itself (level 0).
    Primary,
    /// A one-hop neighbour (level 1).
    Neighbour,
}

impl HighlightLevel {
    /// Numeric level: 0 for primary, 1 for neighbours.
    pub fn level(self) -> u8 {
        match self {
            Self::Primary => 0,
            Self::Neighbour => 1,
        }
    }
}

/// Highlight levels of nodes and edges. Absence means "not highlighted".
///
/// Nodes and edges are keyed separately, so a node and an edge sharing an
/// identifier keep their own levels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightMap {
    nodes: IndexMap<Id, HighlightLevel>,
    edges: IndexMap<Id, HighlightLevel>,
}

impl HighlightMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: Id) -> Option<HighlightLevel> {
        self.nodes.get(&id).copied()
    }

    pub fn edge(&self, id: Id) -> Option<HighlightLevel> {
        self.edges.get(&id).copied()
    }

    /// Highlighted nodes in insertion order.
    pub fn nodes(&self) -> &IndexMap<Id, HighlightLevel> {
        &self.nodes
    }

    /// Highlighted edges in insertion order.
    pub fn edges(&self) -> &IndexMap<Id, HighlightLevel> {
        &self.edges
    }

    /// Number of highlighted nodes and edges.
    pub fn len(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    pub(crate) fn set_node(&mut self, id: Id, level: HighlightLevel) {
        self.nodes.insert(id, level);
    }

    pub(crate) fn set_edge(&mut self, id: Id, level: HighlightLevel) {
        self.edges.insert(id, level);
    }

    /// Marks a node as a neighbour unless it already has a level.
    pub(crate) fn mark_node_neighbour(&mut self, id: Id) {
        self.nodes.entry(id).or_insert(HighlightLevel::Neighbour);
    }

    /// Marks an edge as a neighbour unless it already has a level.
    pub(crate) fn mark_edge_neighbour(&mut self, id: Id) {
        self.edges.entry(id).or_insert(HighlightLevel::Neighbour);
    }
}

/// Groups visual node identifiers by the semantic entity they show.
pub fn external_to_visual<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> HashMap<Id, Vec<Id>> {
    let mut lookup: HashMap<Id, Vec<Id>> = HashMap::new();
    for node in nodes {
        lookup
            .entry(node.external_identifier)
            .or_default()
            .push(node.identifier);
    }
    lookup
}

/// Computes levels for a set of start nodes.
///
/// Start nodes get [`HighlightLevel::Primary`]. Nodes sharing an edge with a
/// start node, and the edges touching a start node, get
/// [`HighlightLevel::Neighbour`]. Edges whose endpoints are missing are
/// ignored.
pub fn compute_levels<'a>(
    start_nodes: &[Id],
    nodes: impl IntoIterator<Item = &'a Node>,
    edges: impl IntoIterator<Item = &'a Edge>,
) -> HighlightMap {
    let mut graph: UnGraphMap<Id, ()> = UnGraphMap::new();
    for node in nodes {
        graph.add_node(node.identifier);
    }

    let start: HashSet<Id> = start_nodes
        .iter()
        .copied()
        .filter(|id| graph.contains_node(*id))
        .collect();

    let mut levels = HighlightMap::new();
    for id in start_nodes {
        if start.contains(id) {
            levels.set_node(*id, HighlightLevel::Primary);
        }
    }

    let mut incident_edges = Vec::new();
    for edge in edges {
        if !graph.contains_node(edge.source) || !graph.contains_node(edge.target) {
            trace!(edge_id:% = edge.identifier; "Skipping edge with missing endpoint");
            continue;
        }
        graph.add_edge(edge.source, edge.target, ());
        if start.contains(&edge.source) || start.contains(&edge.target) {
            incident_edges.push(edge.identifier);
        }
    }

    for id in start_nodes {
        if !start.contains(id) {
            continue;
        }
        for neighbour in graph.neighbors(*id) {
            if !start.contains(&neighbour) {
                levels.mark_node_neighbour(neighbour);
            }
        }
    }

    for edge in incident_edges {
        levels.set_edge(edge, HighlightLevel::Neighbour);
    }

    levels
}

/// Exploration-mode highlight state.
#[derive(Debug, Default)]
pub struct ExplorationHighlighter {
    mode_enabled: bool,
    suppressed: bool,
    levels: HighlightMap,
    should_shrink_catalog: bool,
}

impl ExplorationHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns the user-facing exploration mode on or off. Turning it off
    /// clears any highlight.
    pub fn set_mode(&mut self, enabled: bool) {
        debug!(enabled = enabled; "Exploration mode changed");
        self.mode_enabled = enabled;
        if !enabled {
            self.reset();
        }
    }

    pub fn is_mode_enabled(&self) -> bool {
        self.mode_enabled
    }

    /// Temporarily hides highlighting without touching the user-facing mode.
    pub fn set_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Checks whether highlight requests are honoured right now.
    pub fn is_active(&self) -> bool {
        self.mode_enabled && !self.suppressed
    }

    /// Checks whether a non-empty highlight should be shown.
    pub fn is_highlighting(&self) -> bool {
        self.is_active() && !self.levels.is_empty()
    }

    /// Whether the owner's catalog should shrink to make room; true only for
    /// highlights started from the canvas.
    pub fn should_shrink_catalog(&self) -> bool {
        self.should_shrink_catalog
    }

    /// Highlights visual nodes hovered on the canvas.
    pub fn highlight_from_canvas<'a>(
        &mut self,
        start_nodes: &[Id],
        nodes: impl IntoIterator<Item = &'a Node>,
        edges: impl IntoIterator<Item = &'a Edge>,
    ) {
        if !self.is_active() {
            return;
        }
        self.levels = compute_levels(start_nodes, nodes, edges);
        self.should_shrink_catalog = true;
        debug!(highlighted = self.levels.len(); "Exploration highlight from canvas");
    }

    /// Highlights every visual occurrence of the given semantic entities.
    pub fn highlight_from_catalog<'a>(
        &mut self,
        external_ids: &[Id],
        nodes: impl IntoIterator<Item = &'a Node> + Clone,
        edges: impl IntoIterator<Item = &'a Edge>,
    ) {
        if !self.is_active() {
            return;
        }
        let lookup = external_to_visual(nodes.clone());
        let start: Vec<Id> = external_ids
            .iter()
            .filter_map(|external| lookup.get(external))
            .flatten()
            .copied()
            .collect();
        self.levels = compute_levels(&start, nodes, edges);
        self.should_shrink_catalog = false;
        debug!(
            requested = external_ids.len(),
            highlighted = self.levels.len();
            "Exploration highlight from catalog"
        );
    }

    /// Clears the highlight.
    pub fn reset(&mut self) {
        self.levels.clear();
        self.should_shrink_catalog = false;
    }

    /// Level of a node, `None` when it is not highlighted or when
    /// highlighting is inactive.
    pub fn node_level(&self, id: Id) -> Option<HighlightLevel> {
        self.is_active().then(|| self.levels.node(id)).flatten()
    }

    /// Level of an edge, `None` when it is not highlighted or when
    /// highlighting is inactive.
    pub fn edge_level(&self, id: Id) -> Option<HighlightLevel> {
        self.is_active().then(|| self.levels.edge(id)).flatten()
    }

    /// All current levels, regardless of suppression.
    pub fn levels(&self) -> &HighlightMap {
        &self.levels
    }
}
