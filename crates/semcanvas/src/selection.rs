//! Selection tracking and selection-driven styling.
//!
//! [`Selection`] keeps the selected node and edge identifiers in selection
//! order, most recent last. [`compute_selection_styles`] turns a selection
//! into a style for every node and edge; it is a full recomputation, so the
//! result depends only on its inputs.

use std::collections::HashSet;

use indexmap::IndexMap;

use semcanvas_core::{
    identifier::Id,
    model::{Edge, Node},
};

use crate::{
    config::StyleConfig,
    highlight::{HighlightLevel, HighlightMap},
    style::{EdgeStyle, NodeStyle, StyleDelta},
};

/// Ordered selection of nodes and edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    nodes: Vec<Id>,
    edges: Vec<Id>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Id] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Id] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains(&id)
    }

    pub fn contains_edge(&self, id: Id) -> bool {
        self.edges.contains(&id)
    }

    /// The most recently selected node.
    pub fn last_node(&self) -> Option<Id> {
        self.nodes.last().copied()
    }

    /// Replaces the selected nodes, dropping duplicates. Returns whether the
    /// selection changed.
    pub fn set_nodes(&mut self, ids: impl IntoIterator<Item = Id>) -> bool {
        let nodes = dedup(ids);
        let changed = nodes != self.nodes;
        self.nodes = nodes;
        changed
    }

    /// Replaces the selected edges, dropping duplicates. Returns whether the
    /// selection changed.
    pub fn set_edges(&mut self, ids: impl IntoIterator<Item = Id>) -> bool {
        let edges = dedup(ids);
        let changed = edges != self.edges;
        self.edges = edges;
        changed
    }

    /// Appends nodes not selected yet; already selected ones move to the end.
    pub fn add_nodes(&mut self, ids: impl IntoIterator<Item = Id>) -> bool {
        let before = self.nodes.clone();
        for id in ids {
            self.nodes.retain(|selected| *selected != id);
            self.nodes.push(id);
        }
        before != self.nodes
    }

    /// Appends an edge, moving it to the end if already selected.
    pub fn add_edge(&mut self, id: Id) -> bool {
        let before = self.edges.clone();
        self.edges.retain(|selected| *selected != id);
        self.edges.push(id);
        before != self.edges
    }

    pub fn remove_nodes(&mut self, ids: &[Id]) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|id| !ids.contains(id));
        before != self.nodes.len()
    }

    pub fn remove_edges(&mut self, ids: &[Id]) -> bool {
        let before = self.edges.len();
        self.edges.retain(|id| !ids.contains(id));
        before != self.edges.len()
    }

    /// Clears the selection. Returns whether anything was selected.
    pub fn clear(&mut self) -> bool {
        let changed = !self.is_empty();
        self.nodes.clear();
        self.edges.clear();
        changed
    }
}

fn dedup(ids: impl IntoIterator<Item = Id>) -> Vec<Id> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Styles of every node and edge for one selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionStyles {
    pub nodes: IndexMap<Id, NodeStyle>,
    pub edges: IndexMap<Id, EdgeStyle>,
}

/// Selection-driven levels of nodes and edges.
///
/// Selected nodes and edges are primary. Nodes sharing an edge with a
/// selected node, and endpoints of selected edges, are neighbours. Edges
/// touching a selected node are neighbours unless selected themselves.
pub fn compute_selection_levels<'a>(
    selection: &Selection,
    edges: impl IntoIterator<Item = &'a Edge>,
) -> HighlightMap {
    let mut levels = HighlightMap::new();
    for id in selection.nodes() {
        levels.set_node(*id, HighlightLevel::Primary);
    }
    for id in selection.edges() {
        levels.set_edge(*id, HighlightLevel::Primary);
    }

    for edge in edges {
        let edge_selected = selection.contains_edge(edge.identifier);
        let source_selected = selection.contains_node(edge.source);
        let target_selected = selection.contains_node(edge.target);

        if edge_selected || target_selected {
            levels.mark_node_neighbour(edge.source);
        }
        if edge_selected || source_selected {
            levels.mark_node_neighbour(edge.target);
        }
        if !edge_selected && (source_selected || target_selected) {
            levels.mark_edge_neighbour(edge.identifier);
        }
    }
    levels
}

/// Computes the style of every node and edge for `selection`.
///
/// Entities not related to the selection get the neutral style, so the
/// result fully replaces any previous styling.
pub fn compute_selection_styles<'a>(
    selection: &Selection,
    nodes: impl IntoIterator<Item = &'a Node>,
    edges: impl IntoIterator<Item = &'a Edge> + Clone,
    style: &StyleConfig,
) -> SelectionStyles {
    let levels = compute_selection_levels(selection, edges.clone());
    let nodes = nodes
        .into_iter()
        .map(|node| {
            let delta = StyleDelta::for_selection(levels.node(node.identifier), style);
            (node.identifier, NodeStyle::from_delta(delta))
        })
        .collect();
    let edges = edges
        .into_iter()
        .map(|edge| {
            let delta = StyleDelta::for_selection(levels.edge(edge.identifier), style);
            (edge.identifier, EdgeStyle::from_delta(edge.color, delta))
        })
        .collect();
    SelectionStyles { nodes, edges }
}

#[cfg(test)]
mod tests {
    use semcanvas_core::model::{EdgeType, Position};

    use super::*;

    fn fixture() -> (Vec<Node>, Vec<Edge>) {
        let nodes = ["sel-a", "sel-b", "sel-c", "sel-d"]
            .iter()
            .map(|id| Node::new(*id, *id, *id, Position::new(0.0, 0.0)))
            .collect();
        let edges = vec![
            Edge::new(EdgeType::Association, "sel-ab", "sel-ab", "sel-a", "sel-b"),
            Edge::new(EdgeType::Generalization, "sel-bc", "sel-bc", "sel-b", "sel-c"),
            Edge::new(EdgeType::Association, "sel-cd", "sel-cd", "sel-c", "sel-d"),
        ];
        (nodes, edges)
    }

    #[test]
    fn test_selection_order_and_change_detection() {
        let mut selection = Selection::new();
        assert!(selection.set_nodes([Id::new("s1"), Id::new("s2"), Id::new("s1")]));
        assert_eq!(selection.nodes(), &[Id::new("s1"), Id::new("s2")]);
        assert!(!selection.set_nodes([Id::new("s1"), Id::new("s2")]));

        assert!(selection.add_nodes([Id::new("s1")]));
        assert_eq!(selection.last_node(), Some(Id::new("s1")));

        assert!(selection.clear());
        assert!(!selection.clear());
    }

    #[test]
    fn test_selected_node_levels() {
        let (_, edges) = fixture();
        let mut selection = Selection::new();
        selection.set_nodes([Id::new("sel-b")]);

        let levels = compute_selection_levels(&selection, &edges);
        assert_eq!(levels.node(Id::new("sel-b")), Some(HighlightLevel::Primary));
        assert_eq!(levels.node(Id::new("sel-a")), Some(HighlightLevel::Neighbour));
        assert_eq!(levels.node(Id::new("sel-c")), Some(HighlightLevel::Neighbour));
        assert_eq!(levels.edge(Id::new("sel-ab")), Some(HighlightLevel::Neighbour));
        assert_eq!(levels.edge(Id::new("sel-bc")), Some(HighlightLevel::Neighbour));
        assert_eq!(levels.node(Id::new("sel-d")), None);
        assert_eq!(levels.edge(Id::new("sel-cd")), None);
    }

    #[test]
    fn test_selected_edge_wins_over_neighbour() {
        let (_, edges) = fixture();
        let mut selection = Selection::new();
        selection.set_nodes([Id::new("sel-b")]);
        selection.set_edges([Id::new("sel-bc")]);

        let levels = compute_selection_levels(&selection, &edges);
        assert_eq!(levels.edge(Id::new("sel-bc")), Some(HighlightLevel::Primary));
        assert_eq!(levels.edge(Id::new("sel-ab")), Some(HighlightLevel::Neighbour));
    }

    #[test]
    fn test_selected_edge_marks_endpoints() {
        let (_, edges) = fixture();
        let mut selection = Selection::new();
        selection.set_edges([Id::new("sel-cd")]);

        let levels = compute_selection_levels(&selection, &edges);
        assert_eq!(levels.node(Id::new("sel-c")), Some(HighlightLevel::Neighbour));
        assert_eq!(levels.node(Id::new("sel-d")), Some(HighlightLevel::Neighbour));
        assert_eq!(levels.node(Id::new("sel-b")), None);
    }

    #[test]
    fn test_selected_edge_sharing_node_identifier() {
        let edges = vec![Edge::new(EdgeType::Association, "sel-x", "sel-x", "sel-x", "sel-y")];
        let mut selection = Selection::new();
        selection.set_edges([Id::new("sel-x")]);

        let levels = compute_selection_levels(&selection, &edges);
        assert_eq!(levels.edge(Id::new("sel-x")), Some(HighlightLevel::Primary));
        assert_eq!(levels.node(Id::new("sel-x")), Some(HighlightLevel::Neighbour));
        assert_eq!(levels.node(Id::new("sel-y")), Some(HighlightLevel::Neighbour));
    }

    #[test]
    fn test_styles_cover_everything_and_are_repeatable() {
        let (nodes, edges) = fixture();
        let style = StyleConfig::default();
        let mut selection = Selection::new();
        selection.set_nodes([Id::new("sel-a")]);

        let first = compute_selection_styles(&selection, &nodes, &edges, &style);
        let second = compute_selection_styles(&selection, &nodes, &edges, &style);
        assert_eq!(first, second);
        assert_eq!(format!("{first:?}"), format!("{second:?}"));

        assert_eq!(first.nodes.len(), nodes.len());
        assert_eq!(first.edges.len(), edges.len());
        assert_eq!(first.nodes[&Id::new("sel-a")].outline, Some(style.primary_color()));
        assert_eq!(first.nodes[&Id::new("sel-d")], NodeStyle::default());

        selection.clear();
        let cleared = compute_selection_styles(&selection, &nodes, &edges, &style);
        assert!(cleared.nodes.values().all(|s| *s == NodeStyle::default()));
        assert!(
            cleared
                .edges
                .iter()
                .all(|(id, s)| s.stroke == edges.iter().find(|e| e.identifier == *id).unwrap().color)
        );
    }
}
