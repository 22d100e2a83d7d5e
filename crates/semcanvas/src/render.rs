//! Render-ready views of nodes and edges.
//!
//! Views carry resolved geometry and style so any host renderer (or the
//! SVG exporter) can draw them without knowing about selection,
//! highlighting or routing.

use semcanvas_core::{
    color::Color,
    geometry::{Bounds, Point, Size},
    identifier::Id,
    model::{Cardinality, Edge, EdgeType, Node, ProfileOf},
};

use crate::{
    routing::{
        CandidateWaypoint, NodeFrame, candidate_waypoints, create_svg_path, create_waypoints,
        find_label_position,
    },
    style::{EdgeStyle, NodeStyle},
};

/// Distance of cardinality labels from the edge end, along the edge.
const CARDINALITY_OFFSET: f32 = 18.0;

/// Display text of a profile annotation: `"profile of <label>"`.
pub fn profile_label(profile_of: &ProfileOf) -> String {
    format!("profile of {}", profile_of.label)
}

/// One attribute row of a node view.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub identifier: Id,
    pub label: String,
    pub profile_of: Option<String>,
}

/// Everything needed to draw one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub identifier: Id,
    pub external_identifier: Id,
    pub bounds: Bounds,
    /// Whether `bounds` comes from a host measurement rather than the default size.
    pub measured: bool,
    pub label: String,
    pub description: Option<String>,
    pub iri: Option<String>,
    pub profile_of: Option<String>,
    pub usage_note: Option<String>,
    pub items: Vec<ItemView>,
    pub fill: Color,
    pub anchored: bool,
    pub group: Option<Id>,
    pub style: NodeStyle,
}

impl NodeView {
    /// Builds the view of `node`; unmeasured nodes use `default_size`.
    pub fn new(node: &Node, size: Option<Size>, default_size: Size, style: NodeStyle) -> Self {
        let bounds =
            Bounds::new_from_top_left(node.position.point(), size.unwrap_or(default_size));
        Self {
            identifier: node.identifier,
            external_identifier: node.external_identifier,
            bounds,
            measured: size.is_some(),
            label: node.label.clone(),
            description: node.description.clone(),
            iri: node.iri.clone(),
            profile_of: node.profile_of.as_ref().map(profile_label),
            usage_note: node
                .profile_of
                .as_ref()
                .and_then(|profile| profile.usage_note.clone()),
            items: node
                .items
                .iter()
                .map(|item| ItemView {
                    identifier: item.identifier,
                    label: item.label.clone(),
                    profile_of: item.profile_of.as_ref().map(profile_label),
                })
                .collect(),
            fill: node.color,
            anchored: node.position.anchored,
            group: node.group,
            style,
        }
    }
}

/// Marker drawn at the target end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMarker {
    /// Open arrow head, for associations and profile links.
    Arrow,
    /// Hollow triangle, for generalizations.
    Triangle,
}

impl From<EdgeType> for EdgeMarker {
    fn from(edge_type: EdgeType) -> Self {
        match edge_type {
            EdgeType::Generalization => Self::Triangle,
            EdgeType::Association | EdgeType::AssociationProfile | EdgeType::ClassProfile => {
                Self::Arrow
            }
        }
    }
}

/// A text placed near one end of an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeEndLabel {
    pub text: String,
    pub position: Point,
}

/// Everything needed to draw one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeView {
    pub identifier: Id,
    pub external_identifier: Id,
    pub edge_type: EdgeType,
    /// Full polyline: source border, waypoints, target border.
    pub path: Vec<Point>,
    pub svg_path: String,
    pub label: String,
    pub profile_of: Option<String>,
    pub label_position: Option<Point>,
    pub cardinality_source: Option<EdgeEndLabel>,
    pub cardinality_target: Option<EdgeEndLabel>,
    pub marker: EdgeMarker,
    pub dashed: bool,
    pub style: EdgeStyle,
    pub waypoints: Vec<Point>,
    /// Handles for inserting new waypoints.
    pub candidates: Vec<CandidateWaypoint>,
}

impl EdgeView {
    /// Builds the view of `edge` between two resolved endpoint frames.
    pub fn new(
        edge: &Edge,
        source: NodeFrame,
        target: NodeFrame,
        inflation: f32,
        style: EdgeStyle,
    ) -> Self {
        let path = create_waypoints(source, &edge.waypoints, target, inflation);
        let len = path.len();
        let (cardinality_source, cardinality_target) =
            if edge.edge_type.has_cardinalities() && len >= 2 {
                (
                    end_label(edge.cardinality_source, path[0], path[1]),
                    end_label(edge.cardinality_target, path[len - 1], path[len - 2]),
                )
            } else {
                (None, None)
            };

        Self {
            identifier: edge.identifier,
            external_identifier: edge.external_identifier,
            edge_type: edge.edge_type,
            svg_path: create_svg_path(&path),
            label_position: find_label_position(&path),
            candidates: candidate_waypoints(&path),
            path,
            label: edge.label.clone(),
            profile_of: edge.profile_of.as_ref().map(profile_label),
            cardinality_source,
            cardinality_target,
            marker: EdgeMarker::from(edge.edge_type),
            dashed: edge.edge_type.is_profile(),
            style,
            waypoints: edge.waypoints.clone(),
        }
    }
}

fn end_label(cardinality: Cardinality, end: Point, toward: Point) -> Option<EdgeEndLabel> {
    if cardinality.is_unset() {
        return None;
    }
    Some(EdgeEndLabel {
        text: cardinality.to_string(),
        position: offset_from_end(end, toward),
    })
}

/// Point `CARDINALITY_OFFSET` along the edge from `end`, shifted to the left
/// of the direction of travel by half that distance.
fn offset_from_end(end: Point, toward: Point) -> Point {
    let direction = toward.sub_point(end);
    let length = direction.hypot();
    if length == 0.0 {
        return end;
    }
    let unit = direction.scale(1.0 / length);
    let normal = Point::new(unit.y(), -unit.x());
    end.add_point(unit.scale(CARDINALITY_OFFSET))
        .add_point(normal.scale(CARDINALITY_OFFSET / 2.0))
}

/// Node and edge views of a whole diagram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bounding box of all nodes, `None` without nodes.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut nodes = self.nodes.iter().map(|node| node.bounds);
        let first = nodes.next()?;
        Some(nodes.fold(first, |acc, bounds| acc.merge(&bounds)))
    }
}
