//! Visual diagram model types.
//!
//! These are the shapes exchanged between the diagram controller and its
//! owner. A [`Node`] or [`Edge`] is the on-canvas representation of a
//! semantic entity; the entity itself is referenced only through
//! `external_identifier`, and one semantic entity may appear as several
//! visual nodes.
//!
//! # Organization
//!
//! - [`Node`], [`Position`], [`NodeItem`], [`ProfileOf`] - classes and class profiles
//! - [`Edge`], [`EdgeType`], [`Cardinality`] - associations, generalizations and profile links
//! - [`Group`] - non-visual aggregation of nodes for bulk operations
//! - [`ViewportDimensions`] - visible canvas area in canvas coordinates
//!
//! All types serialize in camelCase so snapshots can be exchanged as JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{color::Color, geometry::Point, identifier::Id};

/// Position of a node's top-left corner.
///
/// `anchored` marks the node as exempt from automatic layout and is kept
/// next to the coordinates because both are persisted together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub anchored: bool,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            anchored: false,
        }
    }

    /// Returns the coordinates as a [`Point`].
    pub fn point(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns a position at `point` keeping the anchor flag.
    pub fn with_point(self, point: Point) -> Self {
        Self {
            x: point.x(),
            y: point.y(),
            anchored: self.anchored,
        }
    }
}

/// Annotation shown on profiles: "profile of `label`" with an optional usage note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOf {
    pub label: String,
    #[serde(default)]
    pub usage_note: Option<String>,
}

/// One attribute/property row rendered inside a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeItem {
    pub identifier: Id,
    pub label: String,
    #[serde(default)]
    pub profile_of: Option<ProfileOf>,
}

impl NodeItem {
    pub fn new(identifier: impl Into<Id>, label: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            label: label.into(),
            profile_of: None,
        }
    }
}

/// Visual representation of a semantic class or class profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub identifier: Id,
    pub external_identifier: Id,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub iri: Option<String>,
    #[serde(default = "default_node_color")]
    pub color: Color,
    #[serde(default)]
    pub group: Option<Id>,
    pub position: Position,
    #[serde(default)]
    pub profile_of: Option<ProfileOf>,
    #[serde(default)]
    pub items: Vec<NodeItem>,
}

fn default_node_color() -> Color {
    Color::new("#ffffff").expect("'#ffffff' is a valid CSS color")
}

impl Node {
    /// Creates a node with no description, group, profile or items.
    ///
    /// # Examples
    ///
    /// ```
    /// use semcanvas_core::model::{Node, Position};
    ///
    /// let node = Node::new("n-1", "http://example.com/Person", "Person", Position::new(10.0, 20.0));
    /// assert_eq!(node.identifier, "n-1");
    /// assert!(node.group.is_none());
    /// ```
    pub fn new(
        identifier: impl Into<Id>,
        external_identifier: impl Into<Id>,
        label: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            external_identifier: external_identifier.into(),
            label: label.into(),
            description: None,
            iri: None,
            color: default_node_color(),
            group: None,
            position,
            profile_of: None,
            items: Vec::new(),
        }
    }

    /// Sets the attribute rows (builder style).
    pub fn with_items(mut self, items: Vec<NodeItem>) -> Self {
        self.items = items;
        self
    }

    /// Sets the profile annotation (builder style).
    pub fn with_profile_of(mut self, profile_of: ProfileOf) -> Self {
        self.profile_of = Some(profile_of);
        self
    }
}

/// Kind of relationship an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    Association,
    AssociationProfile,
    Generalization,
    ClassProfile,
}

impl EdgeType {
    /// Profile edges are drawn dashed.
    pub fn is_profile(self) -> bool {
        matches!(self, Self::AssociationProfile | Self::ClassProfile)
    }

    /// Only associations carry cardinalities.
    pub fn has_cardinalities(self) -> bool {
        matches!(self, Self::Association | Self::AssociationProfile)
    }
}

/// Cardinality of an association end.
///
/// `max: None` stands for an unbounded upper limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Cardinality {
    #[default]
    Unset,
    Range { min: u32, max: Option<u32> },
}

impl Cardinality {
    pub fn range(min: u32, max: Option<u32>) -> Self {
        Self::Range { min, max }
    }

    pub fn is_unset(self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl fmt::Display for Cardinality {
    /// Formats as `[min..max]`, with `*` for an unbounded maximum. An unset
    /// cardinality formats as an empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => Ok(()),
            Self::Range { min, max: Some(max) } => write!(f, "[{min}..{max}]"),
            Self::Range { min, max: None } => write!(f, "[{min}..*]"),
        }
    }
}

/// Visual representation of an association, generalization or profile link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    pub identifier: Id,
    pub external_identifier: Id,
    #[serde(default)]
    pub label: String,
    pub source: Id,
    pub target: Id,
    #[serde(default)]
    pub cardinality_source: Cardinality,
    #[serde(default)]
    pub cardinality_target: Cardinality,
    #[serde(default)]
    pub color: Color,
    /// Intermediate routing points, ordered from source to target.
    #[serde(default)]
    pub waypoints: Vec<Point>,
    #[serde(default)]
    pub profile_of: Option<ProfileOf>,
}

impl Edge {
    /// Creates an edge without label, cardinalities or waypoints.
    pub fn new(
        edge_type: EdgeType,
        identifier: impl Into<Id>,
        external_identifier: impl Into<Id>,
        source: impl Into<Id>,
        target: impl Into<Id>,
    ) -> Self {
        Self {
            edge_type,
            identifier: identifier.into(),
            external_identifier: external_identifier.into(),
            label: String::new(),
            source: source.into(),
            target: target.into(),
            cardinality_source: Cardinality::Unset,
            cardinality_target: Cardinality::Unset,
            color: Color::default(),
            waypoints: Vec::new(),
            profile_of: None,
        }
    }

    /// Sets the waypoints (builder style).
    pub fn with_waypoints(mut self, waypoints: Vec<Point>) -> Self {
        self.waypoints = waypoints;
        self
    }

    /// Checks whether the edge touches the node.
    pub fn is_incident_to(&self, node: Id) -> bool {
        self.source == node || self.target == node
    }
}

/// A set of nodes moved, anchored and dissolved together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub identifier: Id,
    pub content: Vec<Id>,
}

impl Group {
    pub fn new(identifier: impl Into<Id>, content: Vec<Id>) -> Self {
        Self {
            identifier: identifier.into(),
            content,
        }
    }
}

/// Visible area of the canvas expressed in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportDimensions {
    pub position: Point,
    pub width: f32,
    pub height: f32,
}
