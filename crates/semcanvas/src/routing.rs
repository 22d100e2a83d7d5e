//! Edge routing through user-placed waypoints.
//!
//! An edge is drawn as a polyline: the point where it leaves the source
//! node's (slightly inflated) rectangle, the edge's waypoints, and the point
//! where it enters the target node's rectangle. This module builds that
//! polyline, derives label positions and path data from it, and tracks
//! interactive waypoint drags.

use log::debug;

use semcanvas_core::{
    geometry::{Point, Size, find_line_center, find_rectangle_line_intersection},
    identifier::Id,
};

/// A node's top-left position plus its measured size, if the host has
/// measured it yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeFrame {
    position: Point,
    size: Option<Size>,
}

impl NodeFrame {
    pub fn new(position: Point, size: Option<Size>) -> Self {
        Self { position, size }
    }

    pub fn position(self) -> Point {
        self.position
    }

    pub fn size(self) -> Option<Size> {
        self.size
    }
}

/// Center of a node: position plus half the measured size, or the raw
/// position while the node is unmeasured.
pub fn find_node_center(node: NodeFrame) -> Point {
    match node.size {
        Some(size) => node
            .position
            .add_point(Point::new(size.width() / 2.0, size.height() / 2.0)),
        None => node.position,
    }
}

/// Point where the segment from the node center toward `next_point` crosses
/// the node rectangle grown by `inflation` in width and height.
///
/// Unmeasured nodes return their raw position.
pub fn find_node_border(node: NodeFrame, next_point: Point, inflation: f32) -> Point {
    let Some(size) = node.size else {
        return node.position;
    };
    let inflated = Size::new(size.width() + inflation, size.height() + inflation);
    find_rectangle_line_intersection(find_node_center(node), inflated, next_point)
}

/// Builds the full polyline of an edge: `[source border, ...waypoints, target border]`.
///
/// The source border is aimed at the first waypoint (or the target center
/// without waypoints) and the target border at the last waypoint (or the
/// source center).
///
/// # Examples
///
/// ```
/// # use semcanvas::routing::{create_waypoints, NodeFrame};
/// # use semcanvas_core::geometry::{Point, Size};
/// let source = NodeFrame::new(Point::new(0.0, 0.0), Some(Size::new(100.0, 50.0)));
/// let target = NodeFrame::new(Point::new(300.0, 0.0), Some(Size::new(100.0, 50.0)));
///
/// let path = create_waypoints(source, &[], target, 4.0);
/// assert_eq!(path.len(), 2);
/// assert!((path[0].x() - 102.0).abs() < 1e-3);
/// assert!((path[1].x() - 298.0).abs() < 1e-3);
/// ```
pub fn create_waypoints(
    source: NodeFrame,
    waypoints: &[Point],
    target: NodeFrame,
    inflation: f32,
) -> Vec<Point> {
    let toward_source = waypoints
        .first()
        .copied()
        .unwrap_or_else(|| find_node_center(target));
    let toward_target = waypoints
        .last()
        .copied()
        .unwrap_or_else(|| find_node_center(source));

    let mut points = Vec::with_capacity(waypoints.len() + 2);
    points.push(find_node_border(source, toward_source, inflation));
    points.extend_from_slice(waypoints);
    points.push(find_node_border(target, toward_target, inflation));
    points
}

/// Position of an edge label along its polyline.
///
/// Two points give their midpoint; longer paths use the midpoint of the
/// segment starting at index `n / 2`. Returns `None` for an empty path.
pub fn find_label_position(points: &[Point]) -> Option<Point> {
    match points.len() {
        0 => None,
        1 => Some(points[0]),
        2 => Some(find_line_center(points[0], points[1])),
        len => {
            let index = len / 2;
            Some(find_line_center(points[index], points[index + 1]))
        }
    }
}

/// Emits SVG path data for a polyline: `M x,y L x,y L x,y ...`.
pub fn create_svg_path(points: &[Point]) -> String {
    let mut path = String::new();
    for (index, point) in points.iter().enumerate() {
        if index > 0 {
            path.push(' ');
        }
        let command = if index == 0 { 'M' } else { 'L' };
        path.push_str(&format!("{command} {},{}", point.x(), point.y()));
    }
    path
}

/// A drag handle between two consecutive path points; pressing it inserts a
/// new waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateWaypoint {
    /// Index the new waypoint takes in the edge's waypoint list.
    pub index: usize,
    pub position: Point,
}

/// Midpoints between consecutive points of a full edge path.
///
/// The candidate on segment `[path[k], path[k + 1]]` inserts at waypoint
/// index `k`, since `path[0]` is the source border and not a waypoint.
pub fn candidate_waypoints(path: &[Point]) -> Vec<CandidateWaypoint> {
    path.windows(2)
        .enumerate()
        .map(|(index, segment)| CandidateWaypoint {
            index,
            position: find_line_center(segment[0], segment[1]),
        })
        .collect()
}

/// How a waypoint drag ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaypointRelease {
    /// Pressed and released without movement.
    Click,
    /// The waypoint was moved.
    Moved,
    /// A freshly inserted waypoint was released where it was created.
    Inserted,
}

/// An in-progress drag of one waypoint.
///
/// The session is an owned value: the controller takes it out of its slot
/// on release or pointer-leave, so no exit path can leave it dangling.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointDrag {
    edge: Id,
    index: usize,
    origin: Point,
    current: Point,
    moved: bool,
    inserted: bool,
}

impl WaypointDrag {
    /// Starts dragging an existing waypoint.
    pub fn new(edge: Id, index: usize, origin: Point) -> Self {
        debug!(edge_id:% = edge, index = index; "Waypoint drag started");
        Self {
            edge,
            index,
            origin,
            current: origin,
            moved: false,
            inserted: false,
        }
    }

    /// Starts dragging a waypoint that was just inserted from a candidate.
    pub fn inserted(edge: Id, index: usize, origin: Point) -> Self {
        Self {
            inserted: true,
            ..Self::new(edge, index, origin)
        }
    }

    pub fn edge(&self) -> Id {
        self.edge
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Point {
        self.current
    }

    /// Checks whether the pointer left the press position at any point of
    /// the drag, even if it came back.
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// Records a new pointer position.
    pub fn move_to(&mut self, position: Point) {
        self.current = position;
        self.moved |= position != self.origin;
    }

    /// Ends the session and classifies it.
    pub fn finish(self) -> WaypointRelease {
        let release = if self.has_moved() {
            WaypointRelease::Moved
        } else if self.inserted {
            WaypointRelease::Inserted
        } else {
            WaypointRelease::Click
        };
        debug!(edge_id:% = self.edge, index = self.index, release:?; "Waypoint drag finished");
        release
    }
}
