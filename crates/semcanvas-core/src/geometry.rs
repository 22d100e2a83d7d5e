//! Geometric primitives and algorithms for diagram interaction.
//!
//! This module provides the fundamental geometric types used throughout
//! semcanvas for node placement, edge routing and viewport math, together
//! with the pure functions that edge routing is built on.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in canvas space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//! - [`find_rectangle_line_intersection`], [`find_line_center`],
//!   [`find_closest_line`], [`distance_to_segment`] - stateless routing helpers
//!
//! # Coordinate System
//!
//! Semcanvas uses a coordinate system consistent with SVG and the browser canvas:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward (positive to the right)
//! - **Y-axis**: Increases downward (positive downward)
//!
//! Node positions denote the top-left corner of the node.

use serde::{Deserialize, Serialize};

/// A 2D point representing a position in canvas coordinate space.
///
/// Points use `f32` coordinates and provide operations for basic vector math.
/// Waypoints of edges are plain points.
///
/// # Examples
///
/// ```
/// # use semcanvas_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// // Vector addition
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// // Distance between the two points
/// assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// # use semcanvas_core::geometry::Point;
    /// let position = Point::new(100.0, 50.0);
    /// let offset = Point::new(10.0, -5.0);
    ///
    /// let moved = position.add_point(offset);
    /// assert_eq!(moved.x(), 110.0);
    /// assert_eq!(moved.y(), 45.0);
    /// ```
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance between two points
    pub fn distance(self, other: Point) -> f32 {
        self.sub_point(other).hypot()
    }

    /// Dot product of the two points treated as vectors
    pub fn dot(self, other: Point) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Multiplies both coordinates by the given factor.
    ///
    /// # Examples
    ///
    /// ```
    /// # use semcanvas_core::geometry::Point;
    /// let point = Point::new(10.0, 20.0);
    ///
    /// let doubled = point.scale(2.0);
    /// assert_eq!(doubled.x(), 20.0);
    /// assert_eq!(doubled.y(), 40.0);
    /// ```
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Checks whether the point lies inside the bounds or on its border.
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Checks whether `other` lies entirely inside these bounds.
    pub fn contains_bounds(self, other: Self) -> bool {
        self.contains(other.min_point()) && self.contains(Point::new(other.max_x, other.max_y))
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use semcanvas_core::geometry::{Bounds, Point, Size};
    /// let header = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 30.0));
    /// let content = Bounds::new_from_top_left(Point::new(10.0, 40.0), Size::new(120.0, 80.0));
    ///
    /// let combined = header.merge(&content);
    /// assert_eq!(combined.min_x(), 0.0);
    /// assert_eq!(combined.min_y(), 0.0);
    /// assert_eq!(combined.width(), 130.0);
    /// assert_eq!(combined.height(), 120.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Finds where the segment from the center of a rectangle toward `target`
/// leaves the rectangle.
///
/// The rectangle is centered at `center` with the given `size`. When the
/// target lies within the half extents on both axes the center itself is
/// returned. Otherwise the fractional distances along the direction vector
/// to the departed-from vertical and horizontal edges are compared and the
/// nearer edge wins.
///
/// # Examples
///
/// ```
/// # use semcanvas_core::geometry::{find_rectangle_line_intersection, Point, Size};
/// let center = Point::new(0.0, 0.0);
/// let hit = find_rectangle_line_intersection(center, Size::new(100.0, 50.0), Point::new(500.0, 0.0));
/// assert!((hit.x() - 50.0).abs() < 1e-4);
/// assert_eq!(hit.y(), 0.0);
///
/// // Targets inside the rectangle collapse to the center.
/// let inside = find_rectangle_line_intersection(center, Size::new(100.0, 50.0), Point::new(10.0, 5.0));
/// assert_eq!(inside, center);
/// ```
pub fn find_rectangle_line_intersection(center: Point, size: Size, target: Point) -> Point {
    let half_width = size.width / 2.0;
    let half_height = size.height / 2.0;
    let dx = target.x - center.x;
    let dy = target.y - center.y;

    if dx.abs() < half_width && dy.abs() < half_height {
        return center;
    }

    let horizontal = if dx > 0.0 {
        Some((center.x + half_width - center.x) / dx)
    } else if dx < 0.0 {
        Some((center.x - half_width - center.x) / dx)
    } else {
        None
    };

    let vertical = if dy > 0.0 {
        Some((center.y + half_height - center.y) / dy)
    } else if dy < 0.0 {
        Some((center.y - half_height - center.y) / dy)
    } else {
        None
    };

    let factor = match (horizontal, vertical) {
        (Some(h), Some(v)) => h.min(v),
        (Some(h), None) => h,
        (None, Some(v)) => v,
        (None, None) => return center,
    };

    Point::new(center.x + dx * factor, center.y + dy * factor)
}

/// Returns the midpoint of the segment `a`–`b`.
///
/// Each coordinate is computed as the smaller coordinate plus half of the
/// absolute difference.
pub fn find_line_center(a: Point, b: Point) -> Point {
    let offset_x = (a.x - b.x).abs() / 2.0;
    let offset_y = (a.y - b.y).abs() / 2.0;
    Point::new(a.x.min(b.x) + offset_x, a.y.min(b.y) + offset_y)
}

/// Shortest distance from `point` to the segment `start`–`end`.
///
/// The projection of the point onto the line is clamped to the segment. A
/// zero-length segment degrades to the distance to `start`.
pub fn distance_to_segment(point: Point, start: Point, end: Point) -> f32 {
    let direction = end.sub_point(start);
    let length_squared = direction.dot(direction);
    if length_squared == 0.0 {
        return point.distance(start);
    }

    let t = (point.sub_point(start).dot(direction) / length_squared).clamp(0.0, 1.0);
    let projection = start.add_point(direction.scale(t));
    point.distance(projection)
}

/// Returns the index `i` of the segment `[points[i], points[i + 1]]`
/// closest to `point`.
///
/// Returns 0 when fewer than two points are given. Ties resolve to the
/// earliest segment.
pub fn find_closest_line(points: &[Point], point: Point) -> usize {
    let mut closest = 0;
    let mut min_distance = f32::INFINITY;
    for (index, segment) in points.windows(2).enumerate() {
        let distance = distance_to_segment(point, segment[0], segment[1]);
        if distance < min_distance {
            min_distance = distance;
            closest = index;
        }
    }
    closest
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    fn assert_point_eq(actual: Point, expected: Point) {
        assert!(
            approx_eq!(f32, actual.x(), expected.x(), epsilon = 0.001)
                && approx_eq!(f32, actual.y(), expected.y(), epsilon = 0.001),
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_point_new() {
        let point = Point::new(1.5, -2.0);
        assert_eq!(point.x(), 1.5);
        assert_eq!(point.y(), -2.0);
    }

    #[test]
    fn test_point_distance_and_dot() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.dot(Point::new(1.0, 1.0)), 7.0);
    }

    #[test]
    fn test_bounds_new_from_top_left() {
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(30.0, 40.0));
        assert_eq!(bounds.min_x(), 10.0);
        assert_eq!(bounds.min_y(), 20.0);
        assert_eq!(bounds.max_x(), 40.0);
        assert_eq!(bounds.max_y(), 60.0);
        assert_eq!(bounds.center(), Point::new(25.0, 40.0));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        assert!(bounds.contains(Point::new(5.0, 5.0)));
        assert!(bounds.contains(Point::new(10.0, 0.0)));
        assert!(!bounds.contains(Point::new(10.1, 5.0)));
    }

    #[test]
    fn test_rectangle_intersection_contained_target() {
        let center = Point::new(50.0, 50.0);
        let size = Size::new(100.0, 60.0);
        let result = find_rectangle_line_intersection(center, size, Point::new(70.0, 60.0));
        assert_eq!(result, center);
    }

    #[test]
    fn test_rectangle_intersection_horizontal() {
        let center = Point::new(0.0, 0.0);
        let size = Size::new(100.0, 60.0);

        let right = find_rectangle_line_intersection(center, size, Point::new(1000.0, 0.0));
        assert_point_eq(right, Point::new(50.0, 0.0));

        let left = find_rectangle_line_intersection(center, size, Point::new(-1000.0, 0.0));
        assert_point_eq(left, Point::new(-50.0, 0.0));
    }

    #[test]
    fn test_rectangle_intersection_vertical() {
        let center = Point::new(10.0, 10.0);
        let size = Size::new(100.0, 60.0);

        let below = find_rectangle_line_intersection(center, size, Point::new(10.0, 500.0));
        assert_point_eq(below, Point::new(10.0, 40.0));

        let above = find_rectangle_line_intersection(center, size, Point::new(10.0, -500.0));
        assert_point_eq(above, Point::new(10.0, -20.0));
    }

    #[test]
    fn test_rectangle_intersection_picks_first_edge_hit() {
        // Wide rectangle, diagonal direction: the top/bottom edge is hit first.
        let center = Point::new(0.0, 0.0);
        let size = Size::new(200.0, 20.0);
        let result = find_rectangle_line_intersection(center, size, Point::new(100.0, 100.0));
        assert_point_eq(result, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_rectangle_intersection_degenerate() {
        let center = Point::new(3.0, 4.0);
        let result = find_rectangle_line_intersection(center, Size::default(), center);
        assert_eq!(result, center);
    }

    #[test]
    fn test_find_line_center() {
        assert_eq!(
            find_line_center(Point::new(0.0, 0.0), Point::new(10.0, 20.0)),
            Point::new(5.0, 10.0)
        );
        assert_eq!(
            find_line_center(Point::new(10.0, -20.0), Point::new(-10.0, 20.0)),
            Point::new(0.0, 0.0)
        );
    }

    #[test]
    fn test_distance_to_segment() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(10.0, 0.0);
        assert_eq!(distance_to_segment(Point::new(5.0, 3.0), start, end), 3.0);
        // Projection clamped to the end point.
        assert_eq!(distance_to_segment(Point::new(13.0, 4.0), start, end), 5.0);
        // Zero-length segment.
        assert_eq!(distance_to_segment(Point::new(3.0, 4.0), start, start), 5.0);
    }

    #[test]
    fn test_find_closest_line() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        assert_eq!(find_closest_line(&points, Point::new(50.0, 5.0)), 0);
        assert_eq!(find_closest_line(&points, Point::new(95.0, 50.0)), 1);
        assert_eq!(find_closest_line(&points, Point::new(40.0, 110.0)), 2);
    }

    #[test]
    fn test_find_closest_line_too_few_points() {
        assert_eq!(find_closest_line(&[], Point::new(1.0, 1.0)), 0);
        assert_eq!(find_closest_line(&[Point::new(0.0, 0.0)], Point::new(1.0, 1.0)), 0);
    }
}
