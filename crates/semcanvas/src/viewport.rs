//! Viewport math: pan/zoom state and fitting content into a canvas.
//!
//! A [`Viewport`] maps canvas coordinates to screen coordinates as
//! `screen = canvas * zoom + (x, y)`.

use semcanvas_core::{
    geometry::{Bounds, Point, Size},
    model::ViewportDimensions,
};

/// Pan offset and zoom factor of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(x: f32, y: f32, zoom: f32) -> Self {
        Self { x, y, zoom }
    }

    /// Visible area in canvas coordinates for a screen of `canvas` size.
    ///
    /// Offsets and sizes are divided by the zoom factor.
    ///
    /// # Examples
    ///
    /// ```
    /// # use semcanvas::viewport::Viewport;
    /// # use semcanvas_core::geometry::{Point, Size};
    /// let viewport = Viewport::new(-100.0, -50.0, 2.0);
    /// let visible = viewport.dimensions(Size::new(800.0, 600.0));
    /// assert_eq!(visible.position, Point::new(50.0, 25.0));
    /// assert_eq!(visible.width, 400.0);
    /// assert_eq!(visible.height, 300.0);
    /// ```
    pub fn dimensions(&self, canvas: Size) -> ViewportDimensions {
        ViewportDimensions {
            position: Point::new(-self.x / self.zoom, -self.y / self.zoom),
            width: canvas.width() / self.zoom,
            height: canvas.height() / self.zoom,
        }
    }

    /// Viewport that places canvas point `position` at the top-left corner,
    /// keeping the current zoom.
    pub fn with_top_left(&self, position: Point) -> Self {
        Self {
            x: -position.x() * self.zoom,
            y: -position.y() * self.zoom,
            zoom: self.zoom,
        }
    }

    /// Viewport that shows canvas point `center` in the middle of a screen of
    /// `canvas` size at `zoom`.
    pub fn centered_on(center: Point, zoom: f32, canvas: Size) -> Self {
        Self {
            x: canvas.width() / 2.0 - center.x() * zoom,
            y: canvas.height() / 2.0 - center.y() * zoom,
            zoom,
        }
    }

    /// Viewport fitting `bounds` into a `width` × `height` screen.
    ///
    /// `padding` is a fraction of the content size added around it. The zoom
    /// is clamped to `min_zoom..=max_zoom`, and the content is centered.
    pub fn for_bounds(
        bounds: Bounds,
        width: f32,
        height: f32,
        min_zoom: f32,
        max_zoom: f32,
        padding: f32,
    ) -> Self {
        let x_zoom = width / (bounds.width() * (1.0 + padding));
        let y_zoom = height / (bounds.height() * (1.0 + padding));
        // Degenerate bounds give infinite zoom, which the clamp turns into max_zoom.
        let zoom = x_zoom.min(y_zoom).clamp(min_zoom, max_zoom);
        Self::centered_on(bounds.center(), zoom, Size::new(width, height))
    }

    /// Converts a screen point to canvas coordinates.
    pub fn to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x() - self.x) / self.zoom,
            (screen.y() - self.y) / self.zoom,
        )
    }

    /// SVG transform applying this viewport.
    pub fn to_transform(&self) -> String {
        format!("translate({}, {}) scale({})", self.x, self.y, self.zoom)
    }
}

/// Animated viewport change the host should play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportAnimation {
    pub target: Viewport,
    pub duration_ms: u32,
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_dimensions_divide_by_zoom() {
        let viewport = Viewport::new(40.0, -20.0, 0.5);
        let visible = viewport.dimensions(Size::new(800.0, 550.0));
        assert_eq!(visible.position, Point::new(-80.0, 40.0));
        assert_eq!(visible.width, 1600.0);
        assert_eq!(visible.height, 1100.0);
    }

    #[test]
    fn test_for_bounds_centers_and_clamps() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(400.0, 100.0));
        let viewport = Viewport::for_bounds(bounds, 800.0, 550.0, 0.01, 2.0, 0.0);
        assert!(approx_eq!(f32, viewport.zoom, 2.0));
        assert!(approx_eq!(f32, viewport.x, 0.0));
        assert!(approx_eq!(f32, viewport.y, 175.0));

        let big = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(8000.0, 100.0));
        let viewport = Viewport::for_bounds(big, 800.0, 550.0, 0.01, 2.0, 0.0);
        assert!(approx_eq!(f32, viewport.zoom, 0.1));
    }

    #[test]
    fn test_for_bounds_degenerate() {
        let point = Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::default());
        let viewport = Viewport::for_bounds(point, 800.0, 550.0, 0.01, 2.0, 0.065);
        assert_eq!(viewport.zoom, 2.0);
        assert_eq!(viewport.x, 380.0);
    }

    #[test]
    fn test_screen_canvas_roundtrip() {
        let viewport = Viewport::new(30.0, 60.0, 1.5);
        let canvas = viewport.to_canvas(Point::new(180.0, 210.0));
        assert_eq!(canvas, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_with_top_left_keeps_zoom() {
        let viewport = Viewport::new(0.0, 0.0, 2.0).with_top_left(Point::new(10.0, 20.0));
        assert_eq!(viewport, Viewport::new(-20.0, -40.0, 2.0));
        assert_eq!(
            viewport.dimensions(Size::new(100.0, 100.0)).position,
            Point::new(10.0, 20.0)
        );
    }
}
