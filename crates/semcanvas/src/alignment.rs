//! Alignment snapping during single-node drags.
//!
//! When a drag starts, the positions of every other node are captured and
//! sorted per axis. Each position change of the dragged node is then
//! looked up in those snapshots with a binary search; when the node lines up
//! with another node on an axis it snaps to that node's coordinate and a
//! helper line is exposed for the host to draw.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──start_drag──► Armed ──apply (0..n snaps)──► Armed ──finish_drag──► Idle
//! ```
//!
//! Per-axis state is independent, so a node can align horizontally with one
//! node and vertically with another at the same time.

use log::{debug, trace};

use semcanvas_core::{
    geometry::{Point, Size},
    identifier::Id,
};

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// A guide line drawn while a node is aligned with another one.
///
/// Lines for an `X` snap are vertical (extending downward from `start`),
/// lines for a `Y` snap are horizontal (extending rightward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelperLine {
    pub start: Point,
    pub length: f32,
}

/// Helper lines currently shown, one slot per orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HelperLines {
    pub vertical: Option<HelperLine>,
    pub horizontal: Option<HelperLine>,
}

/// Requested position of one node during a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionChange {
    pub node: Id,
    pub position: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Snap {
    value: f32,
    node: Id,
}

#[derive(Debug, Default)]
struct AxisState {
    /// Other nodes' coordinates on this axis, ascending.
    sorted: Vec<(f32, Id)>,
    snap: Option<Snap>,
}

impl AxisState {
    fn new(mut sorted: Vec<(f32, Id)>) -> Self {
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { sorted, snap: None }
    }

    fn range(&self) -> Option<(f32, f32)> {
        let first = self.sorted.first()?;
        let last = self.sorted.last()?;
        Some((first.0, last.0))
    }

    /// Resolves the coordinate for `raw`; returns it together with whether
    /// the snap target changed.
    fn align(&mut self, raw: f32, grid: f32) -> (f32, bool) {
        if let Some(snap) = self.snap {
            if (raw - snap.value).abs() < grid {
                return (snap.value, false);
            }
        }

        let quantized = quantize(raw, grid);
        let found = self
            .sorted
            .binary_search_by(|(value, _)| quantize(*value, grid).total_cmp(&quantized));

        match found {
            Ok(index) => {
                let (value, node) = self.sorted[index];
                let snap = Snap { value, node };
                let changed = self.snap != Some(snap);
                self.snap = Some(snap);
                (value, changed)
            }
            Err(_) => (raw, self.snap.take().is_some()),
        }
    }
}

/// Rounds `value` to the nearest multiple of `grid`.
fn quantize(value: f32, grid: f32) -> f32 {
    let quantized = (value / grid).round() * grid;
    // -0.0 and 0.0 must compare equal under total_cmp
    if quantized == 0.0 { 0.0 } else { quantized }
}

#[derive(Debug)]
struct DragSnapshot {
    node: Id,
    size: Size,
    x: AxisState,
    y: AxisState,
    vertical: Option<HelperLine>,
    horizontal: Option<HelperLine>,
}

/// Tracks alignment of the node being dragged against a snapshot of all
/// other nodes.
#[derive(Debug)]
pub struct AlignmentController {
    snap_grid: f32,
    helper_line_margin: f32,
    drag: Option<DragSnapshot>,
}

impl AlignmentController {
    pub fn new(snap_grid: f32, helper_line_margin: f32) -> Self {
        Self {
            snap_grid,
            helper_line_margin,
            drag: None,
        }
    }

    /// Checks whether a drag is being tracked.
    pub fn is_armed(&self) -> bool {
        self.drag.is_some()
    }

    /// Captures the positions of all other nodes for a drag of `node`.
    ///
    /// `size` is the dragged node's size and is used to keep helper lines
    /// long enough to reach it.
    pub fn start_drag(
        &mut self,
        node: Id,
        size: Size,
        others: impl IntoIterator<Item = (Id, Point)>,
    ) {
        let (xs, ys): (Vec<_>, Vec<_>) = others
            .into_iter()
            .filter(|(id, _)| *id != node)
            .map(|(id, position)| ((position.x(), id), (position.y(), id)))
            .unzip();
        debug!(node_id:% = node, others = xs.len(); "Alignment armed");

        self.drag = Some(DragSnapshot {
            node,
            size,
            x: AxisState::new(xs),
            y: AxisState::new(ys),
            vertical: None,
            horizontal: None,
        });
    }

    /// Aligns a batch of position changes in place.
    ///
    /// Only a change set consisting of exactly the armed node is processed;
    /// anything else passes through untouched.
    pub fn apply(&mut self, changes: &mut [PositionChange]) {
        let [change] = changes else {
            return;
        };
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if change.node != drag.node {
            return;
        }

        let raw = change.position;
        let (x, x_changed) = drag.x.align(raw.x(), self.snap_grid);
        let (y, y_changed) = drag.y.align(raw.y(), self.snap_grid);
        let aligned = Point::new(x, y);

        if x_changed {
            drag.vertical = drag.x.snap.and_then(|snap| {
                helper_line(
                    Axis::X,
                    snap.value,
                    drag.y.range(),
                    (aligned.y(), aligned.y() + drag.size.height()),
                    self.helper_line_margin,
                )
            });
        }
        if y_changed {
            drag.horizontal = drag.y.snap.and_then(|snap| {
                helper_line(
                    Axis::Y,
                    snap.value,
                    drag.x.range(),
                    (aligned.x(), aligned.x() + drag.size.width()),
                    self.helper_line_margin,
                )
            });
        }

        if x_changed || y_changed {
            trace!(node_id:% = drag.node, raw:?, aligned:?; "Alignment changed");
        }
        change.position = aligned;
    }

    /// Ends the drag, returning the final position of the dragged node.
    ///
    /// Each axis uses the last snapped coordinate, falling back to
    /// `current`. Returns `None` when no drag was armed.
    pub fn finish_drag(&mut self, current: Point) -> Option<Point> {
        let drag = self.drag.take()?;
        let x = drag.x.snap.map_or(current.x(), |snap| snap.value);
        let y = drag.y.snap.map_or(current.y(), |snap| snap.value);
        debug!(node_id:% = drag.node, x = x, y = y; "Alignment finished");
        Some(Point::new(x, y))
    }

    /// Drops all alignment state.
    pub fn reset(&mut self) {
        self.drag = None;
    }

    /// Helper lines to draw for the current drag.
    pub fn helper_lines(&self) -> HelperLines {
        self.drag
            .as_ref()
            .map(|drag| HelperLines {
                vertical: drag.vertical,
                horizontal: drag.horizontal,
            })
            .unwrap_or_default()
    }

    /// Node the dragged node is currently aligned with on `axis`.
    pub fn aligned_with(&self, axis: Axis) -> Option<Id> {
        let drag = self.drag.as_ref()?;
        let state = match axis {
            Axis::X => &drag.x,
            Axis::Y => &drag.y,
        };
        state.snap.map(|snap| snap.node)
    }
}

/// Builds the guide line for a snap at `value` on `axis`.
///
/// The line spans the other nodes' coordinates on the perpendicular axis,
/// grown to cover the dragged node's extent and then by `margin` on both ends.
fn helper_line(
    axis: Axis,
    value: f32,
    others: Option<(f32, f32)>,
    dragged: (f32, f32),
    margin: f32,
) -> Option<HelperLine> {
    let (min, max) = others?;
    let min = min.min(dragged.0) - margin;
    let max = max.max(dragged.1) + margin;
    let start = match axis {
        Axis::X => Point::new(value, min),
        Axis::Y => Point::new(min, value),
    };
    Some(HelperLine {
        start,
        length: max - min,
    })
}
