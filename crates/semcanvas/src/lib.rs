//! Semcanvas - interaction and layout state for conceptual-model diagrams.
//!
//! A headless controller for a class-diagram canvas. The host feeds it
//! content, measured node sizes and pointer gestures; the controller keeps
//! the visual state consistent (selection, highlighting, alignment snaps,
//! waypoints, viewport) and reports what the user asked for through
//! [`DiagramCallbacks`]. Render-ready views and a static SVG export are
//! derived from that state.
//!
//! # Organization
//!
//! - [`DiagramController`] - actions and gestures on one diagram
//! - [`routing`] - edge paths, label positions and waypoint drags
//! - [`alignment`] - snapping a dragged node to other nodes
//! - [`highlight`], [`selection`], [`style`] - highlight levels and the styles they map to
//! - [`viewport`], [`menu`] - viewport math and contextual menus
//! - [`render`], [`export`] - views for drawing and SVG export
//! - [`config`] - application configuration

pub mod alignment;
pub mod config;
pub mod export;
pub mod highlight;
pub mod menu;
pub mod render;
pub mod routing;
pub mod selection;
pub mod style;
pub mod viewport;

mod controller;
mod error;

pub use semcanvas_core::{color, geometry, identifier, model};

pub use controller::{DiagramCallbacks, DiagramController};
pub use error::CanvasError;
