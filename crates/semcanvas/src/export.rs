//! Export functionality for semcanvas diagrams.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! converting a prepared [`Scene`] into an output format.
//!
//! # Pipeline Position
//!
//! ```text
//! Nodes / Edges / Selection / Highlight
//!     ↓ render
//! Scene (NodeView + EdgeView)
//!     ↓ export (this module)
//! Output document
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] - static SVG output via [`svg::SvgExporter`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`]. [`Error`] converts into
//! [`CanvasError::Export`] at the crate boundary.
//!
//! [`CanvasError::Export`]: crate::CanvasError::Export

/// SVG export backend.
pub mod svg;

use crate::render::Scene;

/// Abstraction for diagram export backends.
pub trait Exporter {
    /// Exports a scene, returning the serialized document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the scene cannot be converted to the
    /// target format, for example because it is empty.
    fn export_scene(&mut self, scene: &Scene) -> Result<String, Error>;
}

/// Errors that can occur during diagram export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
