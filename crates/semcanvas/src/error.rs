//! Error types for semcanvas operations.
//!
//! This module provides the main error type [`CanvasError`]. Errors are
//! produced by internal lookups and by the export pipeline; the public
//! action surface of [`DiagramController`](crate::DiagramController) logs
//! them and degrades to a no-op instead of returning them to the owner.

use std::io;

use thiserror::Error;

use semcanvas_core::identifier::Id;

/// The main error type for semcanvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Node `{0}` not found")]
    NodeNotFound(Id),

    #[error("Edge `{0}` not found")]
    EdgeNotFound(Id),

    #[error("Group `{0}` not found")]
    GroupNotFound(Id),

    #[error("Edge `{edge}` has no waypoint at index {index}")]
    WaypointNotFound { edge: Id, index: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for CanvasError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}
