//! Error types for the semcanvas CLI.

use std::io;

use thiserror::Error;

use semcanvas::CanvasError;

use crate::config::ConfigError;

/// Errors reported by [`run`](crate::run).
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The snapshot is not valid JSON or does not match the diagram model.
    /// `offset` is the byte offset in `src` the parser stopped at.
    #[error("Invalid diagram snapshot: {message}")]
    Snapshot {
        message: String,
        src: String,
        offset: usize,
    },

    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

impl CliError {
    /// Wraps a JSON error, keeping the source for diagnostics.
    pub fn snapshot(err: &serde_json::Error, src: &str) -> Self {
        Self::Snapshot {
            message: err.to_string(),
            src: src.to_string(),
            offset: offset_of(src, err.line(), err.column()),
        }
    }
}

/// Converts a one-based line and column into a byte offset, clamped to the
/// end of `src`.
fn offset_of(src: &str, line: usize, column: usize) -> usize {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(src.len())
}
