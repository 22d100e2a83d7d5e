//! Error adapter for converting CliError to miette diagnostics.
//!
//! This module provides the bridge between the CLI's error type and miette's
//! rich diagnostic formatting. Snapshot errors carry the JSON source and are
//! rendered with a labeled snippet; everything else is reported as a plain
//! error with a code.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use semcanvas::CanvasError;

use crate::error::CliError;

/// Adapter for a [`CliError::Snapshot`] error.
pub struct SnapshotAdapter<'a> {
    message: &'a str,
    /// Source code for displaying snippets
    src: &'a str,
    offset: usize,
}

impl<'a> SnapshotAdapter<'a> {
    /// Create a new snapshot adapter.
    pub fn new(message: &'a str, src: &'a str, offset: usize) -> Self {
        Self {
            message,
            src,
            offset,
        }
    }

    fn span(&self) -> SourceSpan {
        let len = usize::from(self.offset < self.src.len());
        SourceSpan::new(self.offset.into(), len)
    }
}

impl fmt::Debug for SnapshotAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotAdapter")
            .field("message", &self.message)
            .field("offset", &self.offset)
            .finish()
    }
}

impl fmt::Display for SnapshotAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid diagram snapshot: {}", self.message)
    }
}

impl std::error::Error for SnapshotAdapter<'_> {}

impl MietteDiagnostic for SnapshotAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("semcanvas::snapshot"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(
            "a snapshot is a JSON object with optional `nodes`, `edges`, `groups` and `dimensions` fields",
        ))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some("here".to_string()),
            self.span(),
        ))))
    }
}

/// Adapter for [`CliError`] variants without source information.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CliError::Io(_) | CliError::Canvas(CanvasError::Io(_)) => "semcanvas::io",
            CliError::Config(_) | CliError::Canvas(CanvasError::Config(_)) => "semcanvas::config",
            CliError::Snapshot { .. } => return None,
            CliError::Canvas(CanvasError::Export(_)) => "semcanvas::export",
            CliError::Canvas(_) => "semcanvas::canvas",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            CliError::Config(_) => Some(Box::new(
                "pass a valid file with --config or remove semcanvas/config.toml",
            )),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a snapshot diagnostic or a non-diagnostic error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A snapshot problem with source location information.
    Snapshot(SnapshotAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Snapshot(s) => fmt::Display::fmt(s, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Snapshot(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Snapshot(s) => s.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Snapshot(s) => s.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Snapshot(s) => s.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Snapshot(s) => s.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`CliError`] into a list of reportable errors.
pub fn to_reportables(err: &CliError) -> Vec<Reportable<'_>> {
    match err {
        CliError::Snapshot {
            message,
            src,
            offset,
        } => vec![Reportable::Snapshot(SnapshotAdapter::new(
            message, src, *offset,
        ))],
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
