//! Configuration types for the semcanvas diagram controller.
//!
//! This module provides configuration structures that control interaction
//! thresholds, export geometry and highlight styling. All types implement
//! [`serde::Deserialize`] for flexible loading from external sources, and
//! every field falls back to a default when omitted.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`CanvasConfig`] - Snapping, routing and viewport behavior on the interactive canvas.
//! - [`ExportConfig`] - Fixed canvas size and fit parameters of the static SVG export.
//! - [`StyleConfig`] - Colors and opacity used for highlighting and export.
//!
//! # Example
//!
//! ```
//! # use semcanvas::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.export().width(), 800.0);
//! ```

use serde::Deserialize;

use semcanvas_core::{color::Color, geometry::Size};

use crate::CanvasError;

/// Top-level configuration combining canvas, export and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Canvas interaction section.
    #[serde(default)]
    canvas: CanvasConfig,

    /// Static export section.
    #[serde(default)]
    export: ExportConfig,

    /// Style section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(canvas: CanvasConfig, export: ExportConfig, style: StyleConfig) -> Self {
        Self {
            canvas,
            export,
            style,
        }
    }

    /// Returns the canvas configuration.
    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    /// Returns the export configuration.
    pub fn export(&self) -> &ExportConfig {
        &self.export
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Checks the configuration for values the controller cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Config`] for non-positive grids, sizes or
    /// zoom bounds, inverted zoom ranges, negative paddings and opacities
    /// outside `0.0..=1.0`.
    pub fn validate(&self) -> Result<(), CanvasError> {
        let canvas = &self.canvas;
        if canvas.snap_grid <= 0.0 {
            return Err(CanvasError::Config(format!(
                "canvas.snap_grid must be positive, got {}",
                canvas.snap_grid
            )));
        }
        if canvas.helper_line_margin < 0.0 || canvas.border_inflation < 0.0 {
            return Err(CanvasError::Config(
                "canvas.helper_line_margin and canvas.border_inflation must not be negative"
                    .to_string(),
            ));
        }
        if canvas.default_node_size.width() <= 0.0 || canvas.default_node_size.height() <= 0.0 {
            return Err(CanvasError::Config(
                "canvas.default_node_size must have a positive width and height".to_string(),
            ));
        }
        validate_zoom_range("canvas", canvas.fit_min_zoom, canvas.fit_max_zoom)?;
        validate_padding("canvas.fit_padding", canvas.fit_padding)?;
        if canvas.center_zoom <= 0.0 {
            return Err(CanvasError::Config(
                "canvas.center_zoom must be positive".to_string(),
            ));
        }

        let export = &self.export;
        if export.width <= 0.0 || export.height <= 0.0 {
            return Err(CanvasError::Config(format!(
                "export canvas must have a positive size, got {}x{}",
                export.width, export.height
            )));
        }
        validate_zoom_range("export", export.min_zoom, export.max_zoom)?;
        validate_padding("export.padding", export.padding)?;

        if !(0.0..=1.0).contains(&self.style.dimmed_opacity) {
            return Err(CanvasError::Config(format!(
                "style.dimmed_opacity must be within 0..=1, got {}",
                self.style.dimmed_opacity
            )));
        }

        Ok(())
    }
}

fn validate_zoom_range(section: &str, min_zoom: f32, max_zoom: f32) -> Result<(), CanvasError> {
    if min_zoom <= 0.0 || min_zoom > max_zoom {
        return Err(CanvasError::Config(format!(
            "{section} zoom range {min_zoom}..{max_zoom} is invalid"
        )));
    }
    Ok(())
}

fn validate_padding(key: &str, padding: f32) -> Result<(), CanvasError> {
    if padding < 0.0 {
        return Err(CanvasError::Config(format!(
            "{key} must not be negative, got {padding}"
        )));
    }
    Ok(())
}

/// Interaction settings of the interactive canvas.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Grid the host snaps dragged nodes to; also the alignment tolerance.
    snap_grid: f32,

    /// Extra length added to both ends of alignment helper lines.
    helper_line_margin: f32,

    /// Inflation of node rectangles when computing edge end points.
    border_inflation: f32,

    /// Size assumed for nodes the host has not measured yet.
    default_node_size: Size,

    fit_padding: f32,
    fit_min_zoom: f32,
    fit_max_zoom: f32,

    /// Zoom used when centering the viewport on a node.
    center_zoom: f32,

    /// Duration of the centering animation, in milliseconds.
    center_duration_ms: u32,

    /// Whether a click on a waypoint (press and release without movement) deletes it.
    delete_waypoint_on_click: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            snap_grid: 5.0,
            helper_line_margin: 50.0,
            border_inflation: 4.0,
            default_node_size: Size::new(200.0, 80.0),
            fit_padding: 0.1,
            fit_min_zoom: 0.1,
            fit_max_zoom: 2.0,
            center_zoom: 1.0,
            center_duration_ms: 1000,
            delete_waypoint_on_click: true,
        }
    }
}

impl CanvasConfig {
    pub fn snap_grid(&self) -> f32 {
        self.snap_grid
    }

    pub fn helper_line_margin(&self) -> f32 {
        self.helper_line_margin
    }

    pub fn border_inflation(&self) -> f32 {
        self.border_inflation
    }

    pub fn default_node_size(&self) -> Size {
        self.default_node_size
    }

    pub fn fit_padding(&self) -> f32 {
        self.fit_padding
    }

    /// Returns the `(min, max)` zoom allowed by fit-to-view.
    pub fn fit_zoom_range(&self) -> (f32, f32) {
        (self.fit_min_zoom, self.fit_max_zoom)
    }

    pub fn center_zoom(&self) -> f32 {
        self.center_zoom
    }

    pub fn center_duration_ms(&self) -> u32 {
        self.center_duration_ms
    }

    pub fn delete_waypoint_on_click(&self) -> bool {
        self.delete_waypoint_on_click
    }

    /// Sets the snap grid (builder style).
    pub fn with_snap_grid(mut self, snap_grid: f32) -> Self {
        self.snap_grid = snap_grid;
        self
    }

    /// Enables or disables click-to-delete on waypoints (builder style).
    pub fn with_delete_waypoint_on_click(mut self, enabled: bool) -> Self {
        self.delete_waypoint_on_click = enabled;
        self
    }
}

/// Settings of the static SVG export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    width: f32,
    height: f32,
    min_zoom: f32,
    max_zoom: f32,
    /// Margin around the content as a fraction of the content size.
    padding: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 550.0,
            min_zoom: 0.01,
            max_zoom: 2.0,
            padding: 0.065,
        }
    }
}

impl ExportConfig {
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }
}

/// Visual styling configuration for highlighting and export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Background [`Color`] of exported diagrams, as a color string.
    background_color: Option<String>,

    /// Outline/stroke color of selected and level-0 entities.
    primary_color: Color,

    /// Outline/stroke color of one-hop neighbours.
    secondary_color: Color,

    /// Opacity of entities outside an active exploration highlight.
    dimmed_opacity: f32,

    font_family: String,
    font_size: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            primary_color: Color::new("#f59e0b").expect("'#f59e0b' is a valid CSS color"),
            secondary_color: Color::new("#fcd34d").expect("'#fcd34d' is a valid CSS color"),
            dimmed_opacity: 0.3,
            font_family: "Arial".to_string(),
            font_size: 14.0,
        }
    }
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    pub fn primary_color(&self) -> Color {
        self.primary_color
    }

    pub fn secondary_color(&self) -> Color {
        self.secondary_color
    }

    pub fn dimmed_opacity(&self) -> f32 {
        self.dimmed_opacity
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }
}
