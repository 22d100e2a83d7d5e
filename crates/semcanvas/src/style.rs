//! Mapping highlight levels to visual styles.
//!
//! Highlighting never edits structural data. Instead each node and edge gets
//! a small style value computed from its highlight level by pure functions.

use semcanvas_core::color::Color;

use crate::{config::StyleConfig, highlight::HighlightLevel};

/// Visual adjustment derived from a highlight level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleDelta {
    /// Outline color for nodes; `None` removes the outline.
    pub outline: Option<Color>,
    /// Stroke and marker color for edges; `None` keeps the edge's own color.
    pub edge_color: Option<Color>,
    pub opacity: f32,
}

impl StyleDelta {
    /// The neutral delta: no outline, own edge color, fully opaque.
    pub fn neutral() -> Self {
        Self {
            outline: None,
            edge_color: None,
            opacity: 1.0,
        }
    }

    /// Delta for a selection-driven level. Unrelated entities stay neutral.
    pub fn for_selection(level: Option<HighlightLevel>, style: &StyleConfig) -> Self {
        match level {
            Some(level) => Self::highlighted(level, style),
            None => Self::neutral(),
        }
    }

    /// Delta for an exploration-driven level. Unrelated entities are dimmed.
    pub fn for_exploration(level: Option<HighlightLevel>, style: &StyleConfig) -> Self {
        match level {
            Some(level) => Self::highlighted(level, style),
            None => Self {
                opacity: style.dimmed_opacity(),
                ..Self::neutral()
            },
        }
    }

    fn highlighted(level: HighlightLevel, style: &StyleConfig) -> Self {
        let color = match level {
            HighlightLevel::Primary => style.primary_color(),
            HighlightLevel::Neighbour => style.secondary_color(),
        };
        Self {
            outline: Some(color),
            edge_color: Some(color),
            opacity: 1.0,
        }
    }

    /// Layers `other` on top of this delta. Colors set in `other` win and
    /// opacities multiply.
    pub fn overlay(self, other: Self) -> Self {
        Self {
            outline: other.outline.or(self.outline),
            edge_color: other.edge_color.or(self.edge_color),
            opacity: self.opacity * other.opacity,
        }
    }
}

impl Default for StyleDelta {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Resolved style of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub outline: Option<Color>,
    pub opacity: f32,
}

impl NodeStyle {
    pub fn from_delta(delta: StyleDelta) -> Self {
        Self {
            outline: delta.outline,
            opacity: delta.opacity,
        }
    }
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self::from_delta(StyleDelta::neutral())
    }
}

/// Resolved style of an edge. The marker always matches the stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStyle {
    pub stroke: Color,
    pub opacity: f32,
}

impl EdgeStyle {
    pub fn from_delta(own_color: Color, delta: StyleDelta) -> Self {
        Self {
            stroke: delta.edge_color.unwrap_or(own_color),
            opacity: delta.opacity,
        }
    }
}
