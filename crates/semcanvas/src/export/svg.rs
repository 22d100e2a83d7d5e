//! Static SVG export of a prepared scene.
//!
//! The document has a fixed size taken from [`ExportConfig`]. All content is
//! wrapped in one group whose transform fits the nodes' bounding box into the
//! canvas, the same way fit-to-view does on the interactive canvas.

use indexmap::IndexMap;
use log::{debug, info};
use svg::{self, Document, node::element as svg_element};

use semcanvas_core::{color::Color, geometry::Point};

use super::{Error, Exporter};
use crate::{
    config::{ExportConfig, StyleConfig},
    render::{EdgeEndLabel, EdgeMarker, EdgeView, NodeView, Scene},
    viewport::Viewport,
};

const NODE_PADDING: f32 = 8.0;
const LINE_HEIGHT: f32 = 20.0;

/// Collects the edge markers used by a document so each color/kind pair is
/// defined once.
#[derive(Debug, Default)]
struct MarkerDrawer {
    markers: IndexMap<String, (EdgeMarker, Color)>,
}

impl MarkerDrawer {
    /// Registers a marker and returns its `url(#...)` reference.
    fn register(&mut self, marker: EdgeMarker, color: Color) -> String {
        let id = Self::marker_id(marker, color);
        let reference = format!("url(#{id})");
        self.markers.entry(id).or_insert((marker, color));
        reference
    }

    fn marker_id(marker: EdgeMarker, color: Color) -> String {
        let kind = match marker {
            EdgeMarker::Arrow => "arrow",
            EdgeMarker::Triangle => "triangle",
        };
        format!("marker-{kind}-{}", color.to_id_safe_string())
    }

    fn draw_marker_definitions(&self) -> svg_element::Definitions {
        let mut defs = svg_element::Definitions::new();
        for (id, (marker, color)) in &self.markers {
            let shape = match marker {
                EdgeMarker::Arrow => svg_element::Path::new()
                    .set("d", "M 0 0 L 10 5 L 0 10")
                    .set("fill", "none"),
                EdgeMarker::Triangle => svg_element::Path::new()
                    .set("d", "M 0 0 L 10 5 L 0 10 z")
                    .set("fill", "white"),
            };
            defs = defs.add(
                svg_element::Marker::new()
                    .set("id", id.as_str())
                    .set("viewBox", "0 0 10 10")
                    .set("refX", 10)
                    .set("refY", 5)
                    .set("markerWidth", 10)
                    .set("markerHeight", 10)
                    .set("orient", "auto-start-reverse")
                    .add(
                        shape
                            .set("stroke", *color)
                            .set("stroke-width", 1)
                            .set("stroke-opacity", color.alpha()),
                    ),
            );
        }
        defs
    }
}

/// SVG backend rendering a [`Scene`] to a fixed-size document.
pub struct SvgExporter {
    export: ExportConfig,
    style: StyleConfig,
}

impl SvgExporter {
    pub fn new(export: &ExportConfig, style: &StyleConfig) -> Self {
        Self {
            export: export.clone(),
            style: style.clone(),
        }
    }

    /// Computes the viewport fitting all nodes of `scene` into the document.
    pub fn viewport_for(&self, scene: &Scene) -> Option<Viewport> {
        let bounds = scene.bounds()?;
        Some(Viewport::for_bounds(
            bounds,
            self.export.width(),
            self.export.height(),
            self.export.min_zoom(),
            self.export.max_zoom(),
            self.export.padding(),
        ))
    }

    fn render_document(&self, scene: &Scene) -> Result<Document, Error> {
        let viewport = self
            .viewport_for(scene)
            .ok_or_else(|| Error::Render("scene has no nodes".to_string()))?;
        let width = self.export.width();
        let height = self.export.height();
        debug!(viewport:?; "Export viewport computed");

        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height);

        let background = self.style.background_color().map_err(Error::Render)?;
        if let Some(color) = background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", color),
            );
        }

        let mut markers = MarkerDrawer::default();
        let mut content = svg_element::Group::new().set("transform", viewport.to_transform());

        for edge in &scene.edges {
            content = content.add(self.render_edge(edge, &mut markers));
        }
        for node in &scene.nodes {
            content = content.add(self.render_node(node));
        }

        Ok(doc.add(markers.draw_marker_definitions()).add(content))
    }

    fn text(&self, content: &str, position: Point) -> svg_element::Text {
        svg_element::Text::new(content)
            .set("x", position.x())
            .set("y", position.y())
            .set("font-family", self.style.font_family())
            .set("font-size", self.style.font_size())
    }

    fn render_node(&self, node: &NodeView) -> svg_element::Group {
        let bounds = node.bounds;
        let (stroke, stroke_width) = match node.style.outline {
            Some(outline) => (outline, 3.0),
            None => (Color::default(), 1.0),
        };

        let mut group = svg_element::Group::new()
            .set("id", format!("node-{}", node.identifier))
            .set("opacity", node.style.opacity)
            .add(
                svg_element::Rectangle::new()
                    .set("x", bounds.min_x())
                    .set("y", bounds.min_y())
                    .set("width", bounds.width())
                    .set("height", bounds.height())
                    .set("rx", 4)
                    .set("fill", node.fill)
                    .set("stroke", stroke)
                    .set("stroke-width", stroke_width),
            );

        let left = bounds.min_x() + NODE_PADDING;
        let mut baseline = bounds.min_y() + LINE_HEIGHT;
        group = group.add(
            self.text(&node.label, Point::new(left, baseline))
                .set("font-weight", "bold"),
        );

        if let Some(profile_of) = &node.profile_of {
            baseline += LINE_HEIGHT;
            group = group.add(
                self.text(profile_of, Point::new(left, baseline))
                    .set("font-style", "italic"),
            );
        }

        for item in &node.items {
            baseline += LINE_HEIGHT;
            let label = match &item.profile_of {
                Some(profile_of) => format!("- {} ({profile_of})", item.label),
                None => format!("- {}", item.label),
            };
            group = group.add(self.text(&label, Point::new(left, baseline)));
        }

        group
    }

    fn render_edge(&self, edge: &EdgeView, markers: &mut MarkerDrawer) -> svg_element::Group {
        let color = edge.style.stroke;
        let mut path = svg_element::Path::new()
            .set("d", edge.svg_path.as_str())
            .set("fill", "none")
            .set("stroke", color)
            .set("stroke-width", 1.5)
            .set("marker-end", markers.register(edge.marker, color));
        if edge.dashed {
            path = path.set("stroke-dasharray", "6 4");
        }

        let mut group = svg_element::Group::new()
            .set("id", format!("edge-{}", edge.identifier))
            .set("opacity", edge.style.opacity)
            .add(path);

        if let Some(position) = edge.label_position {
            let label = match &edge.profile_of {
                Some(profile_of) if edge.label.is_empty() => profile_of.clone(),
                Some(profile_of) => format!("{} ({profile_of})", edge.label),
                None => edge.label.clone(),
            };
            if !label.is_empty() {
                group = group.add(
                    self.text(&label, position)
                        .set("text-anchor", "middle")
                        .set("fill", color),
                );
            }
        }

        for EdgeEndLabel { text, position } in [&edge.cardinality_source, &edge.cardinality_target]
            .into_iter()
            .flatten()
        {
            group = group.add(
                self.text(text, *position)
                    .set("text-anchor", "middle")
                    .set("fill", color),
            );
        }

        group
    }
}

impl Exporter for SvgExporter {
    fn export_scene(&mut self, scene: &Scene) -> Result<String, Error> {
        info!(nodes = scene.nodes.len(), edges = scene.edges.len(); "Exporting scene to SVG");
        let doc = self.render_document(scene)?;
        debug!("SVG document rendered");
        Ok(doc.to_string())
    }
}

#[cfg(test)]
mod tests {
    use semcanvas_core::{
        geometry::Size,
        model::{Edge, EdgeType, Node, Position},
    };

    use super::*;
    use crate::{
        routing::NodeFrame,
        style::{EdgeStyle, NodeStyle, StyleDelta},
    };

    fn scene() -> Scene {
        let size = Size::new(100.0, 50.0);
        let a = Node::new("svg-a", "sem-svg-a", "Alpha", Position::new(0.0, 0.0));
        let b = Node::new("svg-b", "sem-svg-b", "Beta & Co", Position::new(200.0, 0.0));
        let mut edge = Edge::new(EdgeType::ClassProfile, "svg-ab", "sem-svg-ab", "svg-a", "svg-b");
        edge.label = "knows".to_string();

        Scene {
            nodes: vec![
                NodeView::new(&a, Some(size), size, NodeStyle::default()),
                NodeView::new(&b, Some(size), size, NodeStyle::default()),
            ],
            edges: vec![EdgeView::new(
                &edge,
                NodeFrame::new(a.position.point(), Some(size)),
                NodeFrame::new(b.position.point(), Some(size)),
                4.0,
                EdgeStyle::from_delta(edge.color, StyleDelta::neutral()),
            )],
        }
    }

    #[test]
    fn test_export_contains_nodes_edges_and_markers() {
        let config = crate::config::AppConfig::default();
        let mut exporter = SvgExporter::new(config.export(), config.style());

        let svg = exporter.export_scene(&scene()).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("viewBox=\"0 0 800 550\""));
        assert!(svg.contains("id=\"node-svg-a\""));
        assert!(svg.contains("id=\"node-svg-b\""));
        assert!(svg.contains("id=\"edge-svg-ab\""));
        assert!(svg.contains("stroke-dasharray"));
        assert!(svg.contains("marker-arrow-"));
        assert!(svg.contains("Alpha"));
        assert!(svg.contains("knows"));
        assert!(svg.contains("translate("));
    }

    #[test]
    fn test_export_empty_scene_fails() {
        let config = crate::config::AppConfig::default();
        let mut exporter = SvgExporter::new(config.export(), config.style());
        let err = exporter.export_scene(&Scene::default()).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn test_viewport_fits_content() {
        let config = crate::config::AppConfig::default();
        let exporter = SvgExporter::new(config.export(), config.style());
        let viewport = exporter.viewport_for(&scene()).unwrap();

        // Content is 300x50, small enough to hit the maximum zoom.
        assert_eq!(viewport.zoom, 2.0);
        assert!((viewport.x - 100.0).abs() < 1e-3);
        assert!((viewport.y - 225.0).abs() < 1e-3);
    }

    #[test]
    fn test_marker_registered_once_per_color() {
        let mut markers = MarkerDrawer::default();
        let black = Color::default();
        let first = markers.register(EdgeMarker::Arrow, black);
        let second = markers.register(EdgeMarker::Arrow, black);
        markers.register(EdgeMarker::Triangle, black);
        assert_eq!(first, second);
        assert_eq!(markers.markers.len(), 2);
    }
}
