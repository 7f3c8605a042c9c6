//! SVG diagram generator.
//!
//! Draws every edge as its swirl curve and every node as a glowing circle
//! with a label. Colors come from the node's group:
//! - Each group gets a stable hue hashed from its key
//! - Edges take the color of their source node's group
//! - The goal node is drawn in a warm accent with a ring
//! - With a selection active, everything outside the group is dimmed

use crate::adapter::{Diagram, DiagramEdge, DiagramNode, EdgeKind};
use crate::config::StyleConfig;
use crate::generators::{escape_xml, Generator};
use crate::selection::Selection;
use crate::swirl::fmt_coord;
use sha2::{Digest, Sha256};

/// HSL helpers and fixed hues.
pub(crate) mod palette {
    /// Warm accent hue used for the goal node (amber).
    pub const HUE_GOAL: f64 = 35.0;

    /// Convert HSL to hex color string
    pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
        // Normalize hue to 0-360
        let h = ((h % 360.0) + 360.0) % 360.0;

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = if h < 60.0 {
            (c, x, 0.0)
        } else if h < 120.0 {
            (x, c, 0.0)
        } else if h < 180.0 {
            (0.0, c, x)
        } else if h < 240.0 {
            (0.0, x, c)
        } else if h < 300.0 {
            (x, 0.0, c)
        } else {
            (c, 0.0, x)
        };

        let r = ((r + m) * 255.0).round() as u8;
        let g = ((g + m) * 255.0).round() as u8;
        let b = ((b + m) * 255.0).round() as u8;

        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

pub struct SvgGenerator {
    pub style: StyleConfig,
    pub node_radius: f64,
    pub selection: Selection,
}

impl Default for SvgGenerator {
    fn default() -> Self {
        Self {
            style: StyleConfig::default(),
            node_radius: 10.0,
            selection: Selection::none(),
        }
    }
}

impl SvgGenerator {
    pub fn new(style: StyleConfig, node_radius: f64) -> Self {
        Self {
            style,
            node_radius,
            selection: Selection::none(),
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Hash a string to a deterministic float in [0, 1).
    fn hash_to_float(s: &str) -> f64 {
        let mut hasher = Sha256::new();
        hasher.update(s.as_bytes());
        let hash = hasher.finalize();
        let val = u32::from_le_bytes([hash[0], hash[1], hash[2], hash[3]]);
        val as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Stable hue for a grouping key.
    pub fn group_hue(group: &str) -> f64 {
        Self::hash_to_float(group) * 360.0
    }

    pub fn node_color(node: &DiagramNode) -> String {
        if node.is_goal {
            palette::hsl_to_hex(palette::HUE_GOAL, 0.9, 0.6)
        } else {
            palette::hsl_to_hex(Self::group_hue(&node.group), 0.65, 0.6)
        }
    }

    pub fn edge_color(edge: &DiagramEdge) -> String {
        palette::hsl_to_hex(Self::group_hue(&edge.group), 0.55, 0.55)
    }

    fn opacity(&self, selected: bool, resting: f64) -> f64 {
        if !self.selection.is_active() {
            resting
        } else if selected {
            1.0
        } else {
            self.style.dim_opacity
        }
    }

    fn draw_edges(&self, diagram: &Diagram) -> Vec<String> {
        diagram
            .edges
            .iter()
            .map(|edge| {
                let selected = self.selection.contains_edge(edge);
                let class = if selected {
                    format!("edge edge-{} selected", edge.kind.as_str())
                } else {
                    format!("edge edge-{}", edge.kind.as_str())
                };
                // Cross-links are dashed so they read apart from the tree.
                let dash = match edge.kind {
                    EdgeKind::CrossLink => r#" stroke-dasharray="6 4""#,
                    _ => "",
                };
                format!(
                    r#"<path class="{}" d="{}" data-group="{}" data-source="{}" data-target="{}" fill="none" stroke="{}" stroke-width="{}" opacity="{:.2}" stroke-linecap="round"{}/>"#,
                    class,
                    edge.curve().path_data(),
                    escape_xml(&edge.group),
                    escape_xml(&edge.source),
                    escape_xml(&edge.target),
                    Self::edge_color(edge),
                    fmt_coord(self.style.edge_width),
                    self.opacity(selected, 0.75),
                    dash
                )
            })
            .collect()
    }

    fn draw_nodes(&self, diagram: &Diagram) -> Vec<String> {
        diagram
            .nodes
            .iter()
            .map(|node| {
                let selected = self.selection.contains_node(node);
                let color = Self::node_color(node);
                let (x, y) = (fmt_coord(node.position.x), fmt_coord(node.position.y));
                let radius = if node.is_goal {
                    self.node_radius * 1.6
                } else {
                    self.node_radius
                };

                let mut parts = Vec::new();
                parts.push(format!(
                    r#"<g class="node{}" data-node="{}" data-group="{}" opacity="{:.2}">"#,
                    if selected { " selected" } else { "" },
                    escape_xml(&node.name),
                    escape_xml(&node.group),
                    self.opacity(selected, 1.0)
                ));
                if node.is_goal {
                    parts.push(format!(
                        r#"  <circle cx="{}" cy="{}" r="{}" fill="none" stroke="{}" stroke-width="1.5" opacity="0.6"/>"#,
                        x,
                        y,
                        fmt_coord(radius * 1.5),
                        color
                    ));
                }
                let stroke_width = if selected { 3.0 } else { 1.5 };
                parts.push(format!(
                    r#"  <circle cx="{}" cy="{}" r="{}" fill="{}" stroke="{}" stroke-width="{}" filter="url(#softGlow)"/>"#,
                    x,
                    y,
                    fmt_coord(radius),
                    color,
                    self.style.label_color,
                    fmt_coord(stroke_width)
                ));
                parts.push(format!(
                    r#"  <text x="{}" y="{}" fill="{}" font-family="sans-serif" font-size="12" text-anchor="middle">{}</text>"#,
                    x,
                    fmt_coord(node.position.y - radius - 6.0),
                    self.style.label_color,
                    escape_xml(&node.name)
                ));
                parts.push("</g>".to_string());
                parts.join("\n")
            })
            .collect()
    }

    /// Generate SVG filter definitions for glow effects.
    fn generate_defs(&self) -> String {
        let blur_std = (self.node_radius * 0.35).max(1.0);
        format!(
            r#"<defs>
  <filter id="softGlow" x="-100%" y="-100%" width="300%" height="300%">
    <feGaussianBlur in="SourceGraphic" stdDeviation="{:.1}" result="blur"/>
    <feMerge>
      <feMergeNode in="blur"/>
      <feMergeNode in="SourceGraphic"/>
    </feMerge>
  </filter>
</defs>"#,
            blur_std
        )
    }

    /// Just the drawable content: edges under nodes.
    pub fn content(&self, diagram: &Diagram) -> String {
        format!(
            "<g class=\"edges\">\n{}\n</g>\n<g class=\"nodes\">\n{}\n</g>",
            self.draw_edges(diagram).join("\n"),
            self.draw_nodes(diagram).join("\n")
        )
    }

    fn wrap_svg(&self, diagram: &Diagram, defs: &str, content: &str) -> String {
        let (w, h) = (fmt_coord(diagram.width), fmt_coord(diagram.height));
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">
  {}
  <!-- Background -->
  <rect width="100%" height="100%" fill="{}"/>
  <!-- Diagram content -->
  {}
</svg>"#,
            w, h, w, h, defs, self.style.background, content
        )
    }
}

impl Generator for SvgGenerator {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn generate(&self, diagram: &Diagram) -> String {
        let defs = self.generate_defs();
        let content = self.content(diagram);
        self.wrap_svg(diagram, &defs, &content)
    }

    fn extension(&self) -> &'static str {
        "svg"
    }
}
