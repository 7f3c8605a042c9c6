//! Interactive HTML page generator.
//!
//! The page carries the server-rendered SVG for first paint plus a JSON
//! scene. A small script redraws the scene whenever the window is resized
//! and handles click-to-select by group. The selection survives redraws.

use crate::adapter::{Diagram, EdgeKind};
use crate::generators::svg::SvgGenerator;
use crate::generators::{escape_xml, Generator};
use crate::swirl::SwirlParameters;
use serde::Serialize;

/// Node as seen by the page script, in unit coordinates.
#[derive(Debug, Clone, Serialize)]
struct SceneNode<'a> {
    name: &'a str,
    group: &'a str,
    goal: bool,
    u: f64,
    v: f64,
    color: String,
}

#[derive(Debug, Clone, Serialize)]
struct SceneEdge<'a> {
    kind: EdgeKind,
    from: [f64; 2],
    to: [f64; 2],
    group: &'a str,
    swirl: SwirlParameters,
    color: String,
}

#[derive(Debug, Clone, Serialize)]
struct Scene<'a> {
    width: f64,
    height: f64,
    node_radius: f64,
    edge_width: f64,
    dim_opacity: f64,
    label_color: &'a str,
    selected: Option<&'a str>,
    groups: Vec<&'a str>,
    nodes: Vec<SceneNode<'a>>,
    edges: Vec<SceneEdge<'a>>,
}

pub struct HtmlGenerator {
    pub title: String,
    pub svg: SvgGenerator,
}

impl HtmlGenerator {
    pub fn new(title: impl Into<String>, svg: SvgGenerator) -> Self {
        Self {
            title: title.into(),
            svg,
        }
    }

    fn scene<'a>(&'a self, diagram: &'a Diagram) -> Scene<'a> {
        let (w, h) = (diagram.width.max(1.0), diagram.height.max(1.0));

        let nodes = diagram
            .nodes
            .iter()
            .map(|n| SceneNode {
                name: &n.name,
                group: &n.group,
                goal: n.is_goal,
                u: n.position.x / w,
                v: n.position.y / h,
                color: SvgGenerator::node_color(n),
            })
            .collect();

        let edges = diagram
            .edges
            .iter()
            .map(|e| SceneEdge {
                kind: e.kind,
                from: [e.from.x / w, e.from.y / h],
                to: [e.to.x / w, e.to.y / h],
                group: &e.group,
                swirl: e.swirl,
                color: SvgGenerator::edge_color(e),
            })
            .collect();

        Scene {
            width: diagram.width,
            height: diagram.height,
            node_radius: self.svg.node_radius,
            edge_width: self.svg.style.edge_width,
            dim_opacity: self.svg.style.dim_opacity,
            label_color: &self.svg.style.label_color,
            selected: self.svg.selection.selected_group(),
            groups: diagram.groups(),
            nodes,
            edges,
        }
    }

    fn scene_json(&self, diagram: &Diagram) -> String {
        serde_json::to_string(&self.scene(diagram))
            .unwrap_or_else(|_| "{}".to_string())
            .replace("</", "<\\/")
    }
}

impl Generator for HtmlGenerator {
    fn name(&self) -> &'static str {
        "html"
    }

    fn generate(&self, diagram: &Diagram) -> String {
        let svg = self.svg.generate(diagram);
        // The XML prolog is not valid inside an HTML body.
        let inline_svg = svg
            .split_once("?>")
            .map(|(_, rest)| rest.trim_start())
            .unwrap_or(&svg);

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
  html, body {{ margin: 0; height: 100%; background: {background}; }}
  #diagram {{ width: 100vw; height: 100vh; }}
  #diagram svg {{ display: block; width: 100%; height: 100%; }}
  #diagram .node {{ cursor: pointer; }}
</style>
</head>
<body>
<div id="diagram">
{inline_svg}
</div>
<script type="application/json" id="scene">{scene}</script>
<script>
{script}
</script>
</body>
</html>
"#,
            title = escape_xml(&self.title),
            background = self.svg.style.background,
            inline_svg = inline_svg,
            scene = self.scene_json(diagram),
            script = SCRIPT,
        )
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}

const SCRIPT: &str = r#"(function () {
  const scene = JSON.parse(document.getElementById("scene").textContent);
  const container = document.getElementById("diagram");
  const NS = "http://www.w3.org/2000/svg";
  let selected = scene.selected;

  function swirlPath(s, t, w) {
    const h = (t.y - s.y) / 2;
    const o = w.direction * w.amplitude * Math.sin(w.frequency * s.y + w.phase);
    return "M" + s.x + "," + s.y + "C" + (s.x + o) + "," + (s.y + h) + "," +
      (t.x - o) + "," + (t.y - h) + "," + t.x + "," + t.y;
  }

  function opacity(group, resting) {
    if (selected === null) return resting;
    return group === selected ? 1 : scene.dim_opacity;
  }

  function el(name, attrs) {
    const e = document.createElementNS(NS, name);
    for (const k in attrs) e.setAttribute(k, attrs[k]);
    return e;
  }

  function render() {
    const width = container.clientWidth || scene.width;
    const height = container.clientHeight || scene.height;
    const at = p => ({ x: p[0] * width, y: p[1] * height });
    const pts = scene.nodes.map(n => at([n.u, n.v]));

    if (selected !== null && !scene.groups.includes(selected)) selected = null;

    const svg = el("svg", { viewBox: "0 0 " + width + " " + height, width: width, height: height });
    const edges = el("g", { class: "edges" });
    scene.edges.forEach(e => {
      const attrs = {
        class: "edge edge-" + e.kind.replace("_", "-"),
        d: swirlPath(at(e.from), at(e.to), e.swirl),
        fill: "none",
        stroke: e.color,
        "stroke-width": scene.edge_width,
        "stroke-linecap": "round",
        opacity: opacity(e.group, 0.75)
      };
      if (e.kind === "cross_link") attrs["stroke-dasharray"] = "6 4";
      edges.appendChild(el("path", attrs));
    });
    svg.appendChild(edges);

    const nodes = el("g", { class: "nodes" });
    scene.nodes.forEach((n, i) => {
      const r = n.goal ? scene.node_radius * 1.6 : scene.node_radius;
      const g = el("g", { class: "node", opacity: opacity(n.group, 1) });
      g.appendChild(el("circle", {
        cx: pts[i].x, cy: pts[i].y, r: r, fill: n.color,
        stroke: scene.label_color, "stroke-width": n.group === selected ? 3 : 1.5
      }));
      const label = el("text", {
        x: pts[i].x, y: pts[i].y - r - 6, fill: scene.label_color,
        "font-family": "sans-serif", "font-size": 12, "text-anchor": "middle"
      });
      label.textContent = n.name;
      g.appendChild(label);
      g.addEventListener("click", () => {
        selected = selected === n.group ? null : n.group;
        render();
      });
      nodes.appendChild(g);
    });
    svg.appendChild(nodes);

    container.replaceChildren(svg);
  }

  window.addEventListener("resize", render);
  render();
})();"#;
