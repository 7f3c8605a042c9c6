//! Layout adapter.
//!
//! Turns a computed tree layout into the drawable diagram: applies node
//! offsets, attaches swirl parameters to tree edges, resolves named
//! cross-links and connects flagged nodes to the goal node.

use crate::config::LayoutConfig;
use crate::layout::{Area, TreeLayout};
use crate::swirl::{Point, SwirlCurve, SwirlParameters};
use crate::tree::TreeData;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// A problem found while wiring the diagram. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkIssue {
    #[error("link on '{owner}' references unknown fromNode '{name}'")]
    UnresolvedFrom { owner: String, name: String },

    #[error("link on '{owner}' references unknown toNode '{name}'")]
    UnresolvedTo { owner: String, name: String },

    #[error("node name '{name}' is used more than once; links resolve to the first")]
    DuplicateName { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Tree,
    CrossLink,
    Goal,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Tree => "tree",
            EdgeKind::CrossLink => "cross-link",
            EdgeKind::Goal => "goal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramNode {
    pub name: String,
    pub group: String,
    pub depth: u32,
    pub position: Point,
    pub is_goal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramEdge {
    pub kind: EdgeKind,
    pub source: String,
    pub target: String,
    /// Group of the source node; edges are selected with it.
    pub group: String,
    pub from: Point,
    pub to: Point,
    pub swirl: SwirlParameters,
}

impl DiagramEdge {
    pub fn curve(&self) -> SwirlCurve {
        SwirlCurve::new(self.from, self.to, &self.swirl)
    }
}

/// Everything the generators need to draw.
#[derive(Debug, Clone, Serialize)]
pub struct Diagram {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
    pub issues: Vec<LinkIssue>,
}

impl Diagram {
    /// Convenience: lay out `data` and adapt it in one go.
    pub fn from_tree(
        data: &TreeData,
        area: Area,
        layout_config: &LayoutConfig,
        default_swirl: SwirlParameters,
    ) -> Self {
        let layout = TreeLayout::compute(&data.root, area, layout_config);
        LayoutAdapter::new(area, layout_config, default_swirl).adapt(data, &layout)
    }

    pub fn node(&self, name: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn goal(&self) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.is_goal)
    }

    pub fn edges_of(&self, kind: EdgeKind) -> impl Iterator<Item = &DiagramEdge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    /// Distinct grouping keys in first-seen order.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for node in &self.nodes {
            if !groups.contains(&node.group.as_str()) {
                groups.push(&node.group);
            }
        }
        groups
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.nodes.iter().any(|n| n.group == group)
    }
}

pub struct LayoutAdapter<'c> {
    area: Area,
    config: &'c LayoutConfig,
    default_swirl: SwirlParameters,
}

impl<'c> LayoutAdapter<'c> {
    pub fn new(area: Area, config: &'c LayoutConfig, default_swirl: SwirlParameters) -> Self {
        Self {
            area,
            config,
            default_swirl,
        }
    }

    pub fn adapt(&self, data: &TreeData, layout: &TreeLayout<'_>) -> Diagram {
        let mut issues = Vec::new();

        let mut nodes: Vec<DiagramNode> = layout
            .nodes
            .iter()
            .map(|n| DiagramNode {
                name: n.record.name.clone(),
                group: n.record.group.clone(),
                depth: n.depth,
                position: n.position.offset(n.record.offset_x, n.record.offset_y),
                is_goal: false,
            })
            .collect();

        let mut by_name: HashMap<&str, usize> = HashMap::new();
        for (i, n) in layout.nodes.iter().enumerate() {
            if by_name.contains_key(n.record.name.as_str()) {
                tracing::warn!(name = %n.record.name, "duplicate node name");
                issues.push(LinkIssue::DuplicateName {
                    name: n.record.name.clone(),
                });
            } else {
                by_name.insert(&n.record.name, i);
            }
        }

        let flagged: Vec<usize> = layout
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.record.connects_to_goal)
            .map(|(i, _)| i)
            .collect();

        // The goal exists only when something points at it, and then it can
        // also be named by cross-links.
        let goal_index = if flagged.is_empty() {
            None
        } else {
            let index = nodes.len();
            nodes.push(DiagramNode {
                name: data.goal.name.clone(),
                group: data.goal.group.clone(),
                depth: layout.max_depth + 1,
                position: Point::new(self.area.width / 2.0, layout.next_level_y(self.config)),
                is_goal: true,
            });
            if by_name.contains_key(data.goal.name.as_str()) {
                tracing::warn!(name = %data.goal.name, "goal name is also a node name");
                issues.push(LinkIssue::DuplicateName {
                    name: data.goal.name.clone(),
                });
            } else {
                by_name.insert(&data.goal.name, index);
            }
            Some(index)
        };

        // The goal has no record, so its links use the default swirl.
        let swirl_of = |i: usize| {
            layout
                .nodes
                .get(i)
                .and_then(|n| n.record.swirl)
                .unwrap_or(self.default_swirl)
        };
        let edge = |kind, s: usize, t: usize, swirl, nodes: &[DiagramNode]| DiagramEdge {
            kind,
            source: nodes[s].name.clone(),
            target: nodes[t].name.clone(),
            group: nodes[s].group.clone(),
            from: nodes[s].position,
            to: nodes[t].position,
            swirl,
        };

        let mut edges = Vec::new();

        // Edges leaving a node all carry that node's swirl.
        for &(parent, child) in &layout.links {
            edges.push(edge(EdgeKind::Tree, parent, child, swirl_of(parent), &nodes));
        }

        for (owner, laid_out) in layout.nodes.iter().enumerate() {
            for link in &laid_out.record.links {
                let from = by_name.get(link.from_node.as_str()).copied();
                let to = by_name.get(link.to_node.as_str()).copied();

                if from.is_none() {
                    issues.push(LinkIssue::UnresolvedFrom {
                        owner: nodes[owner].name.clone(),
                        name: link.from_node.clone(),
                    });
                }
                if to.is_none() {
                    issues.push(LinkIssue::UnresolvedTo {
                        owner: nodes[owner].name.clone(),
                        name: link.to_node.clone(),
                    });
                }

                if let (Some(from), Some(to)) = (from, to) {
                    let swirl = link.swirl.unwrap_or_else(|| swirl_of(from));
                    edges.push(edge(EdgeKind::CrossLink, from, to, swirl, &nodes));
                } else {
                    tracing::warn!(
                        owner = %nodes[owner].name,
                        from = %link.from_node,
                        to = %link.to_node,
                        "skipping unresolved cross-link"
                    );
                }
            }
        }

        if let Some(goal_index) = goal_index {
            for i in flagged {
                edges.push(edge(EdgeKind::Goal, i, goal_index, swirl_of(i), &nodes));
            }
        }

        tracing::info!(
            nodes = nodes.len(),
            edges = edges.len(),
            issues = issues.len(),
            "built diagram"
        );

        Diagram {
            width: self.area.width,
            height: self.area.height,
            nodes,
            edges,
            issues,
        }
    }
}
