//! Layered tree layout.
//!
//! Positions each record at a vertical level given by its depth and a
//! horizontal slot given by its place among the leaves:
//! - Leaves take consecutive slots, one apart for siblings and
//!   `cousin_separation` apart when their parents differ
//! - A parent sits midway between its first and last child
//! - Slots are scaled to the drawing width, depths to the height

use crate::config::LayoutConfig;
use crate::swirl::Point;
use crate::tree::NodeRecord;

/// Size of the drawing area in user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub width: f64,
    pub height: f64,
}

impl Area {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
        }
    }
}

/// A record with its computed position.
#[derive(Debug, Clone)]
pub struct LaidOutNode<'a> {
    pub record: &'a NodeRecord,
    pub depth: u32,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub position: Point,
}

/// Layout result: nodes in depth-first order plus parent/child index pairs.
#[derive(Debug, Clone)]
pub struct TreeLayout<'a> {
    pub nodes: Vec<LaidOutNode<'a>>,
    pub links: Vec<(usize, usize)>,
    pub level_spacing: f64,
    pub max_depth: u32,
}

impl<'a> TreeLayout<'a> {
    pub fn compute(root: &'a NodeRecord, area: Area, config: &LayoutConfig) -> Self {
        let mut nodes = Vec::new();
        let mut links = Vec::new();
        Self::flatten(root, None, 0, &mut nodes, &mut links);

        let max_depth = nodes.iter().map(|n| n.depth).max().unwrap_or(0);

        // Slot assignment walks leaves left to right.
        let mut slots = vec![0.0; nodes.len()];
        let mut cursor: Option<(f64, Option<usize>)> = None;
        Self::assign_slots(0, &nodes, config, &mut slots, &mut cursor);

        let min_slot = slots.iter().copied().fold(f64::INFINITY, f64::min);
        let max_slot = slots.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = max_slot - min_slot;
        let usable_width = (area.width - config.padding * 2.0).max(0.0);

        // One extra level is reserved below the deepest node for the goal.
        let level_spacing = if config.level_spacing > 0.0 {
            config.level_spacing
        } else {
            (area.height - config.padding * 2.0).max(0.0) / (max_depth + 1) as f64
        };

        for (node, slot) in nodes.iter_mut().zip(&slots) {
            let x = if span > 0.0 {
                config.padding + (slot - min_slot) / span * usable_width
            } else {
                area.width / 2.0
            };
            let y = config.padding + node.depth as f64 * level_spacing;
            node.position = Point::new(x, y);
        }

        tracing::debug!(
            nodes = nodes.len(),
            max_depth,
            level_spacing,
            "computed tree layout"
        );

        Self {
            nodes,
            links,
            level_spacing,
            max_depth,
        }
    }

    fn flatten(
        record: &'a NodeRecord,
        parent: Option<usize>,
        depth: u32,
        nodes: &mut Vec<LaidOutNode<'a>>,
        links: &mut Vec<(usize, usize)>,
    ) -> usize {
        let index = nodes.len();
        nodes.push(LaidOutNode {
            record,
            depth,
            parent,
            children: Vec::new(),
            position: Point::default(),
        });
        if let Some(p) = parent {
            links.push((p, index));
        }

        for child in &record.children {
            let child_index = Self::flatten(child, Some(index), depth + 1, nodes, links);
            nodes[index].children.push(child_index);
        }
        index
    }

    /// Returns the slot of `index`. `cursor` holds the last leaf's slot and parent.
    fn assign_slots(
        index: usize,
        nodes: &[LaidOutNode<'a>],
        config: &LayoutConfig,
        slots: &mut [f64],
        cursor: &mut Option<(f64, Option<usize>)>,
    ) -> f64 {
        let node = &nodes[index];
        let slot = if node.children.is_empty() {
            let slot = match *cursor {
                None => 0.0,
                Some((last, last_parent)) if last_parent == node.parent => {
                    last + config.sibling_separation
                }
                Some((last, _)) => last + config.cousin_separation,
            };
            *cursor = Some((slot, node.parent));
            slot
        } else {
            let mut first = None;
            let mut last = 0.0;
            for &child in &node.children {
                let s = Self::assign_slots(child, nodes, config, slots, cursor);
                if first.is_none() {
                    first = Some(s);
                }
                last = s;
            }
            (first.unwrap_or(last) + last) / 2.0
        };
        slots[index] = slot;
        slot
    }

    #[cfg(test)]
    fn find(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.record.name == name)
    }

    /// Vertical position the level below the deepest node would take.
    pub fn next_level_y(&self, config: &LayoutConfig) -> f64 {
        config.padding + (self.max_depth + 1) as f64 * self.level_spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> NodeRecord {
        NodeRecord::new("root", "g")
            .with_child(
                NodeRecord::new("a", "g")
                    .with_child(NodeRecord::new("a1", "g"))
                    .with_child(NodeRecord::new("a2", "g")),
            )
            .with_child(NodeRecord::new("b", "g").with_child(NodeRecord::new("b1", "g")))
    }

    #[test]
    fn parents_are_centred_over_children() {
        let root = tree();
        let layout = TreeLayout::compute(&root, Area::new(500, 400), &LayoutConfig::default());
        let pos = |name: &str| layout.nodes[layout.find(name).unwrap()].position;

        assert!((pos("a").x - (pos("a1").x + pos("a2").x) / 2.0).abs() < 1e-9);
        assert!((pos("b").x - pos("b1").x).abs() < 1e-9);
        assert!((pos("root").x - (pos("a").x + pos("b").x) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn cousins_are_further_apart_than_siblings() {
        let root = tree();
        let layout = TreeLayout::compute(&root, Area::new(500, 400), &LayoutConfig::default());
        let pos = |name: &str| layout.nodes[layout.find(name).unwrap()].position;

        let sibling_gap = pos("a2").x - pos("a1").x;
        let cousin_gap = pos("b1").x - pos("a2").x;
        assert!((cousin_gap - 2.0 * sibling_gap).abs() < 1e-9);
        // Leaves span exactly the padded width.
        assert!((pos("a1").x - 60.0).abs() < 1e-9);
        assert!((pos("b1").x - 440.0).abs() < 1e-9);
    }

    #[test]
    fn depth_grows_downward_with_room_for_goal() {
        let root = tree();
        let config = LayoutConfig::default();
        let layout = TreeLayout::compute(&root, Area::new(500, 420), &config);

        assert_eq!(layout.max_depth, 2);
        assert_eq!(layout.links.len(), 5);
        assert!((layout.level_spacing - 100.0).abs() < 1e-9);

        let root_y = layout.nodes[0].position.y;
        let leaf_y = layout.nodes[layout.find("a1").unwrap()].position.y;
        assert_eq!(root_y, 60.0);
        assert_eq!(leaf_y, 260.0);
        assert_eq!(layout.next_level_y(&config), 360.0);
    }

    #[test]
    fn fixed_level_spacing_is_respected() {
        let root = tree();
        let config = LayoutConfig {
            level_spacing: 35.0,
            ..LayoutConfig::default()
        };
        let layout = TreeLayout::compute(&root, Area::new(500, 400), &config);
        assert_eq!(layout.nodes[layout.find("b1").unwrap()].position.y, 130.0);
    }

    #[test]
    fn single_node_sits_at_centre() {
        let root = NodeRecord::new("only", "g");
        let layout = TreeLayout::compute(&root, Area::new(300, 200), &LayoutConfig::default());
        assert_eq!(layout.nodes.len(), 1);
        assert!(layout.links.is_empty());
        assert_eq!(layout.nodes[0].position, Point::new(150.0, 60.0));
    }
}
