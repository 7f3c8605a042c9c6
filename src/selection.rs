//! Group selection state.

use crate::adapter::{Diagram, DiagramEdge, DiagramNode};

/// The currently emphasized grouping key, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    group: Option<String>,
}

impl Selection {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn group(group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
        }
    }

    pub fn selected_group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.group.is_some()
    }

    /// Handle a click on the named node.
    ///
    /// Selects the node's group, or clears the selection when that group
    /// is already selected. Unknown names leave the selection unchanged.
    pub fn click(&mut self, diagram: &Diagram, node_name: &str) {
        let Some(node) = diagram.node(node_name) else {
            tracing::debug!(node = node_name, "click on unknown node ignored");
            return;
        };
        if self.group.as_deref() == Some(node.group.as_str()) {
            self.group = None;
        } else {
            self.group = Some(node.group.clone());
        }
    }

    /// Keep the selection for a freshly built diagram if its group survived.
    pub fn retain_for(&mut self, diagram: &Diagram) {
        if let Some(group) = &self.group {
            if !diagram.has_group(group) {
                tracing::debug!(group = %group, "selected group is gone, clearing");
                self.group = None;
            }
        }
    }

    pub fn contains_node(&self, node: &DiagramNode) -> bool {
        self.group.as_deref() == Some(node.group.as_str())
    }

    pub fn contains_edge(&self, edge: &DiagramEdge) -> bool {
        self.group.as_deref() == Some(edge.group.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::Area;
    use crate::swirl::SwirlParameters;
    use crate::tree::{NodeRecord, TreeData};

    fn diagram(data: &TreeData) -> Diagram {
        Diagram::from_tree(
            data,
            Area::new(400, 300),
            &LayoutConfig::default(),
            SwirlParameters::DEFAULT,
        )
    }

    fn data() -> TreeData {
        TreeData::new(
            NodeRecord::new("root", "trunk")
                .with_child(NodeRecord::new("a", "red").with_child(NodeRecord::new("a1", "red")))
                .with_child(NodeRecord::new("b", "blue")),
        )
    }

    #[test]
    fn click_toggles_group() {
        let d = diagram(&data());
        let mut selection = Selection::none();

        selection.click(&d, "a1");
        assert_eq!(selection.selected_group(), Some("red"));

        selection.click(&d, "b");
        assert_eq!(selection.selected_group(), Some("blue"));

        selection.click(&d, "b");
        assert!(!selection.is_active());

        selection.click(&d, "missing");
        assert!(!selection.is_active());
    }

    #[test]
    fn selects_nodes_and_edges_sharing_group() {
        let d = diagram(&data());
        let mut selection = Selection::none();
        selection.click(&d, "a");

        let nodes: Vec<&str> = d
            .nodes
            .iter()
            .filter(|n| selection.contains_node(n))
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(nodes, vec!["a", "a1"]);

        let edges: Vec<(&str, &str)> = d
            .edges
            .iter()
            .filter(|e| selection.contains_edge(e))
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(edges, vec![("a", "a1")]);
    }

    #[test]
    fn survives_rerender_only_if_group_exists() {
        let mut selection = Selection::group("red");

        selection.retain_for(&diagram(&data()));
        assert_eq!(selection.selected_group(), Some("red"));

        let pruned = TreeData::new(NodeRecord::new("root", "trunk").with_child(NodeRecord::new("b", "blue")));
        selection.retain_for(&diagram(&pruned));
        assert!(!selection.is_active());
    }
}
