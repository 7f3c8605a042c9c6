//! Node data that drives the diagram.
//!
//! A data file holds one root node record with nested children. Records
//! carry their grouping key, optional layout offsets, an optional swirl and
//! any named cross-links. JSON and TOML files are both accepted.

use crate::swirl::SwirlParameters;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while loading a data file.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported data file extension: {0}")]
    UnsupportedFormat(String),

    #[error("node at {0} has an empty name")]
    EmptyName(String),
}

/// A named edge between two nodes outside the parent/child structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSpec {
    pub from_node: String,
    pub to_node: String,
    /// Overrides the swirl of the `from_node` node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swirl: Option<SwirlParameters>,
}

/// One node of the input tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub name: String,
    /// Grouping key; clicking a node selects everything sharing it.
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub connects_to_goal: bool,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swirl: Option<SwirlParameters>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeRecord>,
}

impl NodeRecord {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            connects_to_goal: false,
            offset_x: 0.0,
            offset_y: 0.0,
            swirl: None,
            links: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: NodeRecord) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_swirl(mut self, swirl: SwirlParameters) -> Self {
        self.swirl = Some(swirl);
        self
    }

    pub fn with_link(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.links.push(LinkSpec {
            from_node: from.into(),
            to_node: to.into(),
            swirl: None,
        });
        self
    }

    pub fn to_goal(mut self) -> Self {
        self.connects_to_goal = true;
        self
    }

    /// Visit every record depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a NodeRecord, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a NodeRecord, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }

    /// Total number of records in this subtree.
    pub fn count(&self) -> usize {
        let mut n = 0;
        self.walk(&mut |_, _| n += 1);
        n
    }
}

/// The singleton terminal node that flagged nodes connect to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSpec {
    #[serde(default = "default_goal_name")]
    pub name: String,
    #[serde(default = "default_goal_group")]
    pub group: String,
}

impl Default for GoalSpec {
    fn default() -> Self {
        Self {
            name: default_goal_name(),
            group: default_goal_group(),
        }
    }
}

fn default_goal_name() -> String {
    "Goal".to_string()
}

fn default_goal_group() -> String {
    "goal".to_string()
}

/// A whole data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeData {
    pub root: NodeRecord,
    #[serde(default)]
    pub goal: GoalSpec,
}

impl TreeData {
    pub fn new(root: NodeRecord) -> Self {
        Self {
            root,
            goal: GoalSpec::default(),
        }
    }

    /// Load a data file, choosing the parser by extension.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let data: TreeData = match ext.as_str() {
            "json" => serde_json::from_str(&text).map_err(|source| DataError::Json {
                path: path.to_path_buf(),
                source,
            })?,
            "toml" => toml::from_str(&text).map_err(|source| DataError::Toml {
                path: path.to_path_buf(),
                source,
            })?,
            other => return Err(DataError::UnsupportedFormat(other.to_string())),
        };

        data.validate()?;
        tracing::debug!(path = %path.display(), nodes = data.root.count(), "loaded tree data");
        Ok(data)
    }

    /// Reject records that cannot be referenced by name.
    pub fn validate(&self) -> Result<(), DataError> {
        Self::validate_node(&self.root, "root")
    }

    fn validate_node(node: &NodeRecord, at: &str) -> Result<(), DataError> {
        if node.name.trim().is_empty() {
            return Err(DataError::EmptyName(at.to_string()));
        }
        for (i, child) in node.children.iter().enumerate() {
            Self::validate_node(child, &format!("{at}/{}[{i}]", node.name))?;
        }
        Ok(())
    }

    /// Create a deterministic sample tree for demos and tests.
    ///
    /// Three to five branches hang from the root, each with its own group
    /// and swirl. Leaves sometimes connect to the goal, and a couple of
    /// cross-links join neighbouring branches.
    pub fn sample(seed: u64) -> Self {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

        let branch_count = rng.gen_range(3..=5);
        let mut root = NodeRecord::new("Origin", "origin");
        let mut leaves: Vec<Vec<String>> = Vec::new();

        for b in 0..branch_count {
            let group = format!("branch-{}", b + 1);
            let swirl = SwirlParameters::new(
                if rng.gen::<bool>() { 1.0 } else { -1.0 },
                rng.gen_range(20.0..120.0),
                rng.gen_range(0.005..0.05),
                rng.gen_range(0.0..std::f64::consts::PI),
            );

            let mut branch = NodeRecord::new(format!("B{}", b + 1), group.clone()).with_swirl(swirl);
            let mut branch_leaves = Vec::new();

            for c in 0..rng.gen_range(1..=3) {
                let name = format!("B{}.{}", b + 1, c + 1);
                let mut child = NodeRecord::new(name.clone(), group.clone());
                if rng.gen::<f64>() < 0.4 {
                    child.swirl = Some(swirl.flipped());
                }
                if rng.gen::<f64>() < 0.5 {
                    child.connects_to_goal = true;
                }
                if rng.gen::<f64>() < 0.3 {
                    child.offset_y = rng.gen_range(-20.0..20.0);
                }
                branch_leaves.push(name);
                branch = branch.with_child(child);
            }

            leaves.push(branch_leaves);
            root = root.with_child(branch);
        }

        // Join the first leaf of each branch to the last leaf of the next one.
        for pair in leaves.windows(2).take(2) {
            if let (Some(from), Some(to)) = (pair[0].first(), pair[1].last()) {
                root.links.push(LinkSpec {
                    from_node: from.clone(),
                    to_node: to.clone(),
                    swirl: None,
                });
            }
        }

        // Make sure the goal has at least one incoming edge.
        if let Some(last) = root.children.last_mut().and_then(|b| b.children.last_mut()) {
            last.connects_to_goal = true;
        }

        Self::new(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_JSON: &str = r#"{
        "root": {
            "name": "Root",
            "group": "a",
            "children": [
                {
                    "name": "Left",
                    "group": "a",
                    "connectsToGoal": true,
                    "offsetX": -12.5,
                    "swirl": { "direction": -1, "amplitude": 40, "frequency": 0.01, "phase": 0.5 }
                },
                {
                    "name": "Right",
                    "group": "b",
                    "links": [ { "fromNode": "Right", "toNode": "Left" } ]
                }
            ]
        }
    }"#;

    #[test]
    fn parses_camel_case_records() {
        let data: TreeData = serde_json::from_str(SAMPLE_JSON).unwrap();
        assert_eq!(data.root.children.len(), 2);

        let left = &data.root.children[0];
        assert!(left.connects_to_goal);
        assert_eq!(left.offset_x, -12.5);
        assert_eq!(left.offset_y, 0.0);
        assert_eq!(left.swirl, Some(SwirlParameters::new(-1.0, 40.0, 0.01, 0.5)));

        let right = &data.root.children[1];
        assert!(right.swirl.is_none());
        assert_eq!(right.links[0].from_node, "Right");
        assert_eq!(right.links[0].to_node, "Left");
        assert_eq!(data.goal, GoalSpec::default());
    }

    #[test]
    fn loads_json_and_toml_files() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("tree.json");
        std::fs::write(&json_path, SAMPLE_JSON).unwrap();
        let from_json = TreeData::load(&json_path).unwrap();

        let toml_path = dir.path().join("tree.toml");
        std::fs::write(
            &toml_path,
            r#"
[root]
name = "Root"
group = "a"

[[root.children]]
name = "Left"
group = "a"
connectsToGoal = true
offsetX = -12.5
swirl = { direction = -1.0, amplitude = 40.0, frequency = 0.01, phase = 0.5 }

[[root.children]]
name = "Right"
group = "b"
links = [{ fromNode = "Right", toNode = "Left" }]
"#,
        )
        .unwrap();
        let from_toml = TreeData::load(&toml_path).unwrap();

        assert_eq!(from_json, from_toml);
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.yaml");
        std::fs::write(&path, "root: {}").unwrap();
        assert!(matches!(
            TreeData::load(&path),
            Err(DataError::UnsupportedFormat(ext)) if ext == "yaml"
        ));
    }

    #[test]
    fn rejects_empty_names() {
        let data = TreeData::new(NodeRecord::new("Root", "a").with_child(NodeRecord::new(" ", "a")));
        assert!(matches!(data.validate(), Err(DataError::EmptyName(_))));
    }

    #[test]
    fn walk_is_depth_first() {
        let root = NodeRecord::new("r", "g")
            .with_child(NodeRecord::new("a", "g").with_child(NodeRecord::new("a1", "g")))
            .with_child(NodeRecord::new("b", "g"));
        let mut seen = Vec::new();
        root.walk(&mut |n, depth| seen.push((n.name.as_str(), depth)));
        assert_eq!(seen, vec![("r", 0), ("a", 1), ("a1", 2), ("b", 1)]);
        assert_eq!(root.count(), 4);
    }

    #[test]
    fn sample_is_deterministic() {
        assert_eq!(TreeData::sample(7), TreeData::sample(7));
        let sample = TreeData::sample(7);
        assert!(sample.validate().is_ok());

        let mut flagged = 0;
        sample.root.walk(&mut |n, _| {
            if n.connects_to_goal {
                flagged += 1;
            }
        });
        assert!(flagged >= 1);
    }
}
