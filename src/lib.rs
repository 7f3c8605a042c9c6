//! swirlgraph - tree diagrams drawn with sine-modulated Bézier edges.
//!
//! Node records are laid out as a layered tree, wired up with cross-links
//! and goal edges, and rendered as SVG or as an interactive HTML page.

pub mod adapter;
pub mod config;
pub mod generators;
pub mod layout;
pub mod render;
pub mod selection;
pub mod swirl;
pub mod tree;

pub use adapter::{Diagram, EdgeKind, LinkIssue};
pub use crate::config::SwirlConfig;
pub use generators::Generator;
pub use render::{render, OutputFormat};
pub use selection::Selection;
pub use swirl::{Point, SwirlCurve, SwirlParameters};
pub use tree::{NodeRecord, TreeData};
