//! Configuration loading for swirlgraph.
//!
//! Configuration is loaded from TOML files with environment variable overrides.
//! Variables nest with a double underscore: `SWIRLGRAPH_LAYOUT__NODE_RADIUS=12`.

use crate::swirl::SwirlParameters;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "config.default.toml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SwirlConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub swirl: SwirlDefaults,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub style: StyleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_directory")]
    pub directory: String,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_format")]
    pub format: String,

    #[serde(default)]
    pub save_scene: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            width: default_width(),
            height: default_height(),
            format: default_format(),
            save_scene: false,
        }
    }
}

fn default_directory() -> String {
    "output".to_string()
}

fn default_width() -> u32 {
    960
}

fn default_height() -> u32 {
    720
}

fn default_format() -> String {
    "svg".to_string()
}

/// Swirl used by edges whose source node carries none.
#[derive(Debug, Clone, Deserialize)]
pub struct SwirlDefaults {
    #[serde(default = "default_direction")]
    pub direction: f64,

    #[serde(default = "default_amplitude")]
    pub amplitude: f64,

    #[serde(default = "default_frequency")]
    pub frequency: f64,

    #[serde(default)]
    pub phase: f64,
}

impl Default for SwirlDefaults {
    fn default() -> Self {
        Self::from(SwirlParameters::DEFAULT)
    }
}

impl From<SwirlParameters> for SwirlDefaults {
    fn from(p: SwirlParameters) -> Self {
        Self {
            direction: p.direction,
            amplitude: p.amplitude,
            frequency: p.frequency,
            phase: p.phase,
        }
    }
}

impl SwirlDefaults {
    pub fn parameters(&self) -> SwirlParameters {
        SwirlParameters::new(self.direction, self.amplitude, self.frequency, self.phase)
    }
}

fn default_direction() -> f64 {
    SwirlParameters::DEFAULT.direction
}

fn default_amplitude() -> f64 {
    SwirlParameters::DEFAULT.amplitude
}

fn default_frequency() -> f64 {
    SwirlParameters::DEFAULT.frequency
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_padding")]
    pub padding: f64,

    /// Vertical distance between depths; 0 fits the drawing height.
    #[serde(default)]
    pub level_spacing: f64,

    #[serde(default = "default_sibling_separation")]
    pub sibling_separation: f64,

    #[serde(default = "default_cousin_separation")]
    pub cousin_separation: f64,

    #[serde(default = "default_node_radius")]
    pub node_radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: default_padding(),
            level_spacing: 0.0,
            sibling_separation: default_sibling_separation(),
            cousin_separation: default_cousin_separation(),
            node_radius: default_node_radius(),
        }
    }
}

fn default_padding() -> f64 {
    60.0
}

fn default_sibling_separation() -> f64 {
    1.0
}

fn default_cousin_separation() -> f64 {
    2.0
}

fn default_node_radius() -> f64 {
    10.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "default_background")]
    pub background: String,

    #[serde(default = "default_edge_width")]
    pub edge_width: f64,

    #[serde(default = "default_label_color")]
    pub label_color: String,

    #[serde(default = "default_dim_opacity")]
    pub dim_opacity: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            edge_width: default_edge_width(),
            label_color: default_label_color(),
            dim_opacity: default_dim_opacity(),
        }
    }
}

fn default_background() -> String {
    "#0b0d12".to_string()
}

fn default_edge_width() -> f64 {
    2.0
}

fn default_label_color() -> String {
    "#e6e6e6".to_string()
}

fn default_dim_opacity() -> f64 {
    0.15
}

impl SwirlConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false))
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("SWIRLGRAPH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let swirl_config: SwirlConfig = config
            .try_deserialize()
            .context("invalid configuration")?;
        Ok(swirl_config)
    }
}
