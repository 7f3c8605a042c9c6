//! Glue from loaded data and configuration to a finished document.

use crate::adapter::Diagram;
use crate::config::SwirlConfig;
use crate::generators::html::HtmlGenerator;
use crate::generators::svg::SvgGenerator;
use crate::generators::Generator;
use crate::layout::Area;
use crate::selection::Selection;
use crate::tree::TreeData;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Html,
}

impl OutputFormat {
    pub fn all() -> [OutputFormat; 2] {
        [OutputFormat::Svg, OutputFormat::Html]
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Html => "html",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "html" => Ok(OutputFormat::Html),
            other => anyhow::bail!("unknown output format '{other}' (expected svg or html)"),
        }
    }
}

/// A rendered document and the diagram it was drawn from.
pub struct Rendered {
    pub diagram: Diagram,
    pub document: String,
    pub extension: &'static str,
}

/// Lay out, adapt and draw `data` at the configured size.
///
/// The selection is dropped if its group does not exist in this diagram.
pub fn render(
    data: &TreeData,
    config: &SwirlConfig,
    format: OutputFormat,
    mut selection: Selection,
) -> Rendered {
    let area = Area::new(config.output.width, config.output.height);
    let diagram = Diagram::from_tree(data, area, &config.layout, config.swirl.parameters());
    selection.retain_for(&diagram);

    let svg = SvgGenerator::new(config.style.clone(), config.layout.node_radius)
        .with_selection(selection);

    let generator: Box<dyn Generator> = match format {
        OutputFormat::Svg => Box::new(svg),
        OutputFormat::Html => Box::new(HtmlGenerator::new(data.root.name.clone(), svg)),
    };

    tracing::debug!(generator = generator.name(), "rendering document");
    let document = generator.generate(&diagram);

    Rendered {
        diagram,
        document,
        extension: generator.extension(),
    }
}
