//! swirlgraph CLI - Render node-link trees with swirling Bézier edges.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use swirlgraph::config::SwirlConfig;
use swirlgraph::{render, OutputFormat, Point, Selection, SwirlCurve, SwirlParameters, TreeData};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "swirlgraph")]
#[command(about = "Render tree diagrams whose edges swirl along sine-modulated curves")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "swirlgraph.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Render a node data file
    Render {
        /// Node data file (.json or .toml)
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Width of the output
        #[arg(long)]
        width: Option<u32>,

        /// Height of the output
        #[arg(long)]
        height: Option<u32>,

        /// Group to highlight
        #[arg(long)]
        select: Option<String>,

        /// Also save the built scene as JSON
        #[arg(long)]
        save_scene: bool,
    },

    /// Write a generated sample data file
    Sample {
        /// Seed for generation
        #[arg(short = 'S', long, default_value = "42")]
        seed: u64,

        /// Output file path
        #[arg(short, long, default_value = "sample.json")]
        output: PathBuf,
    },

    /// Print the path for a single swirl curve
    Curve {
        /// Source point as "x,y"
        #[arg(long, allow_hyphen_values = true)]
        from: String,

        /// Target point as "x,y"
        #[arg(long, allow_hyphen_values = true)]
        to: String,

        #[arg(long, allow_hyphen_values = true)]
        direction: Option<f64>,

        #[arg(long)]
        amplitude: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        frequency: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        phase: Option<f64>,
    },

    /// Render the sample tree in every format for comparison
    Showcase {
        /// Output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Seed for consistent results
        #[arg(short = 'S', long, default_value = "42")]
        seed: u64,
    },
}

#[derive(Clone, Copy, ValueEnum, Debug)]
enum FormatArg {
    /// Standalone SVG document
    Svg,
    /// Interactive HTML page
    Html,
}

impl FormatArg {
    fn to_format(self) -> OutputFormat {
        match self {
            FormatArg::Svg => OutputFormat::Svg,
            FormatArg::Html => OutputFormat::Html,
        }
    }
}

fn parse_point(s: &str) -> Result<Point> {
    let Some((x, y)) = s.split_once(',') else {
        bail!("expected a point as \"x,y\", got '{s}'");
    };
    let x: f64 = x.trim().parse().with_context(|| format!("bad x in '{s}'"))?;
    let y: f64 = y.trim().parse().with_context(|| format!("bad y in '{s}'"))?;
    Ok(Point::new(x, y))
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("swirlgraph=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = SwirlConfig::load(Path::new(&cli.config))?;

    match cli.command {
        Commands::Render {
            input,
            output,
            format,
            width,
            height,
            select,
            save_scene,
        } => {
            if let Some(width) = width {
                config.output.width = width;
            }
            if let Some(height) = height {
                config.output.height = height;
            }
            let format = match format {
                Some(f) => f.to_format(),
                None => config.output.format.parse()?,
            };
            let save_scene = save_scene || config.output.save_scene;
            let selection = select.map(Selection::group).unwrap_or_default();

            let data = TreeData::load(&input)?;
            println!("Rendering {} as {}...", input.display(), format.name());

            let rendered = render(&data, &config, format, selection);
            println!(
                "  {} nodes, {} edges",
                rendered.diagram.nodes.len(),
                rendered.diagram.edges.len()
            );
            for issue in &rendered.diagram.issues {
                println!("  ! {issue}");
            }

            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "diagram".to_string());
            let output_path = output.unwrap_or_else(|| {
                PathBuf::from(&config.output.directory)
                    .join(format!("{stem}.{}", rendered.extension))
            });

            write_output(&output_path, &rendered.document)?;
            println!("Saved to {}", output_path.display());

            if save_scene {
                let scene_path = output_path.with_extension("json");
                let scene_json = serde_json::to_string_pretty(&rendered.diagram)?;
                write_output(&scene_path, &scene_json)?;
                println!("Saved scene to {}", scene_path.display());
            }
        }

        Commands::Sample { seed, output } => {
            let data = TreeData::sample(seed);
            let json = serde_json::to_string_pretty(&data)?;
            write_output(&output, &json)?;
            println!(
                "Wrote sample tree ({} nodes, seed {}) to {}",
                data.root.count(),
                seed,
                output.display()
            );
        }

        Commands::Curve {
            from,
            to,
            direction,
            amplitude,
            frequency,
            phase,
        } => {
            let defaults = config.swirl.parameters();
            let swirl = SwirlParameters::new(
                direction.unwrap_or(defaults.direction),
                amplitude.unwrap_or(defaults.amplitude),
                frequency.unwrap_or(defaults.frequency),
                phase.unwrap_or(defaults.phase),
            );
            let curve = SwirlCurve::new(parse_point(&from)?, parse_point(&to)?, &swirl);
            println!("{}", curve.path_data());
        }

        Commands::Showcase { output_dir, seed } => {
            let output_dir = output_dir
                .unwrap_or_else(|| PathBuf::from(&config.output.directory).join("showcase"));
            fs::create_dir_all(&output_dir)
                .with_context(|| format!("failed to create {}", output_dir.display()))?;

            let data = TreeData::sample(seed);
            println!("Generating showcase with seed {}...", seed);
            println!("  {} nodes", data.root.count());

            let sizes: [(u32, u32, &str); 3] =
                [(640, 480, "small"), (960, 720, "medium"), (1600, 1200, "large")];

            for format in OutputFormat::all() {
                for (width, height, label) in &sizes {
                    let mut sized = config.clone();
                    sized.output.width = *width;
                    sized.output.height = *height;
                    let rendered = render(&data, &sized, format, Selection::none());

                    let filename = format!("swirl_{}.{}", label, rendered.extension);
                    write_output(&output_dir.join(&filename), &rendered.document)?;
                    println!("  Created {}", filename);
                }
            }

            println!("Done! Showcase saved to {}", output_dir.display());
        }
    }

    Ok(())
}
