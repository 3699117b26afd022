use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use serde::Serialize;
use std::fs;
use std::path::Path;
use trellis_layout::{ConstraintBox, LayoutHost, PanelKind, Placement, Scenario, DEMO_NAMES};

#[derive(Parser)]
#[command(name = "trellis-debug")]
#[command(about = "Lays out a panel scenario and prints the placements as text")]
struct Args {
    /// Path to a scenario .json file
    scenario: Option<String>,

    /// Run a built-in demo scenario instead of a file
    #[arg(long, conflicts_with = "scenario")]
    demo: Option<String>,

    /// Override the available width
    #[arg(long)]
    width: Option<f32>,

    /// Override the available height
    #[arg(long)]
    height: Option<f32>,

    /// Output format (tree, json)
    #[arg(long, default_value = "tree")]
    format: String,

    /// Save output to file instead of stdout
    #[arg(long)]
    output: Option<String>,

    /// List the built-in demos and exit
    #[arg(long)]
    list_demos: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[derive(Serialize)]
struct Report {
    kind: PanelKind,
    available: [Option<f32>; 2],
    desired_size: Vec2,
    size: Vec2,
    placements: Vec<Placement>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")?;

    if args.list_demos {
        for name in DEMO_NAMES {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut scenario = load_scenario(&args)?;
    if let Some(width) = args.width {
        scenario.available.width = Some(width);
    }
    if let Some(height) = args.height {
        scenario.available.height = Some(height);
    }

    let report = run_scenario(&scenario)?;

    let output_text = match args.format.as_str() {
        "tree" => generate_tree_output(&report),
        "json" => serde_json::to_string_pretty(&report).context("Failed to serialize layout")? + "\n",
        _ => anyhow::bail!("Unknown format: {}. Use 'tree' or 'json'", args.format),
    };

    if let Some(output_file) = args.output {
        fs::write(&output_file, output_text)
            .with_context(|| format!("Failed to write to file: {}", output_file))?;
        tracing::info!("Output written to: {}", output_file);
    } else {
        print!("{}", output_text);
    }

    Ok(())
}

fn load_scenario(args: &Args) -> Result<Scenario> {
    if let Some(name) = &args.demo {
        return Scenario::demo(name).with_context(|| {
            format!("Unknown demo: {}. Available: {}", name, DEMO_NAMES.join(", "))
        });
    }

    let Some(path) = &args.scenario else {
        anyhow::bail!(
            "No scenario given. Pass a .json file or --demo <{}>",
            DEMO_NAMES.join("|")
        );
    };
    if !Path::new(path).exists() {
        anyhow::bail!("Scenario file not found: {}", path);
    }

    tracing::debug!("Loading scenario: {}", path);
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse scenario {}", path))
}

fn run_scenario(scenario: &Scenario) -> Result<Report> {
    let panel = scenario.panel.build().context("Invalid panel configuration")?;
    let mut host = LayoutHost::new(panel, scenario.layout_children());
    let available = scenario.available.to_vec2();

    let measured = host.measure(available).context("Measure failed")?;
    let final_size = ConstraintBox::from_available(available).arrange_size(measured.desired_size);
    let arranged = host.arrange(final_size).context("Arrange failed")?;

    Ok(Report {
        kind: host.kind(),
        available: [scenario.available.width, scenario.available.height],
        desired_size: measured.desired_size,
        size: arranged.size,
        placements: arranged.placements,
    })
}

fn generate_tree_output(report: &Report) -> String {
    let mut output = format!(
        "{:?} desired:({:.0},{:.0}) size:({:.0},{:.0})\n",
        report.kind, report.desired_size.x, report.desired_size.y, report.size.x, report.size.y
    );

    let count = report.placements.len();
    for (i, placement) in report.placements.iter().enumerate() {
        let tree_char = if i + 1 == count { "└── " } else { "├── " };
        let rect = placement.rect;
        output.push_str(&format!(
            "{}#{} pos:({:.0},{:.0}) size:({:.0},{:.0})\n",
            tree_char, placement.id, rect.x, rect.y, rect.width, rect.height
        ));
    }

    output
}
