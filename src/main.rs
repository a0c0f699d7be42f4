//! Helmet overlay renderer for recorded landmark streams.

use anyhow::{Context, Result};
use clap::Parser;
use helmet_overlay::{
    app::{ControlEvent, OverlayApp},
    config::Config,
    pipeline::OverlayPipeline,
    provider::JsonLinesProvider,
    sink::create_sink,
};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded landmark frames (JSON Lines)
    input: PathBuf,

    /// Output directory for rendered frames
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (svg, json)
    #[arg(long)]
    format: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Filter type for pose smoothing (exponential, none)
    #[arg(short, long)]
    filter: Option<String>,

    /// Smoothing factor for the exponential filter (0.0-1.0]
    #[arg(short, long)]
    smoothing: Option<f64>,

    /// Toggle the faceplate at this timestamp in ms (repeatable)
    #[arg(long = "toggle-at", value_name = "MS")]
    toggle_at: Vec<f64>,

    /// Open the faceplate at this timestamp in ms (repeatable)
    #[arg(long = "open-at", value_name = "MS")]
    open_at: Vec<f64>,

    /// Close the faceplate at this timestamp in ms (repeatable)
    #[arg(long = "close-at", value_name = "MS")]
    close_at: Vec<f64>,

    /// Scrub the faceplate to a progress value, as <ms>:<value> (repeatable)
    #[arg(long, value_name = "MS:VALUE")]
    scrub: Vec<String>,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{}", helmet_overlay::config::EXAMPLE_CONFIG);
        return Ok(());
    }

    info!("Helmet Overlay");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Command line overrides
    if let Some(filter) = args.filter {
        config.smoothing.filter = filter;
    }
    if let Some(factor) = args.smoothing {
        config.smoothing.factor = factor;
    }
    if let Some(output) = args.output {
        config.output.directory = output;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    config.validate().context("Invalid configuration")?;

    // Scripted faceplate control
    let mut events: Vec<ControlEvent> = args.toggle_at.iter().copied().map(ControlEvent::toggle).collect();
    events.extend(args.open_at.iter().map(|&at| ControlEvent::set_open(at, true)));
    events.extend(args.close_at.iter().map(|&at| ControlEvent::set_open(at, false)));
    for scrub in &args.scrub {
        events.push(scrub.parse().with_context(|| format!("Invalid --scrub '{scrub}'"))?);
    }

    let provider = JsonLinesProvider::open(&args.input)?;
    let sink = create_sink(&config.output.format, &config.output.directory, &config.output.file_prefix)?;
    let pipeline = OverlayPipeline::new(&config)?;

    // Create and run application
    let mut app = OverlayApp::new(pipeline, Box::new(provider), sink, events);
    let summary = app.run()?;

    info!(
        "Wrote {} frames to {}",
        summary.stats.frames,
        config.output.directory.display()
    );

    Ok(())
}
