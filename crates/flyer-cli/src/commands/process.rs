//! Process command - extract an event from a single flyer image.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use flyer_core::{is_supported_image, FlyerPipeline};

use super::config::load_config;
use super::output::{format_event, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input image (png, jpg, jpeg or gif)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also print the recognized text
    #[arg(long)]
    show_raw: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    if !is_supported_image(&args.input) {
        anyhow::bail!(
            "Unsupported file format: {} (expected png, jpg, jpeg or gif)",
            args.input.display()
        );
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Recognizing text...");

    let pipeline = FlyerPipeline::new(&config)?;
    debug!("Using {} recognizer", pipeline.recognizer_name());

    let result = pipeline.run(&args.input);
    pb.finish_and_clear();
    let output = result?;

    for warning in &output.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    let today = config.dates.reference();
    let rendered = format_event(&output.event, args.format, &config.calendar, today)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &rendered)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", rendered);
    }

    if args.show_raw {
        eprintln!();
        eprintln!("{}", style("Recognized text:").blue());
        eprintln!("{}", output.event.raw_text);
    }

    debug!(
        "Pipeline finished in {}ms (threshold {}), total {:?}",
        output.processing_time_ms,
        output.threshold,
        start.elapsed()
    );

    Ok(())
}
