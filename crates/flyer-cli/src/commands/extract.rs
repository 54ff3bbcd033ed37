//! Extract command - parse an event from already recognized text.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use flyer_core::{EventParser, FlyerParser};

use super::config::load_config;
use super::output::{format_event, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Text file, or "-" for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = if args.input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        if !args.input.exists() {
            anyhow::bail!("Input file not found: {}", args.input.display());
        }
        fs::read_to_string(&args.input)?
    };

    let today = config.dates.reference();
    let result = FlyerParser::with_reference_date(today).parse(&text);
    info!(
        "Extracted event in {}ms with {} warnings",
        result.processing_time_ms,
        result.warnings.len()
    );

    for warning in &result.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    let output = format_event(&result.event, args.format, &config.calendar, today)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}
