//! Batch processing command for multiple flyer images.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use flyer_core::{is_supported_image, FlyerPipeline, StructuredEvent};

use super::config::load_config;
use super::output::{csv_row, format_event, OutputFormat, CSV_HEADER};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    index: usize,
    path: PathBuf,
    event: Option<StructuredEvent>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported_image(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // Every run is isolated; the pipeline itself holds no per-run state.
    let pipeline = Arc::new(FlyerPipeline::new(&config)?);
    let jobs = args.jobs.max(1);
    let mut tasks = JoinSet::new();
    let mut results = Vec::with_capacity(files.len());

    for (index, path) in files.into_iter().enumerate() {
        // At most `jobs` files in flight, and nothing new starts after a failure.
        while tasks.len() >= jobs {
            if let Some(joined) = tasks.join_next().await {
                collect(joined?, &mut results, &overall_pb, args.continue_on_error)?;
            }
        }

        let pipeline = Arc::clone(&pipeline);
        tasks.spawn_blocking(move || process_file(&pipeline, index, path));
    }

    while let Some(joined) = tasks.join_next().await {
        collect(joined?, &mut results, &overall_pb, args.continue_on_error)?;
    }

    overall_pb.finish_with_message("Complete");
    results.sort_by_key(|r| r.index);

    let successful: Vec<_> = results.iter().filter(|r| r.event.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        let today = config.dates.reference();

        for result in &successful {
            if let Some(event) = &result.event {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("flyer");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                let content = format_event(event, args.format, &config.calendar, today)?;
                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_file(pipeline: &FlyerPipeline, index: usize, path: PathBuf) -> ProcessResult {
    let file_start = Instant::now();
    let result = pipeline.run(&path);
    let processing_time_ms = file_start.elapsed().as_millis() as u64;

    match result {
        Ok(output) => ProcessResult {
            index,
            path,
            event: Some(output.event),
            error: None,
            processing_time_ms,
        },
        Err(e) => ProcessResult {
            index,
            path,
            event: None,
            error: Some(e.to_string()),
            processing_time_ms,
        },
    }
}

/// Record a finished file. Without `continue_on_error` a failure ends the
/// batch; dropping the remaining tasks cancels anything not yet started.
fn collect(
    result: ProcessResult,
    results: &mut Vec<ProcessResult>,
    pb: &ProgressBar,
    continue_on_error: bool,
) -> anyhow::Result<()> {
    pb.inc(1);

    if let Some(error_msg) = &result.error {
        if continue_on_error {
            warn!("Failed to process {}: {}", result.path.display(), error_msg);
        } else {
            error!("Failed to process {}: {}", result.path.display(), error_msg);
            pb.abandon();
            anyhow::bail!("Processing failed for {}: {}", result.path.display(), error_msg);
        }
    }

    results.push(result);
    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status"];
    header.extend(CSV_HEADER);
    header.extend(["processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let (status, cells) = match &result.event {
            Some(event) => ("success", csv_row(event)),
            None => ("error", Default::default()),
        };

        let mut record = vec![filename, status.to_string()];
        record.extend(cells);
        record.push(result.processing_time_ms.to_string());
        record.push(result.error.clone().unwrap_or_default());
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
