//! Batch processing command for multiple expense documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use shopbag_core::{Receipt, ReceiptAssembler, ReceiptNormalizer};

use super::config::load_config;
use super::output::{format_receipt, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers (default: from config)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    receipt: Option<Receipt>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let format = args.format.unwrap_or_else(|| config.output.format.into());
    let jobs = args.jobs.unwrap_or(config.batch.jobs).max(1);
    let continue_on_error = args.continue_on_error || config.batch.continue_on_error;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let assembler = Arc::new(ReceiptAssembler::from_config(&config.extraction));
    let semaphore = Arc::new(Semaphore::new(jobs));

    // One task per file; handles are awaited in input order.
    let handles: Vec<_> = files
        .into_iter()
        .map(|path| {
            let assembler = Arc::clone(&assembler);
            let semaphore = Arc::clone(&semaphore);
            let pb = overall_pb.clone();
            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await?;
                let file_start = Instant::now();
                let result = process_single_file(&path, &assembler).await;
                let processing_time_ms = file_start.elapsed().as_millis() as u64;
                pb.inc(1);
                anyhow::Ok((path, result, processing_time_ms))
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let (path, result, processing_time_ms) = handle.await??;

        match result {
            Ok(receipt) => {
                results.push(ProcessResult {
                    path,
                    receipt: Some(receipt),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = format!("{:#}", e);
                if continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        receipt: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    overall_pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }
    }

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.receipt.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    // Write outputs
    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(receipt) = &result.receipt {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("receipt");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, format.extension()));

                let content = format_receipt(receipt, format, config.output.pretty)?;
                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    let duplicates = find_duplicates(&results);
    for (first, second) in &duplicates {
        warn!(
            "Possible duplicate receipt: {} and {}",
            first.display(),
            second.display()
        );
    }

    // Generate summary if requested
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

    // Print summary
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

    if !duplicates.is_empty() {
        println!();
        println!("{}", style("Possible duplicates:").yellow());
        for (first, second) in &duplicates {
            println!("  - {} = {}", first.display(), second.display());
        }
    }

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

async fn process_single_file(path: &Path, assembler: &ReceiptAssembler) -> anyhow::Result<Receipt> {
    let json = tokio::fs::read_to_string(path).await?;
    Ok(assembler.assemble_json(&json)?)
}

/// Pairs of files whose receipts share a duplicate key, earlier file first.
fn find_duplicates(results: &[ProcessResult]) -> Vec<(&Path, &Path)> {
    let receipts: Vec<(&Path, &Receipt)> = results
        .iter()
        .filter_map(|r| r.receipt.as_ref().map(|receipt| (r.path.as_path(), receipt)))
        .collect();

    let mut pairs = Vec::new();
    for (i, (stored_path, stored)) in receipts.iter().enumerate() {
        let stored_key = stored.duplicate_key();
        for (path, receipt) in &receipts[i + 1..] {
            let key = receipt.duplicate_key();
            if key.matches(&stored_key) || stored_key.matches(&key) {
                pairs.push((*stored_path, *path));
            }
        }
    }
    pairs
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "merchant",
        "date",
        "total",
        "currency",
        "items",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(receipt) = &result.receipt {
            wtr.write_record([
                filename,
                "success",
                &receipt.merchant,
                &receipt.date.to_string(),
                &receipt.total.to_string(),
                &receipt.currency,
                &receipt.items.len().to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
