//! Ingest command - parse receipts and add their line items to the database.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info, warn};

use studio_core::{DefaultExtractor, Document, IngestSummary, ParserRegistry, Store, Vendor};

use super::{load_config, GlobalArgs};

/// Arguments for the ingest command.
#[derive(Args)]
pub struct IngestArgs {
    /// Input files or glob pattern (default: the workspace receipts folder)
    input: Option<String>,

    /// Database file (default: the workspace database)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Keep going when a receipt fails to parse
    #[arg(long)]
    continue_on_error: bool,

    /// Parse everything against a throwaway in-memory database
    #[arg(long)]
    dry_run: bool,

    /// Print parsed order fields for each receipt
    #[arg(long)]
    debug: bool,

    /// Write a per-file summary CSV
    #[arg(long)]
    summary: Option<PathBuf>,
}

/// Result of ingesting a single file.
struct IngestResult {
    path: PathBuf,
    vendor: Option<Vendor>,
    invoice: Option<String>,
    summary: IngestSummary,
    error: Option<String>,
}

pub fn run(args: IngestArgs, globals: &GlobalArgs<'_>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(globals)?;

    let pattern = match &args.input {
        Some(input) => input.clone(),
        None => {
            config.ensure_workspace()?;
            config.receipts_glob()
        }
    };

    let files: Vec<PathBuf> = glob(&pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", pattern);
    }

    println!(
        "{} Found {} files to ingest",
        style("ℹ").blue(),
        files.len()
    );

    let mut store = if args.dry_run {
        Store::open_in_memory()?
    } else {
        let db_path = args.db.clone().unwrap_or_else(|| config.database_path());
        info!("Using database {}", db_path.display());
        Store::open(&db_path)?
    };

    let continue_on_error = args.continue_on_error || config.ingest.continue_on_error;
    let debug_output = args.debug || config.ingest.debug;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );
    if debug_output {
        pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    let extractor = DefaultExtractor::new();
    let registry = ParserRegistry::default();
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        match ingest_single_file(&path, &extractor, &registry, &mut store, debug_output) {
            Ok((vendor, invoice, summary)) => {
                debug!("{}: {:?}", path.display(), summary);
                results.push(IngestResult {
                    path,
                    vendor: Some(vendor),
                    invoice,
                    summary,
                    error: None,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if continue_on_error {
                    warn!("Failed to ingest {}: {}", path.display(), error_msg);
                    results.push(IngestResult {
                        path,
                        vendor: None,
                        invoice: None,
                        summary: IngestSummary::default(),
                        error: Some(error_msg),
                    });
                } else {
                    pb.abandon();
                    error!("Failed to ingest {}: {}", path.display(), error_msg);
                    anyhow::bail!("Ingest failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let mut totals = IngestSummary::default();
    for result in &results {
        totals += result.summary;
    }
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Ingested {} files in {:?}{}",
        style("✓").green(),
        results.len(),
        start.elapsed(),
        if args.dry_run { " (dry run)" } else { "" }
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );
    println!(
        "   {} items: {} new parts, {} updated, {} skipped",
        totals.items,
        style(totals.inserted).green(),
        totals.updated,
        style(totals.skipped).yellow()
    );
    if totals.duplicates > 0 {
        println!(
            "   {} items from orders already ingested",
            style(totals.duplicates).yellow()
        );
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

fn ingest_single_file(
    path: &Path,
    extractor: &DefaultExtractor,
    registry: &ParserRegistry,
    store: &mut Store,
    debug_output: bool,
) -> anyhow::Result<(Vendor, Option<String>, IngestSummary)> {
    let document = Document::new(path, extractor);

    let parser = registry
        .pick_parser(&document)
        .ok_or_else(|| anyhow::anyhow!("no vendor parser recognized this file"))?;

    let receipt = parser.parse(&document, debug_output)?;
    let summary = store.upsert_receipt(&receipt)?;

    Ok((parser.vendor(), receipt.order.invoice, summary))
}

fn write_summary(path: &Path, results: &[IngestResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "vendor",
        "invoice",
        "items",
        "inserted",
        "updated",
        "skipped",
        "duplicates",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let status = if result.error.is_some() { "error" } else { "success" };

        wtr.write_record([
            filename,
            status,
            result.vendor.map(|v| v.as_str()).unwrap_or(""),
            result.invoice.as_deref().unwrap_or(""),
            &result.summary.items.to_string(),
            &result.summary.inserted.to_string(),
            &result.summary.updated.to_string(),
            &result.summary.skipped.to_string(),
            &result.summary.duplicates.to_string(),
            result.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
