//! Parse command - extract order and line items from a single receipt.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use studio_core::{all_parsers, DefaultExtractor, Document, ParsedReceipt, ParserRegistry, Vendor, VendorParser};

use super::{load_config, GlobalArgs};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (PDF or text dump)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Skip detection and use this vendor's parser
    #[arg(long)]
    vendor: Option<String>,

    /// Print the parsed order fields before the output
    #[arg(long)]
    debug: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per line item
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ParseArgs, globals: &GlobalArgs<'_>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(globals)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );

    let extractor = DefaultExtractor::new();
    let document = Document::new(&args.input, &extractor);

    pb.set_message("Detecting vendor...");
    let registry = ParserRegistry::default();
    let forced = match args.vendor.as_deref() {
        Some(name) => Some(forced_parser(name)?),
        None => None,
    };
    let parser: &dyn VendorParser = match forced.as_deref() {
        Some(parser) => parser,
        None => registry.pick_parser(&document).ok_or_else(|| {
            anyhow::anyhow!("No vendor parser recognized {}", args.input.display())
        })?,
    };
    info!("Using {} parser for {}", parser.vendor(), args.input.display());

    pb.set_message("Parsing receipt...");
    let debug_output = args.debug || config.ingest.debug;
    if debug_output {
        pb.finish_and_clear();
    }
    let receipt = parser.parse(&document, debug_output)?;

    pb.finish_with_message(format!(
        "Parsed {} items in {:?}",
        receipt.items.len(),
        start.elapsed()
    ));

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string(&receipt)?,
        OutputFormat::Csv => format_csv(&receipt)?,
        OutputFormat::Text => format_text(&receipt),
    };

    match args.output {
        Some(output_path) => {
            fs::write(&output_path, &output)?;
            debug!("Wrote output to {}", output_path.display());
            println!(
                "{} Output written to {}",
                style("✓").green(),
                output_path.display()
            );
        }
        None => println!("{}", output),
    }

    Ok(())
}

fn forced_parser(name: &str) -> anyhow::Result<Box<dyn VendorParser>> {
    let vendor = Vendor::from_str(name).map_err(anyhow::Error::msg)?;
    all_parsers()
        .into_iter()
        .find(|parser| parser.vendor() == vendor)
        .ok_or_else(|| anyhow::anyhow!("No parser registered for {}", vendor))
}

/// CSV with one row per line item; order fields repeat on every row.
pub fn format_csv(receipt: &ParsedReceipt) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "vendor",
        "source_file",
        "invoice",
        "purchase_order",
        "line",
        "sku",
        "description",
        "ordered",
        "shipped",
        "balance",
        "unit_price",
        "line_total",
        "manufacturer",
        "mfg_part",
        "url",
    ])?;

    for item in &receipt.items {
        wtr.write_record([
            item.vendor.as_str(),
            &item.source_file,
            item.invoice.as_deref().unwrap_or(""),
            item.purchase_order.as_deref().unwrap_or(""),
            &opt(item.line),
            &item.sku,
            &item.description,
            &opt(item.ordered),
            &opt(item.shipped),
            &opt(item.balance),
            &opt(item.unit_price),
            &opt(item.line_total),
            item.manufacturer.as_deref().unwrap_or(""),
            item.mfg_part.as_deref().unwrap_or(""),
            item.url.as_deref().unwrap_or(""),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_text(receipt: &ParsedReceipt) -> String {
    let order = &receipt.order;
    let mut output = String::new();

    output.push_str(&format!("=== {} RECEIPT ===\n\n", order.vendor.as_str().to_uppercase()));
    output.push_str(&format!("File: {}\n", order.source_file));
    output.push_str(&format!("Invoice: {}\n", order.invoice.as_deref().unwrap_or("-")));
    output.push_str(&format!(
        "Purchase order: {}\n",
        order.purchase_order.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!(
        "Date: {}\n",
        dated(order.invoice_date.as_deref(), order.invoice_date_parsed())
    ));
    if order.payment_date.is_some() {
        output.push_str(&format!(
            "Paid: {}\n",
            dated(order.payment_date.as_deref(), order.payment_date_parsed())
        ));
    }
    if let Some(card) = &order.credit_card {
        output.push_str(&format!("Payment: {}\n", card));
    }

    output.push_str(&format!("\n--- ITEMS ({}) ---\n", receipt.items.len()));
    for (i, item) in receipt.items.iter().enumerate() {
        output.push_str(&format!(
            "{}. [{}] {}\n",
            i + 1,
            if item.sku.is_empty() { "no sku" } else { &item.sku },
            item.description
        ));
        output.push_str(&format!(
            "   Qty: {}  Unit: {}  Total: {}\n",
            opt(item.received_quantity()),
            opt(item.unit_price),
            opt(item.line_total)
        ));
    }

    output.push_str("\n--- TOTALS ---\n");
    output.push_str(&format!("Merchandise: {}\n", opt(order.merchandise)));
    output.push_str(&format!("Shipping: {}\n", opt(order.shipping)));
    output.push_str(&format!("Sales tax: {}\n", opt(order.sales_tax)));
    output.push_str(&format!("Total: {}\n", opt(order.total)));
    output.push_str(&format!("Sum of lines: {}\n", receipt.items_total()));

    output
}

/// Printed date followed by its ISO form when it could be read.
fn dated<D: std::fmt::Display>(raw: Option<&str>, parsed: Option<D>) -> String {
    match (raw, parsed) {
        (Some(raw), Some(date)) => format!("{} ({})", raw, date),
        (Some(raw), None) => raw.to_string(),
        (None, _) => "-".to_string(),
    }
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
