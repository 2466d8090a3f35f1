//! Detect command - report which vendor issued each receipt.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::warn;

use studio_core::{DefaultExtractor, Document, ParserRegistry};

/// Arguments for the detect command.
#[derive(Args)]
pub struct DetectArgs {
    /// Receipt files (PDF or text dump)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

pub fn run(args: DetectArgs) -> anyhow::Result<()> {
    let extractor = DefaultExtractor::new();
    let registry = ParserRegistry::default();

    for path in &args.inputs {
        if !path.exists() {
            warn!("Input file not found: {}", path.display());
        }

        let document = Document::new(path, &extractor);
        match registry.pick_parser(&document) {
            Some(parser) => println!("{}: {}", path.display(), style(parser.vendor()).green()),
            None => println!("{}: {}", path.display(), style("unrecognized").yellow()),
        }
    }

    Ok(())
}
