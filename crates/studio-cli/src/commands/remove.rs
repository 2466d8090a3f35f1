//! Remove command - log parts taken out of inventory.

use std::path::PathBuf;

use clap::Args;
use console::style;

use studio_core::Store;

use super::{load_config, GlobalArgs};

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Part key, `vendor:sku`
    part_key: String,

    /// Number of units removed
    qty: u32,

    /// Project the parts went to
    #[arg(short, long)]
    project: Option<String>,

    /// Free-form note
    #[arg(short, long)]
    note: Option<String>,

    /// Database file (default: the workspace database)
    #[arg(long)]
    db: Option<PathBuf>,
}

pub fn run(args: RemoveArgs, globals: &GlobalArgs<'_>) -> anyhow::Result<()> {
    let db_path = match args.db {
        Some(path) => path,
        None => load_config(globals)?.database_path(),
    };

    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'studio-inv ingest' first.",
            db_path.display()
        );
    }

    let store = Store::open(&db_path)?;
    let removal_uid = store.log_removal(
        &args.part_key,
        args.qty,
        args.project.as_deref(),
        args.note.as_deref(),
    )?;

    println!(
        "{} Removed {} x {} ({})",
        style("✓").green(),
        args.qty,
        args.part_key,
        removal_uid
    );

    if let Some(part) = store.part(&args.part_key)? {
        let on_hand = if part.on_hand < 0 {
            style(part.on_hand).red()
        } else {
            style(part.on_hand).green()
        };
        println!("   {} on hand", on_hand);
    }

    Ok(())
}
