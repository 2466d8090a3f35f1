//! CLI application for studio inventory receipt ingestion.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, detect, ingest, parse, remove};

/// Studio inventory - ingest vendor receipts into the parts database
#[derive(Parser)]
#[command(name = "studio-inv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Workspace root (overrides STUDIO_INV_HOME)
    #[arg(long, global = true)]
    home: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report which vendor issued each receipt
    Detect(detect::DetectArgs),

    /// Parse a single receipt
    Parse(parse::ParseArgs),

    /// Parse receipts and add them to the inventory database
    Ingest(ingest::IngestArgs),

    /// Log parts taken out of inventory
    Remove(remove::RemoveArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let globals = commands::GlobalArgs {
        config: cli.config.as_deref(),
        home: cli.home.as_deref(),
    };

    match cli.command {
        Commands::Detect(args) => detect::run(args),
        Commands::Parse(args) => parse::run(args, &globals),
        Commands::Ingest(args) => ingest::run(args, &globals),
        Commands::Remove(args) => remove::run(args, &globals),
        Commands::Config(args) => config::run(args, &globals),
    }
}
