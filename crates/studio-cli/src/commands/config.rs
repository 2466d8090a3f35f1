//! Config command - manage configuration.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use studio_core::StudioConfig;

use super::{load_config, GlobalArgs};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "ingest.pattern")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,

    /// Show where the database and receipts live
    Workspace {
        /// Create the workspace directories
        #[arg(long)]
        create: bool,
    },
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, globals: &GlobalArgs<'_>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(globals),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Get { key } => get_config(&key),
        ConfigCommand::Set { key, value } => set_config(&key, &value),
        ConfigCommand::Path => show_path(),
        ConfigCommand::Workspace { create } => show_workspace(globals, create),
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("studio-inventory")
        .join("config.json")
}

fn load_or_default() -> anyhow::Result<StudioConfig> {
    let config_path = default_config_path();
    if config_path.exists() {
        Ok(StudioConfig::from_file(&config_path)?)
    } else {
        Ok(StudioConfig::default())
    }
}

/// Effective configuration, with the workspace root already resolved.
fn show_config(globals: &GlobalArgs<'_>) -> anyhow::Result<()> {
    if globals.config.is_none() && !default_config_path().exists() {
        println!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }

    let config = load_config(globals)?;
    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn show_workspace(globals: &GlobalArgs<'_>, create: bool) -> anyhow::Result<()> {
    let config = load_config(globals)?;

    if create {
        let root = config.ensure_workspace()?;
        println!(
            "{} Workspace ready at {}",
            style("✓").green(),
            root.display()
        );
    }

    let status = |path: &std::path::Path| {
        if path.exists() {
            style("exists").green()
        } else {
            style("missing").yellow()
        }
    };

    let database = config.database_path();
    let receipts = config.receipts_path();
    println!("Root:     {} ({})", config.workspace.root.display(), status(&config.workspace.root));
    println!("Database: {} ({})", database.display(), status(&database));
    println!("Receipts: {} ({})", receipts.display(), status(&receipts));
    println!("Ingest:   {}", config.receipts_glob());

    Ok(())
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(default_config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = StudioConfig::default();
    config.save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(load_or_default()?)?;
    let value = lookup(&json, key)?;
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn set_config(key: &str, value: &str) -> anyhow::Result<()> {
    let config_path = default_config_path();
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Bare words are stored as strings
    let parsed_value: serde_json::Value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

    let mut json = serde_json::to_value(load_or_default()?)?;
    assign(&mut json, key, parsed_value.clone())?;

    let config: StudioConfig = serde_json::from_value(json)?;
    config.save(&config_path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );

    Ok(())
}

fn show_path() -> anyhow::Result<()> {
    let config_path = default_config_path();

    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'studio-inv config init' to create a configuration file.");
    }

    Ok(())
}

/// Follow a dotted key through nested objects.
fn lookup<'a>(json: &'a serde_json::Value, key: &str) -> anyhow::Result<&'a serde_json::Value> {
    let mut current = json;
    for part in key.split('.') {
        current = current
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    }
    Ok(current)
}

fn assign(json: &mut serde_json::Value, key: &str, value: serde_json::Value) -> anyhow::Result<()> {
    let (parent_path, last) = match key.rsplit_once('.') {
        Some((parent, last)) => (Some(parent), last),
        None => (None, key),
    };

    let mut current = json;
    if let Some(parent_path) = parent_path {
        for part in parent_path.split('.') {
            current = current
                .get_mut(part)
                .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
        }
    }

    match current.as_object_mut() {
        Some(obj) => {
            obj.insert(last.to_string(), value);
            Ok(())
        }
        None => anyhow::bail!("Cannot set value at non-object path"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested_key() {
        let json = serde_json::to_value(StudioConfig::default()).unwrap();
        assert_eq!(lookup(&json, "ingest.pattern").unwrap(), &json!("*.pdf"));
        assert!(lookup(&json, "ingest.missing").is_err());
    }

    #[test]
    fn test_assign_round_trips_through_config() {
        let mut json = serde_json::to_value(StudioConfig::default()).unwrap();
        assign(&mut json, "ingest.continue_on_error", json!(false)).unwrap();
        assign(&mut json, "workspace.database", json!("parts.sqlite")).unwrap();

        let config: StudioConfig = serde_json::from_value(json).unwrap();
        assert!(!config.ingest.continue_on_error);
        assert_eq!(config.workspace.database, PathBuf::from("parts.sqlite"));
    }

    #[test]
    fn test_assign_rejects_scalar_parent() {
        let mut json = serde_json::to_value(StudioConfig::default()).unwrap();
        assert!(assign(&mut json, "ingest.pattern.deep", json!(1)).is_err());
    }
}
