//! CLI subcommands.

pub mod config;
pub mod detect;
pub mod ingest;
pub mod parse;
pub mod remove;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use studio_core::models::config::{resolve_workspace_root, WORKSPACE_ENV};
use studio_core::StudioConfig;

/// Options shared by every subcommand.
pub struct GlobalArgs<'a> {
    pub config: Option<&'a str>,
    pub home: Option<&'a str>,
}

/// Load configuration and settle the workspace root.
///
/// Root precedence: `--home`, then `STUDIO_INV_HOME`, then the config file
/// (relative roots live under the home directory).
pub fn load_config(globals: &GlobalArgs<'_>) -> anyhow::Result<StudioConfig> {
    let mut config = match globals.config {
        Some(path) => StudioConfig::from_file(Path::new(path))
            .with_context(|| format!("failed to load config from {}", path))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                StudioConfig::from_file(&default_path).with_context(|| {
                    format!("failed to load config from {}", default_path.display())
                })?
            } else {
                StudioConfig::default()
            }
        }
    };

    let home = dirs::home_dir();
    let env_root = std::env::var(WORKSPACE_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty());

    config.workspace.root = match (globals.home, env_root) {
        (Some(root), _) => resolve_workspace_root(Some(root), home.as_deref()),
        (None, Some(root)) => resolve_workspace_root(Some(&root), home.as_deref()),
        (None, None) if config.workspace.root.is_relative() => home
            .unwrap_or_else(|| PathBuf::from("."))
            .join(&config.workspace.root),
        (None, None) => config.workspace.root,
    };

    debug!("workspace root: {}", config.workspace.root.display());
    Ok(config)
}
