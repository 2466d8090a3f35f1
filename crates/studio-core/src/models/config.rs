//! Configuration structures for the ingestion workspace.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the workspace root.
pub const WORKSPACE_ENV: &str = "STUDIO_INV_HOME";

/// Directory name used under the home directory when nothing is configured.
pub const DEFAULT_WORKSPACE_DIR: &str = "StudioInventory";

/// Main configuration for studio inventory.
///
/// The library never reads the environment itself; callers resolve the
/// workspace root once and pass this struct down.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Workspace layout.
    pub workspace: WorkspaceConfig,

    /// Receipt ingestion options.
    pub ingest: IngestConfig,
}

/// Where runtime data lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Root directory for the database and receipts.
    pub root: PathBuf,

    /// SQLite file name, relative to `root` unless absolute.
    pub database: PathBuf,

    /// Directory scanned for receipts, relative to `root` unless absolute.
    pub receipts_dir: PathBuf,

    /// Subdirectories created by `ensure_workspace`.
    pub subdirs: Vec<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_WORKSPACE_DIR),
            database: PathBuf::from("studio_inventory.sqlite"),
            receipts_dir: PathBuf::from("receipts"),
            subdirs: ["receipts", "exports", "log", "label_presets", "secrets"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Receipt ingestion options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// File name pattern searched inside the receipts directory.
    pub pattern: String,

    /// Keep going when one receipt fails to parse.
    pub continue_on_error: bool,

    /// Print intermediate extraction values.
    pub debug: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            pattern: "*.pdf".to_string(),
            continue_on_error: true,
            debug: false,
        }
    }
}

impl StudioConfig {
    /// Configuration rooted at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.workspace.root = root.into();
        config
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Full path to the SQLite database.
    pub fn database_path(&self) -> PathBuf {
        self.workspace.root.join(&self.workspace.database)
    }

    /// Full path to the receipts directory.
    pub fn receipts_path(&self) -> PathBuf {
        self.workspace.root.join(&self.workspace.receipts_dir)
    }

    /// Glob pattern matching every receipt in the workspace.
    pub fn receipts_glob(&self) -> String {
        self.receipts_path()
            .join(&self.ingest.pattern)
            .display()
            .to_string()
    }

    /// Create the root and its subdirectories.
    pub fn ensure_workspace(&self) -> Result<&Path, std::io::Error> {
        let root = self.workspace.root.as_path();
        std::fs::create_dir_all(root)?;
        for dir in &self.workspace.subdirs {
            std::fs::create_dir_all(root.join(dir))?;
        }
        Ok(root)
    }
}

/// Pick the workspace root: an explicit override wins, then `home/StudioInventory`.
///
/// `override_root` is normally the value of [`WORKSPACE_ENV`]; a leading `~`
/// is expanded against `home`.
pub fn resolve_workspace_root(override_root: Option<&str>, home: Option<&Path>) -> PathBuf {
    let home = home.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

    match override_root.map(str::trim).filter(|s| !s.is_empty()) {
        Some("~") => home,
        Some(s) if s.starts_with("~/") => home.join(&s[2..]),
        Some(s) => PathBuf::from(s),
        None => home.join(DEFAULT_WORKSPACE_DIR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_paths_are_relative_to_root() {
        let config = StudioConfig::with_root("/srv/studio");
        assert_eq!(config.database_path(), PathBuf::from("/srv/studio/studio_inventory.sqlite"));
        assert_eq!(config.receipts_path(), PathBuf::from("/srv/studio/receipts"));
        assert_eq!(config.receipts_glob(), "/srv/studio/receipts/*.pdf");
    }

    #[test]
    fn test_absolute_database_overrides_root() {
        let mut config = StudioConfig::with_root("/srv/studio");
        config.workspace.database = PathBuf::from("/var/db/inv.sqlite");
        assert_eq!(config.database_path(), PathBuf::from("/var/db/inv.sqlite"));
    }

    #[test]
    fn test_resolve_workspace_root() {
        let home = Path::new("/home/ana");
        assert_eq!(
            resolve_workspace_root(None, Some(home)),
            PathBuf::from("/home/ana/StudioInventory")
        );
        assert_eq!(
            resolve_workspace_root(Some("~/inv"), Some(home)),
            PathBuf::from("/home/ana/inv")
        );
        assert_eq!(
            resolve_workspace_root(Some("/data/inv"), Some(home)),
            PathBuf::from("/data/inv")
        );
        assert_eq!(
            resolve_workspace_root(Some("  "), Some(home)),
            PathBuf::from("/home/ana/StudioInventory")
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = StudioConfig::with_root(dir.path());
        config.ingest.debug = true;
        config.save(&path).unwrap();

        let loaded = StudioConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"ingest": {"continue_on_error": false}}"#).unwrap();

        let loaded = StudioConfig::from_file(&path).unwrap();
        assert!(!loaded.ingest.continue_on_error);
        assert_eq!(loaded.ingest.pattern, "*.pdf");
        assert_eq!(loaded.workspace, WorkspaceConfig::default());
    }

    #[test]
    fn test_ensure_workspace_creates_subdirs() {
        let dir = tempfile::tempdir().unwrap();
        let config = StudioConfig::with_root(dir.path().join("inv"));
        config.ensure_workspace().unwrap();
        assert!(dir.path().join("inv/receipts").is_dir());
        assert!(dir.path().join("inv/secrets").is_dir());
    }
}
