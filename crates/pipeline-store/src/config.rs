//! Store Configuration
//!
//! Where the database and logs live, and whether to seed default stages.
//! Loaded from a JSON file; every field has a default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DB_FILE_NAME: &str = "pipeline_board.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite file, or `:memory:`
    pub db_path: PathBuf,
    /// Rolling log directory; logging is left alone when unset
    pub log_dir: Option<PathBuf>,
    /// Used for the log file name
    pub app_name: String,
    pub seed_default_stages: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DB_FILE_NAME),
            log_dir: None,
            app_name: "PipelineBoard".to_string(),
            seed_default_stages: true,
        }
    }
}

impl StoreConfig {
    /// Database and logs under one application directory
    pub fn in_dir(app_dir: &Path) -> Self {
        Self {
            db_path: app_dir.join(DB_FILE_NAME),
            log_dir: Some(app_dir.join("logs")),
            ..Self::default()
        }
    }

    /// Throwaway configuration for tests and previews
    pub fn in_memory() -> Self {
        Self {
            db_path: PathBuf::from(":memory:"),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid config: {}", e))
    }

    /// Read a config file. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, String> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json_str(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(format!("Failed to read config {}: {}", path.display(), e)),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write config: {}", e))
    }
}
