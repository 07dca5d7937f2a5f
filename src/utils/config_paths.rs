//! Settings file handling
//!
//! Lookup order for the settings file:
//! - `--config <path>` (must exist)
//! - `$PROCTREE_CONFIG` (must exist)
//! - `~/.proctree/config.json` (optional)
//!
//! Command-line flags override whatever the file says.

use crate::config::{CONFIG_DIRECTORY, CONFIG_ENV, CONFIG_FILE_NAME, PROC_DIR_ENV};
use crate::error::{errors, ProctreeResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// User settings (read from config.json)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// procfs mount to read instead of asking the OS through psutil
    pub proc_dir: Option<PathBuf>,
    pub root_pid: Option<u32>,
    pub max_depth: Option<usize>,
    /// tracing filter directive, e.g. `debug` or `proctree=trace`
    pub log_level: Option<String>,
}

impl Settings {
    /// Load from a file; a missing file gives defaults, a broken one an error
    pub fn load(path: &Path) -> ProctreeResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|err| {
            errors::filesystem_error_with_source(
                "cannot read settings file",
                path.display().to_string(),
                err,
            )
        })?;
        serde_json::from_str(&content).map_err(|err| {
            errors::config_error(
                format!("invalid settings file {}: {}", path.display(), err),
                Some(path.display().to_string()),
            )
        })
    }

    /// Resolve the settings file location and load it
    pub fn load_from(explicit: Option<&Path>) -> ProctreeResult<Self> {
        let required = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let settings = match required {
            Some(path) if !path.exists() => {
                return Err(errors::config_error(
                    format!("settings file {} does not exist", path.display()),
                    Some(path.display().to_string()),
                ));
            }
            Some(path) => Self::load(&path)?,
            None => match default_settings_path() {
                Some(path) => Self::load(&path)?,
                None => Self::default(),
            },
        };

        Ok(settings.with_env_overrides())
    }

    /// `PROCTREE_PROC_DIR` wins over the file's `proc_dir`
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = std::env::var_os(PROC_DIR_ENV).filter(|dir| !dir.is_empty()) {
            self.proc_dir = Some(PathBuf::from(dir));
        }
        self
    }
}

/// `~/.proctree/config.json`, when a home directory is known
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIRECTORY).join(CONFIG_FILE_NAME))
}
