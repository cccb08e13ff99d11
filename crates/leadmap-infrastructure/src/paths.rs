//! Unified path management for LeadMap files.
//!
//! ```text
//! ~/.config/leadmap/           # Config directory
//! └── config.toml              # Backend credentials, automation and auth settings
//!
//! ~/.local/share/leadmap/      # Data directory
//! └── session.json             # Persisted auth session
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "leadmap";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves LeadMap directories, optionally rooted somewhere other than the
/// platform defaults (tests, portable installs).
#[derive(Debug, Clone, Default)]
pub struct LeadmapPaths {
    base: Option<PathBuf>,
}

impl LeadmapPaths {
    /// `base = None` uses the platform directories.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the configuration directory (e.g., `~/.config/leadmap/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.join("config")),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the data directory (e.g., `~/.local/share/leadmap/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("session.json"))
    }
}
