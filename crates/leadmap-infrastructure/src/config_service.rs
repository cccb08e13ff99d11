//! Configuration service implementation.
//!
//! Loads `LeadmapConfig` from `~/.config/leadmap/config.toml` and applies the
//! backend credential overrides from the environment.

use crate::paths::LeadmapPaths;
use leadmap_core::config::LeadmapConfig;
use leadmap_core::error::{LeadmapError, Result};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// Environment variable overriding `backend.url`.
pub const ENV_BACKEND_URL: &str = "LEADMAP_BACKEND_URL";
/// Environment variable overriding `backend.anon_key`.
pub const ENV_BACKEND_ANON_KEY: &str = "LEADMAP_BACKEND_ANON_KEY";

/// Configuration service that loads and caches the configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<LeadmapConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the platform config file.
    pub fn new() -> Result<Self> {
        let path = LeadmapPaths::default()
            .config_file()
            .map_err(|e| LeadmapError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service reading an explicit file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Gets the configuration, loading from file and environment if not cached.
    pub fn get_config(&self) -> Result<LeadmapConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.load_file()?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        tracing::debug!("[ConfigService] Loaded configuration from {:?}", self.path);

        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }

    /// Reads the TOML file; a missing file yields the defaults.
    fn load_file(&self) -> Result<LeadmapConfig> {
        if !self.path.exists() {
            tracing::info!(
                "[ConfigService] No config file at {:?}, using defaults",
                self.path
            );
            return Ok(LeadmapConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config: LeadmapConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Applies the credential overrides. `lookup` abstracts the environment.
pub fn apply_env_overrides<F>(config: &mut LeadmapConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
        config.backend.url = url;
    }
    if let Some(key) = lookup(ENV_BACKEND_ANON_KEY).filter(|v| !v.trim().is_empty()) {
        config.backend.anon_key = key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let service = ConfigService::with_path(dir.path().join("config.toml"));
        let config = service.load_file().unwrap();
        assert_eq!(config, LeadmapConfig::default());
    }

    #[test]
    fn test_loads_and_caches_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[backend]\nurl = \"https://p.supabase.co\"\nanon_key = \"k\"\n",
        )
        .unwrap();

        let service = ConfigService::with_path(&path);
        let first = service.load_file().unwrap();
        assert_eq!(first.backend.url, "https://p.supabase.co");

        // Cached value survives a file change until invalidated
        *service.config.write().unwrap() = Some(first.clone());
        std::fs::write(&path, "[backend]\nurl = \"https://other.supabase.co\"\n").unwrap();
        assert_eq!(service.get_config().unwrap().backend.url, first.backend.url);

        service.invalidate_cache();
        assert!(service.config.read().unwrap().is_none());
    }

    #[test]
    fn test_malformed_file_is_serialization_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[backend\nurl = ").unwrap();

        let err = ConfigService::with_path(&path).load_file().unwrap_err();
        assert!(matches!(err, LeadmapError::Serialization { .. }));
    }

    #[test]
    fn test_env_overrides_credentials_only_when_set() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BACKEND_URL, "https://env.supabase.co"),
            (ENV_BACKEND_ANON_KEY, "  "),
        ]);
        let mut config = LeadmapConfig::default();
        config.backend.anon_key = "from-file".to_string();

        apply_env_overrides(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.backend.url, "https://env.supabase.co");
        assert_eq!(config.backend.anon_key, "from-file");
    }
}
