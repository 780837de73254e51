use crate::constants::{cache, cache_ttl, env_vars};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runtime configuration for the aggregation engine.
///
/// Loaded from a TOML file in the platform config directory, with
/// environment variable overrides for the cache settings. Every field
/// has a sensible default so a missing config file is not an error.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Number of entries the division cache can hold
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// TTL for aggregated division data, in seconds
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,

    /// Optional custom log file path
    #[serde(default)]
    pub log_file_path: Option<String>,
}

fn default_cache_capacity() -> usize {
    cache::DEFAULT_CAPACITY
}

fn default_cache_ttl_seconds() -> u64 {
    cache_ttl::DIVISION_DATA_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cache_capacity: default_cache_capacity(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
            log_file_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from the default config path, falling back to
    /// defaults when the file does not exist. Environment variable
    /// overrides are applied on top of whatever was loaded.
    pub async fn load() -> Result<Self, AppError> {
        let config_path = Config::get_config_path();
        let mut config = Self::load_from_path(&config_path).await?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads configuration from an explicit path. A missing file yields
    /// the default configuration.
    pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves configuration to the default config path, creating the
    /// config directory if needed.
    pub async fn save(&self) -> Result<(), AppError> {
        self.save_to_path(Config::get_config_path()).await
    }

    /// Saves configuration to an explicit path.
    pub async fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), AppError> {
        let path = path.as_ref();
        if let Some(config_dir) = path.parent()
            && !config_dir.exists()
        {
            tokio::fs::create_dir_all(config_dir).await?;
        }

        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Some(ttl) = read_env_var(env_vars::CACHE_TTL) {
            self.cache_ttl_seconds = ttl;
        }
        if let Some(capacity) = read_env_var(env_vars::CACHE_CAPACITY) {
            self.cache_capacity = capacity;
        }
        if let Ok(path) = std::env::var(env_vars::LOG_FILE)
            && !path.trim().is_empty()
        {
            self.log_file_path = Some(path);
        }
    }

    pub fn get_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| Path::new(".").to_path_buf())
            .join("darts_division")
            .join("config.toml")
    }

    pub fn get_log_dir_path() -> String {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| Path::new(".").to_path_buf())
            .join("darts_division")
            .join("logs")
            .to_string_lossy()
            .to_string()
    }
}

fn read_env_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}
