//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the fetch origin and the last used email address.
//!
//! Configuration is stored at `~/.config/gametrail/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data/cache directory paths
const APP_NAME: &str = "gametrail";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the data directory, useful in tests
/// and local development
const DATA_DIR_ENV: &str = "GAMETRAIL_DATA_DIR";

/// Origin used for same-origin fetches when none is configured
const DEFAULT_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub origin: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the persistence store.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Directory for the offline cache buckets.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn origin(&self) -> &str {
        self.origin.as_deref().unwrap_or(DEFAULT_ORIGIN)
    }
}
