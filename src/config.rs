use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::{nlog_debug, Error, Result};

const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/processingnodes/?has_available_options=True";
const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub endpoint: Option<String>,
    pub retry_delay_ms: Option<u64>,
    pub fetch_timeout_ms: Option<u64>,
}

impl Config {
    pub fn nodeform_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".nodeform"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::nodeform_dir()?.join("nodeform.toml"))
    }

    pub fn effective_endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms.unwrap_or(DEFAULT_RETRY_DELAY_MS))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms.unwrap_or(DEFAULT_FETCH_TIMEOUT_MS))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        nlog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            nlog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(&path)?)?;
        nlog_debug!(
            "Config loaded: endpoint={:?}, retry_delay_ms={:?}, fetch_timeout_ms={:?}",
            config.endpoint,
            config.retry_delay_ms,
            config.fetch_timeout_ms
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let dir = Self::nodeform_dir()?;
        if !dir.exists() {
            nlog_debug!("Creating nodeform directory: {}", dir.display());
            fs::create_dir_all(&dir)?;
        }
        let path = Self::config_path()?;
        fs::write(&path, toml::to_string_pretty(self)?)?;
        nlog_debug!("Config saved to {}", path.display());
        Ok(())
    }
}
