use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_DIR: &str = "everhour-tui";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EverhourConfig {
    /// Base URL of the Everhour API, e.g. "https://api.everhour.com"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Add a task to the weekly plan when its timer is started.
    #[serde(default = "default_auto_add_to_weekly")]
    pub auto_add_to_weekly: bool,
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_url() -> String {
    everhour::DEFAULT_API_URL.to_string()
}

fn default_auto_add_to_weekly() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EverhourConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            auto_add_to_weekly: default_auto_add_to_weekly(),
            log_level: default_log_level(),
        }
    }
}

impl EverhourConfig {
    fn root_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join(APP_DIR))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::root_path()?.join("config.toml"))
    }

    pub fn token_path() -> Result<PathBuf> {
        Ok(Self::root_path()?.join("token"))
    }

    pub fn state_path() -> Result<PathBuf> {
        Ok(Self::root_path()?.join("state.json"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::root_path()?.join("everhour-tui.log"))
    }

    /// Load config from disk. Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(&path, raw)?;
        Ok(())
    }

    /// Config path, writing the defaults first if no file exists yet.
    pub fn ensure_exists() -> Result<PathBuf> {
        let path = Self::config_path()?;
        if !path.exists() {
            Self::default().save()?;
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let cfg = EverhourConfig::from_toml("auto_add_to_weekly = false").unwrap();
        assert_eq!(cfg.api_url, "https://api.everhour.com");
        assert_eq!(cfg.api_url, everhour::DEFAULT_API_URL);
        assert!(!cfg.auto_add_to_weekly);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn default_round_trips_through_toml() {
        let raw = toml::to_string_pretty(&EverhourConfig::default()).unwrap();
        assert_eq!(
            EverhourConfig::from_toml(&raw).unwrap(),
            EverhourConfig::default()
        );
    }
}
