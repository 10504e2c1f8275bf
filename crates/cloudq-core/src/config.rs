use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::filters::Defaults;
use crate::retry::Backoff;

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per lookup, including the first.
    pub tries: u32,
    /// Wait before the first retry, in seconds.
    pub delay_secs: u64,
    /// Multiplier applied to the wait after every retry.
    pub backoff: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            tries: 10,
            delay_secs: 3,
            backoff: 2,
        }
    }
}

/// Global configuration loaded from `~/.config/cloudq/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudqConfig {
    /// Region used when a call does not name one.
    #[serde(default)]
    pub default_region: Option<String>,
    /// Named credential profile used when a call does not name one.
    #[serde(default)]
    pub default_profile: Option<String>,
    /// Inventory snapshot served by the offline provider.
    #[serde(default)]
    pub inventory: Option<PathBuf>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl CloudqConfig {
    pub fn backoff(&self) -> Backoff {
        self.retry.as_ref().map(Backoff::from).unwrap_or_default()
    }

    pub fn defaults(&self) -> Defaults {
        Defaults {
            region: self.default_region.clone(),
            profile: self.default_profile.clone(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cloudq")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CloudqConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CloudqConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

pub fn load_from(path: &Path) -> Result<CloudqConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: CloudqConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
