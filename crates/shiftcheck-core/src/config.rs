//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the backend base address, the request timeout and the
//! last used username.
//!
//! Configuration is stored at `~/.config/shiftcheck/config.json`. The
//! `SHIFTCHECK_API_URL` and `SHIFTCHECK_TIMEOUT_SECS` environment variables
//! override the file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application name used for config directory paths
const APP_NAME: &str = "shiftcheck";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Production backend
pub const DEFAULT_API_BASE_URL: &str = "https://quimioshub-production.up.railway.app/api/";

/// HTTP request timeout in seconds. A request gets exactly one attempt.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const API_URL_ENV: &str = "SHIFTCHECK_API_URL";
pub const TIMEOUT_ENV: &str = "SHIFTCHECK_TIMEOUT_SECS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub last_username: Option<String>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_timeout_secs(),
            last_username: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Load the config file (defaults if it is unusable), then apply
    /// environment overrides.
    pub fn load_with_env() -> Self {
        let mut config = match Self::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        };
        config.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(TIMEOUT_ENV).ok(),
        );
        config
    }

    fn apply_overrides(&mut self, api_url: Option<String>, timeout: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(raw) = timeout {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.request_timeout_secs = secs,
                _ => warn!(value = %raw, "Ignoring invalid {}", TIMEOUT_ENV),
            }
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

    /// Validated base address, always ending in `/`
    pub fn base_url(&self) -> Result<String> {
        let normalized = normalize_base_url(&self.api_base_url);
        let parsed = reqwest::Url::parse(&normalized)
            .with_context(|| format!("Invalid API base URL: {}", self.api_base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("API base URL must be http(s): {}", self.api_base_url);
        }
        Ok(normalized)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

/// Join a relative endpoint path onto a base address
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}{}",
        normalize_base_url(base_url),
        path.trim_start_matches('/')
    )
}
