//! `AppConfig` struct and TOML loading.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable overriding `api.base_url`.
pub const BACKEND_URL_ENV: &str = "REELVIEW_BACKEND_URL";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Catalog API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Home view settings.
    #[serde(default)]
    pub home: HomeConfig,
}

/// Catalog API settings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// API origin; `/api` is appended by the client.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Home view settings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HomeConfig {
    /// Genre rows, in display order.
    #[serde(default = "default_genres")]
    pub genres: Vec<String>,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            genres: default_genres(),
        }
    }
}

fn default_base_url() -> String {
    String::from("http://localhost:8001")
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_genres() -> Vec<String> {
    reelview_core::DEFAULT_GENRES
        .iter()
        .map(|g| String::from(*g))
        .collect()
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Resolves the API origin.
    ///
    /// Precedence: `flag`, then `env` (the value of [`BACKEND_URL_ENV`]),
    /// then `api.base_url`. Blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen value is not a valid URL.
    pub fn base_url(&self, flag: Option<&str>, env: Option<&str>) -> Result<Url> {
        let raw = [flag, env]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .unwrap_or(self.api.base_url.as_str());
        Url::parse(raw).with_context(|| format!("invalid base URL: {raw}"))
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}
