//! Configuration management for podview
//!
//! Config is stored at ~/.config/podview/config.toml. Every field is
//! optional; missing values fall back to built-in defaults.

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_CATALOG_URL;

/// Environment override for the catalog base URL
pub const CATALOG_URL_ENV: &str = "PODVIEW_CATALOG_URL";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// Catalog base URL
    pub catalog_url: Option<String>,
    /// Player binary (defaults to mpv)
    pub player: Option<String>,
}

impl Config {
    /// Get config file path (~/.config/podview/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("podview").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| Self::load_from(&p).ok())
            .unwrap_or_default()
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Catalog URL with fallback chain:
    /// 1. Explicit override (command line)
    /// 2. Environment variable PODVIEW_CATALOG_URL
    /// 3. Config file
    /// 4. Public catalog
    pub fn catalog_url(&self, explicit: Option<&str>) -> String {
        Self::resolve_catalog_url(
            explicit,
            std::env::var(CATALOG_URL_ENV).ok().as_deref(),
            self.catalog_url.as_deref(),
        )
    }

    fn resolve_catalog_url(
        explicit: Option<&str>,
        env: Option<&str>,
        file: Option<&str>,
    ) -> String {
        [explicit, env, file]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(DEFAULT_CATALOG_URL)
            .to_string()
    }

    /// Player binary to launch
    pub fn player(&self) -> &str {
        self.player.as_deref().unwrap_or("mpv")
    }
}
