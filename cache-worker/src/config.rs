//! Cache name and precache manifest
//!
//! Bump `cache_name` whenever the manifest changes; activation deletes every
//! cache with another name.
//!
//! ```toml
//! cache_name = "taxi-cache-v3"
//! manifest = ["/", "/about", "/static/css/style.css"]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::WorkerError;

pub const DEFAULT_CACHE_NAME: &str = "taxi-cache-v2";

pub const DEFAULT_MANIFEST: [&str; 16] = [
    "/",
    "/about",
    "/pricing",
    "/contacts",
    "/terms",
    "/privacy",
    "/static/css/style.css",
    "/static/js/main.js",
    "/static/js/calculator.js",
    "/static/img/hero-bg.jpg",
    "/static/img/economy.jpg",
    "/static/img/comfort.jpg",
    "/static/img/business.jpg",
    "/static/img/premium.jpg",
    "/static/img/placeholder.jpg",
    "/static/img/favicon.ico",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Versioned name of the one cache this worker keeps.
    pub cache_name: String,
    /// Paths precached at install, in order.
    pub manifest: Vec<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            manifest: DEFAULT_MANIFEST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl WorkerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, WorkerError> {
        let config: WorkerConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, WorkerError> {
        let source = std::fs::read_to_string(path).map_err(|source| WorkerError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        log::info!(
            "[AssetCache] loaded manifest of {} paths from {}",
            config.manifest.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WorkerError> {
        if self.cache_name.trim().is_empty() {
            return Err(WorkerError::ManifestInvalid(
                "cache_name must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for url in &self.manifest {
            if url.trim().is_empty() {
                return Err(WorkerError::ManifestInvalid(
                    "manifest contains an empty path".to_string(),
                ));
            }
            if !seen.insert(url.as_str()) {
                return Err(WorkerError::ManifestInvalid(format!(
                    "duplicate manifest path {url}"
                )));
            }
        }
        Ok(())
    }
}
