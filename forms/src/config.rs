//! Form configuration
//!
//! Loaded from TOML; every key is optional and falls back to the built-in
//! defaults.
//!
//! ```toml
//! debounce_ms = 300
//! min_query_chars = 2
//! auto_calculate_ms = 500
//! countdown_secs = 5
//! suggestion_hide_ms = 200
//!
//! [endpoints]
//! suggest_cities = "/api/suggest-cities"
//! calculate_distance = "/api/calculate-distance"
//! submit_request = "/submit-request"
//! ```

use core::time::Duration;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::transport::Endpoint;

/// Backend paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub suggest_cities: String,
    pub calculate_distance: String,
    pub submit_request: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            suggest_cities: "/api/suggest-cities".to_string(),
            calculate_distance: "/api/calculate-distance".to_string(),
            submit_request: "/submit-request".to_string(),
        }
    }
}

impl Endpoints {
    pub fn path(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::SuggestCities => &self.suggest_cities,
            Endpoint::CalculateDistance => &self.calculate_distance,
            Endpoint::SubmitRequest => &self.submit_request,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    pub endpoints: Endpoints,
    /// Quiet period before a suggestion lookup is sent.
    pub debounce_ms: u64,
    /// Shortest trimmed query that is looked up.
    pub min_query_chars: usize,
    /// Delay between picking the second city and the automatic calculation.
    pub auto_calculate_ms: u64,
    /// Lifetime of the booking confirmation dialog.
    pub countdown_secs: u32,
    /// Delay between a city field losing focus and its list closing.
    pub suggestion_hide_ms: u64,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            debounce_ms: 300,
            min_query_chars: 2,
            auto_calculate_ms: 500,
            countdown_secs: 5,
            suggestion_hide_ms: 200,
        }
    }
}

impl FormsConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, FormError> {
        let config: FormsConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, FormError> {
        let source = std::fs::read_to_string(path).map_err(|source| FormError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        log::info!("[Config] loaded form settings from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FormError> {
        for endpoint in [
            Endpoint::SuggestCities,
            Endpoint::CalculateDistance,
            Endpoint::SubmitRequest,
        ] {
            let path = self.endpoints.path(endpoint);
            if !path.starts_with('/') {
                return Err(FormError::InvalidConfig(format!(
                    "{} endpoint must be an absolute path, got {path:?}",
                    endpoint.as_str()
                )));
            }
        }
        if self.min_query_chars == 0 {
            return Err(FormError::InvalidConfig(
                "min_query_chars must be at least 1".to_string(),
            ));
        }
        if self.countdown_secs == 0 {
            return Err(FormError::InvalidConfig(
                "countdown_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn auto_calculate_delay(&self) -> Duration {
        Duration::from_millis(self.auto_calculate_ms)
    }

    pub fn suggestion_hide_delay(&self) -> Duration {
        Duration::from_millis(self.suggestion_hide_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_site_behaviour() {
        let config = FormsConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.min_query_chars, 2);
        assert_eq!(config.auto_calculate_delay(), Duration::from_millis(500));
        assert_eq!(config.countdown_secs, 5);
        assert_eq!(config.endpoints.path(Endpoint::SubmitRequest), "/submit-request");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let config = FormsConfig::from_toml_str(
            r#"
            debounce_ms = 150

            [endpoints]
            suggest_cities = "/v2/suggest"
            "#,
        )
        .unwrap();
        assert_eq!(config.debounce_ms, 150);
        assert_eq!(config.endpoints.suggest_cities, "/v2/suggest");
        assert_eq!(config.endpoints.calculate_distance, "/api/calculate-distance");
        assert_eq!(config.countdown_secs, 5);
    }

    #[test]
    fn relative_endpoint_rejected() {
        let err = FormsConfig::from_toml_str(
            r#"
            [endpoints]
            submit_request = "submit"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, FormError::InvalidConfig(_)));
    }

    #[test]
    fn zero_threshold_rejected() {
        let err = FormsConfig::from_toml_str("min_query_chars = 0").unwrap_err();
        assert!(matches!(err, FormError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_toml() {
        let err = FormsConfig::from_toml_str("debounce_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, FormError::ConfigParse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "countdown_secs = 3").unwrap();
        let config = FormsConfig::load(file.path()).unwrap();
        assert_eq!(config.countdown_secs, 3);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            FormsConfig::load(&missing),
            Err(FormError::ConfigIo { .. })
        ));
    }
}
