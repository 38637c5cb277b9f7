//! Application settings loading from config.toml
//!
//! Covers the knobs the core needs at runtime: scraper endpoints and timeout,
//! and the percentage-sum validation policy for allocations. The database URL
//! stays in the environment (see [`super::database`]).

use crate::core::allocation::ValidationPolicy;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    /// Invoice scraper endpoints and timeout
    #[serde(default)]
    pub scraper: ScraperSettings,
    /// Allocation validation behavior
    #[serde(default)]
    pub allocation: AllocationSettings,
}

/// Scraper endpoint configuration
#[derive(Debug, Deserialize)]
pub struct ScraperSettings {
    /// Primary scraper proxy endpoint
    pub endpoint: String,
    /// Optional fallback endpoint, tried once after a primary failure
    pub fallback_endpoint: Option<String>,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            fallback_endpoint: None,
            timeout_secs: 15,
        }
    }
}

/// Allocation validation configuration
#[derive(Debug, Deserialize, Default)]
pub struct AllocationSettings {
    /// `"strict"` rejects percentage sums above 100; `"lenient"` (default)
    /// passes shares through verbatim
    #[serde(default)]
    pub percentage_policy: PercentagePolicy,
}

/// Serialized form of the percentage validation policy
#[derive(Debug, Deserialize, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum PercentagePolicy {
    /// Reject over-allocation
    Strict,
    /// Trust caller-supplied shares
    #[default]
    Lenient,
}

impl From<PercentagePolicy> for ValidationPolicy {
    fn from(policy: PercentagePolicy) -> Self {
        match policy {
            PercentagePolicy::Strict => Self::Strict,
            PercentagePolicy::Lenient => Self::Lenient,
        }
    }
}

/// Loads settings from a TOML file.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from the default location (./config.toml).
pub fn load_default_settings() -> Result<Settings> {
    load_settings("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_settings() {
        let toml_str = r#"
            [scraper]
            endpoint = "https://proxy.example.com/extrair-fatura"
            fallback_endpoint = "https://proxy-alt.example.com/extrair-fatura"
            timeout_secs = 15

            [allocation]
            percentage_policy = "strict"
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.scraper.endpoint, "https://proxy.example.com/extrair-fatura");
        assert_eq!(
            settings.scraper.fallback_endpoint.as_deref(),
            Some("https://proxy-alt.example.com/extrair-fatura")
        );
        assert_eq!(settings.scraper.timeout_secs, 15);
        assert!(matches!(
            ValidationPolicy::from(settings.allocation.percentage_policy),
            ValidationPolicy::Strict
        ));
    }

    #[test]
    fn test_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.scraper.timeout_secs, 15);
        assert!(matches!(
            ValidationPolicy::from(settings.allocation.percentage_policy),
            ValidationPolicy::Lenient
        ));
    }
}
