//! Configuration for the portfolio tool
//!
//! Everything is defaulted: with no config file and no flags the tool
//! talks to the public mainnet endpoint and the public price API.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::constants;

// =============================================================================
// File-based Configuration (config.toml)
// =============================================================================

/// Configuration loaded from config.toml (all sections optional)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub rpc: Option<RpcSection>,
    #[serde(default)]
    pub price: Option<PriceSection>,
}

/// `[rpc]` section
#[derive(Debug, Deserialize)]
pub struct RpcSection {
    /// RPC endpoint URL
    pub url: Option<String>,
    /// Per-call timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// `[price]` section
#[derive(Debug, Deserialize)]
pub struct PriceSection {
    /// Price API base URL
    pub api_base: Option<String>,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).with_context(|| {
            "Failed to parse config.toml. Check for:\n\
             - Invalid TOML syntax (missing quotes, brackets, etc.)\n\
             - Incorrect data types (strings vs numbers)"
        })
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Main configuration struct with resolved values
#[derive(Debug, Clone)]
pub struct Config {
    /// Ledger RPC endpoint
    pub rpc_url: String,
    /// Price API base URL
    pub price_api_base: String,
    /// Per-call network timeout
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: constants::MAINNET_RPC_URL.to_string(),
            price_api_base: constants::PRICE_API_BASE.to_string(),
            timeout: Duration::from_secs(constants::REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Create config from file config and optional RPC URL override
    pub fn from_file(file_config: &FileConfig, rpc_url: Option<String>) -> Self {
        let defaults = Self::default();
        let rpc_section = file_config.rpc.as_ref();

        Self {
            // Override order: CLI flag, then config file, then default
            rpc_url: rpc_url
                .or_else(|| rpc_section.and_then(|rpc| rpc.url.clone()))
                .unwrap_or(defaults.rpc_url),

            price_api_base: file_config
                .price
                .as_ref()
                .and_then(|price| price.api_base.clone())
                .unwrap_or(defaults.price_api_base),

            timeout: rpc_section
                .and_then(|rpc| rpc.timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = Config::from_file(&FileConfig::default(), None);

        assert_eq!(config.rpc_url, constants::MAINNET_RPC_URL);
        assert_eq!(config.price_api_base, constants::PRICE_API_BASE);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_file_values_apply() {
        let file_config: FileConfig = toml::from_str(
            r#"
            [rpc]
            url = "https://rpc.example.com"
            timeout_secs = 5

            [price]
            api_base = "https://price.example.com/v2"
            "#,
        )
        .unwrap();

        let config = Config::from_file(&file_config, None);
        assert_eq!(config.rpc_url, "https://rpc.example.com");
        assert_eq!(config.price_api_base, "https://price.example.com/v2");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_cli_override_beats_file() {
        let file_config: FileConfig = toml::from_str(
            r#"
            [rpc]
            url = "https://rpc.example.com"
            "#,
        )
        .unwrap();

        let config = Config::from_file(&file_config, Some("https://override.example.com".to_string()));
        assert_eq!(config.rpc_url, "https://override.example.com");
    }
}
