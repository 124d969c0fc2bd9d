//! Service configuration
//!
//! Loaded from an optional TOML file; every field has a default so an empty
//! file (or no file) gives a working local setup. Binaries apply command-line
//! overrides on top.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::{HeatmapError, HeatmapResult};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub market_data: MarketDataConfig,
    /// Default tracing filter; `RUST_LOG` takes precedence
    pub log_level: LogLevel,
}

/// Tracing filter directive, e.g. `info` or `option_heatmap=debug`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(pub String);

impl Default for LogLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory of front-end assets served for unmatched paths
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            static_dir: None,
        }
    }
}

/// Market data provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// Yahoo Finance v7 base (quotes and option chains)
    pub quote_base_url: String,
    /// Yahoo Finance v8 base (daily history)
    pub chart_base_url: String,
    /// Short-term treasury yield used as the risk-free rate
    /// Default: ^IRX (13-week T-bill, quoted in percent)
    pub rate_symbol: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            quote_base_url: "https://query1.finance.yahoo.com/v7/finance".to_string(),
            chart_base_url: "https://query1.finance.yahoo.com/v8/finance".to_string(),
            rate_symbol: "^IRX".to_string(),
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
        }
    }
}

impl MarketDataConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Parse a TOML document
    pub fn from_toml_str(text: &str) -> HeatmapResult<Self> {
        toml::from_str(text).map_err(|e| HeatmapError::config(e.to_string()))
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> HeatmapResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| HeatmapError::config(format!("{}: {}", path.display(), e)))?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load from `path` if given, otherwise defaults
    pub fn load_or_default(path: Option<&Path>) -> HeatmapResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.bind_address(), "127.0.0.1:8000");
        assert_eq!(config.market_data.rate_symbol, "^IRX");
        assert_eq!(config.market_data.timeout(), Duration::from_secs(10));
        assert_eq!(config.log_level.0, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"

[server]
port = 9100
static_dir = "frontend/build"

[market_data]
timeout_secs = 3
"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.static_dir, Some(PathBuf::from("frontend/build")));
        assert_eq!(config.market_data.timeout_secs, 3);
        assert_eq!(config.market_data.rate_symbol, "^IRX");
        assert_eq!(config.log_level.0, "debug");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = AppConfig::from_toml_str("[server]\nport = \"eighty\"");
        assert!(matches!(result, Err(HeatmapError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(HeatmapError::IO(_))));
    }
}
