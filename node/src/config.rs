//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Parse(String),
}

/// Configuration for an Agora node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// RPC endpoint of the settlement-chain client.
    #[serde(default = "default_chain_endpoint")]
    pub chain_endpoint: String,

    /// Maximum number of subjects processed concurrently.
    #[serde(default = "default_max_concurrent_subjects")]
    pub max_concurrent_subjects: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to enable the Prometheus metrics endpoint.
    #[serde(default)]
    pub enable_metrics: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_chain_endpoint() -> String {
    "http://127.0.0.1:51735".to_string()
}

fn default_max_concurrent_subjects() -> usize {
    8
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("NodeConfig is always serializable to TOML")
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            chain_endpoint: default_chain_endpoint(),
            max_concurrent_subjects: default_max_concurrent_subjects(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            enable_metrics: false,
        }
    }
}
