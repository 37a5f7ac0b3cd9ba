use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::analyzer::AnalyzerConfig;
use crate::anonymizer::AnonymizerConfig;

/// Config file looked up (any supported extension) when none is given
pub const DEFAULT_CONFIG_NAME: &str = "pii_anonymizer";

/// Prefix for environment overrides, e.g. `PII_ANONYMIZER_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "PII_ANONYMIZER";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Largest accepted JSON request body; uploads arrive base64-encoded
    pub json_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            json_limit_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write logs to a timestamped file here instead of stdout
    pub dir: Option<String>,

    /// Filter used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            level: "info".to_string(),
        }
    }
}

/// Configuration for the API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub analyzer: AnalyzerConfig,
    pub anonymizer: AnonymizerConfig,
}

impl ApiConfig {
    /// Loads defaults, then the config file (optional), then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }
}
