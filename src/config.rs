//! Configuration for the rig checker.
//!
//! Supports both environment variables and YAML config file.
//! Environment variables take precedence over config file values.

use crate::error::{CheckerError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Inference endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Base URL of the Ollama-compatible API (e.g., "http://127.0.0.1:11434")
    pub api_url: String,

    /// Model identifier (e.g., "llama3.1:8b")
    pub model: String,

    /// Hard time budget for one batch evaluation, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature, kept low for repeatable verdicts
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// When false the model-backed path is never attempted
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_timeout_secs() -> u64 {
    45
}

fn default_temperature() -> f32 {
    0.1
}

fn default_enabled() -> bool {
    true
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:11434".to_string(),
            model: "llama3.1:8b".to_string(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            enabled: default_enabled(),
        }
    }
}

/// Listing search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// eBay Browse API bearer token. Without it the sample catalogue is used.
    #[serde(default)]
    pub ebay_token: Option<String>,

    /// Marketplace sent as `X-EBAY-C-MARKETPLACE-ID`
    #[serde(default = "default_marketplace")]
    pub marketplace_id: String,

    /// Maximum number of listings requested per search
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_marketplace() -> String {
    "EBAY_DE".to_string()
}

fn default_limit() -> u32 {
    12
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            ebay_token: None,
            marketplace_id: default_marketplace(),
            limit: default_limit(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub inference: InferenceConfig,
    pub source: SourceConfig,
    pub telemetry: TelemetryConfig,
}

/// Configuration file structure (YAML format).
#[derive(Debug, Deserialize)]
struct ConfigFile {
    inference: Option<InferenceFileSection>,
    source: Option<SourceFileSection>,
    log_level: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InferenceFileSection {
    api_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    temperature: Option<f32>,
    enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SourceFileSection {
    ebay_token: Option<String>,
    marketplace_id: Option<String>,
    limit: Option<u32>,
}

impl Config {
    /// Load configuration from environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (OLLAMA_API_URL, OLLAMA_MODEL, EBAY_BEARER_TOKEN, ...)
    /// 2. Config file (~/.config/rig-checker/config.yaml)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                config = Self::load_from_file(&config_path)?;
            }
        }

        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Overlay values from a variable lookup (the process environment in
    /// production, a map in tests). Unparseable numbers are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_url) = lookup("OLLAMA_API_URL") {
            self.inference.api_url = api_url;
        }

        if let Some(model) = lookup("OLLAMA_MODEL") {
            self.inference.model = model;
        }

        if let Some(timeout) = lookup("OLLAMA_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.inference.timeout_secs = secs;
            }
        }

        if let Some(temperature) = lookup("OLLAMA_TEMPERATURE") {
            if let Ok(temp) = temperature.parse() {
                self.inference.temperature = temp;
            }
        }

        if let Some(token) = lookup("EBAY_BEARER_TOKEN") {
            if !token.trim().is_empty() {
                self.source.ebay_token = Some(token);
            }
        }

        if let Some(marketplace) = lookup("EBAY_MARKETPLACE_ID") {
            self.source.marketplace_id = marketplace;
        }

        if let Some(level) = lookup("RIG_CHECKER_LOG") {
            self.telemetry.log_level = level;
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CheckerError::io(path, e))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text, filling gaps with defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file_config: ConfigFile = serde_yaml::from_str(content)
            .map_err(|e| CheckerError::Config(format!("Failed to parse config file: {}", e)))?;

        let mut config = Config::default();

        if let Some(inference) = file_config.inference {
            if let Some(api_url) = inference.api_url {
                config.inference.api_url = api_url;
            }
            if let Some(model) = inference.model {
                config.inference.model = model;
            }
            if let Some(timeout_secs) = inference.timeout_secs {
                config.inference.timeout_secs = timeout_secs;
            }
            if let Some(temperature) = inference.temperature {
                config.inference.temperature = temperature;
            }
            if let Some(enabled) = inference.enabled {
                config.inference.enabled = enabled;
            }
        }

        if let Some(source) = file_config.source {
            config.source.ebay_token = source.ebay_token.filter(|t| !t.trim().is_empty());
            if let Some(marketplace_id) = source.marketplace_id {
                config.source.marketplace_id = marketplace_id;
            }
            if let Some(limit) = source.limit {
                config.source.limit = limit;
            }
        }

        if let Some(level) = file_config.log_level {
            config.telemetry.log_level = level;
        }

        Ok(config)
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "rig-checker")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Validate the loaded configuration.
    pub fn validate(&self) -> Result<()> {
        if self.inference.api_url.is_empty() {
            return Err(CheckerError::Config(
                "Inference API URL is required. Set OLLAMA_API_URL or add to config file."
                    .to_string(),
            ));
        }

        if self.inference.model.is_empty() {
            return Err(CheckerError::Config(
                "Inference model is required. Set OLLAMA_MODEL or add to config file.".to_string(),
            ));
        }

        if self.inference.timeout_secs == 0 {
            return Err(CheckerError::Config(
                "Inference timeout must be at least one second".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.inference.temperature) {
            return Err(CheckerError::Config(format!(
                "Temperature {} is outside 0.0..=2.0",
                self.inference.temperature
            )));
        }

        Ok(())
    }
}
