//! YAML configuration for a pagewatch deployment.
//!
//! One file describes how document text and keywords are tokenized, the
//! default matching behaviour for subscriptions, the parser pool, the
//! monitor's retry policy and log output. Every field has a default, so an
//! empty document with only a `version` is a valid configuration.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "mythology watch"
//!
//! tokenizer:
//!   ignore_case: true
//!   filter_stopwords: true
//!   enable_stemming: false
//!   language_hint: "en"
//!   normalize_unicode: true
//!
//! matcher:
//!   ignore_inserted: false
//!   ignore_deleted: false
//!   snippet_radius: 50
//!
//! pool:
//!   size: 4
//!   acquire_timeout_ms: 5000
//!
//! monitor:
//!   max_consecutive_failures: 3
//!
//! logging:
//!   level: "info"
//!   format: "json"
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use canonical::{LanguageRegistry, TokenizeOptions};
use matcher::{MatchFilter, MatchOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::monitor::MonitorPolicy;
use crate::pipeline::CycleConfig;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WatchConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub tokenizer: TokenizerYamlConfig,

    /// Defaults for subscriptions that do not set their own options
    #[serde(default)]
    pub matcher: MatcherYamlConfig,

    #[serde(default)]
    pub pool: PoolYamlConfig,

    #[serde(default)]
    pub monitor: MonitorYamlConfig,

    #[serde(default)]
    pub logging: LoggingYamlConfig,
}

impl WatchConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: WatchConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.tokenizer.validate()?;
        self.matcher.validate()?;
        self.pool.validate()?;
        self.monitor.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    /// Runtime options for one detection cycle.
    pub fn cycle_config(&self) -> CycleConfig {
        CycleConfig {
            tokenize: self.tokenizer.to_options(),
            acquire_timeout: self.pool.acquire_timeout(),
        }
    }

    pub fn monitor_policy(&self) -> MonitorPolicy {
        MonitorPolicy {
            max_consecutive_failures: self.monitor.max_consecutive_failures,
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            tokenizer: TokenizerYamlConfig::default(),
            matcher: MatcherYamlConfig::default(),
            pool: PoolYamlConfig::default(),
            monitor: MonitorYamlConfig::default(),
            logging: LoggingYamlConfig::default(),
        }
    }
}

/// Tokenization applied identically to snapshots and keywords.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizerYamlConfig {
    #[serde(default = "true_value")]
    pub ignore_case: bool,

    #[serde(default)]
    pub filter_stopwords: bool,

    #[serde(default)]
    pub enable_stemming: bool,

    #[serde(default)]
    pub language_hint: Option<String>,

    #[serde(default = "true_value")]
    pub normalize_unicode: bool,
}

impl TokenizerYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        self.to_options()
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("tokenizer: {err}")))?;
        if let Some(hint) = self.language_hint.as_deref() {
            LanguageRegistry::standard().lookup(hint).map_err(|_| {
                ConfigLoadError::Validation(format!(
                    "tokenizer.language_hint `{hint}` is not a supported language"
                ))
            })?;
        }
        Ok(())
    }

    pub fn to_options(&self) -> TokenizeOptions {
        TokenizeOptions {
            ignore_case: self.ignore_case,
            filter_stopwords: self.filter_stopwords,
            enable_stemming: self.enable_stemming,
            language_hint: self.language_hint.clone(),
            normalize_unicode: self.normalize_unicode,
        }
    }
}

impl Default for TokenizerYamlConfig {
    fn default() -> Self {
        Self {
            ignore_case: true,
            filter_stopwords: false,
            enable_stemming: false,
            language_hint: None,
            normalize_unicode: true,
        }
    }
}

/// Default matching options for subscriptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherYamlConfig {
    #[serde(default)]
    pub ignore_inserted: bool,

    #[serde(default)]
    pub ignore_deleted: bool,

    #[serde(default = "default_snippet_radius")]
    pub snippet_radius: usize,
}

impl MatcherYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.ignore_inserted && self.ignore_deleted {
            return Err(ConfigLoadError::Validation(
                "matcher.ignore_inserted and matcher.ignore_deleted cannot both be set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_options(&self) -> MatchOptions {
        MatchOptions {
            filter: MatchFilter {
                ignore_inserted: self.ignore_inserted,
                ignore_deleted: self.ignore_deleted,
            },
            snippet_radius: self.snippet_radius,
        }
    }
}

impl Default for MatcherYamlConfig {
    fn default() -> Self {
        Self {
            ignore_inserted: false,
            ignore_deleted: false,
            snippet_radius: default_snippet_radius(),
        }
    }
}

/// Parser pool sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolYamlConfig {
    #[serde(default = "default_pool_size")]
    pub size: usize,

    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
}

impl PoolYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.size == 0 {
            return Err(ConfigLoadError::Validation(
                "pool.size must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}

impl Default for PoolYamlConfig {
    fn default() -> Self {
        Self {
            size: default_pool_size(),
            acquire_timeout_ms: default_acquire_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorYamlConfig {
    #[serde(default = "default_max_failures")]
    pub max_consecutive_failures: u32,
}

impl MonitorYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.max_consecutive_failures == 0 {
            return Err(ConfigLoadError::Validation(
                "monitor.max_consecutive_failures must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MonitorYamlConfig {
    fn default() -> Self {
        Self {
            max_consecutive_failures: default_max_failures(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingYamlConfig {
    /// Fallback filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

impl LoggingYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(ConfigLoadError::Validation(format!(
                "logging.format must be one of: {valid_formats:?}"
            )));
        }
        if self.level.trim().is_empty() {
            return Err(ConfigLoadError::MissingField("logging.level".to_string()));
        }
        Ok(())
    }
}

impl Default for LoggingYamlConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn true_value() -> bool {
    true
}

fn default_snippet_radius() -> usize {
    50
}

fn default_pool_size() -> usize {
    4
}

fn default_acquire_timeout_ms() -> u64 {
    5_000
}

fn default_max_failures() -> u32 {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}
