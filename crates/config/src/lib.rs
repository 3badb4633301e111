//! Configuration loading, validation, and management for GroundCrew.
//!
//! Loads configuration from `~/.groundcrew/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.groundcrew/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default sampling temperature for provider requests
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Gateway (HTTP server) configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Provider credentials and endpoints
    #[serde(default)]
    pub providers: ProviderSettings,

    /// Chunking and retrieval configuration
    #[serde(default)]
    pub indexing: IndexingConfig,

    /// External OCR command used for image uploads
    #[serde(default = "default_ocr_command")]
    pub ocr_command: String,
}

fn default_temperature() -> f32 {
    0.7
}
fn default_ocr_command() -> String {
    "tesseract".into()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("default_temperature", &self.default_temperature)
            .field("gateway", &self.gateway)
            .field("providers", &self.providers)
            .field("indexing", &self.indexing)
            .field("ocr_command", &self.ocr_command)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8000
}
fn default_host() -> String {
    "0.0.0.0".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Credentials and endpoints for the LLM providers.
///
/// Keys may come from the config file or from the environment; a request
/// may also carry its own key, which always wins.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic_api_key: Option<String>,

    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Wall-clock timeout for one provider round trip, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Model used for embedding chunks and queries.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

fn default_ollama_url() -> String {
    "http://localhost:11434".into()
}
fn default_request_timeout() -> u64 {
    120
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            ollama_url: default_ollama_url(),
            request_timeout_secs: default_request_timeout(),
            embedding_model: default_embedding_model(),
        }
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("ollama_url", &self.ollama_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("embedding_model", &self.embedding_model)
            .finish()
    }
}

/// Window sizing and retrieval depth for the context indexer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    /// Sliding window size in characters.
    #[serde(default = "default_window_chars")]
    pub window_chars: usize,

    /// Overlap between consecutive windows, in characters.
    #[serde(default = "default_overlap_chars")]
    pub overlap_chars: usize,

    /// How many chunks a query retrieves.
    #[serde(default = "default_retrieval_k")]
    pub retrieval_k: usize,
}

fn default_window_chars() -> usize {
    1000
}
fn default_overlap_chars() -> usize {
    200
}
fn default_retrieval_k() -> usize {
    3
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            window_chars: default_window_chars(),
            overlap_chars: default_overlap_chars(),
            retrieval_k: default_retrieval_k(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.groundcrew/config.toml).
    ///
    /// Also checks environment variables:
    /// - `OPENAI_API_KEY`, `ANTHROPIC_API_KEY` for credentials
    /// - `GROUNDCREW_OLLAMA_URL`, `GROUNDCREW_PORT` for endpoints
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.providers.openai_api_key.is_none() {
            config.providers.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        if config.providers.anthropic_api_key.is_none() {
            config.providers.anthropic_api_key = std::env::var("ANTHROPIC_API_KEY").ok();
        }
        if let Ok(url) = std::env::var("GROUNDCREW_OLLAMA_URL") {
            config.providers.ollama_url = url;
        }
        if let Ok(port) = std::env::var("GROUNDCREW_PORT") {
            config.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("GROUNDCREW_PORT is not a port: {port}"))
            })?;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".groundcrew")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.indexing.overlap_chars >= self.indexing.window_chars {
            return Err(ConfigError::ValidationError(
                "indexing.overlap_chars must be smaller than indexing.window_chars".into(),
            ));
        }

        if self.indexing.retrieval_k == 0 {
            return Err(ConfigError::ValidationError(
                "indexing.retrieval_k must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_temperature: default_temperature(),
            gateway: GatewayConfig::default(),
            providers: ProviderSettings::default(),
            indexing: IndexingConfig::default(),
            ocr_command: default_ocr_command(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.indexing.window_chars, 1000);
        assert_eq!(config.indexing.overlap_chars, 200);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.providers.ollama_url, config.providers.ollama_url);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            default_temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn overlap_must_be_smaller_than_window() {
        let mut config = AppConfig::default();
        config.indexing.overlap_chars = config.indexing.window_chars;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_retrieval_k_rejected() {
        let mut config = AppConfig::default();
        config.indexing.retrieval_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().gateway.port, 8000);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gateway]\nport = 9000").unwrap();
        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.gateway.port, 9000);
        assert_eq!(config.indexing.retrieval_k, 3);
    }

    #[test]
    fn debug_redacts_keys() {
        let mut config = AppConfig::default();
        config.providers.openai_api_key = Some("sk-very-secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
