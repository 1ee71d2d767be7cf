//! Configuration management for llmi18n
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.llmi18n/config.toml

use crate::errors::{LlmError, Result};
use crate::streaming::{ClientConfig, DEFAULT_GENERATE_PATH, DEFAULT_OLLAMA_URL, DEFAULT_TIMEOUT};
use crate::translation::TranslationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete configuration for llmi18n
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
}

/// Ollama connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub base_url: String,
    pub generate_path: String,
    /// Idle deadline in seconds, 0 waits on the server indefinitely
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            generate_path: DEFAULT_GENERATE_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl OllamaConfig {
    /// Client settings for [`crate::streaming::OllamaClient::with_config`]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            generate_path: self.generate_path.clone(),
            timeout: match self.timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LlmError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| LlmError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard configuration file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".llmi18n").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let ollama = &self.ollama;
        if !(ollama.base_url.starts_with("http://") || ollama.base_url.starts_with("https://")) {
            return Err(LlmError::ConfigError(format!(
                "base_url must start with http:// or https://, got {}",
                ollama.base_url
            )));
        }

        if !ollama.generate_path.starts_with('/') {
            return Err(LlmError::ConfigError(format!(
                "generate_path must start with /, got {}",
                ollama.generate_path
            )));
        }

        let translation = &self.translation;
        if translation.model.trim().is_empty() {
            return Err(LlmError::ConfigError("model must not be empty".to_string()));
        }

        if translation.target_language.trim().is_empty() {
            return Err(LlmError::ConfigError(
                "target_language must not be empty".to_string(),
            ));
        }

        let options = &translation.options;
        if matches!(options.temperature(), Some(t) if t < 0.0) {
            return Err(LlmError::ConfigError(
                "temperature must not be negative".to_string(),
            ));
        }

        if matches!(options.top_p(), Some(p) if !(0.0..=1.0).contains(&p)) {
            return Err(LlmError::ConfigError(
                "top_p must be between 0.0 and 1.0".to_string(),
            ));
        }

        if matches!(options.mirostat_eta(), Some(eta) if eta <= 0.0)
            || matches!(options.mirostat_tau(), Some(tau) if tau <= 0.0)
        {
            return Err(LlmError::ConfigError(
                "mirostat_eta and mirostat_tau must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| LlmError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| LlmError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| LlmError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}
