//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `ANIKO_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_GENERATION_TIMEOUT_SECS, DEFAULT_TOP_K, DEFAULT_TOP_N};

/// Pipeline configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `ANIKO_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the catalog snapshot JSON. Default: `./catalog.json`.
    pub catalog_path: PathBuf,

    /// Path to the encoder weights (`model.safetensors`). Stub mode when unset.
    pub model_path: Option<PathBuf>,

    /// Path to `tokenizer.json`. Defaults to the model's directory when unset.
    pub tokenizer_path: Option<PathBuf>,

    /// Explanation model identifier (e.g. `gpt-4o-mini`). Template fallback when unset.
    pub generation_model: Option<String>,

    /// Timeout for a single explanation-model call, in seconds. Default: `30`.
    pub generation_timeout_secs: u64,

    /// Candidates retrieved before selection. Default: `15`.
    pub top_k: usize,

    /// Titles in the final shortlist. Default: `3`.
    pub top_n: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("./catalog.json"),
            model_path: None,
            tokenizer_path: None,
            generation_model: None,
            generation_timeout_secs: DEFAULT_GENERATION_TIMEOUT_SECS,
            top_k: DEFAULT_TOP_K,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl Config {
    const ENV_CATALOG_PATH: &'static str = "ANIKO_CATALOG_PATH";
    const ENV_MODEL_PATH: &'static str = "ANIKO_MODEL_PATH";
    const ENV_TOKENIZER_PATH: &'static str = "ANIKO_TOKENIZER_PATH";
    const ENV_GENERATION_MODEL: &'static str = "ANIKO_GENERATION_MODEL";
    const ENV_GENERATION_TIMEOUT_SECS: &'static str = "ANIKO_GENERATION_TIMEOUT_SECS";
    const ENV_TOP_K: &'static str = "ANIKO_TOP_K";
    const ENV_TOP_N: &'static str = "ANIKO_TOP_N";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let catalog_path = Self::parse_path_from_env(Self::ENV_CATALOG_PATH, defaults.catalog_path);
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let tokenizer_path = Self::parse_optional_path_from_env(Self::ENV_TOKENIZER_PATH);
        let generation_model = Self::parse_optional_string_from_env(Self::ENV_GENERATION_MODEL);
        let generation_timeout_secs = Self::parse_u64_from_env(
            Self::ENV_GENERATION_TIMEOUT_SECS,
            defaults.generation_timeout_secs,
        )?;
        let top_k = Self::parse_usize_from_env(Self::ENV_TOP_K, defaults.top_k)?;
        let top_n = Self::parse_usize_from_env(Self::ENV_TOP_N, defaults.top_n)?;

        let config = Self {
            catalog_path,
            model_path,
            tokenizer_path,
            generation_model,
            generation_timeout_secs,
            top_k,
            top_n,
        };

        if config.top_n == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_TOP_N,
                value: "0".to_string(),
            });
        }
        if config.top_k < config.top_n {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_TOP_K,
                value: config.top_k.to_string(),
            });
        }

        Ok(config)
    }

    /// Validates paths (does not load anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        if let Some(ref path) = self.tokenizer_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Generation timeout as a [`Duration`].
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::InvalidNumber {
                name: var_name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::InvalidNumber {
                name: var_name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }
}
