//! Host configuration: a TOML file for tunables, the environment for keys.
//!
//! ```toml
//! [web_search]
//! concurrency = 4
//! max_results = 5
//!
//! [shopping]
//! enabled = true
//!
//! [shopping.retry]
//! max_attempts = 2
//! base_delay_ms = 2000
//! ```
//!
//! Every key is optional. API keys are read from `TAVILY_API_KEY` and
//! `SERPAPI_KEY` and are never written back to disk.

use crate::error::{Result, RunAiError};
use runai_search::config::{SERPAPI_KEY_ENV, TAVILY_API_KEY_ENV};
use runai_search::{ShoppingConfig, WebSearchConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "RUNAI_CONFIG";

/// Top-level configuration for the runai host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunAiConfig {
    /// Bounded fan-out web search settings.
    pub web_search: WebSearchConfig,
    /// Two-phase shopping lookup settings.
    pub shopping: ShoppingConfig,
}

impl RunAiConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| RunAiError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| RunAiError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/runai/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp/runai-config"))
            .join("runai")
            .join("config.toml")
    }

    /// Resolve the config file to use.
    ///
    /// An explicit path wins, then [`CONFIG_PATH_ENV`], then the default
    /// location. Only the default location may be absent.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be loaded, or if
    /// the loaded values fail validation.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let config = match named {
            Some(path) => Self::from_file(&path)?,
            None => {
                let path = Self::default_config_path();
                if path.is_file() {
                    Self::from_file(&path)?
                } else {
                    tracing::debug!(path = %path.display(), "no config file; using defaults");
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config.with_credentials(|var| std::env::var(var).ok()))
    }

    /// Fill the provider keys using `lookup`, usually the process environment.
    ///
    /// Blank values are treated as unset.
    pub fn with_credentials<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        self.web_search.api_key = key(TAVILY_API_KEY_ENV);
        self.shopping.api_key = key(SERPAPI_KEY_ENV);
        self
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`RunAiError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.web_search.validate()?;
        self.shopping.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RunAiConfig::default();
        assert_eq!(config.web_search.concurrency, 4);
        assert_eq!(config.web_search.max_results, 5);
        assert_eq!(config.web_search.snippet_chars, 300);
        assert!(!config.shopping.enabled);
        assert_eq!(config.shopping.concurrency, 2);
        assert_eq!(config.shopping.retry.max_attempts, 2);
        assert_eq!(config.shopping.retry.base_delay_ms, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: RunAiConfig = toml::from_str(
            "[shopping]\nenabled = true\n\n[shopping.retry]\nmax_attempts = 3\n",
        )
        .expect("parse");
        assert!(config.shopping.enabled);
        assert_eq!(config.shopping.retry.max_attempts, 3);
        assert_eq!(config.shopping.retry.base_delay_ms, 2000);
        assert_eq!(config.web_search.concurrency, 4);
    }

    #[test]
    fn api_keys_in_toml_are_ignored() {
        let config: RunAiConfig =
            toml::from_str("[web_search]\napi_key = \"leaked\"\n").expect("parse");
        assert_eq!(config.web_search.api_key, None);
    }

    #[test]
    fn credentials_come_from_lookup() {
        let config = RunAiConfig::default().with_credentials(|var| match var {
            "TAVILY_API_KEY" => Some("tvly-1".to_owned()),
            "SERPAPI_KEY" => Some("   ".to_owned()),
            _ => None,
        });
        assert_eq!(config.web_search.api_key.as_deref(), Some("tvly-1"));
        assert_eq!(config.shopping.api_key, None);
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let mut config = RunAiConfig::default();
        config.web_search.concurrency = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("web_search.concurrency"));
    }

    #[test]
    fn shrinking_multiplier_is_rejected() {
        let mut config = RunAiConfig::default();
        config.shopping.retry.network_error_multiplier = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = RunAiConfig::from_file(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(RunAiError::Io(_))));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = RunAiConfig::default_config_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.ends_with("config.toml"));
        assert!(path_str.contains("runai"));
    }
}
