use crate::error::{GitlogError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration
///
/// Every tunable the pipeline depends on lives here and is handed to the
/// components through their constructors, so tests can run with short TTLs
/// and tiny token budgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub token for API access (usually supplied via CLI/env instead)
    pub github_token: Option<String>,

    /// GitHub API base URL
    #[serde(default = "default_github_api_base")]
    pub github_api_base: String,

    /// Path of the on-disk commit cache (relative to the working directory)
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Cache TTL in seconds (default: 900 / 15 minutes)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Enable the commit cache
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Base URL of the local inference server (LM Studio style)
    #[serde(default = "default_inference_base")]
    pub inference_base: String,

    /// Model name passed to the inference server
    #[serde(default = "default_model")]
    pub inference_model: String,

    /// Maximum tokens the model may generate per summary
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Estimated model context window, in tokens
    #[serde(default = "default_context_window")]
    pub context_window_tokens: usize,

    /// Input budget for a single summarization call, leaving headroom for
    /// the model's own output
    #[serde(default = "default_summary_budget")]
    pub summary_budget_tokens: usize,
}

impl Config {
    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GitlogError::config(format!(
                "Config file not found at: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.cache_ttl_secs == 0 {
            return Err(GitlogError::config("cache_ttl_secs must be > 0"));
        }

        if self.summary_budget_tokens == 0 {
            return Err(GitlogError::config("summary_budget_tokens must be > 0"));
        }

        if self.summary_budget_tokens > self.context_window_tokens {
            return Err(GitlogError::config(
                "summary_budget_tokens must leave headroom within context_window_tokens",
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_base: default_github_api_base(),
            cache_path: default_cache_path(),
            cache_ttl_secs: default_cache_ttl(),
            cache_enabled: default_true(),
            inference_base: default_inference_base(),
            inference_model: default_model(),
            max_output_tokens: default_max_output_tokens(),
            context_window_tokens: default_context_window(),
            summary_budget_tokens: default_summary_budget(),
        }
    }
}

// Serde default functions
fn default_github_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(".gitlog_summary_cache.json")
}

fn default_cache_ttl() -> u64 {
    900 // 15 minutes
}

fn default_inference_base() -> String {
    "http://localhost:1234".to_string()
}

fn default_model() -> String {
    "local-model".to_string()
}

fn default_max_output_tokens() -> u32 {
    300
}

fn default_context_window() -> usize {
    15_000
}

fn default_summary_budget() -> usize {
    12_000
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_ttl_secs, 900);
        assert!(config.cache_enabled);
        assert_eq!(config.context_window_tokens, 15_000);
        assert_eq!(config.summary_budget_tokens, 12_000);
        assert_eq!(config.github_api_base, "https://api.github.com");
    }

    #[test]
    fn test_config_validation_zero_ttl() {
        let mut config = Config::default();
        config.cache_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_budget_exceeds_window() {
        let mut config = Config::default();
        config.summary_budget_tokens = 20_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            cache_ttl_secs = 60
            cache_enabled = false
            inference_model = "qwen2.5-coder"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.cache_ttl_secs, 60);
        assert!(!config.cache_enabled);
        assert_eq!(config.inference_model, "qwen2.5-coder");
        // untouched fields keep their defaults
        assert_eq!(config.summary_budget_tokens, 12_000);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("cache_ttl_secs"));
        assert!(toml_str.contains("summary_budget_tokens"));
    }
}
