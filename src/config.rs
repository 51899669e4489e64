use crate::ai::client::{DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::error::{Result, TrendError};
use crate::github::client::GITHUB_API_URL;
use crate::github::query::{MAX_DAYS, MAX_PER_PAGE};
use crate::trends::snapshot::DEFAULT_TOLERANCE_DAYS;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const AI_API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub token (README access needs one; search works without)
    pub github_token: Option<String>,

    /// GitHub REST API root (change for GitHub Enterprise)
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// API key for the chat completion endpoint
    pub ai_api_key: Option<String>,

    /// Chat completion endpoint
    #[serde(default = "default_ai_base_url")]
    pub ai_base_url: String,

    /// Model name sent with each completion request
    #[serde(default = "default_ai_model")]
    pub ai_model: String,

    #[serde(default = "default_ai_max_tokens")]
    pub ai_max_tokens: u32,

    #[serde(default = "default_ai_temperature")]
    pub ai_temperature: f64,

    /// Look for repositories created within this many days (default: 7)
    #[serde(default = "default_days")]
    pub default_days: u32,

    /// Number of repositories to fetch (default: 10)
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// How far a comparison snapshot may be from the target date
    #[serde(default = "default_tolerance")]
    pub comparison_tolerance_days: u32,

    /// Directory holding dated snapshot files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory for Markdown reports
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,

    /// Enable caching of README contents
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Cache TTL in hours (default: 168 hours / 7 days)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_hours: u32,

    /// Cache location (default: ~/.cache/gh-trending)
    pub cache_dir: Option<PathBuf>,

    /// README characters sent to the model
    #[serde(default = "default_readme_max_chars")]
    pub readme_max_chars: usize,

    /// Pause before each completion request, in milliseconds
    #[serde(default = "default_request_delay")]
    pub request_delay_ms: u64,
}

impl Config {
    /// Load configuration from the default location (~/.config/gh-trending/config.toml)
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TrendError::config(format!(
                "Config file not found at: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TrendError::config("Could not determine home directory"))?;
        Ok(home.join(".config").join("gh-trending").join("config.toml"))
    }

    /// Get the default cache directory path
    pub fn default_cache_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TrendError::config("Could not determine home directory"))?;
        Ok(home.join(".cache").join("gh-trending"))
    }

    /// Cache directory in effect: the configured one, or the default
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match self.cache_dir {
            Some(ref dir) => Ok(dir.clone()),
            None => Self::default_cache_dir(),
        }
    }

    /// Create a default configuration file at the default location
    pub fn create_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config = Self::default();
        let toml_string = toml::to_string_pretty(&config)?;
        fs::write(&config_path, toml_string)?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.default_days == 0 || self.default_days > MAX_DAYS {
            return Err(TrendError::config(format!(
                "default_days must be between 1 and {}",
                MAX_DAYS
            )));
        }

        if self.default_limit == 0 || self.default_limit > MAX_PER_PAGE {
            return Err(TrendError::config(format!(
                "default_limit must be between 1 and {}",
                MAX_PER_PAGE
            )));
        }

        if self.cache_ttl_hours == 0 {
            return Err(TrendError::config("cache_ttl_hours must be > 0"));
        }

        if self.ai_max_tokens == 0 {
            return Err(TrendError::config("ai_max_tokens must be > 0"));
        }

        if !(0.0..=2.0).contains(&self.ai_temperature) {
            return Err(TrendError::config("ai_temperature must be between 0 and 2"));
        }

        if self.readme_max_chars == 0 {
            return Err(TrendError::config("readme_max_chars must be > 0"));
        }

        Ok(())
    }

    /// Load config from file, or create default if it doesn't exist
    pub fn load_or_create_default() -> Result<Self> {
        match Self::load() {
            Ok(config) => Ok(config),
            Err(TrendError::Config(_)) => {
                eprintln!("Config file not found. Creating default config...");
                Self::create_default()
            }
            Err(e) => Err(e),
        }
    }

    /// GitHub token, preferring the environment over the config file
    pub fn github_token(&self) -> Option<String> {
        env_or(GITHUB_TOKEN_ENV, self.github_token.as_ref())
    }

    /// Chat API key, preferring the environment over the config file
    pub fn ai_api_key(&self) -> Option<String> {
        env_or(AI_API_KEY_ENV, self.ai_api_key.as_ref())
    }
}

fn env_or(var: &str, fallback: Option<&String>) -> Option<String> {
    env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| fallback.filter(|v| !v.trim().is_empty()).cloned())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_url: default_github_api_url(),
            ai_api_key: None,
            ai_base_url: default_ai_base_url(),
            ai_model: default_ai_model(),
            ai_max_tokens: default_ai_max_tokens(),
            ai_temperature: default_ai_temperature(),
            default_days: default_days(),
            default_limit: default_limit(),
            comparison_tolerance_days: default_tolerance(),
            data_dir: default_data_dir(),
            reports_dir: default_reports_dir(),
            cache_enabled: default_true(),
            cache_ttl_hours: default_cache_ttl(),
            cache_dir: None,
            readme_max_chars: default_readme_max_chars(),
            request_delay_ms: default_request_delay(),
        }
    }
}

// Serde default functions
fn default_github_api_url() -> String {
    GITHUB_API_URL.to_string()
}

fn default_ai_base_url() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_ai_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_ai_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_ai_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_days() -> u32 {
    7
}

fn default_limit() -> u32 {
    10
}

fn default_tolerance() -> u32 {
    DEFAULT_TOLERANCE_DAYS
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_cache_ttl() -> u32 {
    168 // 7 days in hours
}

fn default_readme_max_chars() -> usize {
    12_000
}

fn default_request_delay() -> u64 {
    1200
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
        assert_eq!(config.default_days, 7);
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.comparison_tolerance_days, 2);
        assert!(config.cache_enabled);
        assert_eq!(config.cache_ttl_hours, 168);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_days() {
        let mut config = Config::default();
        config.default_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_days_too_large() {
        let mut config = Config::default();
        config.default_days = u32::MAX;
        assert!(config.validate().is_err());

        config.default_days = MAX_DAYS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_limit_range() {
        let mut config = Config::default();
        config.default_limit = 0;
        assert!(config.validate().is_err());

        config.default_limit = 101;
        assert!(config.validate().is_err());

        config.default_limit = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_temperature() {
        let mut config = Config::default();
        config.ai_temperature = 2.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("default_days"));
        assert!(toml_str.contains("comparison_tolerance_days"));
        assert!(toml_str.contains("data_dir"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            ai_api_key = "sk-test-key"
            default_days = 30
            default_limit = 25
            cache_enabled = false
            data_dir = "snapshots"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ai_api_key.as_deref(), Some("sk-test-key"));
        assert_eq!(config.default_days, 30);
        assert_eq!(config.default_limit, 25);
        assert!(!config.cache_enabled);
        assert_eq!(config.data_dir, PathBuf::from("snapshots"));
        assert_eq!(config.ai_model, "deepseek-chat");
        assert_eq!(config.github_api_url, "https://api.github.com");
        assert_eq!(config.readme_max_chars, 12_000);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "default_limit = 5\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.default_limit, 5);

        assert!(Config::load_from(&temp_dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_configured_cache_dir() {
        let mut config = Config::default();
        config.cache_dir = Some(PathBuf::from("/tmp/gh-trending-cache"));
        assert_eq!(
            config.cache_dir().unwrap(),
            PathBuf::from("/tmp/gh-trending-cache")
        );
    }

    #[test]
    fn test_env_or_fallback() {
        let fallback = "from-config".to_string();
        assert_eq!(
            env_or("GH_TRENDING_TEST_UNSET_VAR", Some(&fallback)).as_deref(),
            Some("from-config")
        );
        let blank = "  ".to_string();
        assert!(env_or("GH_TRENDING_TEST_UNSET_VAR", Some(&blank)).is_none());
    }
}
