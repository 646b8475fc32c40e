//! Declutter configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main Declutter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR); CLI flag wins
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Vision provider configuration
    pub analysis: AnalysisConfig,

    /// Image capture limits
    pub capture: CaptureConfig,

    /// Terminal UI settings
    pub tui: TuiConfig,

    /// File this config was loaded from (None = defaults)
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// Explicit path, then `./.declutter.yml`, then
    /// `~/.config/declutter/declutter.yml`, then defaults.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let local_config = PathBuf::from(".declutter.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("declutter").join("declutter.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let mut config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.source = Some(path.as_ref().to_path_buf());

        Ok(config)
    }
}

/// Vision provider configuration
///
/// `model`, `api-key-env` and `base-url` fall back to per-provider defaults
/// when unset, so switching `provider` alone is enough.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Provider name ("anthropic" or "openai")
    pub provider: String,

    /// Model identifier (must accept image input)
    pub model: Option<String>,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: Option<String>,

    /// File containing the API key, used when the env var is unset
    #[serde(rename = "api-key-file")]
    pub api_key_file: Option<String>,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: None,
            api_key_env: None,
            api_key_file: None,
            base_url: None,
            max_tokens: 4096,
            timeout_ms: 60_000,
        }
    }
}

impl AnalysisConfig {
    pub fn model(&self) -> &str {
        match &self.model {
            Some(model) => model.as_str(),
            None => match self.provider.as_str() {
                "openai" => "gpt-4o",
                _ => "claude-sonnet-4-20250514",
            },
        }
    }

    pub fn api_key_env(&self) -> &str {
        match &self.api_key_env {
            Some(env) => env.as_str(),
            None => match self.provider.as_str() {
                "openai" => "OPENAI_API_KEY",
                _ => "ANTHROPIC_API_KEY",
            },
        }
    }

    pub fn base_url(&self) -> &str {
        let url = match &self.base_url {
            Some(url) => url.as_str(),
            None => match self.provider.as_str() {
                "openai" => "https://api.openai.com",
                _ => "https://api.anthropic.com",
            },
        };
        url.trim_end_matches('/')
    }

    /// Resolve the API key: environment variable first, then key file
    pub fn get_api_key(&self) -> Result<String> {
        let env = self.api_key_env();
        if let Ok(key) = std::env::var(env)
            && !key.trim().is_empty()
        {
            return Ok(key.trim().to_string());
        }

        if let Some(file) = &self.api_key_file {
            let path = expand_home(file);
            let key = fs::read_to_string(&path).context(format!("Failed to read API key file {}", path.display()))?;
            let key = key.trim();
            if !key.is_empty() {
                return Ok(key.to_string());
            }
            return Err(eyre::eyre!("API key file {} is empty", path.display()));
        }

        Err(eyre::eyre!("API key not found. Set the {} environment variable.", env))
    }
}

/// Image capture limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Largest accepted image file in bytes
    #[serde(rename = "max-image-bytes")]
    pub max_image_bytes: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            // Hosted vision APIs cap a single image at 5 MiB
            max_image_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Terminal UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds
    #[serde(rename = "tick-ms")]
    pub tick_ms: u64,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_ms: 100 }
    }
}

/// Expand a leading `~/` to the user's home directory
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.analysis.provider, "anthropic");
        assert_eq!(config.capture.max_image_bytes, 5 * 1024 * 1024);
        assert_eq!(config.tui.tick_ms, 100);
        assert!(config.log_level.is_none());
        assert!(config.source.is_none());
    }

    #[test]
    fn test_analysis_config_defaults() {
        let config = AnalysisConfig::default();

        assert!(config.model().contains("sonnet"));
        assert_eq!(config.api_key_env(), "ANTHROPIC_API_KEY");
        assert_eq!(config.base_url(), "https://api.anthropic.com");
        assert_eq!(config.timeout_ms, 60_000);
    }

    #[test]
    fn test_provider_defaults_follow_provider() {
        let config = AnalysisConfig {
            provider: "openai".to_string(),
            ..Default::default()
        };

        assert_eq!(config.model(), "gpt-4o");
        assert_eq!(config.api_key_env(), "OPENAI_API_KEY");
        assert_eq!(config.base_url(), "https://api.openai.com");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = AnalysisConfig {
            base_url: Some("http://localhost:8080/".to_string()),
            ..Default::default()
        };

        assert_eq!(config.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
log-level: DEBUG
analysis:
  provider: openai
  model: gpt-4o
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-tokens: 2048
  timeout-ms: 15000
capture:
  max-image-bytes: 1000
tui:
  tick-ms: 50
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("DEBUG"));
        assert_eq!(config.analysis.provider, "openai");
        assert_eq!(config.analysis.model(), "gpt-4o");
        assert_eq!(config.analysis.api_key_env(), "MY_API_KEY");
        assert_eq!(config.analysis.base_url(), "https://api.example.com");
        assert_eq!(config.analysis.max_tokens, 2048);
        assert_eq!(config.analysis.timeout_ms, 15000);
        assert_eq!(config.capture.max_image_bytes, 1000);
        assert_eq!(config.tui.tick_ms, 50);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
analysis:
  model: claude-haiku
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.analysis.model(), "claude-haiku");
        assert_eq!(config.analysis.provider, "anthropic");
        assert_eq!(config.capture.max_image_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_load_explicit_file_records_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("declutter.yml");
        fs::write(&path, "capture:\n  max-image-bytes: 42\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.capture.max_image_bytes, 42);
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/declutter.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_api_key_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let key_path = dir.path().join("key");
        fs::write(&key_path, "  sk-test-123\n").unwrap();

        let config = AnalysisConfig {
            api_key_env: Some("DECLUTTER_TEST_KEY_UNSET_VAR".to_string()),
            api_key_file: Some(key_path.to_string_lossy().into_owned()),
            ..Default::default()
        };

        assert_eq!(config.get_api_key().unwrap(), "sk-test-123");
    }

    #[test]
    #[serial_test::serial]
    fn test_api_key_env_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let key_path = dir.path().join("key");
        fs::write(&key_path, "sk-from-file").unwrap();

        let config = AnalysisConfig {
            api_key_env: Some("DECLUTTER_TEST_KEY_SET_VAR".to_string()),
            api_key_file: Some(key_path.to_string_lossy().into_owned()),
            ..Default::default()
        };

        // SAFETY: serialized with the other env-mutating tests
        unsafe { std::env::set_var("DECLUTTER_TEST_KEY_SET_VAR", " sk-from-env ") };
        let key = config.get_api_key();
        unsafe { std::env::remove_var("DECLUTTER_TEST_KEY_SET_VAR") };

        assert_eq!(key.unwrap(), "sk-from-env");
        assert_eq!(config.get_api_key().unwrap(), "sk-from-file");
    }

    #[test]
    fn test_api_key_missing() {
        let config = AnalysisConfig {
            api_key_env: Some("DECLUTTER_TEST_KEY_UNSET_VAR".to_string()),
            ..Default::default()
        };

        let err = config.get_api_key().unwrap_err();
        assert!(err.to_string().contains("DECLUTTER_TEST_KEY_UNSET_VAR"));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/tmp/room.jpg"), PathBuf::from("/tmp/room.jpg"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/room.jpg"), home.join("room.jpg"));
        }
    }
}
