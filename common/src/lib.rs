/*!
common/src/lib.rs

Shared configuration types and helpers for News Navigator.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader for a TOML config file, with default/override merging
- Credential resolution from environment variables
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org/v2/everything";
pub const DEFAULT_NEWS_API_KEY_ENV: &str = "NEWS_API_KEY";
pub const DEFAULT_LLM_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_LLM_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o";

/// News search provider configuration section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsConfig {
    /// Search endpoint (NewsAPI "everything" or a compatible service)
    pub api_url: Option<String>,
    /// Name of the environment variable holding the provider credential
    pub api_key_env: Option<String>,
    /// ISO language filter, e.g. "en"
    pub language: Option<String>,
    /// Provider sort key, e.g. "publishedAt"
    pub sort_by: Option<String>,
    /// Maximum number of articles requested per search
    pub page_size: Option<usize>,
    /// How many days back the search window reaches
    pub window_days: Option<i64>,
}

/// Remote LLM config (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_url: Option<String>,
    pub api_key_env: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

impl NewsConfig {
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_NEWS_API_URL)
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_NEWS_API_KEY_ENV)
    }
}

impl LlmConfig {
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_LLM_API_URL)
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_LLM_API_KEY_ENV)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_LLM_MODEL)
    }
}

impl Config {
    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    /// Missing files are skipped, so with neither present the built-in defaults apply.
    pub async fn load_with_defaults(default_path: Option<&Path>, override_path: Option<&Path>) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        if let Some(path) = default_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path).await
                    .with_context(|| format!("Failed to read default config: {}", path.display()))?;
                let val: toml::Value = toml::from_str(&data)
                    .context("Failed to parse default configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        if let Some(path) = override_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path).await
                    .with_context(|| format!("Failed to read override config: {}", path.display()))?;
                let val: toml::Value = toml::from_str(&data)
                    .context("Failed to parse override configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        let cfg: Config = config_value.try_into().context("Failed to parse merged configuration")?;
        Ok(cfg)
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}

/// Read a credential from the named environment variable.
/// Unset and blank values are both reported as `None`.
pub fn resolve_secret(env_name: &str) -> Option<String> {
    std::env::var(env_name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn config_from_string_uses_defaults_for_missing_keys() {
        let toml = r#"
            [news]
            page_size = 5

            [llm]
            model = "gpt-4o-mini"
        "#;

        let cfg: Config = toml::from_str(toml).expect("parse config");
        assert_eq!(cfg.news.page_size, Some(5));
        assert_eq!(cfg.news.api_url(), DEFAULT_NEWS_API_URL);
        assert_eq!(cfg.news.api_key_env(), "NEWS_API_KEY");
        assert_eq!(cfg.llm.model(), "gpt-4o-mini");
        assert_eq!(cfg.llm.api_key_env(), "OPENAI_API_KEY");
    }

    #[test]
    fn empty_config_is_valid() {
        let cfg: Config = toml::from_str("").expect("parse empty config");
        assert!(cfg.news.window_days.is_none());
        assert_eq!(cfg.llm.model(), DEFAULT_LLM_MODEL);
    }

    #[tokio::test]
    async fn override_file_wins_key_by_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let default_path = dir.path().join("config.default.toml");
        let override_path = dir.path().join("config.toml");

        fs::write(
            &default_path,
            "[news]\nlanguage = \"en\"\npage_size = 10\n\n[llm]\nmodel = \"gpt-4o\"\n",
        )
        .expect("write default");
        fs::write(&override_path, "[news]\npage_size = 3\n").expect("write override");

        let cfg = Config::load_with_defaults(Some(&default_path), Some(&override_path))
            .await
            .expect("load config");

        assert_eq!(cfg.news.page_size, Some(3));
        assert_eq!(cfg.news.language.as_deref(), Some("en"));
        assert_eq!(cfg.llm.model(), "gpt-4o");
    }

    #[tokio::test]
    async fn missing_files_fall_back_to_builtin_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");

        let cfg = Config::load_with_defaults(Some(&missing), None)
            .await
            .expect("load config");

        assert_eq!(cfg.news.api_url(), DEFAULT_NEWS_API_URL);
    }

    #[test]
    fn resolve_secret_treats_blank_as_missing() {
        std::env::set_var("NEWSNAV_TEST_BLANK_SECRET", "   ");
        assert_eq!(resolve_secret("NEWSNAV_TEST_BLANK_SECRET"), None);

        std::env::set_var("NEWSNAV_TEST_SET_SECRET", "abc");
        assert_eq!(resolve_secret("NEWSNAV_TEST_SET_SECRET").as_deref(), Some("abc"));

        assert_eq!(resolve_secret("NEWSNAV_TEST_UNSET_SECRET_XYZ"), None);
    }
}
