use chrono::{Duration, Utc};
use common::{NewsConfig, DEFAULT_NEWS_API_KEY_ENV, DEFAULT_NEWS_API_URL};
use tracing::{info, warn};

use super::model::{Article, SearchEnvelope};
use super::{ArticleSource, NewsError};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_WINDOW_DAYS: i64 = 7;
pub const MAX_WINDOW_DAYS: i64 = 365;
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_SORT_BY: &str = "publishedAt";

/// Article source backed by the NewsAPI `everything` endpoint.
///
/// Each call issues exactly one GET request for articles published in the last
/// `window_days` days, newest first, capped at `page_size` results (at most 10).
pub struct NewsApiSource {
    base_url: String,
    api_key: Option<String>,
    key_env: String,
    language: String,
    sort_by: String,
    page_size: usize,
    window_days: i64,
    client: reqwest::Client,
}

impl NewsApiSource {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            key_env: DEFAULT_NEWS_API_KEY_ENV.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            sort_by: DEFAULT_SORT_BY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            window_days: DEFAULT_WINDOW_DAYS,
            client: reqwest::Client::new(),
        }
    }

    /// Build a source from the `[news]` config section, reading the credential
    /// from the configured environment variable.
    pub fn from_config(config: &NewsConfig) -> Self {
        let key_env = config.api_key_env().to_string();
        let mut source = Self::new(config.api_url(), common::resolve_secret(&key_env));
        source.key_env = key_env;
        if let Some(language) = &config.language {
            source.language = language.clone();
        }
        if let Some(sort_by) = &config.sort_by {
            source.sort_by = sort_by.clone();
        }
        if let Some(page_size) = config.page_size {
            source.page_size = page_size.clamp(1, DEFAULT_PAGE_SIZE);
        }
        if let Some(window_days) = config.window_days {
            source.window_days = window_days;
        }
        source
    }

    /// First day of the search window, `window_days` before today.
    fn window_start(&self) -> Result<String, NewsError> {
        let invalid = || {
            NewsError::Configuration(format!(
                "invalid news window_days: {} (expected 1 to {})",
                self.window_days, MAX_WINDOW_DAYS
            ))
        };
        if !(1..=MAX_WINDOW_DAYS).contains(&self.window_days) {
            return Err(invalid());
        }
        let span = Duration::try_days(self.window_days).ok_or_else(invalid)?;
        let start = Utc::now().checked_sub_signed(span).ok_or_else(invalid)?;
        Ok(start.format("%Y-%m-%d").to_string())
    }
}

impl Default for NewsApiSource {
    fn default() -> Self {
        Self::new(DEFAULT_NEWS_API_URL, None)
    }
}

#[async_trait::async_trait]
impl ArticleSource for NewsApiSource {
    fn name(&self) -> &str {
        "get_news"
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Article>, NewsError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                NewsError::Configuration(format!(
                    "{} not found in environment variables",
                    self.key_env
                ))
            })?;

        let from = self.window_start()?;

        let params = [
            ("q", query.to_string()),
            ("from", from),
            ("sortBy", self.sort_by.clone()),
            ("language", self.language.clone()),
            ("apiKey", api_key.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| NewsError::Service(format!("Request Error: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NewsError::Service(format!("Request Error: {}", e)))?;

        if !status.is_success() {
            // NewsAPI reports most failures with an error envelope on a 4xx/5xx status.
            let message = serde_json::from_str::<SearchEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.message);
            warn!(%status, query, "news search returned an error status");
            return Err(match message {
                Some(message) => NewsError::Service(format!("API Error: {}", message)),
                None => NewsError::Service(format!("Request Error: HTTP {}", status)),
            });
        }

        let envelope: SearchEnvelope = serde_json::from_str(&body)
            .map_err(|e| NewsError::Service(format!("Error retrieving news: {}", e)))?;

        if envelope.status != "ok" {
            let message = envelope
                .message
                .unwrap_or_else(|| "Unknown error".to_string());
            warn!(status = %envelope.status, query, "news search reported a failure");
            return Err(NewsError::Service(format!("API Error: {}", message)));
        }

        let articles: Vec<Article> = envelope
            .articles
            .into_iter()
            .take(self.page_size)
            .map(Article::from)
            .collect();
        info!(
            query,
            count = articles.len(),
            total = ?envelope.total_results,
            "fetched news articles"
        );
        Ok(articles)
    }
}
