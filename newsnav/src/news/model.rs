use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "No title";
pub const DEFAULT_DESCRIPTION: &str = "No description";
pub const DEFAULT_SOURCE: &str = "Unknown source";
pub const DEFAULT_AUTHOR: &str = "Unknown author";

/// Article record as returned by the search provider. Every field may be missing or null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: Option<RawSource>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub name: Option<String>,
}

/// Search provider response envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEnvelope {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

/// Canonical article shape handed to the summarizer and returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub author: String,
    pub published_at: String,
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        Self {
            title: raw.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: raw
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            url: raw.url.unwrap_or_default(),
            source: raw
                .source
                .and_then(|s| s.name)
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            author: raw.author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            published_at: raw.published_at.unwrap_or_default(),
        }
    }
}
