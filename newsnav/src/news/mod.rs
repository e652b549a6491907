//! Article retrieval: the provider-agnostic `ArticleSource` seam, the canonical
//! article model and the NewsAPI adapter.

use thiserror::Error;

pub mod model;
pub mod newsapi;

pub use model::{Article, RawArticle};
pub use newsapi::NewsApiSource;

/// Failures surfaced by an article source.
#[derive(Debug, Error)]
pub enum NewsError {
    /// Required credential or setting is missing. Raised before any network call.
    #[error("{0}")]
    Configuration(String),
    /// Transport failure or provider-reported failure while retrieving articles.
    #[error("{0}")]
    Service(String),
}

/// Something that turns a free-text query into an ordered list of articles.
#[async_trait::async_trait]
pub trait ArticleSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Human-readable description of what the source returns.
    fn description(&self) -> &str {
        "Get the latest news articles about a specific topic or query."
    }

    /// Fetch articles for `query`, in provider order.
    async fn fetch(&self, query: &str) -> Result<Vec<Article>, NewsError>;
}
