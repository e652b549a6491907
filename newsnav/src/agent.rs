use anyhow::Result;
use common::Config;
use std::sync::Arc;
use tracing::info;

use crate::llm::remote::RemoteLlmProvider;
use crate::llm::LlmProvider;
use crate::news::{ArticleSource, NewsApiSource};
use crate::pipeline::Pipeline;
use crate::summarize::SearchResult;

/// News agent that retrieves and summarizes news articles for a query.
pub struct NewsAgent {
    pipeline: Pipeline,
}

impl NewsAgent {
    pub fn new(source: Arc<dyn ArticleSource>, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            pipeline: Pipeline::new(source, provider),
        }
    }

    /// Wire the NewsAPI source and the remote LLM provider from configuration.
    ///
    /// A missing LLM credential fails here. A missing news credential is reported
    /// by the source itself on the first search, before any request is sent.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = NewsApiSource::from_config(&config.news);

        let key_env = config.llm.api_key_env();
        let api_key = common::resolve_secret(key_env).ok_or_else(|| {
            anyhow::anyhow!("{} not found in environment variables", key_env)
        })?;

        let provider = RemoteLlmProvider::new(config.llm.api_url(), api_key, config.llm.model())
            .with_defaults(config.llm.max_tokens, config.llm.temperature);

        info!(
            news_url = config.news.api_url(),
            llm_url = config.llm.api_url(),
            model = provider.model(),
            "news agent initialized"
        );

        Ok(Self::new(Arc::new(source), Arc::new(provider)))
    }

    /// Search for news about `query`; returns a summary plus up to 10 articles.
    pub async fn search(&self, query: &str) -> Result<SearchResult> {
        let state = self.pipeline.run(query).await?;
        Ok(SearchResult {
            summary: state.summary,
            articles: state.top_articles,
        })
    }
}
