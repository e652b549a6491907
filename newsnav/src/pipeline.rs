//! Forward-only search workflow.
//!
//! A search moves through `AcceptQuery -> FetchArticles -> Summarize -> Terminal`.
//! Retrieval failures reported by the article source end the run early with a
//! readable message in `summary`; a misconfigured source or a failing text
//! generator aborts the run with an error instead.

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::llm::LlmProvider;
use crate::news::{Article, ArticleSource, NewsError};
use crate::summarize::summarize_articles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AcceptQuery,
    FetchArticles,
    Summarize,
    Terminal,
}

/// Per-invocation record threaded through the stages.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub query: String,
    pub fetched_articles: Vec<Article>,
    pub summary: String,
    pub top_articles: Vec<Article>,
    pub next: Stage,
}

impl PipelineState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            fetched_articles: Vec::new(),
            summary: String::new(),
            top_articles: Vec::new(),
            next: Stage::AcceptQuery,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next == Stage::Terminal
    }
}

pub struct Pipeline {
    source: Arc<dyn ArticleSource>,
    provider: Arc<dyn LlmProvider>,
}

impl Pipeline {
    pub fn new(source: Arc<dyn ArticleSource>, provider: Arc<dyn LlmProvider>) -> Self {
        Self { source, provider }
    }

    /// Execute the stage named by `state.next` and record the following one.
    pub async fn advance(&self, state: &mut PipelineState) -> Result<()> {
        debug!(stage = ?state.next, query = %state.query, "pipeline step");

        match state.next {
            Stage::AcceptQuery => {
                state.next = Stage::FetchArticles;
            }
            Stage::FetchArticles => match self.source.fetch(&state.query).await {
                Ok(articles) => {
                    state.fetched_articles = articles;
                    state.next = Stage::Summarize;
                }
                Err(NewsError::Service(message)) => {
                    warn!(source = self.source.name(), %message, "article fetch failed");
                    state.fetched_articles.clear();
                    state.top_articles.clear();
                    state.summary = format!("Error fetching news: {}", message);
                    state.next = Stage::Terminal;
                }
                Err(err @ NewsError::Configuration(_)) => return Err(err.into()),
            },
            Stage::Summarize => {
                let result = summarize_articles(
                    self.provider.as_ref(),
                    &state.query,
                    &state.fetched_articles,
                )
                .await?;
                state.summary = result.summary;
                state.top_articles = result.articles;
                state.next = Stage::Terminal;
            }
            Stage::Terminal => {}
        }

        Ok(())
    }

    /// Run a fresh state for `query` until it reaches `Stage::Terminal`.
    pub async fn run(&self, query: &str) -> Result<PipelineState> {
        let mut state = PipelineState::new(query);
        while !state.is_terminal() {
            self.advance(&mut state).await?;
        }
        Ok(state)
    }
}
