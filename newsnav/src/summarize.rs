use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::llm::{LlmProvider, LlmRequest};
use crate::news::Article;

/// Upper bound on the number of articles republished with a summary.
pub const MAX_TOP_ARTICLES: usize = 10;

/// Outcome of one search: the narrative summary and the articles it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub summary: String,
    pub articles: Vec<Article>,
}

/// Message returned when the provider found nothing for `query`.
pub fn no_articles_message(query: &str) -> String {
    format!("No news articles found for '{}'.", query)
}

/// Summarize `articles` about `query` with the given provider.
///
/// An empty article list short-circuits without calling the provider.
/// Provider failures are returned to the caller untouched.
pub async fn summarize_articles<P: LlmProvider + ?Sized>(
    provider: &P,
    query: &str,
    articles: &[Article],
) -> Result<SearchResult> {
    if articles.is_empty() {
        info!(query, "no articles to summarize");
        return Ok(SearchResult {
            summary: no_articles_message(query),
            articles: Vec::new(),
        });
    }

    let request = LlmRequest::new(build_prompt(query, articles));
    let response = provider
        .generate(request)
        .await
        .context("LLM generation failed")?;

    info!(
        query,
        articles = articles.len(),
        model = %response.model,
        total_tokens = response.usage.total_tokens,
        "news summary generated"
    );

    Ok(SearchResult {
        summary: response.content,
        articles: articles.iter().take(MAX_TOP_ARTICLES).cloned().collect(),
    })
}

/// Build the summarization prompt: a numbered article listing followed by the task.
pub fn build_prompt(query: &str, articles: &[Article]) -> String {
    let mut context = format!(
        "Here are {} news articles about '{}':\n\n",
        articles.len(),
        query
    );

    for (i, article) in articles.iter().enumerate() {
        context.push_str(&format!("{}. Title: {}\n", i + 1, article.title));
        context.push_str(&format!("   Description: {}\n", article.description));
        context.push_str(&format!("   Source: {}\n", article.source));
        context.push_str(&format!("   Published: {}\n\n", article.published_at));
    }

    let mut prompt = String::new();
    prompt.push_str(&format!(
        "Based on the following news articles about '{}', provide:\n\n",
        query
    ));
    prompt.push_str("1. A comprehensive summary of the overall news coverage (about 2-3 paragraphs)\n");
    prompt.push_str("2. Key points or trends in the news\n\n");
    prompt.push_str("Context:\n");
    prompt.push_str(&context);
    prompt
}
