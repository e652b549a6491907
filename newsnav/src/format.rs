use anyhow::{Context, Result};

use crate::summarize::SearchResult;

/// Render a search result as markdown for terminal display.
pub fn format_markdown(result: &SearchResult) -> String {
    let mut output = String::from("# News Summary\n\n");
    output.push_str(&result.summary);

    output.push_str("\n\n# Top 10 Recent Articles\n\n");

    for (i, article) in result.articles.iter().enumerate() {
        output.push_str(&format!("{}. [{}]({})\n", i + 1, article.title, article.url));
        output.push_str(&format!("   Source: {}\n", article.source));
        output.push_str(&format!("   Published: {}\n\n", article.published_at));
    }

    output
}

pub fn format_json(result: &SearchResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize search result")
}
