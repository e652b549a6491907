use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use newsnav::llm::{LlmProvider, LlmRequest, LlmResponse, UsageMetadata};
use newsnav::news::{Article, ArticleSource, NewsError};
use newsnav::pipeline::{Pipeline, PipelineState, Stage};
use newsnav::NewsAgent;

enum Outcome {
    Articles(Vec<Article>),
    ServiceError(String),
    MissingKey,
}

struct FakeSource {
    outcome: Outcome,
    calls: AtomicUsize,
}

impl FakeSource {
    fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl ArticleSource for FakeSource {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch(&self, _query: &str) -> Result<Vec<Article>, NewsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Outcome::Articles(articles) => Ok(articles.clone()),
            Outcome::ServiceError(message) => Err(NewsError::Service(message.clone())),
            Outcome::MissingKey => Err(NewsError::Configuration(
                "NEWS_API_KEY not found in environment variables".to_string(),
            )),
        }
    }
}

struct FakeProvider {
    reply: Option<String>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl FakeProvider {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        })
    }
}

#[async_trait::async_trait]
impl LlmProvider for FakeProvider {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(request.prompt);
        match &self.reply {
            Some(text) => Ok(LlmResponse {
                content: text.clone(),
                usage: UsageMetadata::default(),
                model: "fake-model".to_string(),
            }),
            None => anyhow::bail!("LLM API error 503 Service Unavailable: overloaded"),
        }
    }
}

fn article(n: usize) -> Article {
    Article {
        title: format!("Title {}", n),
        description: format!("Description {}", n),
        url: format!("https://example.com/{}", n),
        source: format!("Source {}", n),
        author: format!("Author {}", n),
        published_at: format!("2024-05-{:02}T00:00:00Z", (n % 28) + 1),
    }
}

fn agent(source: &Arc<FakeSource>, provider: &Arc<FakeProvider>) -> NewsAgent {
    NewsAgent::new(source.clone(), provider.clone())
}

#[tokio::test]
async fn test_empty_fetch_short_circuits_summary() {
    let source = FakeSource::new(Outcome::Articles(Vec::new()));
    let provider = FakeProvider::replying("unused");

    let result = agent(&source, &provider).search("quantum gravity").await.expect("search");

    assert_eq!(result.summary, "No news articles found for 'quantum gravity'.");
    assert!(result.articles.is_empty());
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_fetch_failure_degrades_to_message() {
    let source = FakeSource::new(Outcome::ServiceError("Request Error: connection refused".to_string()));
    let provider = FakeProvider::replying("unused");

    let result = agent(&source, &provider).search("markets").await.expect("search");

    assert!(!result.summary.is_empty());
    assert!(result.summary.starts_with("Error fetching news:"));
    assert!(result.summary.contains("connection refused"));
    assert!(result.articles.is_empty());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_news_key_is_a_hard_error() {
    let source = FakeSource::new(Outcome::MissingKey);
    let provider = FakeProvider::replying("unused");

    let err = agent(&source, &provider).search("markets").await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<NewsError>(),
        Some(NewsError::Configuration(_))
    ));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_generation_failure_propagates() {
    let source = FakeSource::new(Outcome::Articles(vec![article(1)]));
    let provider = FakeProvider::failing();

    let err = agent(&source, &provider).search("markets").await.unwrap_err();

    assert!(format!("{:#}", err).contains("503"));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_articles_capped_at_ten_in_fetch_order() {
    for fetched in [1usize, 9, 10, 11, 25] {
        let articles: Vec<Article> = (0..fetched).map(article).collect();
        let source = FakeSource::new(Outcome::Articles(articles.clone()));
        let provider = FakeProvider::replying("summary");

        let result = agent(&source, &provider).search("topic").await.expect("search");

        let expected = fetched.min(10);
        assert_eq!(result.articles.len(), expected);
        assert_eq!(result.articles[..], articles[..expected]);
    }
}

#[tokio::test]
async fn test_end_to_end_artificial_intelligence() {
    let articles: Vec<Article> = (1..=3).map(article).collect();
    let source = FakeSource::new(Outcome::Articles(articles.clone()));
    let provider = FakeProvider::replying("Paragraph A. Paragraph B.");

    let result = agent(&source, &provider)
        .search("artificial intelligence")
        .await
        .expect("search");

    assert_eq!(result.summary, "Paragraph A. Paragraph B.");
    assert_eq!(result.articles, articles);
    for a in &result.articles {
        for field in [&a.title, &a.description, &a.url, &a.source, &a.author, &a.published_at] {
            assert!(!field.is_empty());
        }
    }

    let prompt = provider.last_prompt.lock().unwrap().clone().expect("prompt sent");
    assert!(prompt.contains("Here are 3 news articles about 'artificial intelligence'"));
    assert!(prompt.contains("3. Title: Title 3"));
}

#[tokio::test]
async fn test_stage_transitions() {
    let source = FakeSource::new(Outcome::Articles(vec![article(1)]));
    let provider = FakeProvider::replying("done");
    let pipeline = Pipeline::new(source.clone(), provider.clone());

    let mut state = PipelineState::new("rust");
    assert_eq!(state.next, Stage::AcceptQuery);

    pipeline.advance(&mut state).await.expect("accept");
    assert_eq!(state.next, Stage::FetchArticles);
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);

    pipeline.advance(&mut state).await.expect("fetch");
    assert_eq!(state.next, Stage::Summarize);
    assert_eq!(state.fetched_articles.len(), 1);

    pipeline.advance(&mut state).await.expect("summarize");
    assert_eq!(state.next, Stage::Terminal);
    assert_eq!(state.summary, "done");
    assert_eq!(state.top_articles, state.fetched_articles);

    // Terminal is absorbing
    pipeline.advance(&mut state).await.expect("terminal");
    assert!(state.is_terminal());
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fetch_failure_skips_summarize_stage() {
    let source = FakeSource::new(Outcome::ServiceError("API Error: rateLimited".to_string()));
    let provider = FakeProvider::replying("unused");
    let pipeline = Pipeline::new(source, provider);

    let state = pipeline.run("rust").await.expect("run");

    assert!(state.is_terminal());
    assert!(state.fetched_articles.is_empty());
    assert!(state.top_articles.is_empty());
    assert_eq!(state.summary, "Error fetching news: API Error: rateLimited");
}
