/*
newsnav - command-line entry point.
Searches recent news for a topic, summarizes the coverage and prints the result.
*/

use anyhow::Result;
use clap::Parser;
use common::Config;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use newsnav::format::{format_json, format_markdown};
use newsnav::NewsAgent;

#[derive(Parser, Debug)]
#[command(name = "newsnav", about = "Search recent news on a topic and summarize the coverage")]
struct Args {
    /// Search query; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,

    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the LLM model identifier
    #[arg(long)]
    model: Option<String>,

    /// Print the result as JSON instead of markdown
    #[arg(long)]
    json: bool,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout only carries the rendered result
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    // Credentials may live in a .env file next to the binary's working directory
    dotenv::dotenv().ok();

    let query = args.query.join(" ").trim().to_string();
    if query.is_empty() {
        error!("empty search query");
        anyhow::bail!("Please provide a search query.");
    }

    // Resolve config paths
    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() { Some(p) } else { None }
    };

    let mut config = match Config::load_with_defaults(
        if default_path.exists() { Some(&default_path) } else { None },
        override_path.as_deref(),
    )
    .await
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(%e, "failed to load configuration");
            return Err(e);
        }
    };
    info!(default = ?default_path, override = ?override_path, "configuration loaded");

    if let Some(model) = args.model {
        config.llm.model = Some(model);
    }

    if common::resolve_secret(config.news.api_key_env()).is_none() {
        error!(
            env = config.news.api_key_env(),
            "news API key not set; obtain one from https://newsapi.org/ and put it in your .env file"
        );
        anyhow::bail!("{} environment variable not set", config.news.api_key_env());
    }

    let agent = NewsAgent::from_config(&config).map_err(|e| {
        error!(%e, "failed to initialize news agent");
        e
    })?;

    println!("Searching for news about: {}", query);
    println!("This may take a moment...");

    let result = match agent.search(&query).await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %format!("{:#}", e), "search failed");
            return Err(e);
        }
    };

    let rendered = if args.json {
        format_json(&result)?
    } else {
        format_markdown(&result)
    };
    println!("\n{}", rendered);

    Ok(())
}
