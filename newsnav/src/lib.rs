// Library interface for newsnav modules
// This allows tests and the CLI binary to import modules

pub mod agent;
pub mod format;
pub mod llm;
pub mod news;
pub mod pipeline;
pub mod summarize;

pub use agent::NewsAgent;
pub use summarize::SearchResult;
