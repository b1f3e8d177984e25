//! Command line argument parsing for the `llm-api` and `search-engine` binaries

use crate::llm::ProviderKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "llm-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query an LLM with a prompt")]
pub struct LlmArgs {
    /// The prompt to send to the LLM
    #[arg(long)]
    pub prompt: String,
    /// The API provider to use
    #[arg(long, value_enum, default_value_t = ProviderKind::OpenAI)]
    pub provider: ProviderKind,
    /// The model to use (default depends on provider)
    #[arg(long)]
    pub model: Option<String>,
    /// Configuration file path
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl LlmArgs {
    /// Model to request: `--model`, else the CLI default for the provider.
    /// `None` leaves the choice to the dispatcher.
    pub fn resolved_model(&self) -> Option<&str> {
        self.model
            .as_deref()
            .or_else(|| self.provider.cli_default_model())
    }
}

#[derive(Debug, Parser)]
#[command(name = "search-engine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search using DuckDuckGo with fallback mechanisms")]
pub struct SearchArgs {
    /// Search query
    pub query: String,
    /// Maximum number of results
    #[arg(
        long = "max-results",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_results: u32,
    /// Maximum number of attempts (overrides the configuration file)
    #[arg(long = "max-retries", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_retries: Option<u32>,
    /// Configuration file path
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
