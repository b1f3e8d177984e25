//! # Agent Tools
//!
//! Command-line helpers for querying hosted LLM providers and searching the web.
//!
//! ## Architecture Overview
//!
//! - **[`llm`]**: Provider-agnostic LLM interface (OpenAI, DeepSeek, local
//!   OpenAI-compatible servers, Anthropic, Gemini) with a client factory and a
//!   single-shot query dispatcher
//! - **[`search`]**: DuckDuckGo text search with backend fallback, jittered
//!   retries and result formatting
//! - **[`env`]**: Layered `.env` resolution and path constants
//! - **[`cli`]**: Argument parsing, configuration discovery and logging setup
//! - **[`integration`]**: The end-to-end flows run by the binaries
//!
//! ## Binaries
//!
//! - `llm-api --prompt <text> [--provider openai|anthropic|gemini|local|deepseek] [--model <name>]`
//! - `search-engine <query> [--max-results <n>]`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agent_tools::env::Environment;
//! use agent_tools::llm::{LlmSettings, ProviderKind, QueryDispatcher};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let dispatcher = QueryDispatcher::new(Environment::load()?, LlmSettings::default());
//!     match dispatcher.query("Say hello", None, None, ProviderKind::OpenAI).await? {
//!         Some(reply) => println!("{}", reply),
//!         None => println!("no answer"),
//!     }
//!     Ok(())
//! }
//! ```

/// Provider-agnostic LLM interface.
///
/// One [`llm::LLMProvider`] implementation per wire format, built through
/// [`llm::LLMProviderFactory`] and driven by [`llm::QueryDispatcher`].
pub mod llm;

/// Web search with retry and fallback.
pub mod search;

/// Environment constants, path utilities and `.env` layering.
pub mod env;

/// High-level flows shared by the binaries.
pub mod integration;

// CLI module for command-line interface
pub mod cli;

// Re-export LLM abstraction types
pub use llm::{LLMProvider, LLMProviderFactory, ProviderKind, QueryDispatcher};

// Re-export search types
pub use search::{DuckDuckGo, SearchBackend, SearchRecord, search_with_retry};

pub use env::{ConfigError, Environment};
