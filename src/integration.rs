//! End-to-end flows behind the two binaries.
//!
//! ```text
//! llm-api:        args -> config + .env layers -> factory -> dispatcher -> stdout
//! search-engine:  args -> config -> DuckDuckGo -> retry/fallback -> formatter -> stdout
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use agent_tools::integration::run_search;
//! use agent_tools::search::{DuckDuckGo, SearchSettings};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = DuckDuckGo::new("wt-wt")?;
//!     let printed = run_search(
//!         &backend,
//!         "rust async runtime",
//!         5,
//!         &SearchSettings::default(),
//!         &mut std::io::stdout(),
//!     )
//!     .await?;
//!     eprintln!("{} results", printed);
//!     Ok(())
//! }
//! ```

use crate::cli::{LlmArgs, ToolsConfig};
use crate::env::{ConfigError, Environment};
use crate::llm::{LLMProvider, QueryDispatcher};
use crate::search::{SearchBackend, SearchSettings, search_with_retry, write_results};
use anyhow::{Context, Result};
use std::io::Write;
use tracing::info;

/// Line printed by `llm-api` when no reply could be obtained
pub const LLM_FAILURE_MESSAGE: &str = "Failed to get response from LLM";

/// Build a client for the requested provider and send the prompt.
///
/// Configuration problems are returned as errors; a failed call yields `Ok(None)`.
/// An empty reply is treated the same as no reply.
pub async fn run_llm_query(
    args: &LlmArgs,
    env: Environment,
    config: ToolsConfig,
) -> Result<Option<String>> {
    let dispatcher = QueryDispatcher::new(env, config.llm);
    let client = dispatcher
        .create_client(args.provider)
        .with_context(|| format!("failed to create {} client", args.provider))?;

    Ok(ask(&dispatcher, client.as_ref(), args).await?)
}

/// Send the prompt from `args` through `client`.
///
/// `None` covers both a failed call and an empty reply.
pub async fn ask(
    dispatcher: &QueryDispatcher,
    client: &dyn LLMProvider,
    args: &LlmArgs,
) -> Result<Option<String>, ConfigError> {
    let reply = dispatcher
        .query(
            &args.prompt,
            Some(client),
            args.resolved_model(),
            args.provider,
        )
        .await?;

    Ok(reply.filter(|text| !text.is_empty()))
}

/// Search and write the formatted results to `out`.
///
/// Returns the number of results written. Nothing is written for an empty
/// result set.
pub async fn run_search<W: Write>(
    backend: &dyn SearchBackend,
    query: &str,
    max_results: usize,
    settings: &SearchSettings,
    out: &mut W,
) -> Result<usize> {
    info!(backend = backend.name(), %query, max_results, "Starting search");
    let results = search_with_retry(backend, query, max_results, settings)
        .await
        .with_context(|| format!("search for '{}' failed", query))?;

    if !results.is_empty() {
        write_results(out, &results).context("failed to write results")?;
    }
    Ok(results.len())
}
