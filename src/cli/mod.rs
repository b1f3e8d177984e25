//! CLI-specific functionality shared by the `llm-api` and `search-engine` binaries
//!
//! This module contains argument parsing, configuration discovery and
//! logging setup.

pub mod args;
pub mod config;

pub use args::{LlmArgs, SearchArgs};
pub use config::{ConfigDiscovery, ToolsConfig};

use tracing_subscriber::EnvFilter;

/// Install the stderr `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the crate logs at `info`, or `debug`
/// when `verbose` is set.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "agent_tools=debug"
    } else {
        "agent_tools=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
