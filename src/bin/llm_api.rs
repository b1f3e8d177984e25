use agent_tools::cli::{ConfigDiscovery, LlmArgs, init_tracing};
use agent_tools::env::Environment;
use agent_tools::integration::{LLM_FAILURE_MESSAGE, run_llm_query};
use clap::Parser;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = LlmArgs::parse();
    init_tracing(args.verbose);

    let config = ConfigDiscovery::load(args.config.as_deref())?;
    let env = Environment::load()?;
    info!(provider = %args.provider, "Starting llm-api");

    match run_llm_query(&args, env, config).await? {
        Some(reply) => println!("{}", reply),
        None => println!("{}", LLM_FAILURE_MESSAGE),
    }

    Ok(())
}
