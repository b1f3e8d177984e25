use agent_tools::cli::{ConfigDiscovery, SearchArgs, init_tracing};
use agent_tools::env::ConfigError;
use agent_tools::integration::run_search;
use agent_tools::search::{DuckDuckGo, SearchError};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = SearchArgs::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("ERROR: Search failed: {:#}", e);
        eprintln!("ERROR type: {}", error_type(&e));
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}

async fn run(args: SearchArgs) -> anyhow::Result<()> {
    let mut config = ConfigDiscovery::load(args.config.as_deref())?;
    if let Some(max_retries) = args.max_retries {
        config.search.max_retries = max_retries;
    }

    let backend = DuckDuckGo::new(&config.search.region)?;
    let mut stdout = std::io::stdout().lock();
    run_search(
        &backend,
        &args.query,
        args.max_results as usize,
        &config.search,
        &mut stdout,
    )
    .await?;

    Ok(())
}

fn error_type(err: &anyhow::Error) -> String {
    if let Some(e) = err.downcast_ref::<SearchError>() {
        format!("SearchError::{}", e.kind())
    } else if err.downcast_ref::<ConfigError>().is_some() {
        "ConfigError".to_string()
    } else if err.downcast_ref::<std::io::Error>().is_some() {
        "io::Error".to_string()
    } else {
        "Unknown".to_string()
    }
}
