//! Exit codes and output of the `llm-api` and `search-engine` binaries
//!
//! Each run happens in an empty temporary directory with `HOME` pointed at
//! another one, so no `.env` or configuration file is picked up. None of these
//! cases reach a real service.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const CREDENTIAL_VARS: [&str; 4] = [
    "OPENAI_API_KEY",
    "DEEPSEEK_API_KEY",
    "ANTHROPIC_API_KEY",
    "GOOGLE_API_KEY",
];

fn run_isolated(binary: &str, args: &[&str], vars: &[(&str, &str)], workdir: &Path) -> Output {
    let home = TempDir::new().unwrap();
    let mut command = Command::new(binary);
    command
        .args(args)
        .current_dir(workdir)
        .env("HOME", home.path())
        .env_remove("USERPROFILE")
        .env_remove("RUST_LOG")
        .env_remove("LOCAL_LLM_BASE_URL");
    for name in CREDENTIAL_VARS {
        command.env_remove(name);
    }
    for (name, value) in vars {
        command.env(name, value);
    }
    command.output().expect("Should be able to run the binary")
}

fn llm_api(args: &[&str], vars: &[(&str, &str)]) -> Output {
    let workdir = TempDir::new().unwrap();
    run_isolated(env!("CARGO_BIN_EXE_llm-api"), args, vars, workdir.path())
}

fn search_engine(args: &[&str], workdir: &Path) -> Output {
    run_isolated(env!("CARGO_BIN_EXE_search-engine"), args, &[], workdir)
}

#[test]
fn test_llm_api_prints_failure_line_and_exits_zero() {
    // Nothing listens on the discard port, so the call fails at connect time
    let output = llm_api(
        &["--prompt", "hi", "--provider", "local"],
        &[("LOCAL_LLM_BASE_URL", "http://127.0.0.1:9/v1")],
    );

    assert!(output.status.success(), "status: {:?}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end(), "Failed to get response from LLM");
}

#[test]
fn test_llm_api_missing_credential_exits_one() {
    let output = llm_api(&["--prompt", "hi", "--provider", "anthropic"], &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("ANTHROPIC_API_KEY not found in environment variables"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn test_llm_api_rejects_unknown_provider() {
    let output = llm_api(&["--prompt", "hi", "--provider", "mistral"], &[]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_search_engine_empty_query_reports_error() {
    let workdir = TempDir::new().unwrap();
    let output = search_engine(&[""], workdir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: Search failed:"), "stderr: {}", stderr);
    assert!(
        stderr.contains("ERROR type: SearchError::InvalidRequest"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn test_search_engine_oversized_delay_in_config_reports_error() {
    let workdir = TempDir::new().unwrap();
    fs::write(
        workdir.path().join("agent-tools.toml"),
        "[search]\ninitial_delay_secs = 1e20\n",
    )
    .unwrap();

    let output = search_engine(&["rust"], workdir.path());

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: Search failed:"), "stderr: {}", stderr);
    assert!(stderr.contains("ERROR type: ConfigError"), "stderr: {}", stderr);
    assert!(!stderr.contains("panicked"), "stderr: {}", stderr);
}
