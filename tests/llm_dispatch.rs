//! Integration tests for LLM client construction and dispatch
//!
//! Providers are replaced by in-process stubs; nothing here talks to a real API.

use agent_tools::cli::{LlmArgs, ToolsConfig};
use agent_tools::env::{ConfigError, Environment};
use agent_tools::integration::{ask, run_llm_query};
use agent_tools::llm::{
    LLMError, LLMProvider, LLMProviderFactory, LLMRequest, LLMResponse, LlmSettings,
    ProviderKind, QueryDispatcher,
};
use clap::Parser;
use futures::future::BoxFuture;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

struct CannedProvider {
    reply: Result<String, u16>,
}

impl LLMProvider for CannedProvider {
    fn execute_request(
        &self,
        request: LLMRequest,
    ) -> BoxFuture<'_, Result<LLMResponse, LLMError>> {
        let result = match &self.reply {
            Ok(text) => Ok(LLMResponse {
                request_id: request.id,
                content: text.clone(),
                model_used: request.model.clone(),
                execution_time: Duration::from_millis(1),
            }),
            Err(status) => Err(LLMError::Api {
                status: *status,
                body: "upstream failure".to_string(),
            }),
        };
        Box::pin(async move { result })
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAI
    }
}

fn dispatcher_with(vars: &[(&str, &str)]) -> QueryDispatcher {
    QueryDispatcher::new(
        Environment::from_vars(vars.iter().copied()),
        LlmSettings::default(),
    )
}

#[tokio::test]
async fn test_injected_client_reply_is_returned() {
    let dispatcher = dispatcher_with(&[]);
    let client = CannedProvider {
        reply: Ok("Hello!".to_string()),
    };

    let reply = dispatcher
        .query("Say hello", Some(&client), None, ProviderKind::OpenAI)
        .await
        .unwrap();
    assert_eq!(reply.as_deref(), Some("Hello!"));
}

#[tokio::test]
async fn test_provider_failure_becomes_none() {
    let dispatcher = dispatcher_with(&[]);
    let client = CannedProvider { reply: Err(500) };

    let reply = dispatcher
        .query("Say hello", Some(&client), Some("gpt-4o"), ProviderKind::OpenAI)
        .await
        .unwrap();
    assert_eq!(reply, None);
}

#[tokio::test]
async fn test_missing_credential_surfaces_as_error() {
    let dispatcher = dispatcher_with(&[]);

    let err = dispatcher
        .query("Say hello", None, None, ProviderKind::Anthropic)
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigError::MissingCredential("ANTHROPIC_API_KEY")));
    assert_eq!(
        err.to_string(),
        "ANTHROPIC_API_KEY not found in environment variables"
    );
}

#[test]
fn test_factory_builds_every_provider_with_credentials() {
    let env = Environment::from_vars([
        ("OPENAI_API_KEY", "sk-test"),
        ("DEEPSEEK_API_KEY", "ds-test"),
        ("ANTHROPIC_API_KEY", "ant-test"),
        ("GOOGLE_API_KEY", "g-test"),
    ]);
    let settings = LlmSettings::default();

    for kind in ProviderKind::ALL {
        let client = LLMProviderFactory::create_provider(kind, &env, &settings).unwrap();
        assert_eq!(client.kind(), kind);
    }
}

#[test]
fn test_factory_rejects_unknown_tag() {
    let env = Environment::default();
    let err = LLMProviderFactory::create_from_tag("mistral", &env, &LlmSettings::default())
        .err()
        .unwrap();
    assert_eq!(err.to_string(), "Unsupported provider: mistral");
}

#[test]
fn test_env_layers_feed_the_factory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env.example"), "GOOGLE_API_KEY=placeholder\n").unwrap();
    fs::write(dir.path().join(".env"), "GOOGLE_API_KEY=from-dotenv\n").unwrap();

    let env = Environment::load_layers(Vec::new(), dir.path()).unwrap();
    assert_eq!(env.get("GOOGLE_API_KEY"), Some("from-dotenv"));
    assert_eq!(env.loaded_files().len(), 2);

    let client =
        LLMProviderFactory::create_provider(ProviderKind::Gemini, &env, &LlmSettings::default())
            .unwrap();
    assert_eq!(client.kind(), ProviderKind::Gemini);
}

#[tokio::test]
async fn test_run_llm_query_fails_fast_without_credentials() {
    let args = LlmArgs::try_parse_from(["llm-api", "--prompt", "hi", "--provider", "deepseek"])
        .unwrap();

    let err = run_llm_query(&args, Environment::default(), ToolsConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::MissingCredential("DEEPSEEK_API_KEY"))
    ));
}

#[tokio::test]
async fn test_ask_treats_empty_reply_as_failure() {
    let dispatcher = dispatcher_with(&[]);
    let args = LlmArgs::try_parse_from(["llm-api", "--prompt", "hi"]).unwrap();

    let empty = CannedProvider {
        reply: Ok(String::new()),
    };
    assert_eq!(ask(&dispatcher, &empty, &args).await.unwrap(), None);

    let failing = CannedProvider { reply: Err(503) };
    assert_eq!(ask(&dispatcher, &failing, &args).await.unwrap(), None);

    let answering = CannedProvider {
        reply: Ok("4".to_string()),
    };
    assert_eq!(
        ask(&dispatcher, &answering, &args).await.unwrap().as_deref(),
        Some("4")
    );
}
