use crate::env::{ConfigError, Environment, vars};
use crate::llm::anthropic_provider::AnthropicProvider;
use crate::llm::gemini_provider::GeminiProvider;
use crate::llm::openai_provider::OpenAIProvider;
use crate::llm::types::{LLMError, LLMRequest, LLMResponse, LlmSettings, ProviderKind};
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Uniform "send prompt, get text" capability implemented by every provider
pub trait LLMProvider: Send + Sync {
    /// Execute a single request against the provider's API
    fn execute_request(
        &self,
        request: LLMRequest,
    ) -> BoxFuture<'_, Result<LLMResponse, LLMError>>;

    /// Provider this client is bound to
    fn kind(&self) -> ProviderKind;

    /// Get provider name/identifier
    fn provider_name(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Factory for creating LLM providers
pub struct LLMProviderFactory;

impl LLMProviderFactory {
    /// Build a client for `kind`, reading its credential from `env`.
    pub fn create_provider(
        kind: ProviderKind,
        env: &Environment,
        settings: &LlmSettings,
    ) -> Result<Arc<dyn LLMProvider>, ConfigError> {
        debug!(provider = %kind, "Creating LLM client");
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {}", e)))?;

        let provider: Arc<dyn LLMProvider> = match kind {
            ProviderKind::OpenAI => {
                let api_key = env.require(vars::OPENAI_API_KEY)?;
                Arc::new(OpenAIProvider::new(
                    kind,
                    http,
                    validate_base_url(&settings.openai_base_url)?,
                    api_key,
                    settings.temperature,
                ))
            }
            ProviderKind::DeepSeek => {
                let api_key = env.require(vars::DEEPSEEK_API_KEY)?;
                Arc::new(OpenAIProvider::new(
                    kind,
                    http,
                    validate_base_url(&settings.deepseek_base_url)?,
                    api_key,
                    settings.temperature,
                ))
            }
            ProviderKind::Local => {
                let base_url = env
                    .get(vars::LOCAL_LLM_BASE_URL)
                    .filter(|url| !url.is_empty())
                    .unwrap_or(settings.local_base_url.as_str());
                Arc::new(OpenAIProvider::new(
                    kind,
                    http,
                    validate_base_url(base_url)?,
                    "not-needed",
                    settings.temperature,
                ))
            }
            ProviderKind::Anthropic => {
                let api_key = env.require(vars::ANTHROPIC_API_KEY)?;
                Arc::new(AnthropicProvider::new(
                    http,
                    validate_base_url(&settings.anthropic_base_url)?,
                    api_key,
                    settings.anthropic_max_tokens,
                ))
            }
            ProviderKind::Gemini => {
                let api_key = env.require(vars::GOOGLE_API_KEY)?;
                Arc::new(GeminiProvider::configure(
                    http,
                    validate_base_url(&settings.gemini_base_url)?,
                    api_key,
                ))
            }
        };

        Ok(provider)
    }

    /// Build a client from a provider tag such as `"openai"`.
    pub fn create_from_tag(
        tag: &str,
        env: &Environment,
        settings: &LlmSettings,
    ) -> Result<Arc<dyn LLMProvider>, ConfigError> {
        let kind: ProviderKind = tag.parse()?;
        Self::create_provider(kind, env, settings)
    }
}

fn validate_base_url(base_url: &str) -> Result<&str, ConfigError> {
    url::Url::parse(base_url)
        .map(|_| base_url)
        .map_err(|e| ConfigError::Invalid(format!("invalid base URL '{}': {}", base_url, e)))
}

/// Decode a successful JSON response, classifying HTTP failures.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, LLMError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LLMError::from_status(status, body));
    }
    Ok(response.json::<T>().await?)
}

/// Join a base URL and a path without doubling or dropping slashes.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
