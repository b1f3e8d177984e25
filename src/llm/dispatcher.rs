//! Single-shot prompt dispatch.
//!
//! [`QueryDispatcher::query`] returns `Ok(None)` for every failure that happens
//! while talking to the provider. Only configuration problems (missing
//! credential, bad endpoint) surface as `Err`.

use crate::env::{ConfigError, Environment};
use crate::llm::provider::{LLMProvider, LLMProviderFactory};
use crate::llm::types::{LLMRequest, LlmSettings, ProviderKind};
use std::sync::Arc;
use tracing::{error, info};

pub struct QueryDispatcher {
    env: Environment,
    settings: LlmSettings,
}

impl QueryDispatcher {
    pub fn new(env: Environment, settings: LlmSettings) -> Self {
        Self { env, settings }
    }

    /// Build a client for `provider` using this dispatcher's environment.
    pub fn create_client(
        &self,
        provider: ProviderKind,
    ) -> Result<Arc<dyn LLMProvider>, ConfigError> {
        LLMProviderFactory::create_provider(provider, &self.env, &self.settings)
    }

    /// Send `prompt` and return the reply text.
    ///
    /// A client is created through the factory when `client` is `None`, and
    /// `model` falls back to the provider's default.
    pub async fn query(
        &self,
        prompt: &str,
        client: Option<&dyn LLMProvider>,
        model: Option<&str>,
        provider: ProviderKind,
    ) -> Result<Option<String>, ConfigError> {
        let owned;
        let client = match client {
            Some(client) => client,
            None => {
                owned = self.create_client(provider)?;
                owned.as_ref()
            }
        };

        let model = model.unwrap_or_else(|| provider.default_model());
        let request = LLMRequest::new(prompt, model);
        let request_id = request.id;
        info!(%request_id, %provider, %model, "Querying LLM");

        match client.execute_request(request).await {
            Ok(response) => {
                info!(
                    %request_id,
                    model_used = %response.model_used,
                    elapsed_ms = response.execution_time.as_millis() as u64,
                    "LLM responded"
                );
                Ok(Some(response.content))
            }
            Err(e) => {
                error!(%request_id, "Error querying LLM: {}", e);
                Ok(None)
            }
        }
    }
}
