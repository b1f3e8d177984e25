//! OpenAI-compatible chat-completions provider.
//!
//! Serves three provider tags that share the same wire format:
//! `openai`, `deepseek` (custom endpoint) and `local` (self-hosted server, no
//! credential).

use crate::llm::provider::{LLMProvider, endpoint, read_json};
use crate::llm::types::{LLMError, LLMRequest, LLMResponse, ProviderKind};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o";
pub const DEEPSEEK_DEFAULT_MODEL: &str = "deepseek-chat";
pub const LOCAL_DEFAULT_MODEL: &str = "Qwen/Qwen2.5-32B-Instruct-AWQ";

pub struct OpenAIProvider {
    kind: ProviderKind,
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAIProvider {
    pub fn new(
        kind: ProviderKind,
        http: reqwest::Client,
        base_url: &str,
        api_key: &str,
        temperature: f32,
    ) -> Self {
        Self {
            kind,
            http,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            temperature,
        }
    }

    fn build_body<'a>(&self, request: &'a LLMRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: self.temperature,
        }
    }

    /// `choices[0].message.content`
    fn extract_text(response: ChatCompletionResponse) -> Result<String, LLMError> {
        response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::MalformedResponse("response has no choices".to_string()))?
            .message
            .content
            .ok_or_else(|| LLMError::MalformedResponse("first choice has no content".to_string()))
    }
}

impl LLMProvider for OpenAIProvider {
    fn execute_request(
        &self,
        request: LLMRequest,
    ) -> BoxFuture<'_, Result<LLMResponse, LLMError>> {
        Box::pin(async move {
            let started = Instant::now();
            let url = endpoint(&self.base_url, "chat/completions");
            debug!(provider = %self.kind, model = %request.model, %url, "Sending chat completion");

            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&self.build_body(&request))
                .send()
                .await?;

            let body: ChatCompletionResponse = read_json(response).await?;
            let model_used = body.model.clone().unwrap_or_else(|| request.model.clone());
            let content = Self::extract_text(body)?;

            Ok(LLMResponse {
                request_id: request.id,
                content,
                model_used,
                execution_time: started.elapsed(),
            })
        })
    }

    fn kind(&self) -> ProviderKind {
        self.kind
    }
}
