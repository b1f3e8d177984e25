//! Anthropic Messages API provider
//!
//! Requires `ANTHROPIC_API_KEY`. Requests carry a fixed `max_tokens` budget and
//! the reply is read from the first content block.

use crate::llm::provider::{LLMProvider, endpoint, read_json};
use crate::llm::types::{LLMError, LLMRequest, LLMResponse, ProviderKind};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

pub const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicProvider {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str, max_tokens: u32) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            max_tokens,
        }
    }

    fn build_body<'a>(&self, request: &'a LLMRequest) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &request.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        }
    }

    fn extract_text(response: MessagesResponse) -> Result<String, LLMError> {
        response
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| {
                LLMError::MalformedResponse("first content block has no text".to_string())
            })
    }
}

impl LLMProvider for AnthropicProvider {
    fn execute_request(
        &self,
        request: LLMRequest,
    ) -> BoxFuture<'_, Result<LLMResponse, LLMError>> {
        Box::pin(async move {
            let started = Instant::now();
            let url = endpoint(&self.base_url, "messages");
            debug!(model = %request.model, %url, "Sending Anthropic message");

            let response = self
                .http
                .post(&url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&self.build_body(&request))
                .send()
                .await?;

            let body: MessagesResponse = read_json(response).await?;
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
        ProviderKind::Anthropic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let provider = AnthropicProvider::new(
            reqwest::Client::new(),
            "https://api.anthropic.com/v1",
            "sk-ant-test",
            1000,
        );
        let request = LLMRequest::new("Hello", DEFAULT_MODEL);
        let body = serde_json::to_value(provider.build_body(&request)).unwrap();

        assert_eq!(
            body,
            json!({
                "model": "claude-3-sonnet-20240229",
                "max_tokens": 1000,
                "messages": [{"role": "user", "content": "Hello"}]
            })
        );
    }

    #[test]
    fn test_extract_first_block() {
        let response: MessagesResponse = serde_json::from_value(json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-sonnet-20240229",
            "content": [{"type": "text", "text": "Hi there"}],
            "stop_reason": "end_turn"
        }))
        .unwrap();

        assert_eq!(AnthropicProvider::extract_text(response).unwrap(), "Hi there");
    }

    #[test]
    fn test_extract_empty_content() {
        let response: MessagesResponse =
            serde_json::from_value(json!({"content": []})).unwrap();
        assert!(AnthropicProvider::extract_text(response).is_err());
    }
}
