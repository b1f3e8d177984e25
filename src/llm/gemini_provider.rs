//! Google Gemini `generateContent` provider
//!
//! The API key is bound to the handle returned by [`GeminiProvider::configure`];
//! configuring twice simply yields two independent handles.

use crate::llm::provider::{LLMProvider, endpoint, read_json};
use crate::llm::types::{LLMError, LLMRequest, LLMResponse, ProviderKind};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

pub const DEFAULT_MODEL: &str = "gemini-pro";

pub struct GeminiProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiProvider {
    /// Bind a Gemini client to `api_key`.
    pub fn configure(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn model_path(model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("models/{}:generateContent", model)
    }

    fn build_body(request: &LLMRequest) -> GenerateContentRequest<'_> {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
        }
    }

    /// Concatenated text parts of the first candidate
    fn extract_text(response: GenerateContentResponse) -> Result<String, LLMError> {
        let content = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .ok_or_else(|| LLMError::MalformedResponse("response has no candidates".to_string()))?;

        let texts: Vec<String> = content.parts.into_iter().filter_map(|p| p.text).collect();
        if texts.is_empty() {
            return Err(LLMError::MalformedResponse(
                "candidate has no text parts".to_string(),
            ));
        }
        Ok(texts.concat())
    }
}

impl LLMProvider for GeminiProvider {
    fn execute_request(
        &self,
        request: LLMRequest,
    ) -> BoxFuture<'_, Result<LLMResponse, LLMError>> {
        Box::pin(async move {
            let started = Instant::now();
            let url = endpoint(&self.base_url, &Self::model_path(&request.model));
            debug!(model = %request.model, %url, "Sending Gemini generateContent");

            let response = self
                .http
                .post(&url)
                .query(&[("key", self.api_key.as_str())])
                .json(&Self::build_body(&request))
                .send()
                .await?;

            let body: GenerateContentResponse = read_json(response).await?;
            let model_used = body
                .model_version
                .clone()
                .unwrap_or_else(|| request.model.clone());
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
        ProviderKind::Gemini
    }
}
