use crate::env::{ConfigError, vars};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// A single prompt sent to a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMRequest {
    pub id: Uuid,
    pub prompt: String,
    pub model: String,
}

impl LLMRequest {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            model: model.into(),
        }
    }
}

/// Text reply extracted from a provider response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMResponse {
    pub request_id: Uuid,
    pub content: String,
    pub model_used: String,
    pub execution_time: Duration,
}

/// Supported LLM providers
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    Gemini,
    Local,
    #[value(name = "deepseek")]
    DeepSeek,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::OpenAI,
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
        ProviderKind::Local,
        ProviderKind::DeepSeek,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Local => "local",
            ProviderKind::DeepSeek => "deepseek",
        }
    }

    /// Environment variable holding this provider's credential.
    /// `None` for providers that run without one.
    pub fn credential_var(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAI => Some(vars::OPENAI_API_KEY),
            ProviderKind::Anthropic => Some(vars::ANTHROPIC_API_KEY),
            ProviderKind::Gemini => Some(vars::GOOGLE_API_KEY),
            ProviderKind::DeepSeek => Some(vars::DEEPSEEK_API_KEY),
            ProviderKind::Local => None,
        }
    }

    /// Model used by the dispatcher when the caller names none.
    pub fn default_model(&self) -> &'static str {
        use crate::llm::{anthropic_provider, gemini_provider, openai_provider};
        match self {
            ProviderKind::OpenAI => openai_provider::OPENAI_DEFAULT_MODEL,
            ProviderKind::DeepSeek => openai_provider::DEEPSEEK_DEFAULT_MODEL,
            ProviderKind::Local => openai_provider::LOCAL_DEFAULT_MODEL,
            ProviderKind::Anthropic => anthropic_provider::DEFAULT_MODEL,
            ProviderKind::Gemini => gemini_provider::DEFAULT_MODEL,
        }
    }

    /// Model the `llm-api` binary picks when `--model` is omitted.
    /// The local provider has none and defers to [`ProviderKind::default_model`].
    pub fn cli_default_model(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAI => Some("gpt-3.5-turbo"),
            ProviderKind::DeepSeek => Some("deepseek-chat"),
            ProviderKind::Anthropic => Some("claude-3-5-sonnet-20241022"),
            ProviderKind::Gemini => Some("gemini-2.0-flash-exp"),
            ProviderKind::Local => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigError::UnsupportedProvider(s.to_string()))
    }
}

/// Endpoint and request settings shared by all providers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub temperature: f32,
    pub anthropic_max_tokens: u32,
    pub openai_base_url: String,
    pub deepseek_base_url: String,
    pub local_base_url: String,
    pub anthropic_base_url: String,
    pub gemini_base_url: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            anthropic_max_tokens: 1000,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            deepseek_base_url: "https://api.deepseek.com/v1".to_string(),
            local_base_url: "http://192.168.180.137:8006/v1".to_string(),
            anthropic_base_url: "https://api.anthropic.com/v1".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

/// Errors raised while talking to a provider
#[derive(Debug, Clone, thiserror::Error)]
pub enum LLMError {
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Provider returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl LLMError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 | 403 => LLMError::Authentication(body),
            429 => LLMError::RateLimit(body),
            400 | 404 | 422 => LLMError::InvalidRequest(body),
            code => LLMError::Api { status: code, body },
        }
    }
}

impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LLMError::MalformedResponse(err.to_string())
        } else {
            LLMError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_tags_round_trip() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unsupported_provider_tag() {
        let err = "mistral".parse::<ProviderKind>().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedProvider(ref tag) if tag == "mistral"));
        assert_eq!(err.to_string(), "Unsupported provider: mistral");

        // Tags are case-sensitive
        assert!("OpenAI".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_default_models() {
        assert_eq!(ProviderKind::OpenAI.default_model(), "gpt-4o");
        assert_eq!(ProviderKind::DeepSeek.default_model(), "deepseek-chat");
        assert_eq!(
            ProviderKind::Anthropic.default_model(),
            "claude-3-sonnet-20240229"
        );
        assert_eq!(ProviderKind::Gemini.default_model(), "gemini-pro");
        assert_eq!(
            ProviderKind::Local.default_model(),
            "Qwen/Qwen2.5-32B-Instruct-AWQ"
        );
        assert_eq!(ProviderKind::Local.cli_default_model(), None);
        assert_eq!(
            ProviderKind::OpenAI.cli_default_model(),
            Some("gpt-3.5-turbo")
        );
    }

    #[test]
    fn test_status_classification() {
        use reqwest::StatusCode;
        assert!(matches!(
            LLMError::from_status(StatusCode::UNAUTHORIZED, String::new()),
            LLMError::Authentication(_)
        ));
        assert!(matches!(
            LLMError::from_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            LLMError::RateLimit(_)
        ));
        assert!(matches!(
            LLMError::from_status(StatusCode::BAD_GATEWAY, String::new()),
            LLMError::Api { status: 502, .. }
        ));
    }
}
