use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// One search hit as a loose string map.
///
/// Key names depend on the backend (`href`/`body` for DuckDuckGo,
/// `link`/`snippet` elsewhere), so lookups are always tolerant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchRecord(BTreeMap<String, String>);

impl SearchRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Return the first value present among `keys`, in order.
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for SearchRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(fields: [(K, V); N]) -> Self {
        Self(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Access mode of the search aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Structured JSON endpoint
    Api,
    /// Rendered results page
    Html,
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendMode::Api => f.write_str("api"),
            BackendMode::Html => f.write_str("html"),
        }
    }
}

/// Parameters of one backend call
#[derive(Debug, Clone)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub max_results: usize,
    pub user_agent: &'a str,
}

/// Retry and backend settings for the search tool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub max_retries: u32,
    pub initial_delay_secs: f64,
    pub max_jitter_secs: f64,
    pub fallback_delay_secs: f64,
    /// DuckDuckGo region code, `wt-wt` means no region
    pub region: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_secs: 2.0,
            max_jitter_secs: 2.0,
            fallback_delay_secs: 1.0,
            region: "wt-wt".to_string(),
        }
    }
}

/// Upper bound for every configured delay, in seconds
pub const MAX_DELAY_SECS: f64 = 3600.0;

/// Seconds to `Duration`, clamped to `[0, MAX_DELAY_SECS]`; NaN maps to zero.
pub(crate) fn clamped_secs(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.clamp(0.0, MAX_DELAY_SECS)).unwrap_or_default()
}

impl SearchSettings {
    pub fn initial_delay(&self) -> Duration {
        clamped_secs(self.initial_delay_secs)
    }

    pub fn fallback_delay(&self) -> Duration {
        clamped_secs(self.fallback_delay_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 {
            return Err("search.max_retries must be at least 1".to_string());
        }
        for (name, value) in [
            ("search.initial_delay_secs", self.initial_delay_secs),
            ("search.max_jitter_secs", self.max_jitter_secs),
            ("search.fallback_delay_secs", self.fallback_delay_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number", name));
            }
            if value > MAX_DELAY_SECS {
                return Err(format!(
                    "{} must not exceed {} seconds",
                    name, MAX_DELAY_SECS
                ));
            }
        }
        Ok(())
    }
}

/// Search failures
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("{backend} backend rate limited: {message}")]
    RateLimited {
        backend: BackendMode,
        message: String,
    },
    #[error("{backend} backend timed out: {message}")]
    Timeout {
        backend: BackendMode,
        message: String,
    },
    #[error("{backend} backend error: {message}")]
    Backend {
        backend: BackendMode,
        message: String,
    },
    #[error("Invalid search request: {0}")]
    InvalidRequest(String),
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl SearchError {
    /// Errors raised by the aggregator itself. These trigger the html fallback;
    /// anything else goes straight to the retry loop.
    pub fn is_backend_error(&self) -> bool {
        matches!(
            self,
            SearchError::RateLimited { .. }
                | SearchError::Timeout { .. }
                | SearchError::Backend { .. }
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::RateLimited { .. } => "RateLimited",
            SearchError::Timeout { .. } => "Timeout",
            SearchError::Backend { .. } => "Backend",
            SearchError::InvalidRequest(_) => "InvalidRequest",
            SearchError::Client(_) => "Client",
        }
    }

    pub(crate) fn from_reqwest(backend: BackendMode, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchError::Timeout {
                backend,
                message: err.to_string(),
            }
        } else if err.is_builder() {
            SearchError::Client(err.to_string())
        } else {
            SearchError::Backend {
                backend,
                message: err.to_string(),
            }
        }
    }
}
