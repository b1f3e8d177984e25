//! Bounded retry with backend fallback.
//!
//! Each attempt tries the `api` mode first. A backend error there is followed by
//! a short pause and one `html` call within the same attempt. A failed attempt
//! sleeps `initial_delay * (attempt + 1) + jitter` before the next one, and the
//! error of the last attempt is returned to the caller.

use crate::search::backend::SearchBackend;
use crate::search::types::{
    BackendMode, SearchError, SearchRecord, SearchRequest, SearchSettings, clamped_secs,
};
use crate::search::user_agent::random_user_agent;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Search `query`, retrying per `settings`.
///
/// An empty result list is a success and is returned without retrying.
pub async fn search_with_retry(
    backend: &dyn SearchBackend,
    query: &str,
    max_results: usize,
    settings: &SearchSettings,
) -> Result<Vec<SearchRecord>, SearchError> {
    if query.trim().is_empty() {
        return Err(SearchError::InvalidRequest(
            "search query cannot be empty".to_string(),
        ));
    }

    let max_retries = settings.max_retries.max(1);
    let mut attempt = 0;

    loop {
        let request = SearchRequest {
            query,
            max_results,
            user_agent: random_user_agent(),
        };
        debug!(
            "Attempt {}/{} - Searching for query: {}",
            attempt + 1,
            max_retries,
            query
        );

        match attempt_search(backend, &request, settings).await {
            Ok(results) => {
                if results.is_empty() {
                    debug!("No results found");
                } else {
                    debug!("Found {} results", results.len());
                }
                return Ok(results);
            }
            Err(e) => {
                warn!("Attempt {} failed: {}", attempt + 1, e);
                if attempt + 1 >= max_retries {
                    error!("All retry attempts failed");
                    return Err(e);
                }

                let delay = backoff_delay(
                    settings.initial_delay(),
                    attempt,
                    random_jitter(settings.max_jitter_secs),
                );
                debug!("Waiting {:.2} seconds before retry...", delay.as_secs_f64());
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// One attempt: primary mode, then the fallback mode on a backend error.
async fn attempt_search(
    backend: &dyn SearchBackend,
    request: &SearchRequest<'_>,
    settings: &SearchSettings,
) -> Result<Vec<SearchRecord>, SearchError> {
    match backend.text(request, BackendMode::Api).await {
        Ok(results) => Ok(results),
        Err(e) if e.is_backend_error() => {
            debug!("API backend failed, trying HTML backend: {}", e);
            tokio::time::sleep(settings.fallback_delay()).await;
            backend.text(request, BackendMode::Html).await
        }
        Err(e) => Err(e),
    }
}

/// Delay before retrying after the failed attempt `attempt` (0-based).
pub fn backoff_delay(initial_delay: Duration, attempt: u32, jitter: Duration) -> Duration {
    initial_delay
        .saturating_mul(attempt.saturating_add(1))
        .saturating_add(jitter)
}

/// Uniform jitter in `[0, max_secs)`.
pub fn random_jitter(max_secs: f64) -> Duration {
    if !max_secs.is_finite() || max_secs <= 0.0 {
        return Duration::ZERO;
    }
    clamped_secs(rand::rng().random::<f64>() * max_secs)
}
