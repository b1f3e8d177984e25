use crate::search::types::{BackendMode, SearchError, SearchRecord, SearchRequest};
use futures::future::BoxFuture;

/// A search aggregator offering the `api` and `html` access modes
pub trait SearchBackend: Send + Sync {
    /// Run a text search through the given access mode
    fn text<'a>(
        &'a self,
        request: &'a SearchRequest<'a>,
        mode: BackendMode,
    ) -> BoxFuture<'a, Result<Vec<SearchRecord>, SearchError>>;

    /// Get backend name/identifier
    fn name(&self) -> &'static str;
}
