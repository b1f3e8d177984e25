pub mod backend;
pub mod duckduckgo;
pub mod format;
pub mod retry;
pub mod types;
pub mod user_agent;

pub use backend::SearchBackend;
pub use duckduckgo::DuckDuckGo;
pub use format::{format_results, write_results};
pub use retry::search_with_retry;
pub use types::*;
