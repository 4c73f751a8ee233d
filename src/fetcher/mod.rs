pub mod connectivity;
pub mod http_fetcher;

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// HTTP 200 with the full response body
    Content { body: String },
    /// Malformed URL, connection error, timeout or non-200 status
    Failed,
}

impl FetchResult {
    pub fn ok(&self) -> bool {
        matches!(self, FetchResult::Content { .. })
    }

    /// Response body, empty on failure
    pub fn body(&self) -> &str {
        match self {
            FetchResult::Content { body } => body,
            FetchResult::Failed => "",
        }
    }

    pub fn into_body(self) -> Option<String> {
        match self {
            FetchResult::Content { body } => Some(body),
            FetchResult::Failed => None,
        }
    }
}

/// One-shot GET of a fully formed URL.
///
/// Implementations never return an error: every failure collapses into
/// [`FetchResult::Failed`] after being logged.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> FetchResult;
}
