//! Request URL construction and the fetch-then-parse pipeline.

use url::Url;

use crate::app::Result;
use crate::domain::Article;
use crate::fetcher::Fetcher;
use crate::parser::ArticleParser;

/// Guardian content API search endpoint.
pub const GUARDIAN_REQUEST_URL: &str = "https://content.guardianapis.com/search";

/// Request parameters, read fresh from the settings before each fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    pub search_term: String,
    pub page_size: u32,
    pub api_key: String,
}

/// Build the search URL for `query` on top of `base`.
///
/// Parameters are appended in a fixed order after any already on `base`.
pub fn build_request_url(base: &str, query: &QueryConfig) -> Result<String> {
    let mut url = Url::parse(base)?;

    url.query_pairs_mut()
        .append_pair("q", &query.search_term)
        .append_pair("production-office", "us")
        .append_pair("show-tags", "contributor")
        .append_pair("order-by", "relevance")
        .append_pair("page-size", &query.page_size.to_string())
        .append_pair("api-key", &query.api_key);

    Ok(url.into())
}

/// Run one fetch and parse for `url`.
///
/// `None` means no URL is configured and returns no articles without any
/// network attempt. Failures are logged by the fetcher and parser and show
/// up here as an empty list.
pub async fn fetch_articles(
    fetcher: &(dyn Fetcher + Send + Sync),
    parser: &ArticleParser,
    url: Option<&str>,
) -> Vec<Article> {
    let Some(url) = url else {
        tracing::debug!("No request URL configured");
        return Vec::new();
    };

    tracing::info!("Fetching articles from {}", redact_api_key(url));
    let result = fetcher.fetch(url).await;
    let articles = parser.parse(result.into_body().as_deref());
    tracing::info!("Parsed {} articles", articles.len());

    articles
}

/// Replace the `api-key` query value so URLs can be logged.
pub fn redact_api_key(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "api-key" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();

    if pairs.is_empty() {
        return url.to_string();
    }

    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn query() -> QueryConfig {
        QueryConfig {
            search_term: "football".into(),
            page_size: 10,
            api_key: "test".into(),
        }
    }

    struct CannedFetcher {
        result: FetchResult,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for CannedFetcher {
        async fn fetch(&self, _url: &str) -> FetchResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    #[test]
    fn test_build_request_url_parameter_order() {
        let url = build_request_url(GUARDIAN_REQUEST_URL, &query()).unwrap();
        assert_eq!(
            url,
            "https://content.guardianapis.com/search?q=football&production-office=us\
             &show-tags=contributor&order-by=relevance&page-size=10&api-key=test"
        );
    }

    #[test]
    fn test_build_request_url_encodes_term() {
        let mut q = query();
        q.search_term = "rugby & cricket".into();
        let url = build_request_url(GUARDIAN_REQUEST_URL, &q).unwrap();
        assert!(url.contains("q=rugby+%26+cricket"));
    }

    #[test]
    fn test_build_request_url_rejects_bad_base() {
        assert!(build_request_url("not a url", &query()).is_err());
    }

    #[test]
    fn test_redact_api_key() {
        let url = build_request_url(GUARDIAN_REQUEST_URL, &query()).unwrap();
        let redacted = redact_api_key(&url);
        assert!(redacted.ends_with("api-key=***") || redacted.ends_with("api-key=%2A%2A%2A"));
        assert!(redacted.contains("q=football"));
    }

    #[tokio::test]
    async fn test_fetch_articles_without_url_skips_network() {
        let fetcher = CannedFetcher {
            result: FetchResult::Failed,
            calls: AtomicUsize::new(0),
        };

        let articles = fetch_articles(&fetcher, &ArticleParser::new(), None).await;

        assert!(articles.is_empty());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_articles_parses_body() {
        let body = r#"{"response": {"results": [
            { "webTitle": "One", "sectionName": "News", "webPublicationDate": "2021-01-05T10:00:00Z",
              "webUrl": "https://example.com/1", "tags": [] }
        ]}}"#;
        let fetcher = CannedFetcher {
            result: FetchResult::Content { body: body.into() },
            calls: AtomicUsize::new(0),
        };

        let articles =
            fetch_articles(&fetcher, &ArticleParser::new(), Some("https://example.com")).await;

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title(), "One");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_no_articles() {
        let fetcher = CannedFetcher {
            result: FetchResult::Failed,
            calls: AtomicUsize::new(0),
        };

        let articles =
            fetch_articles(&fetcher, &ArticleParser::new(), Some("https://example.com")).await;

        assert!(articles.is_empty());
    }
}
