use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::app::{NewsfeedError, Result};
use crate::fetcher::{FetchResult, Fetcher};

pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(15_000);
pub const READ_TIMEOUT: Duration = Duration::from_millis(10_000);

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeouts(CONNECT_TIMEOUT, READ_TIMEOUT)
    }

    pub fn with_timeouts(connect_timeout: Duration, read_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("newsfeed/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        // Reject malformed URLs before touching the network
        let url = Url::parse(url)?;

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(NewsfeedError::HttpStatus(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        match self.try_fetch(url).await {
            Ok(body) => {
                tracing::debug!("Fetched {} bytes from {}", body.len(), url);
                FetchResult::Content { body }
            }
            Err(NewsfeedError::HttpStatus(code)) => {
                tracing::error!("Error response code: {}", code);
                FetchResult::Failed
            }
            Err(e) => {
                tracing::error!("Problem retrieving the article JSON results: {}", e);
                FetchResult::Failed
            }
        }
    }
}
