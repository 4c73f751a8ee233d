use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::app::Result;
use crate::config::{Config, QuerySettings};
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::loader::{ArticleLoader, LoaderEvent};
use crate::parser::ArticleParser;
use crate::query::{build_request_url, redact_api_key};

/// Command-line adjustments applied on top of the stored settings.
#[derive(Debug, Clone, Default)]
pub struct QueryOverrides {
    pub search_term: Option<String>,
    pub page_size: Option<u32>,
}

impl QueryOverrides {
    pub fn apply(&self, settings: &mut QuerySettings) {
        if let Some(term) = &self.search_term {
            settings.search_term = term.clone();
        }
        if let Some(size) = self.page_size {
            settings.page_size = size;
        }
    }
}

pub struct AppContext {
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub parser: ArticleParser,
    pub config_path: PathBuf,
    pub overrides: QueryOverrides,
}

impl AppContext {
    pub fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new()?);
        Self::with_fetcher(config_path, fetcher)
    }

    pub fn with_fetcher(
        config_path: Option<PathBuf>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
    ) -> Result<Self> {
        let config_path = match config_path {
            Some(p) => p,
            None => Config::default_config_path()?,
        };

        Ok(Self {
            fetcher,
            parser: ArticleParser::new(),
            config_path,
            overrides: QueryOverrides::default(),
        })
    }

    pub fn with_overrides(mut self, overrides: QueryOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn load_config(&self) -> Result<Config> {
        Ok(Config::load_from(&self.config_path)?)
    }

    /// Current query settings, re-read from disk with overrides applied.
    pub fn query_settings(&self) -> Result<QuerySettings> {
        let mut settings = self.load_config()?.query;
        self.overrides.apply(&mut settings);
        settings.validate()?;
        Ok(settings)
    }

    /// Build the request URL from freshly read settings.
    ///
    /// A base URL that can't be parsed is logged and reported as `None`,
    /// which the loader treats as "nothing to fetch".
    pub fn request_url(&self) -> Result<Option<String>> {
        let settings = self.query_settings()?;
        match build_request_url(&settings.base_url, &settings.query_config()) {
            Ok(url) => {
                tracing::debug!("Request URL: {}", redact_api_key(&url));
                Ok(Some(url))
            }
            Err(e) => {
                tracing::error!("Problem building the request URL: {}", e);
                Ok(None)
            }
        }
    }

    pub fn loader(&self) -> (ArticleLoader, mpsc::UnboundedReceiver<LoaderEvent>) {
        ArticleLoader::new(self.fetcher.clone(), self.parser.clone())
    }
}
