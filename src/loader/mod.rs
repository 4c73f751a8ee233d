//! Background article loader.
//!
//! Runs the connectivity probe, fetch and parse on a tokio task and hands
//! the result to the presentation layer over a channel.
//!
//! ```text
//! Idle ──start──▶ Loading ──▶ Delivered
//!                    │    └─▶ Offline
//!        cancel/reset▼
//!                  Reset ──start──▶ Loading ...
//! ```
//!
//! At most one load is in flight per loader. Starting a new load cancels the
//! previous one (last request wins), and a cancelled load never delivers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::domain::Article;
use crate::fetcher::connectivity::{is_online, PROBE_TIMEOUT};
use crate::fetcher::Fetcher;
use crate::parser::ArticleParser;
use crate::query::fetch_articles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Idle,
    Loading,
    Delivered,
    Offline,
    Reset,
}

/// Messages sent to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderEvent {
    /// Result of one load cycle, possibly empty
    Delivered {
        generation: u64,
        articles: Vec<Article>,
    },
    /// The API host could not be resolved; no request was made
    Offline { generation: u64 },
    /// Drop every reference to previously delivered articles
    Reset,
}

struct Shared {
    state: LoaderState,
    generation: u64,
}

struct InFlight {
    cancelled: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

pub struct ArticleLoader {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    parser: ArticleParser,
    probe_timeout: Duration,
    shared: Arc<Mutex<Shared>>,
    tx: mpsc::UnboundedSender<LoaderEvent>,
    in_flight: Option<InFlight>,
}

impl ArticleLoader {
    /// Create a loader and the receiver its results arrive on.
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        parser: ArticleParser,
    ) -> (Self, mpsc::UnboundedReceiver<LoaderEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let loader = Self {
            fetcher,
            parser,
            probe_timeout: PROBE_TIMEOUT,
            shared: Arc::new(Mutex::new(Shared {
                state: LoaderState::Idle,
                generation: 0,
            })),
            tx,
            in_flight: None,
        };
        (loader, rx)
    }

    /// Limit on the connectivity probe run before each fetch.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn state(&self) -> LoaderState {
        lock(&self.shared).state
    }

    /// Generation of the most recently started load cycle (0 before any).
    pub fn generation(&self) -> u64 {
        lock(&self.shared).generation
    }

    /// Start a load cycle for `url`, superseding any cycle in flight.
    ///
    /// Must be called from within a tokio runtime. Returns the generation
    /// number the result will be tagged with.
    pub fn start(&mut self, url: Option<String>) -> u64 {
        self.cancel_in_flight();

        let generation = {
            let mut shared = lock(&self.shared);
            shared.generation += 1;
            shared.state = LoaderState::Loading;
            shared.generation
        };
        info!("Starting load cycle {}", generation);

        let cancelled = Arc::new(AtomicBool::new(false));
        let task = LoadTask {
            fetcher: self.fetcher.clone(),
            parser: self.parser.clone(),
            probe_timeout: self.probe_timeout,
            shared: self.shared.clone(),
            tx: self.tx.clone(),
            cancelled: cancelled.clone(),
            generation,
        };

        let handle = tokio::spawn(task.run(url));
        self.in_flight = Some(InFlight { cancelled, handle });

        generation
    }

    /// Cancel the cycle in flight, if any. Nothing is delivered for it.
    pub fn cancel(&mut self) {
        if self.cancel_in_flight() {
            let mut shared = lock(&self.shared);
            if shared.state == LoaderState::Loading {
                shared.state = LoaderState::Reset;
            }
        }
    }

    /// Tear down: cancel any cycle and tell the presentation layer to drop
    /// its data.
    pub fn reset(&mut self) {
        self.cancel_in_flight();
        lock(&self.shared).state = LoaderState::Reset;
        info!("Loader reset");
        // The receiver may already be gone during shutdown
        let _ = self.tx.send(LoaderEvent::Reset);
    }

    /// Returns true if a still-running cycle was cancelled.
    fn cancel_in_flight(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                in_flight.cancelled.store(true, Ordering::SeqCst);
                let was_running = !in_flight.handle.is_finished();
                if was_running {
                    debug!("Cancelled in-flight load");
                }
                was_running
            }
            None => false,
        }
    }
}

impl Drop for ArticleLoader {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

struct LoadTask {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    parser: ArticleParser,
    probe_timeout: Duration,
    shared: Arc<Mutex<Shared>>,
    tx: mpsc::UnboundedSender<LoaderEvent>,
    cancelled: Arc<AtomicBool>,
    generation: u64,
}

impl LoadTask {
    async fn run(self, url: Option<String>) {
        if self.is_cancelled() {
            debug!("Load cycle {} cancelled before probe", self.generation);
            return;
        }

        if let Some(ref url) = url {
            if !is_online(url, self.probe_timeout).await {
                self.send_if_current(LoaderEvent::Offline {
                    generation: self.generation,
                });
                return;
            }
        }

        if self.is_cancelled() {
            debug!("Load cycle {} cancelled after probe", self.generation);
            return;
        }

        let articles = fetch_articles(self.fetcher.as_ref(), &self.parser, url.as_deref()).await;

        if self.is_cancelled() {
            debug!("Load cycle {} cancelled after fetch", self.generation);
            return;
        }

        self.send_if_current(LoaderEvent::Delivered {
            generation: self.generation,
            articles,
        });
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Send under the state lock so a newer `start` can't slip in
    /// between the final cancellation check and the send.
    fn send_if_current(&self, event: LoaderEvent) {
        let mut shared = lock(&self.shared);
        if self.is_cancelled() || shared.generation != self.generation {
            debug!("Dropping result of superseded load cycle {}", self.generation);
            return;
        }

        let (state, summary) = match &event {
            LoaderEvent::Offline { .. } => (LoaderState::Offline, "no connectivity".to_string()),
            LoaderEvent::Delivered { articles, .. } => {
                (LoaderState::Delivered, format!("{} articles", articles.len()))
            }
            LoaderEvent::Reset => return,
        };

        if self.tx.send(event).is_ok() {
            shared.state = state;
            info!("Load cycle {} finished: {}", self.generation, summary);
        }
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    // The guarded data is two plain fields, always left consistent
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchResult;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio::time::timeout;

    fn body_with_titles(titles: &[&str]) -> String {
        let results: Vec<String> = titles
            .iter()
            .map(|t| {
                format!(
                    r#"{{"webTitle": "{t}", "sectionName": "News",
                        "webPublicationDate": "2021-01-05T10:00:00Z",
                        "webUrl": "http://127.0.0.1/{t}", "tags": []}}"#
                )
            })
            .collect();
        format!(r#"{{"response": {{"results": [{}]}}}}"#, results.join(","))
    }

    /// Answers each URL with an article titled after the URL's last segment.
    /// URLs containing "slow" wait for `gate` first.
    struct FakeFetcher {
        calls: AtomicUsize,
        gate: Notify,
    }

    impl FakeFetcher {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                gate: Notify::new(),
            })
        }
    }

    #[async_trait]
    impl Fetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> FetchResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if url.contains("slow") {
                self.gate.notified().await;
            }
            let title = url.rsplit('/').next().unwrap_or_default();
            FetchResult::Content {
                body: body_with_titles(&[title]),
            }
        }
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<LoaderEvent>) -> LoaderEvent {
        timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("loader event within timeout")
            .expect("channel open")
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let (loader, _rx) = ArticleLoader::new(FakeFetcher::new(), ArticleParser::new());
        assert_eq!(loader.state(), LoaderState::Idle);
        assert_eq!(loader.generation(), 0);
    }

    #[tokio::test]
    async fn test_no_url_delivers_empty_without_fetching() {
        let fetcher = FakeFetcher::new();
        let (mut loader, mut rx) = ArticleLoader::new(fetcher.clone(), ArticleParser::new());

        let generation = loader.start(None);

        assert_eq!(
            next_event(&mut rx).await,
            LoaderEvent::Delivered {
                generation,
                articles: vec![]
            }
        );
        assert_eq!(loader.state(), LoaderState::Delivered);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delivers_parsed_articles() {
        let (mut loader, mut rx) = ArticleLoader::new(FakeFetcher::new(), ArticleParser::new());

        loader.start(Some("http://127.0.0.1/alpha".into()));

        match next_event(&mut rx).await {
            LoaderEvent::Delivered { articles, .. } => {
                assert_eq!(articles.len(), 1);
                assert_eq!(articles[0].title(), "alpha");
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(loader.state(), LoaderState::Delivered);
    }

    #[tokio::test]
    async fn test_last_request_wins() {
        let fetcher = FakeFetcher::new();
        let (mut loader, mut rx) = ArticleLoader::new(fetcher.clone(), ArticleParser::new());

        let first = loader.start(Some("http://127.0.0.1/slow/first".into()));
        // Let the first cycle reach the gated fetch
        tokio::task::yield_now().await;
        let second = loader.start(Some("http://127.0.0.1/second".into()));
        assert!(second > first);

        match next_event(&mut rx).await {
            LoaderEvent::Delivered {
                generation,
                articles,
            } => {
                assert_eq!(generation, second);
                assert_eq!(articles[0].title(), "second");
            }
            other => panic!("unexpected event {:?}", other),
        }

        // Releasing the first fetch must not produce a second delivery
        fetcher.gate.notify_waiters();
        fetcher.gate.notify_one();
        assert!(timeout(Duration::from_millis(200), rx.recv()).await.is_err());
    }

    #[tokio::test]
    async fn test_cancel_suppresses_delivery() {
        let fetcher = FakeFetcher::new();
        let (mut loader, mut rx) = ArticleLoader::new(fetcher.clone(), ArticleParser::new());

        loader.start(Some("http://127.0.0.1/slow/never".into()));
        tokio::task::yield_now().await;
        loader.cancel();
        assert_eq!(loader.state(), LoaderState::Reset);

        fetcher.gate.notify_one();
        assert!(timeout(Duration::from_millis(200), rx.recv()).await.is_err());
    }

    #[tokio::test]
    async fn test_reset_notifies_presentation() {
        let fetcher = FakeFetcher::new();
        let (mut loader, mut rx) = ArticleLoader::new(fetcher.clone(), ArticleParser::new());

        loader.start(Some("http://127.0.0.1/slow/pending".into()));
        tokio::task::yield_now().await;
        loader.reset();

        assert_eq!(next_event(&mut rx).await, LoaderEvent::Reset);
        assert_eq!(loader.state(), LoaderState::Reset);

        fetcher.gate.notify_one();
        assert!(timeout(Duration::from_millis(200), rx.recv()).await.is_err());
    }

    #[tokio::test]
    async fn test_restart_after_reset() {
        let (mut loader, mut rx) = ArticleLoader::new(FakeFetcher::new(), ArticleParser::new());

        loader.reset();
        assert_eq!(next_event(&mut rx).await, LoaderEvent::Reset);

        loader.start(Some("http://127.0.0.1/again".into()));
        assert!(matches!(
            next_event(&mut rx).await,
            LoaderEvent::Delivered { .. }
        ));
        assert_eq!(loader.state(), LoaderState::Delivered);
    }

    #[tokio::test]
    async fn test_superseded_cycle_never_fetches() {
        let fetcher = FakeFetcher::new();
        let (mut loader, mut rx) = ArticleLoader::new(fetcher.clone(), ArticleParser::new());

        loader.start(Some("http://127.0.0.1/first".into()));
        let second = loader.start(Some("http://127.0.0.1/second".into()));

        match next_event(&mut rx).await {
            LoaderEvent::Delivered {
                generation,
                articles,
            } => {
                assert_eq!(generation, second);
                assert_eq!(articles[0].title(), "second");
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(timeout(Duration::from_millis(200), rx.recv()).await.is_err());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_before_fetch_skips_network() {
        let fetcher = FakeFetcher::new();
        let (mut loader, mut rx) = ArticleLoader::new(fetcher.clone(), ArticleParser::new());

        loader.start(Some("http://127.0.0.1/never".into()));
        loader.cancel();

        assert!(timeout(Duration::from_millis(200), rx.recv()).await.is_err());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(loader.state(), LoaderState::Reset);
    }

    #[tokio::test]
    async fn test_unresolvable_host_reports_offline() {
        let fetcher = FakeFetcher::new();
        let (loader, mut rx) = ArticleLoader::new(fetcher.clone(), ArticleParser::new());
        let mut loader = loader.with_probe_timeout(Duration::from_millis(500));

        let generation = loader.start(Some("http://newsfeed.invalid/search".into()));

        assert_eq!(
            next_event(&mut rx).await,
            LoaderEvent::Offline { generation }
        );
        assert_eq!(loader.state(), LoaderState::Offline);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }
}
