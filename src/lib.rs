//! # newsfeed
//!
//! A terminal reader for The Guardian's content API.
//!
//! ## Architecture
//!
//! ```text
//! Settings → Query URL → Fetcher → Parser → Loader → UI
//! ```
//!
//! - [`fetcher`]: one-shot HTTP GET with fixed timeouts
//! - [`parser`]: search response JSON to [`Article`](domain::Article)s
//! - [`loader`]: background load cycles with cancellation
//! - [`tui`]: terminal list built with ratatui
//!
//! ## Quick Start
//!
//! ```bash
//! # Browse interactively
//! newsfeed
//!
//! # Print one page of results
//! newsfeed list -q "climate" -n 10
//!
//! # Change the stored search term
//! newsfeed settings set search-term cricket
//! ```

/// Application context and error types.
pub mod app;

/// Command-line interface using clap.
///
/// - `list [--json]` - Print one page of articles
/// - `open <n>` - Open the nth article in the browser
/// - `tui` - Launch the interactive list (default)
/// - `settings show|path|set` - Inspect or edit the request settings
pub mod cli;

/// Configuration from `~/.config/newsfeed/config.toml`: request settings,
/// colors and keybindings.
pub mod config;

/// Article record and date formatting.
pub mod domain;

/// HTTP fetching and the connectivity probe.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for one-shot GETs
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest implementation
pub mod fetcher;

/// Background load cycles: Idle → Loading → Delivered / Reset.
pub mod loader;

/// Search response parsing.
pub mod parser;

/// Request URL construction and the fetch-then-parse pipeline.
pub mod query;

/// Terminal user interface.
///
/// Keys are configured under `[keybindings]`; the status bar shows the
/// active ones.
pub mod tui;
