use ratatui::widgets::ListState;

use crate::domain::Article;

pub const PAGE_SIZE: usize = 10;

/// What the list shows when it has no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    Loading,
    NoArticles,
    NoConnection,
}

impl EmptyState {
    pub fn message(self) -> &'static str {
        match self {
            EmptyState::Loading => "Loading articles...",
            EmptyState::NoArticles => "No articles found.",
            EmptyState::NoConnection => "No internet connection.",
        }
    }
}

/// UI state. Owns the one list of delivered articles; only the UI loop
/// touches it, and each delivery replaces it wholesale.
pub struct TuiApp {
    pub articles: Vec<Article>,
    pub article_index: usize,
    pub list_state: ListState,
    pub empty_state: EmptyState,
    pub is_loading: bool,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl TuiApp {
    pub fn new() -> Self {
        Self {
            articles: Vec::new(),
            article_index: 0,
            list_state: ListState::default(),
            empty_state: EmptyState::Loading,
            is_loading: false,
            should_quit: false,
            status_message: None,
        }
    }

    pub fn begin_loading(&mut self) {
        self.is_loading = true;
        self.empty_state = EmptyState::Loading;
        self.status_message = None;
    }

    /// Replace the list with a freshly delivered result.
    pub fn apply_articles(&mut self, articles: Vec<Article>) {
        self.is_loading = false;
        self.empty_state = EmptyState::NoArticles;
        self.articles = articles;
        self.article_index = 0;
        self.list_state
            .select(if self.articles.is_empty() { None } else { Some(0) });
    }

    /// Drop every delivered article, e.g. after a loader reset.
    pub fn clear_articles(&mut self) {
        self.is_loading = false;
        self.articles.clear();
        self.article_index = 0;
        self.list_state.select(None);
    }

    pub fn set_offline(&mut self) {
        self.clear_articles();
        self.empty_state = EmptyState::NoConnection;
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.articles.get(self.article_index)
    }

    pub fn move_up(&mut self) {
        self.select(self.article_index.saturating_sub(1));
    }

    pub fn move_down(&mut self) {
        self.select(self.article_index + 1);
    }

    pub fn next_page(&mut self) {
        self.select(self.article_index + PAGE_SIZE);
    }

    pub fn prev_page(&mut self) {
        self.select(self.article_index.saturating_sub(PAGE_SIZE));
    }

    pub fn first(&mut self) {
        self.select(0);
    }

    pub fn last(&mut self) {
        self.select(self.articles.len().saturating_sub(1));
    }

    fn select(&mut self, index: usize) {
        if self.articles.is_empty() {
            return;
        }
        self.article_index = index.min(self.articles.len() - 1);
        self.list_state.select(Some(self.article_index));
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }
}

impl Default for TuiApp {
    fn default() -> Self {
        Self::new()
    }
}
