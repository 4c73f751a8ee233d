use serde::{Deserialize, Serialize};

use super::date::reformat_publication_date;

/// A single news article as shown in the list.
///
/// Fields are private: an article never changes after the parser builds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    title: String,
    section: String,
    author: Option<String>,
    publish_date: String,
    url: String,
}

impl Article {
    pub fn new(
        title: String,
        section: String,
        author: Option<String>,
        publish_date: String,
        url: String,
    ) -> Self {
        Self {
            title,
            section,
            author,
            publish_date,
            url,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Raw publication date, `YYYY-MM-DDThh:mm:ssZ`.
    pub fn publish_date(&self) -> &str {
        &self.publish_date
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn display_author(&self) -> &str {
        self.author.as_deref().unwrap_or("")
    }

    /// Publication date reformatted for display, empty if unparseable
    pub fn display_date(&self) -> String {
        reformat_publication_date(&self.publish_date)
    }
}
