use serde::Deserialize;

use crate::domain::Article;

/// Tag type that marks an article's author.
pub const CONTRIBUTOR_TAG: &str = "contributor";

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    web_title: String,
    section_name: String,
    web_publication_date: String,
    web_url: String,
    tags: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Tag {
    #[serde(rename = "type")]
    kind: String,
    web_title: Option<String>,
}

/// Converts a search response body into [`Article`]s.
#[derive(Clone)]
pub struct ArticleParser;

impl Default for ArticleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw response body.
    ///
    /// An absent or empty body yields no articles. Any structural or field
    /// error anywhere in the document discards the whole result, so the
    /// caller only ever sees complete pages. Errors are logged, never returned.
    pub fn parse(&self, body: Option<&str>) -> Vec<Article> {
        let body = match body {
            Some(b) if !b.trim().is_empty() => b,
            _ => return Vec::new(),
        };

        match self.try_parse(body) {
            Ok(articles) => articles,
            Err(e) => {
                tracing::error!("Problem parsing the article JSON results: {}", e);
                Vec::new()
            }
        }
    }

    fn try_parse(&self, body: &str) -> Result<Vec<Article>, ParseError> {
        let envelope: SearchEnvelope = serde_json::from_str(body)?;

        envelope
            .response
            .results
            .into_iter()
            .enumerate()
            .map(|(index, result)| {
                let author = contributor(&result.tags)
                    .map(|tag| {
                        tag.web_title
                            .clone()
                            .ok_or(ParseError::ContributorWithoutName { index })
                    })
                    .transpose()?;

                Ok(Article::new(
                    result.web_title,
                    result.section_name,
                    author,
                    result.web_publication_date,
                    result.web_url,
                ))
            })
            .collect()
    }
}

/// First tag in order whose type is [`CONTRIBUTOR_TAG`].
fn contributor(tags: &[Tag]) -> Option<&Tag> {
    tags.iter().find(|tag| tag.kind == CONTRIBUTOR_TAG)
}

#[derive(Debug, thiserror::Error)]
enum ParseError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("result {index} has a contributor tag without webTitle")]
    ContributorWithoutName { index: usize },
}
