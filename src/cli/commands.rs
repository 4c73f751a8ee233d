use std::path::Path;

use crate::app::{AppContext, NewsfeedError, Result};
use crate::config::{Config, SettingKey};
use crate::domain::Article;
use crate::fetcher::connectivity::{is_online, PROBE_TIMEOUT};
use crate::query::fetch_articles;

/// One load cycle for the non-interactive commands.
///
/// Returns `None` when the API host can't be reached, without attempting
/// the request.
async fn load(ctx: &AppContext) -> Result<Option<Vec<Article>>> {
    let url = ctx.request_url()?;

    if let Some(ref url) = url {
        if !is_online(url, PROBE_TIMEOUT).await {
            return Ok(None);
        }
    }

    Ok(Some(
        fetch_articles(ctx.fetcher.as_ref(), &ctx.parser, url.as_deref()).await,
    ))
}

pub async fn list_articles(ctx: &AppContext, json: bool) -> Result<()> {
    let Some(articles) = load(ctx).await? else {
        println!("No internet connection.");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&articles)?);
        return Ok(());
    }

    if articles.is_empty() {
        println!("No articles found.");
        return Ok(());
    }

    for (i, article) in articles.iter().enumerate() {
        println!("{}", format_article_line(i + 1, article));
        println!("    {}", article.url());
    }

    Ok(())
}

fn format_article_line(position: usize, article: &Article) -> String {
    let date = article.display_date();
    let date = if date.is_empty() {
        " ".repeat(12)
    } else {
        date
    };

    match article.author() {
        Some(author) => format!(
            "{:>3}. {} | {} | {} | {}",
            position,
            date,
            article.section(),
            article.title(),
            author
        ),
        None => format!(
            "{:>3}. {} | {} | {}",
            position,
            date,
            article.section(),
            article.title()
        ),
    }
}

pub async fn open_article(ctx: &AppContext, index: usize) -> Result<()> {
    let Some(articles) = load(ctx).await? else {
        println!("No internet connection.");
        return Ok(());
    };

    let article = index
        .checked_sub(1)
        .and_then(|i| articles.get(i))
        .ok_or_else(|| {
            NewsfeedError::Other(format!(
                "No article at position {} ({} available)",
                index,
                articles.len()
            ))
        })?;

    open::that_detached(article.url()).map_err(|e| NewsfeedError::Browser(e.to_string()))?;
    println!("Opened: {}", article.title());
    Ok(())
}

pub fn show_settings(path: &Path) -> Result<()> {
    let config = Config::load_from(path)?;
    let query = &config.query;

    println!("search-term = {}", query.search_term);
    println!("page-size   = {}", query.page_size);
    println!("api-key     = {}", mask(&query.api_key));
    println!("base-url    = {}", query.base_url);
    Ok(())
}

pub fn set_setting(path: &Path, key: &str, value: &str) -> Result<()> {
    let key: SettingKey = key.parse()?;
    Config::set_value(path, key, value)?;
    println!("Set {} in {}", key.cli_name(), path.display());
    Ok(())
}

/// Show only the last four characters of a secret.
fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}
