use chrono::NaiveDateTime;

/// Publication date format used by the content API, always UTC.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Format shown in the article list, e.g. "Jan 05, 2021".
pub const OUTPUT_DATE_FORMAT: &str = "%b %d, %Y";

/// Reformat an API publication date for display.
///
/// Returns an empty string if the input does not match [`INPUT_DATE_FORMAT`].
pub fn reformat_publication_date(iso_date: &str) -> String {
    match NaiveDateTime::parse_from_str(iso_date.trim(), INPUT_DATE_FORMAT) {
        Ok(date) => date.and_utc().format(OUTPUT_DATE_FORMAT).to_string(),
        Err(e) => {
            tracing::debug!("Unparseable publication date {:?}: {}", iso_date, e);
            String::new()
        }
    }
}
