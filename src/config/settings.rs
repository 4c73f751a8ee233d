//! User-editable request parameters.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::query::{QueryConfig, GUARDIAN_REQUEST_URL};

/// Page sizes at or below this are rejected.
pub const MIN_PAGE_SIZE: u32 = 1;
/// Page sizes at or above this are rejected.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    pub search_term: String,
    pub page_size: u32,
    pub api_key: String,
    pub base_url: String,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            search_term: "football".to_string(),
            page_size: 20,
            api_key: "test".to_string(),
            base_url: GUARDIAN_REQUEST_URL.to_string(),
        }
    }
}

impl QuerySettings {
    pub fn query_config(&self) -> QueryConfig {
        QueryConfig {
            search_term: self.search_term.clone(),
            page_size: self.page_size,
            api_key: self.api_key.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_page_size(self.page_size)
    }
}

/// Keys accepted by `settings set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    SearchTerm,
    PageSize,
    ApiKey,
    BaseUrl,
}

impl SettingKey {
    pub const ALL: [SettingKey; 4] = [
        SettingKey::SearchTerm,
        SettingKey::PageSize,
        SettingKey::ApiKey,
        SettingKey::BaseUrl,
    ];

    /// Name as typed on the command line
    pub fn cli_name(self) -> &'static str {
        match self {
            SettingKey::SearchTerm => "search-term",
            SettingKey::PageSize => "page-size",
            SettingKey::ApiKey => "api-key",
            SettingKey::BaseUrl => "base-url",
        }
    }

    /// Name inside the `[query]` table of the config file
    pub fn toml_name(self) -> &'static str {
        match self {
            SettingKey::SearchTerm => "search_term",
            SettingKey::PageSize => "page_size",
            SettingKey::ApiKey => "api_key",
            SettingKey::BaseUrl => "base_url",
        }
    }
}

impl std::str::FromStr for SettingKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        SettingKey::ALL
            .into_iter()
            .find(|key| key.cli_name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

/// Validate a page size typed by the user.
///
/// An empty value counts as zero, so it is rejected like any other value
/// outside `MIN_PAGE_SIZE < n < MAX_PAGE_SIZE`.
pub fn validate_page_size(value: &str) -> Result<u32, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::InvalidPageSize(value.to_string()));
    }

    let size: u32 = value
        .parse()
        .map_err(|_| ConfigError::InvalidPageSize(value.to_string()))?;

    check_page_size(size)?;
    Ok(size)
}

fn check_page_size(size: u32) -> Result<(), ConfigError> {
    if size <= MIN_PAGE_SIZE || size >= MAX_PAGE_SIZE {
        return Err(ConfigError::InvalidPageSize(size.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_bounds() {
        assert!(validate_page_size("1").is_err());
        assert!(validate_page_size("100").is_err());
        assert_eq!(validate_page_size("50").unwrap(), 50);
        assert_eq!(validate_page_size("2").unwrap(), 2);
        assert_eq!(validate_page_size("99").unwrap(), 99);
    }

    #[test]
    fn test_page_size_rejects_junk() {
        assert!(validate_page_size("").is_err());
        assert!(validate_page_size("0").is_err());
        assert!(validate_page_size("-5").is_err());
        assert!(validate_page_size("ten").is_err());
    }

    #[test]
    fn test_page_size_trims() {
        assert_eq!(validate_page_size(" 42 ").unwrap(), 42);
    }

    #[test]
    fn test_defaults_are_valid() {
        let settings = QuerySettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.base_url, GUARDIAN_REQUEST_URL);
    }

    #[test]
    fn test_query_config_copies_fields() {
        let settings = QuerySettings {
            search_term: "tennis".into(),
            page_size: 5,
            api_key: "secret".into(),
            ..QuerySettings::default()
        };
        let query = settings.query_config();
        assert_eq!(query.search_term, "tennis");
        assert_eq!(query.page_size, 5);
        assert_eq!(query.api_key, "secret");
    }

    #[test]
    fn test_setting_key_names() {
        assert_eq!("page-size".parse::<SettingKey>().unwrap(), SettingKey::PageSize);
        assert_eq!("API_KEY".parse::<SettingKey>().unwrap(), SettingKey::ApiKey);
        assert!("colour".parse::<SettingKey>().is_err());
        assert_eq!(SettingKey::SearchTerm.toml_name(), "search_term");
    }
}
