//! Configuration management for newsfeed.
//!
//! Configuration is read from `~/.config/newsfeed/config.toml`. If the file
//! doesn't exist, a default configuration with comments is created.
//! The `[query]` table is re-read before every load so edits made with
//! `newsfeed settings set` take effect on the next refresh.

pub mod colors;
pub mod keybindings;
pub mod settings;

pub use colors::ColorConfig;
pub use keybindings::KeybindingConfig;
pub use settings::{validate_page_size, QuerySettings, SettingKey};

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub query: QuerySettings,
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
}

impl Config {
    /// Load configuration from `path`.
    ///
    /// A missing file is created with commented defaults. Missing fields fall
    /// back to their defaults; an invalid page size is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::create_default_config(path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.query.validate()?;

        let invalid = config.keybindings.invalid_bindings();
        if !invalid.is_empty() {
            tracing::warn!("Ignoring unparseable keybindings: {}", invalid.join(", "));
        }

        Ok(config)
    }

    /// Get the default config file path: `~/.config/newsfeed/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("newsfeed").join("config.toml"))
    }

    /// Change one `[query]` setting in the file at `path` and return the
    /// resulting configuration. The value is validated before anything is
    /// written.
    pub fn set_value(path: &Path, key: SettingKey, value: &str) -> Result<Self, ConfigError> {
        let new_value = match key {
            SettingKey::PageSize => toml::Value::Integer(i64::from(validate_page_size(value)?)),
            SettingKey::BaseUrl => {
                url::Url::parse(value.trim()).map_err(|e| ConfigError::InvalidValue {
                    key: key.cli_name(),
                    reason: e.to_string(),
                })?;
                toml::Value::String(value.trim().to_string())
            }
            SettingKey::SearchTerm | SettingKey::ApiKey => toml::Value::String(value.to_string()),
        };

        if !path.exists() {
            Self::create_default_config(path)?;
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut document: toml::Table = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        let query = document
            .entry("query")
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        let query = query.as_table_mut().ok_or_else(|| ConfigError::InvalidValue {
            key: "query",
            reason: "expected a table".to_string(),
        })?;
        query.insert(key.toml_name().to_string(), new_value);

        let serialized = toml::to_string(&document)?;

        // The whole edited document must load cleanly before it replaces the file
        let config: Config = toml::from_str(&serialized).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.query.validate()?;

        fs::write(path, serialized).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::info!("Updated setting {} in {}", key.cli_name(), path.display());
        Ok(config)
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, Self::default_config_content()).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::info!("Created default config at {}", path.display());
        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# newsfeed configuration
#
# Edit by hand or with `newsfeed settings set <key> <value>`
# (note that `settings set` rewrites the file without these comments).

[query]
# Search term sent as the `q` parameter
search_term = "football"

# Number of articles per request, between 2 and 99
page_size = 20

# Guardian content API key ("test" is the public developer key)
api_key = "test"

# Search endpoint
base_url = "https://content.guardianapis.com/search"

[colors]
# Named colors (Black, Red, Green, Yellow, Blue, Magenta, Cyan, Gray,
# DarkGray, LightRed, ..., White, Reset) or hex "#RRGGBB" / "#RGB"
border = "Cyan"
selection_bg = "Cyan"
selection_fg = "Black"
title = "White"
section = "Magenta"
author = "Yellow"
date = "Yellow"
link = "Blue"
empty_state = "DarkGray"
status_fg = "White"
status_bg = "DarkGray"

[keybindings]
# Single characters ("j"), special keys (Enter, PageDown, Home, F5, ...)
# and modifiers ("Ctrl+c", "Alt+Enter")
quit = ["q", "Ctrl+c", "Esc"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
next_page = ["n", "PageDown"]
prev_page = ["p", "PageUp"]
first = ["g", "Home"]
last = ["G", "End"]
open_in_browser = ["Enter", "o"]
refresh = ["r", "R", "F5"]
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(
        "Invalid page size '{0}': must be greater than {min} and less than {max}",
        min = settings::MIN_PAGE_SIZE,
        max = settings::MAX_PAGE_SIZE
    )]
    InvalidPageSize(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("Unknown setting '{0}' (expected search-term, page-size, api-key or base-url)")]
    UnknownKey(String),
}
