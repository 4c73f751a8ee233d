pub mod commands;

use clap::{Args, Parser, Subcommand};

use crate::app::context::QueryOverrides;

#[derive(Parser)]
#[command(name = "newsfeed")]
#[command(about = "Browse Guardian news articles from the terminal", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/newsfeed/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch articles once and print them
    List {
        #[command(flatten)]
        query: QueryArgs,

        /// Print the articles as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch articles once and open the Nth one (1-based) in the browser
    Open {
        /// Position of the article in the list
        index: usize,

        #[command(flatten)]
        query: QueryArgs,
    },
    /// Launch the interactive list (default)
    Tui {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Show or change the request settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

/// One-off overrides of the stored query settings.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Search term (overrides the configured one)
    #[arg(short = 'q', long = "query")]
    pub search_term: Option<String>,

    /// Number of articles to request, 2-99 (overrides the configured one)
    #[arg(short = 'n', long = "page-size")]
    pub page_size: Option<u32>,
}

impl From<QueryArgs> for QueryOverrides {
    fn from(args: QueryArgs) -> Self {
        Self {
            search_term: args.search_term,
            page_size: args.page_size,
        }
    }
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current request settings
    Show,
    /// Print the config file location
    Path,
    /// Change one setting: search-term, page-size, api-key or base-url
    Set {
        key: String,
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["newsfeed"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_list_with_overrides() {
        let cli = Cli::try_parse_from(["newsfeed", "list", "-q", "chess", "-n", "5", "--json"])
            .unwrap();
        match cli.command {
            Some(Commands::List { query, json }) => {
                assert!(json);
                assert_eq!(query.search_term.as_deref(), Some("chess"));
                assert_eq!(query.page_size, Some(5));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_settings_set() {
        let cli = Cli::try_parse_from(["newsfeed", "settings", "set", "page-size", "50"]).unwrap();
        match cli.command {
            Some(Commands::Settings {
                action: SettingsAction::Set { key, value },
            }) => {
                assert_eq!(key, "page-size");
                assert_eq!(value, "50");
            }
            _ => panic!("expected settings set"),
        }
    }
}
