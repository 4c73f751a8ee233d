use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsfeed::app::AppContext;
use newsfeed::cli::{commands, Cli, Commands, QueryArgs, SettingsAction};
use newsfeed::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with the TUI or printed articles
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List { query, json }) => {
            let ctx = AppContext::new(cli.config)?.with_overrides(query.into());
            commands::list_articles(&ctx, json).await?;
        }
        Some(Commands::Open { index, query }) => {
            let ctx = AppContext::new(cli.config)?.with_overrides(query.into());
            commands::open_article(&ctx, index).await?;
        }
        Some(Commands::Tui { query }) => {
            let ctx = AppContext::new(cli.config)?.with_overrides(query.into());
            newsfeed::tui::run(Arc::new(ctx)).await?;
        }
        None => {
            let ctx = AppContext::new(cli.config)?.with_overrides(QueryArgs::default().into());
            newsfeed::tui::run(Arc::new(ctx)).await?;
        }
        Some(Commands::Settings { action }) => {
            let path = match cli.config {
                Some(p) => p,
                None => Config::default_config_path()?,
            };
            match action {
                SettingsAction::Show => commands::show_settings(&path)?,
                SettingsAction::Path => println!("{}", path.display()),
                SettingsAction::Set { key, value } => commands::set_setting(&path, &key, &value)?,
            }
        }
    }

    Ok(())
}
