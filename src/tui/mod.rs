pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::app::{AppContext, Result};
use crate::config::Config;
use crate::loader::{ArticleLoader, LoaderEvent};

use self::app::TuiApp;
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let config = ctx.load_config()?;
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx, &config).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(terminal: &mut Tui, ctx: Arc<AppContext>, config: &Config) -> Result<()> {
    let mut tui_app = TuiApp::new();
    let event_handler = EventHandler::new(Duration::from_millis(100));
    let (mut loader, mut events) = ctx.loader();

    start_load(&mut tui_app, &ctx, &mut loader);

    loop {
        drain_loader_events(&mut tui_app, &loader, &mut events);
        terminal.draw(|frame| {
            layout::render(frame, &mut tui_app, &config.colors, &config.keybindings)
        })?;

        if let AppEvent::Key(key) = event_handler.next()? {
            match config.keybindings.get_action(&key) {
                Action::Quit => tui_app.should_quit = true,
                Action::MoveUp => tui_app.move_up(),
                Action::MoveDown => tui_app.move_down(),
                Action::NextPage => tui_app.next_page(),
                Action::PrevPage => tui_app.prev_page(),
                Action::First => tui_app.first(),
                Action::Last => tui_app.last(),
                Action::OpenInBrowser => {
                    if let Some(article) = tui_app.selected_article() {
                        let url = article.url().to_string();
                        match open::that_detached(&url) {
                            Ok(()) => tui_app.set_status(format!("Opened {}", url)),
                            Err(e) => {
                                tracing::warn!("Failed to open {}: {}", url, e);
                                tui_app.set_status(format!("Failed to open browser: {}", e));
                            }
                        }
                    }
                }
                Action::Refresh => start_load(&mut tui_app, &ctx, &mut loader),
                Action::None => {}
            }
        }

        if tui_app.should_quit {
            break;
        }
    }

    loader.reset();
    drain_loader_events(&mut tui_app, &loader, &mut events);

    Ok(())
}

/// Re-read settings and kick off a load. Network work, including the
/// connectivity probe, runs on the loader's task.
fn start_load(tui_app: &mut TuiApp, ctx: &AppContext, loader: &mut ArticleLoader) {
    let url = match ctx.request_url() {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Cannot build request: {}", e);
            loader.cancel();
            tui_app.clear_articles();
            tui_app.set_status(format!("Settings error: {}", e));
            return;
        }
    };

    tui_app.begin_loading();
    loader.start(url);
}

fn drain_loader_events(
    tui_app: &mut TuiApp,
    loader: &ArticleLoader,
    events: &mut mpsc::UnboundedReceiver<LoaderEvent>,
) {
    while let Ok(event) = events.try_recv() {
        match event {
            LoaderEvent::Delivered {
                generation,
                articles,
            } => {
                if generation == loader.generation() {
                    tui_app.apply_articles(articles);
                }
            }
            LoaderEvent::Offline { generation } => {
                if generation == loader.generation() {
                    tui_app.set_offline();
                }
            }
            LoaderEvent::Reset => tui_app.clear_articles(),
        }
    }
}
