use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::config::{ColorConfig, KeybindingConfig};
use crate::tui::app::TuiApp;

pub fn render(
    frame: &mut Frame,
    app: &mut TuiApp,
    colors: &ColorConfig,
    keybindings: &KeybindingConfig,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Article list
            Constraint::Length(6), // Details of the selected article
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_article_list(frame, app, chunks[0], colors);
    render_details(frame, app, chunks[1], colors);
    render_status_bar(frame, app, chunks[2], colors, keybindings);
}

fn render_article_list(frame: &mut Frame, app: &mut TuiApp, area: Rect, colors: &ColorConfig) {
    let title = if app.articles.is_empty() {
        " Articles ".to_string()
    } else {
        format!(
            " Articles [{}/{}] ",
            app.article_index + 1,
            app.articles.len()
        )
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border));

    if app.articles.is_empty() {
        let empty = Paragraph::new(app.empty_state.message())
            .style(Style::default().fg(colors.empty_state))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let rows: Vec<ListItem> = app
        .articles
        .iter()
        .map(|article| {
            let mut meta = vec![
                Span::styled(article.section(), Style::default().fg(colors.section)),
                Span::raw("  "),
                Span::styled(article.display_author(), Style::default().fg(colors.author)),
            ];
            let date = article.display_date();
            if !date.is_empty() {
                meta.push(Span::raw("  "));
                meta.push(Span::styled(date, Style::default().fg(colors.date)));
            }

            ListItem::new(Text::from(vec![
                Line::from(Span::styled(
                    article.title(),
                    Style::default()
                        .fg(colors.title)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(meta),
            ]))
        })
        .collect();

    let list = List::new(rows)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(colors.selection_bg)
                .fg(colors.selection_fg),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_details(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border));

    let text = match app.selected_article() {
        Some(article) => {
            let mut lines = vec![Line::from(Span::styled(
                article.section(),
                Style::default().fg(colors.section),
            ))];
            if let Some(author) = article.author() {
                lines.push(Line::from(Span::styled(
                    format!("By: {}", author),
                    Style::default().fg(colors.author),
                )));
            }
            lines.push(Line::from(Span::styled(
                format!("Published: {}", article.display_date()),
                Style::default().fg(colors.date),
            )));
            lines.push(Line::from(Span::styled(
                article.url(),
                Style::default().fg(colors.link),
            )));
            Text::from(lines)
        }
        None => Text::from(""),
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_status_bar(
    frame: &mut Frame,
    app: &TuiApp,
    area: Rect,
    colors: &ColorConfig,
    keybindings: &KeybindingConfig,
) {
    let status = if app.is_loading {
        "Loading articles...".to_string()
    } else if let Some(ref msg) = app.status_message {
        msg.clone()
    } else {
        keybindings.help_text()
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(colors.status_fg).bg(colors.status_bg));

    frame.render_widget(paragraph, area);
}
