use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::popup::centered;
use crate::tui::app::App;

const BOARD_KEYS: &[(&str, &str)] = &[
    (" \u{2191}\u{2193}/jk", "Move between comments"),
    (" g/G", "Jump to top/bottom"),
    (" y", "Copy comment text"),
    (" e/Enter", "Edit comment"),
    (" d", "Delete comment"),
    (" D", "Delete whole category"),
];

const FORM_KEYS: &[(&str, &str)] = &[
    (" a/Tab", "Write a new comment"),
    (" c", "Jump to the category field"),
    (" Tab", "Next field / take suggestion"),
    (" \u{2191}\u{2193}", "Pick a category suggestion"),
    (" Enter", "Add or update comment"),
    (" Esc", "Close suggestions / leave form"),
];

const GLOBAL_KEYS: &[(&str, &str)] = &[
    (" ?", "Toggle this help"),
    (" q", "Quit"),
    (" Ctrl+C", "Quit (from anywhere)"),
];

const KEY_COLUMN: usize = 12;

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let heading = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let key_style = heading.fg(app.theme.highlight);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);

    let sections = [
        (" Board", BOARD_KEYS),
        (" Form", FORM_KEYS),
        (" Global", GLOBAL_KEYS),
    ];
    let mut lines = Vec::new();
    for (title, keys) in sections {
        lines.push(Line::styled(title, heading));
        lines.extend(keys.iter().map(|&(key, desc)| {
            Line::from(vec![
                Span::styled(format!("{key:<KEY_COLUMN$}"), key_style),
                Span::styled(desc, desc_style),
            ])
        }));
        lines.push(Line::default());
    }
    if let Some(path) = &app.document_path {
        lines.push(Line::styled(
            format!(" {}", path.display()),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    let width = lines.iter().map(Line::width).max().unwrap_or(0) as u16 + 4;
    let height = lines.len() as u16 + 2;
    let rect = centered(width.max(40), height, area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .title(Span::styled(" Key Bindings ", heading))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}
