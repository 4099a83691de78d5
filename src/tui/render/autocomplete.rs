use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::util::unicode;

/// Maximum number of visible entries in the dropdown
const MAX_VISIBLE: usize = 8;

/// Render the category suggestions below the category input
pub fn render_autocomplete(frame: &mut Frame, app: &App, anchor: Rect) {
    let ac = match &app.autocomplete {
        Some(ac) if !ac.entries.is_empty() => ac,
        _ => return,
    };

    let bg = app.theme.background;
    let count = ac.entries.len().min(MAX_VISIBLE);

    // Name column plus a right-aligned count column
    let name_w = ac
        .entries
        .iter()
        .map(|s| unicode::display_width(&s.name))
        .max()
        .unwrap_or(8);
    let count_w = ac
        .entries
        .iter()
        .map(|s| s.count.to_string().len())
        .max()
        .unwrap_or(1);
    let content_w = name_w + 2 + count_w;

    let term_area = frame.area();
    let popup_w = ((content_w + 5) as u16)
        .min(term_area.width.saturating_sub(anchor.x))
        .max(12);
    let popup_h = (count as u16) + 2; // +2 for borders

    // Below the input; above it if there's no room
    let y = if anchor.y + anchor.height + popup_h <= term_area.height {
        anchor.y + anchor.height
    } else {
        anchor.y.saturating_sub(popup_h)
    };
    let x = anchor.x.min(term_area.width.saturating_sub(popup_w));
    let popup_area = Rect::new(x, y, popup_w, popup_h.min(term_area.height));

    // Scroll window around selected item
    let selected = ac.selected;
    let scroll_start = match selected {
        Some(i) if i >= MAX_VISIBLE => i - MAX_VISIBLE + 1,
        _ => 0,
    };
    let inner_w = (popup_w as usize).saturating_sub(2);
    let label_w = inner_w.saturating_sub(3 + count_w + 1);

    let mut lines: Vec<Line> = Vec::new();
    for (i, entry) in ac.entries.iter().enumerate().skip(scroll_start).take(MAX_VISIBLE) {
        let is_selected = selected == Some(i);
        let style = if is_selected {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        let count_style = if is_selected {
            style
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };

        let prefix = if is_selected { " \u{25B8} " } else { "   " };
        let name = unicode::truncate_to_width(&entry.name, label_w);
        let pad = label_w.saturating_sub(unicode::display_width(&name));

        lines.push(Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(format!("{}{}", name, " ".repeat(pad)), style),
            Span::styled(format!("{:>width$} ", entry.count, width = count_w), count_style),
        ]));
    }

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, popup_area);
}
