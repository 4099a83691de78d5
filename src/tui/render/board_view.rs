use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::board::{BoardView, CardView, EMPTY_BOARD_MESSAGE, EMPTY_CARD_MESSAGE};
use crate::tui::app::{App, Mode};
use crate::util::unicode;

const ROW_HINTS: &str = "y copy  e edit  d delete";
const CARD_HINT: &str = "D delete category";
const COPIED: &str = "Copied!";
const LOADING: &str = "Loading comments\u{2026}";

/// Render the category cards, keeping the cursor row in view
pub fn render_board(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    if app.loading || matches!(app.board, BoardView::Empty) {
        let msg = if app.loading { LOADING } else { EMPTY_BOARD_MESSAGE };
        let line = Line::from(Span::styled(
            format!("  {}", msg),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        let y = area.y + area.height / 3;
        let msg_area = Rect::new(area.x, y.min(area.y + area.height.saturating_sub(1)), area.width, 1);
        frame.render_widget(Paragraph::new(line), msg_area);
        return;
    }

    let (lines, cursor_line) = build_lines(app, width);

    // Keep the cursor visible, with the card header above the first row when possible
    let height = area.height as usize;
    if let Some(cl) = cursor_line {
        if cl < app.scroll_offset {
            app.scroll_offset = cl.saturating_sub(1);
        } else if cl >= app.scroll_offset + height {
            app.scroll_offset = cl + 1 - height;
        }
    }
    app.scroll_offset = app.scroll_offset.min(lines.len().saturating_sub(height));

    let visible: Vec<Line> = lines
        .into_iter()
        .skip(app.scroll_offset)
        .take(height)
        .collect();
    let paragraph = Paragraph::new(visible).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// All board lines, plus the index of the line holding the cursor row
fn build_lines(app: &App, width: usize) -> (Vec<Line<'static>>, Option<usize>) {
    let mut lines = Vec::new();
    let mut cursor_line = None;
    let show_cursor = app.mode == Mode::Navigate;
    let mut row_index = 0;

    for (ci, card) in app.board.cards().iter().enumerate() {
        if ci > 0 {
            lines.push(Line::from(""));
        }
        let card_selected =
            show_cursor && (row_index..row_index + card.rows.len()).contains(&app.cursor);
        lines.push(card_header(app, card, card_selected, width));

        if card.rows.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    {}", EMPTY_CARD_MESSAGE),
                Style::default().fg(app.theme.dim).bg(app.theme.background),
            )));
        }

        for row in &card.rows {
            let selected = show_cursor && row_index == app.cursor;
            if row_index == app.cursor {
                cursor_line = Some(lines.len());
            }
            let copied = app.copied.is_some_and(|flash| flash.id == row.id);
            lines.push(comment_line(app, card, &row.text, row.editing, selected, copied, width));
            row_index += 1;
        }
    }

    (lines, cursor_line)
}

fn card_header(app: &App, card: &CardView, selected: bool, width: usize) -> Line<'static> {
    let bg = app.theme.background;
    let color = app.theme.category_color(card.color_index);

    let name_style = Style::default()
        .fg(color)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let badge_style = Style::default().fg(bg).bg(color);

    let mut spans = vec![
        Span::styled(" \u{25A0} ", Style::default().fg(color).bg(bg)),
        Span::styled(card.name.clone(), name_style),
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(format!(" {} ", card.count), badge_style),
    ];

    if selected && app.show_key_hints {
        let used: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
        let hint_w = CARD_HINT.len() + 1;
        if used + hint_w < width {
            spans.push(Span::styled(
                " ".repeat(width - used - hint_w),
                Style::default().bg(bg),
            ));
            spans.push(Span::styled(
                format!("{} ", CARD_HINT),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
    }
    Line::from(spans)
}

fn comment_line(
    app: &App,
    card: &CardView,
    text: &str,
    editing: bool,
    selected: bool,
    copied: bool,
    width: usize,
) -> Line<'static> {
    let row_bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let color = app.theme.category_color(card.color_index);

    let marker = if editing {
        Span::styled(" \u{270E} ", Style::default().fg(app.theme.highlight).bg(row_bg))
    } else {
        Span::styled(" \u{2502} ", Style::default().fg(color).bg(row_bg))
    };

    // Right-side annotation: "Copied!" wins over the action hints
    let trailer = if copied {
        Some(Span::styled(
            format!(" {} ", COPIED),
            Style::default()
                .fg(app.theme.green)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD),
        ))
    } else if selected && app.show_key_hints {
        Some(Span::styled(
            format!(" {} ", ROW_HINTS),
            Style::default().fg(app.theme.dim).bg(row_bg),
        ))
    } else {
        None
    };
    let trailer_w = trailer
        .as_ref()
        .map_or(0, |s| unicode::display_width(&s.content));

    let text_style = if selected {
        Style::default().fg(app.theme.text_bright).bg(row_bg)
    } else {
        Style::default().fg(app.theme.text).bg(row_bg)
    };
    let marker_w = unicode::display_width(&marker.content);
    let text_budget = width.saturating_sub(marker_w + trailer_w);
    let shown = unicode::truncate_to_width(text, text_budget);
    let pad = text_budget.saturating_sub(unicode::display_width(&shown));

    let mut spans = vec![
        marker,
        Span::styled(shown, text_style),
        Span::styled(" ".repeat(pad), Style::default().bg(row_bg)),
    ];
    if let Some(t) = trailer {
        spans.push(t);
    }
    Line::from(spans)
}
