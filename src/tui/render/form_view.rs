use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, Field, Mode, TextInput};
use crate::util::unicode;

/// Width of the field labels, including the trailing gap
const LABEL_WIDTH: u16 = 10;

/// Render the comment form. Returns the category input's area so the
/// autocomplete dropdown can anchor under it.
pub fn render_form(frame: &mut Frame, app: &App, area: Rect) -> Rect {
    let bg = app.theme.background;
    let active = app.mode == Mode::Form;
    let border_color = if active { app.theme.highlight } else { app.theme.dim };
    let label = app.primary_action().label();

    let title_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).bg(bg))
        .title(Span::styled(format!(" {} ", label), title_style))
        .style(Style::default().bg(bg));
    if active {
        block = block.title_bottom(
            Line::from(Span::styled(
                format!(" Enter {} ", label.to_lowercase()),
                Style::default().fg(app.theme.dim).bg(bg),
            ))
            .right_aligned(),
        );
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width <= LABEL_WIDTH {
        return inner;
    }

    let input_w = inner.width - LABEL_WIDTH;
    let rows = [
        (Field::Text, "Comment", &app.form.text, "What needs attention?"),
        (Field::Category, "Category", &app.form.category, "e.g. bug, design, docs"),
    ];

    let mut category_area = inner;
    for (i, (field, name, input, placeholder)) in rows.into_iter().enumerate() {
        let y = inner.y + i as u16;
        if y >= inner.y + inner.height {
            break;
        }
        let focused = active && app.form.focus == field;
        let label_style = if focused {
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };

        let (visible, cursor_col) = visible_slice(input, input_w as usize);
        let value = if input.buffer.is_empty() {
            Span::styled(placeholder, Style::default().fg(app.theme.dim).bg(bg))
        } else {
            Span::styled(visible, Style::default().fg(app.theme.text_bright).bg(bg))
        };

        let line = Line::from(vec![
            Span::styled(format!("{:<width$}", name, width = LABEL_WIDTH as usize), label_style),
            value,
        ]);
        let row_area = Rect::new(inner.x, y, inner.width, 1);
        frame.render_widget(Paragraph::new(line), row_area);

        if field == Field::Category {
            category_area = Rect::new(inner.x + LABEL_WIDTH, y, input_w, 1);
        }
        if focused {
            frame.set_cursor_position(Position::new(
                inner.x + LABEL_WIDTH + cursor_col as u16,
                y,
            ));
        }
    }

    category_area
}

/// The part of `input` that fits in `width` cells, scrolled so the cursor
/// stays visible, plus the cursor's column within that slice.
fn visible_slice(input: &TextInput, width: usize) -> (String, usize) {
    let cursor_col = unicode::byte_offset_to_display_col(&input.buffer, input.cursor);
    // Leave one cell for the cursor at the end of the line
    let usable = width.saturating_sub(1).max(1);
    if cursor_col <= usable {
        return (unicode::truncate_to_width(&input.buffer, width), cursor_col);
    }
    let skip_cols = cursor_col - usable;
    let start = unicode::display_col_to_byte_offset(&input.buffer, skip_cols);
    let shown = unicode::truncate_to_width(&input.buffer[start..], width);
    let col = unicode::byte_offset_to_display_col(&input.buffer[start..], input.cursor - start);
    (shown, col)
}
