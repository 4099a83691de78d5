pub mod autocomplete;
pub mod board_view;
pub mod form_view;
pub mod help_overlay;
pub mod popup;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, Mode};

/// Height of the entry form: two field rows inside a border
const FORM_HEIGHT: u16 = 4;

/// Main render function — dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: form | board | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FORM_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let category_area = form_view::render_form(frame, app, chunks[0]);
    board_view::render_board(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);

    // Autocomplete dropdown floats over the board, under the category field
    if app.mode == Mode::Form && app.autocomplete.is_some() {
        autocomplete::render_autocomplete(frame, app, category_area);
    }

    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }

    match app.mode {
        Mode::Confirm => popup::render_confirm_popup(frame, app, area),
        Mode::Alert => popup::render_alert_popup(frame, app, area),
        _ => {}
    }
}
