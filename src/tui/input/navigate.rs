use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Field};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts ? and Esc
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) => app.should_quit = true,
        (_, KeyCode::Char('?')) => app.show_help = true,
        (_, KeyCode::Esc) => app.status_message = None,

        // Cursor
        (_, KeyCode::Char('j') | KeyCode::Down) => app.move_cursor(1),
        (_, KeyCode::Char('k') | KeyCode::Up) => app.move_cursor(-1),
        (_, KeyCode::Char('g') | KeyCode::Home) => app.cursor = 0,
        (_, KeyCode::Char('G') | KeyCode::End) => {
            app.cursor = app.board.row_count().saturating_sub(1);
        }
        (KeyModifiers::CONTROL, KeyCode::Char('d')) | (_, KeyCode::PageDown) => app.move_cursor(10),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) | (_, KeyCode::PageUp) => app.move_cursor(-10),

        // Form
        (_, KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Tab) => {
            app.form.focus = Field::Text;
            app.open_form();
        }
        (_, KeyCode::Char('c')) => {
            app.form.focus = Field::Category;
            app.open_form();
        }

        // Row actions
        (_, KeyCode::Char('y')) => app.copy_selected(Instant::now()),
        (_, KeyCode::Char('e') | KeyCode::Enter) => app.begin_edit(),
        (_, KeyCode::Char('d')) => app.request_delete_comment(),
        (_, KeyCode::Char('D')) => app.request_delete_category(),

        _ => {}
    }
}
