use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Confirm: y
        (KeyModifiers::NONE, KeyCode::Char('y')) => app.confirm(),
        // Cancel: n or Esc
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => app.cancel_confirm(),
        _ => {}
    }
}

/// Any key dismisses an alert and returns to the form, inputs intact.
pub(super) fn handle_alert(app: &mut App, _key: KeyEvent) {
    app.dismiss_alert();
}

#[cfg(test)]
mod tests {
    use crate::tui::app::Mode;
    use crate::tui::input::handle_key;
    use crate::tui::input::test_keys::*;
    use crate::tui::render::test_helpers::app_with_comments;

    #[test]
    fn other_keys_leave_confirm_pending() {
        let mut app = app_with_comments(&[(1, "a", "bug")]);
        handle_key(&mut app, ch('d'));
        handle_key(&mut app, ch('x'));
        assert_eq!(app.mode, Mode::Confirm);
        assert!(app.confirm_state.is_some());
        assert_eq!(app.session.store().comment_count(), 1);
    }

    #[test]
    fn deleting_last_comment_drops_category() {
        let mut app = app_with_comments(&[(1, "a", "bug")]);
        handle_key(&mut app, ch('d'));
        handle_key(&mut app, ch('y'));
        assert!(app.session.store().is_empty());
        assert_eq!(app.board.row_count(), 0);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn deleting_edited_comment_resets_to_add() {
        let mut app = app_with_comments(&[(1, "a", "bug"), (2, "b", "bug")]);
        handle_key(&mut app, ch('e'));
        app.mode = Mode::Navigate;
        handle_key(&mut app, ch('d'));
        handle_key(&mut app, ch('y'));
        assert!(!app.session.is_editing());
        assert_eq!(app.primary_action().label(), "Add Comment");
    }
}
