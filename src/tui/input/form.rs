use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Field};

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Esc: hide suggestions first, then leave the form
        (_, KeyCode::Esc) => {
            if app.autocomplete.is_some() {
                app.autocomplete = None;
            } else {
                app.cancel_form();
            }
        }

        (_, KeyCode::Enter) => {
            if let Some(name) = highlighted_suggestion(app) {
                app.pick_suggestion(&name);
            } else {
                app.submit();
            }
        }

        (_, KeyCode::Tab) => {
            if let Some(name) = highlighted_suggestion(app) {
                app.pick_suggestion(&name);
            } else {
                switch_field(app);
            }
        }
        (_, KeyCode::BackTab) => switch_field(app),

        // Suggestion list
        (_, KeyCode::Down) if app.form.focus == Field::Category => match &mut app.autocomplete {
            Some(ac) => ac.move_down(),
            None => app.update_suggestions(),
        },
        (_, KeyCode::Up) if app.form.focus == Field::Category => {
            if let Some(ac) = &mut app.autocomplete {
                ac.move_up();
            }
        }
        (_, KeyCode::Right) if app.form.focus == Field::Category && app.form.category.is_at_end() => {
            if let Some(name) = highlighted_suggestion(app) {
                app.pick_suggestion(&name);
            }
        }

        // Cursor movement
        (_, KeyCode::Left) => app.form.focused_mut().left(),
        (_, KeyCode::Right) => app.form.focused_mut().right(),
        (_, KeyCode::Home) | (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
            app.form.focused_mut().home()
        }
        (_, KeyCode::End) | (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
            app.form.focused_mut().end()
        }

        // Editing
        (_, KeyCode::Backspace) => {
            app.form.focused_mut().backspace();
            after_category_change(app);
        }
        (_, KeyCode::Delete) => {
            app.form.focused_mut().delete();
            after_category_change(app);
        }
        (KeyModifiers::CONTROL, KeyCode::Char('w')) => {
            app.form.focused_mut().delete_word_back();
            after_category_change(app);
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            app.form.focused_mut().clear();
            after_category_change(app);
        }
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            app.form.focused_mut().insert_char(c);
            after_category_change(app);
        }

        _ => {}
    }
}

/// Every change to the category field refilters the suggestions.
pub(super) fn after_category_change(app: &mut App) {
    if app.form.focus == Field::Category {
        app.update_suggestions();
    }
}

fn switch_field(app: &mut App) {
    let next = match app.form.focus {
        Field::Text => Field::Category,
        Field::Category => Field::Text,
    };
    app.focus_field(next);
}

fn highlighted_suggestion(app: &App) -> Option<String> {
    if app.form.focus != Field::Category {
        return None;
    }
    app.autocomplete
        .as_ref()
        .and_then(|ac| ac.selected_name())
        .map(str::to_string)
}
