use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    // Left: store errors, otherwise the comment total
    let left = match &app.status_message {
        Some(msg) => Span::styled(msg.clone(), Style::default().fg(app.theme.red).bg(bg)),
        None if app.loading => Span::styled("", Style::default().bg(bg)),
        None => {
            let n = app.session.store().comment_count();
            let noun = if n == 1 { "comment" } else { "comments" };
            Span::styled(
                format!("{} {}", n, noun),
                Style::default().fg(app.theme.dim).bg(bg),
            )
        }
    };

    let hint = if app.show_key_hints {
        match app.mode {
            Mode::Navigate => "a add  c category  ? help  q quit",
            Mode::Form => "Tab next field  Enter submit  Esc close",
            Mode::Confirm => "y confirm  n cancel",
            Mode::Alert => "any key to continue",
        }
    } else {
        ""
    };

    let mut spans = vec![Span::styled(" ", Style::default().bg(bg))];
    let left_w = unicode::display_width(&left.content) + 1;
    spans.push(left);

    let hint_w = unicode::display_width(hint) + 1;
    if !hint.is_empty() && left_w + hint_w < width {
        spans.push(Span::styled(
            " ".repeat(width - left_w - hint_w),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(
            format!("{} ", hint),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn draw(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, app, area);
        })
    }

    #[test]
    fn counts_and_navigate_hints() {
        let app = app_with_comments(&[(1, "a", "bug"), (2, "b", "ui")]);
        let out = draw(&app);
        assert!(out.starts_with(" 2 comments"));
        assert!(out.ends_with("q quit"));
    }

    #[test]
    fn store_error_replaces_count() {
        let mut app = app_with_comments(&[(1, "a", "bug")]);
        app.status_message = Some("error: store unavailable: writes disabled".into());
        let out = draw(&app);
        assert!(out.contains("store unavailable"));
        assert!(!out.contains("1 comment"));
    }

    #[test]
    fn form_hints() {
        let mut app = app_with_comments(&[]);
        app.open_form();
        assert!(draw(&app).contains("Enter submit"));
    }
}
