use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::util::unicode::display_width;

const POPUP_WIDTH: u16 = 48;

/// Render the y/n prompt for a pending delete
pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(state) = &app.confirm_state {
        let popup = Popup {
            title: " Confirm ",
            message: &state.message,
            footer: "y confirm   n cancel",
            accent: app.theme.red,
        };
        popup.render(frame, app, area);
    }
}

/// Render a blocking validation message
pub fn render_alert_popup(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(message) = &app.alert {
        let popup = Popup {
            title: " Missing input ",
            message,
            footer: "press any key",
            accent: app.theme.highlight,
        };
        popup.render(frame, app, area);
    }
}

struct Popup<'a> {
    title: &'a str,
    message: &'a str,
    footer: &'a str,
    accent: Color,
}

impl Popup<'_> {
    fn render(&self, frame: &mut Frame, app: &App, area: Rect) {
        let bg = app.theme.background;
        let width = POPUP_WIDTH.min(area.width.saturating_sub(2));
        let body = wrap_words(self.message, width.saturating_sub(4) as usize);

        let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
        let mut lines: Vec<Line> = body
            .into_iter()
            .map(|l| Line::from(Span::styled(format!(" {l}"), text_style)))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", self.footer),
            Style::default().fg(app.theme.dim).bg(bg),
        )));

        // Body plus top and bottom border
        let height = (lines.len() as u16 + 2).min(area.height);
        let rect = centered(width, height, area);
        frame.render_widget(Clear, rect);

        let accent = Style::default().fg(self.accent).bg(bg);
        let block = Block::default()
            .title(Span::styled(self.title, accent.add_modifier(Modifier::BOLD)))
            .borders(Borders::ALL)
            .border_style(accent)
            .style(Style::default().bg(bg));
        frame.render_widget(Paragraph::new(lines).block(block), rect);
    }
}

/// Greedy word wrap by display width. Always yields at least one line.
/// A single word wider than `width` gets a line of its own.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = display_width(&line) + usize::from(!line.is_empty()) + display_width(word);
        if !line.is_empty() && needed > width {
            out.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() || out.is_empty() {
        out.push(line);
    }
    out
}

/// A `width` x `height` rect in the middle of `area`, clipped to it
pub(super) fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
