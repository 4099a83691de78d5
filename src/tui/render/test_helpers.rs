use ratatui::{Frame, Terminal};
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::store::MemoryStore;
use crate::model::comment::{Comment, CommentId, CommentStore};
use crate::ops::session::Session;
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Draw with `f` on a `w` x `h` test terminal and return the screen as
/// text, one line per row with trailing blanks dropped.
pub fn render_to_string(w: u16, h: u16, f: impl FnOnce(&mut Frame, Rect)) -> String {
    let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buffer = terminal.backend().buffer();
    let mut rows: Vec<String> = (0..h)
        .map(|y| {
            let row: String = (0..w).map(|x| buffer[(x, y)].symbol()).collect();
            row.trim_end().to_owned()
        })
        .collect();
    while rows.last().is_some_and(String::is_empty) {
        rows.pop();
    }
    rows.join("\n")
}

/// Build a comment mapping from `(id, text, category)` triples, in order.
pub fn store_from(rows: &[(CommentId, &str, &str)]) -> CommentStore {
    rows.iter()
        .map(|(id, text, category)| Comment::new(*id, *text, *category))
        .collect()
}

/// An App over an in-memory document. The clipboard is stubbed out.
pub fn app_on(mem: &MemoryStore) -> App {
    let session = Session::load(Box::new(mem.clone())).unwrap();
    let mut app = App::new(session, Theme::default());
    app.clipboard = |_| Ok(());
    app
}

/// An App whose document holds the given comments.
pub fn app_with_comments(rows: &[(CommentId, &str, &str)]) -> App {
    let mem = if rows.is_empty() {
        MemoryStore::new()
    } else {
        MemoryStore::with_document(store_from(rows))
    };
    app_on(&mem)
}
