use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use crate::io::config_io::{self, Workspace};
use crate::io::store::RemoteStore;
use crate::io::watcher::Subscription;
use crate::model::comment::CommentId;
use crate::ops::board::{self, BoardView, PrimaryAction};
use crate::ops::session::{Session, SessionError, Submitted};
use crate::ops::suggest::{Suggestion, suggest};
use crate::util::unicode;

use super::clipboard;
use super::input;
use super::render;
use super::theme::Theme;

/// How long a row shows "Copied!" after a copy
pub const COPY_FLASH: Duration = Duration::from_secs(2);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Form,
    Confirm,
    /// Blocking message; any key dismisses
    Alert,
}

/// Which form field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Text,
    Category,
}

/// A single-line text buffer with a grapheme-aware cursor (byte offset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub buffer: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn set(&mut self, value: &str) {
        self.buffer = value.to_string();
        self.cursor = self.buffer.len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert pasted text; newlines become spaces.
    pub fn insert_str(&mut self, s: &str) {
        let clean = s.replace('\n', " ").replace('\r', "");
        self.buffer.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.buffer, self.cursor) {
            self.buffer.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.buffer, self.cursor) {
            self.buffer.replace_range(self.cursor..next, "");
        }
    }

    pub fn left(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.buffer, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn right(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.buffer, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.buffer.len();
    }

    /// Delete the word before the cursor (Ctrl-W)
    pub fn delete_word_back(&mut self) {
        let start = unicode::word_boundary_left(&self.buffer, self.cursor);
        self.buffer.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.buffer.len()
    }
}

/// The comment/category entry form
#[derive(Debug, Clone)]
pub struct Form {
    pub text: TextInput,
    pub category: TextInput,
    pub focus: Field,
}

impl Default for Form {
    fn default() -> Self {
        Form {
            text: TextInput::default(),
            category: TextInput::default(),
            focus: Field::Text,
        }
    }
}

impl Form {
    pub fn focused_mut(&mut self) -> &mut TextInput {
        match self.focus {
            Field::Text => &mut self.text,
            Field::Category => &mut self.category,
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.category.clear();
        self.focus = Field::Text;
    }
}

/// Category suggestions shown under the category field
#[derive(Debug, Clone, Default)]
pub struct Autocomplete {
    pub entries: Vec<Suggestion>,
    /// Highlighted entry, if the user has moved into the list
    pub selected: Option<usize>,
}

impl Autocomplete {
    pub fn move_down(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            None => 0,
            Some(i) => (i + 1).min(self.entries.len() - 1),
        });
    }

    pub fn move_up(&mut self) {
        self.selected = match self.selected {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.entries.get(i))
            .map(|s| s.name.as_str())
    }
}

/// A destructive action waiting for y/n
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteComment { id: CommentId, category: String },
    DeleteCategory { category: String },
}

#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub message: String,
    pub action: ConfirmAction,
}

/// Transient "Copied!" acknowledgment on one row
#[derive(Debug, Clone, Copy)]
pub struct CopyFlash {
    pub id: CommentId,
    pub until: Instant,
}

/// Writes text to the clipboard
pub type ClipboardFn = fn(&str) -> io::Result<()>;

/// Main application state
pub struct App {
    pub session: Session,
    /// Live feed from the store; `None` when driven manually (tests)
    pub subscription: Option<Subscription>,
    /// View-model derived from the session after every change
    pub board: BoardView,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub form: Form,
    pub autocomplete: Option<Autocomplete>,
    pub confirm_state: Option<ConfirmState>,
    pub alert: Option<String>,
    /// Index of the selected row across all cards
    pub cursor: usize,
    /// First visible line of the board
    pub scroll_offset: usize,
    pub copied: Option<CopyFlash>,
    pub status_message: Option<String>,
    pub show_help: bool,
    pub show_key_hints: bool,
    /// No snapshot has arrived yet
    pub loading: bool,
    pub document_path: Option<PathBuf>,
    pub clipboard: ClipboardFn,
}

impl App {
    pub fn new(session: Session, theme: Theme) -> Self {
        let board = board::build(session.store(), session.editing());
        App {
            session,
            subscription: None,
            board,
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            form: Form::default(),
            autocomplete: None,
            confirm_state: None,
            alert: None,
            cursor: 0,
            scroll_offset: 0,
            copied: None,
            status_message: None,
            show_help: false,
            show_key_hints: true,
            loading: false,
            document_path: None,
            clipboard: clipboard::set,
        }
    }

    /// Re-derive the board and keep the cursor in range.
    pub fn refresh(&mut self) {
        self.board = board::build(self.session.store(), self.session.editing());
        let rows = self.board.row_count();
        self.cursor = if rows == 0 { 0 } else { self.cursor.min(rows - 1) };
    }

    /// Apply pending snapshots from the store. Returns true if anything arrived.
    pub fn apply_snapshots(&mut self) -> bool {
        let latest = match &self.subscription {
            Some(sub) => sub.latest(),
            None => None,
        };
        match latest {
            Some(snapshot) => {
                self.session.hydrate(snapshot);
                self.loading = false;
                self.refresh();
                if self.autocomplete.is_some() {
                    self.update_suggestions();
                }
                true
            }
            None => false,
        }
    }

    /// Expire the copy acknowledgment once its time is up.
    pub fn tick(&mut self, now: Instant) {
        if self.copied.is_some_and(|flash| now >= flash.until) {
            self.copied = None;
        }
    }

    pub fn primary_action(&self) -> PrimaryAction {
        board::primary_action(self.session.editing())
    }

    /// `(id, category)` of the row under the cursor
    pub fn selected(&self) -> Option<(CommentId, String)> {
        let (ci, ri) = self.board.locate_row(self.cursor)?;
        let card = &self.board.cards()[ci];
        Some((card.rows[ri].id, card.name.clone()))
    }

    /// Category of the card holding the cursor
    pub fn selected_category(&self) -> Option<String> {
        let (ci, _) = self.board.locate_row(self.cursor)?;
        Some(self.board.cards()[ci].name.clone())
    }

    // -----------------------------------------------------------------------
    // Form
    // -----------------------------------------------------------------------

    pub fn open_form(&mut self) {
        self.mode = Mode::Form;
        self.focus_field(self.form.focus);
    }

    pub fn focus_field(&mut self, field: Field) {
        self.form.focus = field;
        match field {
            Field::Category => self.update_suggestions(),
            Field::Text => self.autocomplete = None,
        }
    }

    /// Recompute suggestions from the category field. Hidden when nothing matches.
    pub fn update_suggestions(&mut self) {
        let entries = suggest(self.session.store(), &self.form.category.buffer);
        self.autocomplete = if entries.is_empty() {
            None
        } else {
            Some(Autocomplete {
                entries,
                selected: None,
            })
        };
    }

    /// Fill the category field with a suggestion and hide the list. Does not submit.
    pub fn pick_suggestion(&mut self, category: &str) {
        self.form.category.set(category);
        self.autocomplete = None;
    }

    /// Submit the form: add a comment, or apply the edit in progress.
    ///
    /// Once validation passes the mapping has changed, so the form is
    /// cleared even when the write back to the store fails.
    pub fn submit(&mut self) {
        let was_editing = self.session.is_editing();
        let result = self
            .session
            .submit(&self.form.text.buffer, &self.form.category.buffer);
        match result {
            Err(e) if e.is_store() => {
                self.finish_submit(was_editing);
                self.report(e);
            }
            Err(e) => self.report(e),
            Ok(outcome) => {
                self.status_message = None;
                self.finish_submit(was_editing);
                let (Submitted::Added(id) | Submitted::Updated(id)) = outcome;
                self.select_comment(id);
            }
        }
    }

    fn finish_submit(&mut self, was_update: bool) {
        self.form.clear();
        self.autocomplete = None;
        if was_update {
            self.mode = Mode::Navigate;
        }
        self.refresh();
    }

    /// Start editing the selected comment: pre-fill the form in Update mode.
    pub fn begin_edit(&mut self) {
        let Some((id, category)) = self.selected() else {
            return;
        };
        let Some(comment) = self.session.begin_edit(id, &category) else {
            return;
        };
        let text = comment.text.clone();
        self.form.text.set(&text);
        self.form.category.set(&category);
        self.form.focus = Field::Text;
        self.autocomplete = None;
        self.mode = Mode::Form;
        self.refresh();
    }

    /// Leave the form; an edit in progress is abandoned and the inputs reset.
    pub fn cancel_form(&mut self) {
        if self.session.is_editing() {
            self.session.cancel_edit();
            self.form.clear();
            self.refresh();
        }
        self.autocomplete = None;
        self.mode = Mode::Navigate;
    }

    // -----------------------------------------------------------------------
    // Row actions
    // -----------------------------------------------------------------------

    pub fn copy_selected(&mut self, now: Instant) {
        let Some((id, category)) = self.selected() else {
            return;
        };
        let Some(comment) = self.session.store().find(id, &category) else {
            return;
        };
        match (self.clipboard)(&comment.text) {
            Ok(()) => {
                self.copied = Some(CopyFlash {
                    id,
                    until: now + COPY_FLASH,
                });
            }
            Err(e) => {
                warn!(error = %e, "clipboard write failed");
                self.status_message = Some(format!("copy failed: {}", e));
            }
        }
    }

    pub fn request_delete_comment(&mut self) {
        if let Some((id, category)) = self.selected() {
            self.confirm_state = Some(ConfirmState {
                message: "Are you sure you want to delete this comment?".into(),
                action: ConfirmAction::DeleteComment { id, category },
            });
            self.mode = Mode::Confirm;
        }
    }

    pub fn request_delete_category(&mut self) {
        if let Some(category) = self.selected_category() {
            self.confirm_state = Some(ConfirmState {
                message: format!(
                    "Are you sure you want to delete the entire \"{}\" category and all its comments?",
                    category
                ),
                action: ConfirmAction::DeleteCategory { category },
            });
            self.mode = Mode::Confirm;
        }
    }

    /// Run the pending destructive action.
    pub fn confirm(&mut self) {
        let Some(state) = self.confirm_state.take() else {
            self.mode = Mode::Navigate;
            return;
        };
        self.mode = Mode::Navigate;
        let result = match &state.action {
            ConfirmAction::DeleteComment { id, category } => {
                self.session.delete_comment(*id, category).map(|_| ())
            }
            ConfirmAction::DeleteCategory { category } => {
                self.session.delete_category(category).map(|_| ())
            }
        };
        self.refresh();
        if let Err(e) = result {
            self.report(e);
        }
    }

    pub fn cancel_confirm(&mut self) {
        self.confirm_state = None;
        self.mode = Mode::Navigate;
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
        self.mode = Mode::Form;
    }

    // -----------------------------------------------------------------------
    // Cursor
    // -----------------------------------------------------------------------

    pub fn move_cursor(&mut self, delta: isize) {
        let rows = self.board.row_count();
        if rows == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, rows as isize - 1) as usize;
    }

    pub fn select_comment(&mut self, id: CommentId) {
        let mut n = 0;
        for card in self.board.cards() {
            for row in &card.rows {
                if row.id == id {
                    self.cursor = n;
                    return;
                }
                n += 1;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn report(&mut self, err: SessionError) {
        if err.is_validation() {
            self.alert = Some(err.to_string());
            self.mode = Mode::Alert;
        } else {
            // The in-memory change stands; show the failure and keep going
            self.status_message = Some(format!("error: {}", err));
            self.refresh();
        }
    }
}

/// Run the TUI application
pub fn run(project_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start = match project_dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };

    // A missing store configuration stops here, before the terminal is touched
    let workspace = config_io::find_workspace(&start)?;
    let mut app = build_app(&workspace)?;
    info!(document = %workspace.document.display(), "starting tui");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

/// Wire an app to the configured document. The first snapshot arrives through
/// the subscription, so the board starts in the loading state.
fn build_app(workspace: &Workspace) -> Result<App, Box<dyn std::error::Error>> {
    let store = workspace.file_store();
    let subscription = store.subscribe()?;
    let session = Session::new(Box::new(store));

    let mut app = App::new(session, Theme::from_config(&workspace.config.ui));
    app.show_key_hints = workspace.config.ui.show_key_hints;
    app.document_path = Some(workspace.document.clone());
    app.subscription = Some(subscription);
    app.loading = true;
    Ok(app)
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.apply_snapshots();
        app.tick(Instant::now());

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStore;
    use crate::tui::render::test_helpers::{app_on, app_with_comments, store_from};

    fn subscribed(mem: &MemoryStore) -> App {
        let mut app = app_on(mem);
        app.subscription = Some(mem.subscribe().unwrap());
        app.loading = true;
        app
    }

    #[test]
    fn first_snapshot_ends_loading() {
        let mem = MemoryStore::with_document(store_from(&[(1, "a", "bug")]));
        let mut app = subscribed(&mem);
        assert!(app.apply_snapshots());
        assert!(!app.loading);
        assert_eq!(app.board.row_count(), 1);
        assert!(!app.apply_snapshots());
    }

    #[test]
    fn external_write_replaces_board() {
        let mem = MemoryStore::with_document(store_from(&[(1, "a", "bug")]));
        let mut app = subscribed(&mem);
        app.apply_snapshots();

        mem.external_write(Some(store_from(&[(5, "b", "ui"), (6, "c", "ui")])));
        assert!(app.apply_snapshots());
        assert_eq!(app.selected(), Some((5, "ui".to_string())));
        assert!(!app.session.store().contains_category("bug"));
    }

    #[test]
    fn external_delete_clamps_cursor() {
        let mem = MemoryStore::with_document(store_from(&[
            (1, "a", "bug"),
            (2, "b", "bug"),
            (3, "c", "bug"),
        ]));
        let mut app = subscribed(&mem);
        app.apply_snapshots();
        app.cursor = 2;

        mem.external_write(None);
        app.apply_snapshots();
        assert_eq!(app.cursor, 0);
        assert_eq!(app.board, BoardView::Empty);
    }

    #[test]
    fn external_write_refreshes_open_suggestions() {
        let mem = MemoryStore::with_document(store_from(&[(1, "a", "bug")]));
        let mut app = subscribed(&mem);
        app.apply_snapshots();
        app.focus_field(Field::Category);
        app.mode = Mode::Form;

        mem.external_write(Some(store_from(&[(1, "a", "bug"), (2, "b", "docs")])));
        app.apply_snapshots();
        let names: Vec<_> = app
            .autocomplete
            .as_ref()
            .unwrap()
            .entries
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["bug", "docs"]);
    }

    #[test]
    fn copy_flash_expires() {
        let mut app = app_with_comments(&[(1, "fix login", "bug")]);
        let start = Instant::now();
        app.copy_selected(start);
        assert!(app.copied.is_some());

        app.tick(start + Duration::from_millis(500));
        assert!(app.copied.is_some());
        app.tick(start + COPY_FLASH);
        assert!(app.copied.is_none());
    }

    #[test]
    fn clipboard_failure_goes_to_status() {
        let mut app = app_with_comments(&[(1, "fix login", "bug")]);
        app.clipboard = |_| Err(io::Error::other("no clipboard"));
        app.copy_selected(Instant::now());
        assert!(app.copied.is_none());
        assert!(app.status_message.as_deref().unwrap().contains("no clipboard"));
    }

    #[test]
    fn failed_write_keeps_local_change_and_reports() {
        let mem = MemoryStore::new();
        let mut app = app_on(&mem);
        mem.set_fail_writes(true);
        app.form.text.set("fix login");
        app.form.category.set("bug");
        app.mode = Mode::Form;
        app.submit();

        assert_eq!(app.mode, Mode::Form);
        assert!(app.alert.is_none());
        assert_eq!(app.session.store().comment_count(), 1);
        assert!(app.status_message.as_deref().unwrap().starts_with("error:"));
        assert_eq!(app.form.text.buffer, "");
        assert_eq!(mem.writes(), 0);
    }

    #[test]
    fn failed_update_write_does_not_leave_a_resubmittable_form() {
        let mem = MemoryStore::with_document(store_from(&[(1, "fix login", "bug")]));
        let mut app = app_on(&mem);
        app.begin_edit();
        app.form.text.set("fix login page");
        mem.set_fail_writes(true);
        app.submit();

        assert!(!app.session.is_editing());
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.form.text.buffer, "");
        assert_eq!(app.form.category.buffer, "");
        assert!(app.status_message.as_deref().unwrap().starts_with("error:"));

        // Enter on the now-empty form only raises the validation alert
        mem.set_fail_writes(false);
        app.mode = Mode::Form;
        app.submit();
        assert_eq!(app.mode, Mode::Alert);
        assert_eq!(app.session.store().comment_count(), 1);
        assert_eq!(app.session.store().comments("bug").unwrap()[0].text, "fix login page");
    }

    #[test]
    fn submit_writes_through_to_store() {
        let mem = MemoryStore::new();
        let mut app = app_on(&mem);
        app.form.text.set("  fix login  ");
        app.form.category.set(" bug ");
        app.submit();

        let doc = mem.document().unwrap();
        assert_eq!(doc.comments("bug").unwrap()[0].text, "fix login");
        assert_eq!(mem.writes(), 1);
    }
}
