//! Pure view-model for the comment board.
//!
//! Everything a presentation layer needs to draw the board is derived here
//! from the comment mapping and the edit state. Nothing in this module
//! touches a terminal.

use crate::model::comment::{CommentId, CommentStore};

/// Number of category colors. Cards cycle through them by alphabetical rank.
pub const PALETTE_SIZE: usize = 8;

pub const EMPTY_BOARD_MESSAGE: &str = "Create your first comment to get started!";
pub const EMPTY_CARD_MESSAGE: &str = "No comments yet";

/// Label of the form's primary action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    Add,
    Update,
}

impl PrimaryAction {
    pub fn label(self) -> &'static str {
        match self {
            PrimaryAction::Add => "Add Comment",
            PrimaryAction::Update => "Update Comment",
        }
    }
}

/// Primary action for the current edit state.
pub fn primary_action(editing: Option<CommentId>) -> PrimaryAction {
    if editing.is_some() {
        PrimaryAction::Update
    } else {
        PrimaryAction::Add
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: CommentId,
    pub text: String,
    /// This row is the comment currently being edited
    pub editing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub name: String,
    /// Index into the category palette
    pub color_index: usize,
    pub count: usize,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardView {
    /// No categories at all
    Empty,
    Cards(Vec<CardView>),
}

impl BoardView {
    pub fn cards(&self) -> &[CardView] {
        match self {
            BoardView::Empty => &[],
            BoardView::Cards(cards) => cards,
        }
    }

    /// Total number of comment rows across all cards.
    pub fn row_count(&self) -> usize {
        self.cards().iter().map(|c| c.rows.len()).sum()
    }

    /// `(card index, row index)` of the `n`th row in reading order.
    pub fn locate_row(&self, n: usize) -> Option<(usize, usize)> {
        let mut remaining = n;
        for (ci, card) in self.cards().iter().enumerate() {
            if remaining < card.rows.len() {
                return Some((ci, remaining));
            }
            remaining -= card.rows.len();
        }
        None
    }
}

/// Palette slot for `category`: its rank among all category names sorted
/// alphabetically, modulo the palette size.
///
/// Adding or removing a category can shift every later category to a new
/// color. Categories not in the store get slot 0.
pub fn color_index(store: &CommentStore, category: &str) -> usize {
    let mut names: Vec<&str> = store.category_names().collect();
    names.sort_unstable();
    names
        .iter()
        .position(|n| *n == category)
        .map_or(0, |rank| rank % PALETTE_SIZE)
}

/// Derive the board from the mapping. Cards follow mapping order.
pub fn build(store: &CommentStore, editing: Option<CommentId>) -> BoardView {
    if store.is_empty() {
        return BoardView::Empty;
    }

    let mut sorted: Vec<&str> = store.category_names().collect();
    sorted.sort_unstable();

    let cards = store
        .iter()
        .map(|(name, comments)| {
            let rank = sorted.binary_search(&name).unwrap_or(0);
            CardView {
                name: name.to_string(),
                color_index: rank % PALETTE_SIZE,
                count: comments.len(),
                rows: comments
                    .iter()
                    .map(|c| RowView {
                        id: c.id,
                        text: c.text.clone(),
                        editing: editing == Some(c.id),
                    })
                    .collect(),
            }
        })
        .collect();

    BoardView::Cards(cards)
}
