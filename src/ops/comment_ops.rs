use chrono::Utc;

use crate::model::comment::{Comment, CommentId, CommentStore};

/// Error type for comment operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentError {
    #[error("Please enter a comment!")]
    EmptyText,
    #[error("Please enter a category name!")]
    EmptyCategory,
    #[error("no comment is being edited")]
    NotEditing,
    #[error("comment ids are exhausted")]
    IdsExhausted,
}

/// Trim and check the two form inputs. Text is checked before category.
pub fn validate(text: &str, category: &str) -> Result<(String, String), CommentError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CommentError::EmptyText);
    }
    let category = category.trim();
    if category.is_empty() {
        return Err(CommentError::EmptyCategory);
    }
    Ok((text.to_string(), category.to_string()))
}

/// Hands out creation-time ids that never repeat within one clock.
#[derive(Debug, Clone, Default)]
pub struct IdClock {
    last: CommentId,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never hand out anything at or below `id` (e.g. the largest id already stored).
    pub fn observe(&mut self, id: CommentId) {
        self.last = self.last.max(id);
    }

    pub fn next_id(&mut self) -> Result<CommentId, CommentError> {
        self.next_at(Utc::now().timestamp_millis())
    }

    /// Fails once `i64::MAX` has been handed out or observed.
    fn next_at(&mut self, now_ms: CommentId) -> Result<CommentId, CommentError> {
        let floor = self.last.checked_add(1).ok_or(CommentError::IdsExhausted)?;
        let id = now_ms.max(floor);
        self.last = id;
        Ok(id)
    }
}

/// Append a comment to the end of its category, creating the category if absent.
pub fn append(store: &mut CommentStore, comment: Comment) {
    let category = comment.category.clone();
    store.entry(&category).push(comment);
}

/// Remove a comment from `category`. Drops the category once its list is empty.
/// Returns `None` (and leaves the store untouched) if the id isn't in that list.
pub fn remove(store: &mut CommentStore, id: CommentId, category: &str) -> Option<Comment> {
    let list = store.comments_mut(category)?;
    let idx = list.iter().position(|c| c.id == id)?;
    let removed = list.remove(idx);
    if list.is_empty() {
        store.remove_category(category);
    }
    Some(removed)
}

/// Replace a comment's text and category, relocating it to the end of `new_category`.
///
/// The comment is located by id across all categories. Its old category is
/// dropped when emptied, unless it is `new_category` itself. A comment that is
/// no longer present anywhere is still appended under `new_category`.
///
/// Returns the category that held the comment, if any.
pub fn move_comment(
    store: &mut CommentStore,
    id: CommentId,
    text: &str,
    new_category: &str,
) -> Option<String> {
    let old_category = store.find_anywhere(id).map(|(name, _)| name.to_string());

    if let Some(old) = &old_category
        && let Some(list) = store.comments_mut(old)
    {
        list.retain(|c| c.id != id);
        if list.is_empty() && old != new_category {
            store.remove_category(old);
        }
    }

    append(store, Comment::new(id, text, new_category));
    old_category
}

/// Delete a category and every comment in it.
pub fn delete_category(store: &mut CommentStore, category: &str) -> Option<Vec<Comment>> {
    store.remove_category(category)
}
