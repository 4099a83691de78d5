use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Identifier of a comment: its creation time in milliseconds since the epoch.
pub type CommentId = i64;

/// A single free-text comment, owned by exactly one category list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    /// Name of the owning category. Kept in sync with the list holding it.
    pub category: String,
}

impl Comment {
    pub fn new(id: CommentId, text: impl Into<String>, category: impl Into<String>) -> Self {
        Comment {
            id,
            text: text.into(),
            category: category.into(),
        }
    }
}

/// The whole persisted state: category name → ordered comment list.
///
/// Category order is key insertion order; comment order within a category is
/// append order. Serializes as a plain JSON object of arrays, which is the
/// document layout shared by every client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentStore {
    categories: IndexMap<String, Vec<Comment>>,
}

impl CommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Number of categories (keys), not comments.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn comment_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Category names in mapping order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// `(name, comments)` pairs in mapping order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Comment])> {
        self.categories
            .iter()
            .map(|(name, list)| (name.as_str(), list.as_slice()))
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    pub fn comments(&self, category: &str) -> Option<&[Comment]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    pub(crate) fn comments_mut(&mut self, category: &str) -> Option<&mut Vec<Comment>> {
        self.categories.get_mut(category)
    }

    /// The list for `category`, created empty at the end of the mapping if absent.
    pub(crate) fn entry(&mut self, category: &str) -> &mut Vec<Comment> {
        self.categories.entry(category.to_string()).or_default()
    }

    /// Remove a category key, keeping the relative order of the others.
    pub(crate) fn remove_category(&mut self, category: &str) -> Option<Vec<Comment>> {
        self.categories.shift_remove(category)
    }

    pub fn find(&self, id: CommentId, category: &str) -> Option<&Comment> {
        self.categories.get(category)?.iter().find(|c| c.id == id)
    }

    /// Search every category for `id`, returning the holding category and the comment.
    pub fn find_anywhere(&self, id: CommentId) -> Option<(&str, &Comment)> {
        self.categories.iter().find_map(|(name, list)| {
            list.iter()
                .find(|c| c.id == id)
                .map(|comment| (name.as_str(), comment))
        })
    }

    /// Largest id present in the store, if any.
    pub fn max_id(&self) -> Option<CommentId> {
        self.categories.values().flatten().map(|c| c.id).max()
    }
}

impl FromIterator<Comment> for CommentStore {
    /// Group comments by their `category` field, in first-seen order.
    fn from_iter<I: IntoIterator<Item = Comment>>(iter: I) -> Self {
        let mut store = CommentStore::new();
        for comment in iter {
            let category = comment.category.clone();
            store.entry(&category).push(comment);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> CommentStore {
        vec![
            Comment::new(1, "fix login", "bug"),
            Comment::new(2, "align header", "ui"),
            Comment::new(3, "crash on save", "bug"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn from_iter_groups_in_first_seen_order() {
        let store = sample();
        assert_eq!(store.category_names().collect::<Vec<_>>(), vec!["bug", "ui"]);
        let ids: Vec<_> = store.comments("bug").unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(store.comment_count(), 3);
    }

    #[test]
    fn serializes_as_object_of_arrays() {
        let store = sample();
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "bug": [
                    {"id": 1, "text": "fix login", "category": "bug"},
                    {"id": 3, "text": "crash on save", "category": "bug"}
                ],
                "ui": [
                    {"id": 2, "text": "align header", "category": "ui"}
                ]
            })
        );
    }

    #[test]
    fn deserialize_preserves_key_order() {
        let json = r#"{"zeta":[{"id":5,"text":"z","category":"zeta"}],"alpha":[{"id":6,"text":"a","category":"alpha"}]}"#;
        let store: CommentStore = serde_json::from_str(json).unwrap();
        assert_eq!(
            store.category_names().collect::<Vec<_>>(),
            vec!["zeta", "alpha"]
        );
    }

    #[test]
    fn find_anywhere_ignores_stored_category_field() {
        let mut store = CommentStore::new();
        // Pathological: comment filed under "ui" but claims "bug"
        store.entry("ui").push(Comment::new(9, "stray", "bug"));
        assert!(store.find(9, "bug").is_none());
        let (holder, comment) = store.find_anywhere(9).unwrap();
        assert_eq!(holder, "ui");
        assert_eq!(comment.text, "stray");
    }

    #[test]
    fn remove_category_keeps_order() {
        let mut store = sample();
        store.entry("docs").push(Comment::new(4, "readme", "docs"));
        store.remove_category("ui");
        assert_eq!(
            store.category_names().collect::<Vec<_>>(),
            vec!["bug", "docs"]
        );
    }

    #[test]
    fn max_id() {
        assert_eq!(sample().max_id(), Some(3));
        assert_eq!(CommentStore::new().max_id(), None);
    }
}
