use serde::Serialize;

use crate::model::comment::{Comment, CommentId, CommentStore};
use crate::ops::suggest::Suggestion;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct CategoryJson<'a> {
    pub name: &'a str,
    pub count: usize,
    pub comments: &'a [Comment],
}

#[derive(Serialize)]
pub struct SuggestionJson<'a> {
    pub name: &'a str,
    pub count: usize,
}

#[derive(Serialize)]
pub struct MutationJson {
    pub id: CommentId,
    pub category: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn categories_to_json<'a>(
    store: &'a CommentStore,
    only: Option<&str>,
) -> Vec<CategoryJson<'a>> {
    store
        .iter()
        .filter(|(name, _)| only.is_none_or(|o| o == *name))
        .map(|(name, comments)| CategoryJson {
            name,
            count: comments.len(),
            comments,
        })
        .collect()
}

pub fn suggestions_to_json(list: &[Suggestion]) -> Vec<SuggestionJson<'_>> {
    list.iter()
        .map(|s| SuggestionJson {
            name: &s.name,
            count: s.count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Categories as an indented outline:
///
/// ```text
/// bug (2)
///   1718000000000  fix login
///   1718000000001  crash on save
/// ```
pub fn format_categories(store: &CommentStore, only: Option<&str>) -> String {
    let mut out = String::new();
    for (name, comments) in store.iter() {
        if only.is_some_and(|o| o != name) {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("{} ({})\n", name, comments.len()));
        for c in comments {
            out.push_str(&format!("  {}  {}\n", c.id, c.text));
        }
    }
    out
}

pub fn format_suggestions(list: &[Suggestion]) -> String {
    let width = list.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for s in list {
        out.push_str(&format!("{:<width$}  {}\n", s.name, s.count, width = width));
    }
    out
}
