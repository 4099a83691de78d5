use crate::model::comment::CommentStore;

/// One autocomplete entry: a category and how many comments it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub name: String,
    pub count: usize,
}

/// Categories whose name contains `input` (case-insensitive), most used first.
///
/// Empty input matches every category. Ties keep mapping order. An empty
/// result means the suggestion list should be hidden.
pub fn suggest(store: &CommentStore, input: &str) -> Vec<Suggestion> {
    let needle = input.trim().to_lowercase();
    let mut matches: Vec<Suggestion> = store
        .iter()
        .filter(|(name, _)| needle.is_empty() || name.to_lowercase().contains(&needle))
        .map(|(name, comments)| Suggestion {
            name: name.to_string(),
            count: comments.len(),
        })
        .collect();
    // sort_by is stable, so equal counts stay in mapping order
    matches.sort_by(|a, b| b.count.cmp(&a.count));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::comment::Comment;
    use pretty_assertions::assert_eq;

    fn store() -> CommentStore {
        vec![
            Comment::new(1, "a", "Docs"),
            Comment::new(2, "b", "bug"),
            Comment::new(3, "c", "bug"),
            Comment::new(4, "d", "ui"),
            Comment::new(5, "e", "Debugging"),
            Comment::new(6, "f", "bug"),
            Comment::new(7, "g", "Debugging"),
        ]
        .into_iter()
        .collect()
    }

    fn names(list: &[Suggestion]) -> Vec<&str> {
        list.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn empty_input_lists_all_by_count() {
        let result = suggest(&store(), "");
        assert_eq!(names(&result), vec!["bug", "Debugging", "Docs", "ui"]);
        assert_eq!(result[0].count, 3);
        assert_eq!(result[1].count, 2);
    }

    #[test]
    fn matches_substring_case_insensitively() {
        let result = suggest(&store(), " BUG ");
        assert_eq!(names(&result), vec!["bug", "Debugging"]);
    }

    #[test]
    fn ties_keep_mapping_order() {
        let result = suggest(&store(), "");
        // Docs and ui both have one comment; Docs was inserted first
        assert_eq!(names(&result[2..]), vec!["Docs", "ui"]);
    }

    #[test]
    fn no_match_is_empty() {
        assert!(suggest(&store(), "xyz").is_empty());
    }

    #[test]
    fn empty_store_is_empty() {
        assert!(suggest(&CommentStore::new(), "").is_empty());
    }
}
