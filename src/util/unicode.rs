//! Terminal-cell measurements and grapheme-aware cursor math for the form
//! inputs and the board rows.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const TAB_WIDTH: usize = 4;
const ELLIPSIS: char = '\u{2026}';

fn grapheme_width(g: &str) -> usize {
    if g == "\t" { TAB_WIDTH } else { g.width() }
}

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

/// Fit `s` into `max_cells`, ending with `…` when something was cut.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let w = grapheme_width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push(ELLIPSIS);
    out
}

/// Byte offset of the grapheme after the one at `at`; `None` at the end.
pub fn next_grapheme_boundary(s: &str, at: usize) -> Option<usize> {
    let g = s.get(at..)?.graphemes(true).next()?;
    Some(at + g.len())
}

/// Byte offset of the grapheme before `at`; `None` at the start.
pub fn prev_grapheme_boundary(s: &str, at: usize) -> Option<usize> {
    let g = s.get(..at)?.graphemes(true).next_back()?;
    Some(at - g.len())
}

/// Cells occupied by `s[..at]`.
pub fn byte_offset_to_display_col(s: &str, at: usize) -> usize {
    display_width(&s[..at.min(s.len())])
}

/// Byte offset of the grapheme covering cell `col`. A column inside a wide
/// grapheme snaps to its start; past the end yields `s.len()`.
pub fn display_col_to_byte_offset(s: &str, col: usize) -> usize {
    let mut used = 0;
    for (i, g) in s.grapheme_indices(true) {
        used += grapheme_width(g);
        if used > col {
            return i;
        }
    }
    s.len()
}

/// Start of the word before `at`, skipping whitespace first (Ctrl-W).
pub fn word_boundary_left(s: &str, at: usize) -> usize {
    let prefix = &s[..at.min(s.len())];
    let trimmed = prefix.trim_end();
    match trimmed.rfind(char::is_whitespace) {
        Some(i) => {
            // Step past the whitespace character itself
            i + trimmed[i..].chars().next().map_or(1, char::len_utf8)
        }
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(display_width("fix login"), 9);
        assert_eq!(display_width("修正"), 4);
        assert_eq!(display_width("cafe\u{0301}"), 4);
        assert_eq!(display_width("a\tb"), 6);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate_to_width("bug", 10), "bug");
        assert_eq!(truncate_to_width("align header", 8), "align h\u{2026}");
        assert_eq!(truncate_to_width("修正する", 5), "修正\u{2026}");
        assert_eq!(truncate_to_width("bug", 1), "\u{2026}");
        assert_eq!(truncate_to_width("bug", 0), "");
    }

    #[test]
    fn grapheme_steps() {
        let s = "cafe\u{0301}!";
        assert_eq!(next_grapheme_boundary(s, 3), Some(6));
        assert_eq!(prev_grapheme_boundary(s, 6), Some(3));
        assert_eq!(next_grapheme_boundary(s, s.len()), None);
        assert_eq!(prev_grapheme_boundary(s, 0), None);

        let family = "👨\u{200D}👩\u{200D}👧";
        assert_eq!(next_grapheme_boundary(family, 0), Some(family.len()));
    }

    #[test]
    fn column_conversions() {
        assert_eq!(byte_offset_to_display_col("修正", 3), 2);
        assert_eq!(display_col_to_byte_offset("修正", 2), 3);
        assert_eq!(display_col_to_byte_offset("修正", 1), 0);
        assert_eq!(display_col_to_byte_offset("ok", 10), 2);
    }

    #[test]
    fn word_left() {
        let s = "fix the  login";
        assert_eq!(word_boundary_left(s, s.len()), 9);
        assert_eq!(word_boundary_left(s, 9), 4);
        assert_eq!(word_boundary_left(s, 3), 0);
        assert_eq!(word_boundary_left("", 0), 0);
    }
}
