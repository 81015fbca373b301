use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 1 {
        return "\u{2026}".to_string();
    }
    let budget = max_cells - 1; // reserve 1 cell for '…'
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = display_width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// Pad `s` with spaces on the right up to `cells` terminal cells.
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let w = display_width(s);
    if w >= cells {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + cells - w);
    out.push_str(s);
    out.extend(std::iter::repeat_n(' ', cells - w));
    out
}

/// Next grapheme boundary after `byte_offset`. Returns None if at end.
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset >= s.len() {
        return None;
    }
    if let Some((i, _)) = s[byte_offset..].grapheme_indices(true).nth(1) {
        return Some(byte_offset + i);
    }
    Some(s.len())
}

/// Previous grapheme boundary before `byte_offset`. Returns None if at start.
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset == 0 {
        return None;
    }
    s[..byte_offset]
        .grapheme_indices(true)
        .next_back()
        .map(|(i, _)| i)
}

/// Greedy word wrap into lines no wider than `width` cells.
/// Words longer than the width are hard-split on grapheme boundaries.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_w = 0;
        for word in paragraph.split_whitespace() {
            let ww = display_width(word);
            if ww > width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_w = 0;
                }
                for g in word.graphemes(true) {
                    let gw = display_width(g);
                    if line_w + gw > width {
                        lines.push(std::mem::take(&mut line));
                        line_w = 0;
                    }
                    line.push_str(g);
                    line_w += gw;
                }
                continue;
            }
            let needed = if line.is_empty() { ww } else { ww + 1 };
            if line_w + needed > width {
                lines.push(std::mem::take(&mut line));
                line_w = 0;
            }
            if !line.is_empty() {
                line.push(' ');
                line_w += 1;
            }
            line.push_str(word);
            line_w += ww;
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_fits_unchanged() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello", 5), "hello");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate_to_width("hello world", 6), "hello\u{2026}");
        assert_eq!(truncate_to_width("hello", 1), "\u{2026}");
        assert_eq!(truncate_to_width("hello", 0), "");
    }

    #[test]
    fn truncate_respects_wide_chars() {
        // Each CJK char is 2 cells
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本\u{2026}");
    }

    #[test]
    fn pad_extends_to_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("abcd", 2), "abcd");
    }

    #[test]
    fn grapheme_boundaries_step_over_combining_marks() {
        let s = "e\u{301}x"; // é as e + combining acute, then x
        assert_eq!(next_grapheme_boundary(s, 0), Some(3));
        assert_eq!(next_grapheme_boundary(s, 3), Some(4));
        assert_eq!(next_grapheme_boundary(s, 4), None);
        assert_eq!(prev_grapheme_boundary(s, 4), Some(3));
        assert_eq!(prev_grapheme_boundary(s, 3), Some(0));
        assert_eq!(prev_grapheme_boundary(s, 0), None);
    }

    #[test]
    fn wrap_breaks_on_spaces() {
        assert_eq!(
            wrap_words("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn wrap_hard_splits_long_words() {
        assert_eq!(wrap_words("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_keeps_explicit_newlines() {
        assert_eq!(wrap_words("a\nb", 10), vec!["a", "b"]);
    }
}
