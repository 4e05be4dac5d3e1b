//! Title text helpers: sanitizing and display-width fitting.

use emojis::get as emoji_get;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

use crate::core::line_buffer::REPLACEMENT_MARKER;

pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_empty() {
        return 0;
    }
    if emoji_get(grapheme).is_some() {
        return 2;
    }
    grapheme
        .chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

/// Replace control characters so a title can never inject escape sequences.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|ch| {
            if ch.is_control() {
                REPLACEMENT_MARKER as char
            } else {
                ch
            }
        })
        .collect()
}

/// Truncate `text` to at most `max_width` display columns on grapheme
/// boundaries. Returns the kept prefix and its width.
pub fn fit_to_width(text: &str, max_width: usize) -> (&str, usize) {
    let mut width = 0;
    let mut end = 0;
    for (idx, grapheme) in text.grapheme_indices(true) {
        let next = width + grapheme_width(grapheme);
        if next > max_width {
            break;
        }
        width = next;
        end = idx + grapheme.len();
    }
    (&text[..end], width)
}

#[cfg(test)]
mod tests {
    use super::{fit_to_width, grapheme_width, sanitize_title};

    #[test]
    fn sanitize_replaces_escape_and_newline() {
        assert_eq!(sanitize_title("a\x1b[31mb\n"), "a?[31mb?");
        assert_eq!(sanitize_title("plain"), "plain");
    }

    #[test]
    fn fit_keeps_short_text() {
        assert_eq!(fit_to_width("build", 10), ("build", 5));
    }

    #[test]
    fn fit_truncates_ascii_at_limit() {
        assert_eq!(fit_to_width("compile", 4), ("comp", 4));
        assert_eq!(fit_to_width("compile", 0), ("", 0));
    }

    #[test]
    fn fit_never_splits_wide_graphemes() {
        // Each CJK character is two columns wide.
        assert_eq!(fit_to_width("日本語", 5), ("日本", 4));
        assert_eq!(grapheme_width("日"), 2);
    }

    #[test]
    fn combining_marks_stay_with_their_base() {
        let text = "e\u{301}x";
        assert_eq!(fit_to_width(text, 1), ("e\u{301}", 1));
    }
}
