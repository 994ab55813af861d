//! Column tracking. A chunk's text is usually a single token with no
//! embedded newline, but multiline block comments can carry one; the
//! column after writing such text is the display width of whatever
//! follows the last embedded newline, not the whole string.

use unicode_width::UnicodeWidthStr;

pub fn advance_column(current: usize, text: &str) -> usize {
    match text.rfind('\n') {
        Some(idx) => UnicodeWidthStr::width(&text[idx + 1..]),
        None => current + UnicodeWidthStr::width(text),
    }
}
