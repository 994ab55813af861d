//! Source comments attached to the chunk stream.

#[derive(Debug, Clone)]
pub struct SourceComment {
    pub text: String,
    pub lines_before: usize,
    pub is_line_comment: bool,
    /// A block comment with no newlines before or inside it.
    pub is_inline: bool,
    pub flush_left: bool,
    pub selection_start: Option<usize>,
    pub selection_end: Option<usize>,
}

impl SourceComment {
    pub fn line(text: impl Into<String>, lines_before: usize) -> Self {
        Self {
            text: text.into(),
            lines_before,
            is_line_comment: true,
            is_inline: false,
            flush_left: false,
            selection_start: None,
            selection_end: None,
        }
    }

    pub fn block(text: impl Into<String>, lines_before: usize) -> Self {
        let text = text.into();
        let is_inline = !text.contains('\n');
        Self {
            text,
            lines_before,
            is_line_comment: false,
            is_inline,
            flush_left: false,
            selection_start: None,
            selection_end: None,
        }
    }

    pub fn is_multiline(&self) -> bool {
        self.text.contains('\n')
    }
}
