use crate::text::{LineEdit, LineSpan, line_count, normalize_line_endings, replace_span};

use super::MutationError;

/// An open document buffer.
pub struct Document {
    text: String,
    version: i32,
    read_only: bool,
}

impl Document {
    /// Create a new writable document. Line endings are normalized.
    pub fn new(text: &str) -> Self {
        Self {
            text: normalize_line_endings(text).into_owned(),
            version: 0,
            read_only: false,
        }
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Incremented on every successful write
    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn line_count(&self) -> usize {
        line_count(&self.text)
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Replace the lines in `span`, returning the span the new text covers
    /// and the resulting line movement.
    pub fn replace_lines(
        &mut self,
        span: LineSpan,
        text: &str,
    ) -> Result<(LineSpan, LineEdit), MutationError> {
        if self.read_only {
            return Err(MutationError::ReadOnly);
        }
        let replacement = normalize_line_endings(text);
        let (new_text, covered) =
            replace_span(&self.text, span, &replacement).ok_or(MutationError::SpanOutOfBounds {
                span,
                line_count: self.line_count(),
            })?;

        self.text = new_text;
        self.version += 1;
        Ok((covered, LineEdit::from_replacement(span, covered.len())))
    }

    pub fn set_text(&mut self, text: &str) -> Result<(), MutationError> {
        if self.read_only {
            return Err(MutationError::ReadOnly);
        }
        self.text = normalize_line_endings(text).into_owned();
        self.version += 1;
        Ok(())
    }
}
