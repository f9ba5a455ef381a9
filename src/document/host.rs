//! The seam between the engine and the live document buffer.
//!
//! The editor shell owns document text; the engine only reads it during
//! reconciliation and writes it when a region is rejected or a proposed
//! rewrite is applied. Both happen synchronously within one logical step.

use thiserror::Error;
use url::Url;

use crate::text::LineSpan;

/// Why the live document could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("document is closed")]
    Closed,

    #[error("document is read-only")]
    ReadOnly,

    #[error("span {span} is outside a document of {line_count} lines")]
    SpanOutOfBounds { span: LineSpan, line_count: usize },
}

/// Read and write access to live documents, keyed by document URI.
///
/// Implementations must be immediately consistent: text written by
/// [`DocumentHost::replace_lines`] is what the next [`DocumentHost::text`]
/// returns.
pub trait DocumentHost {
    /// Full text of an open document with line endings normalized to `\n`.
    fn text(&self, uri: &Url) -> Option<String>;

    /// Replace the lines in `span` with `text`, returning the span the new
    /// text now occupies.
    fn replace_lines(&self, uri: &Url, span: LineSpan, text: &str) -> Result<LineSpan, MutationError>;

    /// Replace the whole document.
    fn set_text(&self, uri: &Url, text: &str) -> Result<(), MutationError>;
}
