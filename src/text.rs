//! Line-level text utilities.
//!
//! Every text that flows through the engine is addressed by zero-based line
//! numbers. A text is split on `'\n'`, and the empty string holds zero lines,
//! which is how an empty span (a pure deletion site) is represented.
//!
//! - [`normalize_line_endings`] folds `\r\n` and lone `\r` into `\n`
//! - [`LineSpan`] is the half-open `[start, end)` span a region occupies
//! - [`LineEdit`] describes how an edit moved the lines after it

mod edit;
mod lines;
mod span;

pub use edit::LineEdit;
pub use lines::{
    join_lines, line_count, normalize_line_endings, replace_span, split_lines,
};
pub use span::LineSpan;
