use std::ops::Range;

use similar::{Algorithm, DiffTag, capture_diff_slices};

use super::{LineSpan, split_lines};

/// How an edit moved the lines of a document.
///
/// A positive `line_delta` inserts lines at `start_line`; a negative one
/// deletes the lines `[start_line, start_line - line_delta)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEdit {
    pub start_line: usize,
    pub line_delta: isize,
    /// Inserted lines continue the edited line just above `start_line`, so a
    /// span ending at `start_line` grows with them instead of stopping short.
    pub continues_previous: bool,
}

impl LineEdit {
    pub fn new(start_line: usize, line_delta: isize) -> Self {
        Self {
            start_line,
            line_delta,
            continues_previous: false,
        }
    }

    /// Line movement caused by replacing the lines in `span` with
    /// `new_len` lines.
    ///
    /// Growth is attributed to the end of the replaced span and shrinkage to
    /// its tail, so lines in front of the replaced block never move.
    pub fn from_replacement(span: LineSpan, new_len: usize) -> Self {
        let old_len = span.len();
        if new_len >= old_len {
            Self {
                start_line: span.end,
                line_delta: (new_len - old_len) as isize,
                continues_previous: old_len > 0,
            }
        } else {
            Self::new(span.start + new_len, -((old_len - new_len) as isize))
        }
    }

    /// Reconstruct the line edits that turn `old_text` into `new_text`.
    ///
    /// Used when the shell only reports the new document text. Changed lines
    /// between two unchanged runs form one hunk, and each hunk becomes one
    /// [`LineEdit::from_replacement`] in the coordinates left by the hunks
    /// before it, so the edits apply in order. Hunks that keep their line
    /// count are dropped. Empty when nothing moved.
    pub fn between(old_text: &str, new_text: &str) -> Vec<Self> {
        if old_text == new_text {
            return Vec::new();
        }

        let old_lines = split_lines(old_text);
        let new_lines = split_lines(new_text);
        let ops = capture_diff_slices(Algorithm::Myers, &old_lines, &new_lines);

        let mut edits = Vec::new();
        // (old line count, new range) of the hunk being collected
        let mut hunk: Option<(usize, Range<usize>)> = None;
        for op in &ops {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            if tag == DiffTag::Equal {
                edits.extend(hunk.take().map(Self::from_hunk));
                continue;
            }
            hunk = Some(match hunk {
                None => (old_range.len(), new_range),
                Some((old_len, new)) => (old_len + old_range.len(), new.start..new_range.end),
            });
        }
        edits.extend(hunk.map(Self::from_hunk));

        edits.retain(|edit| !edit.is_noop());
        edits
    }

    /// Every hunk before this one has already been applied, so its old lines
    /// start where its new lines do.
    fn from_hunk((old_len, new): (usize, Range<usize>)) -> Self {
        Self::from_replacement(LineSpan::new(new.start, new.start + old_len), new.len())
    }

    pub fn is_noop(&self) -> bool {
        self.line_delta == 0
    }
}
