use serde::Serialize;

use super::LineEdit;

/// Half-open `[start, end)` line span. `start == end` is an empty span
/// anchored at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "LineSpan start {start} is after end {end}");
        Self { start, end }
    }

    pub fn empty_at(line: usize) -> Self {
        Self::new(line, line)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether two spans claim any of the same lines.
    ///
    /// Adjacent spans do not overlap. An empty span overlaps a non-empty one
    /// only when it sits strictly inside it, and two empty spans overlap when
    /// they are anchored at the same line.
    pub fn overlaps(&self, other: &LineSpan) -> bool {
        if self.is_empty() && other.is_empty() {
            return self.start == other.start;
        }
        self.start < other.end && other.start < self.end
    }

    /// Re-anchor this span after `edit` was applied to the document.
    ///
    /// Spans starting at or after the edit move by the full delta. A span the
    /// edit lands inside absorbs it, so hand edits inside a region widen or
    /// narrow that region instead of shifting it; that includes lines split
    /// off the span's last line. Deleted lines collapse onto the edit position.
    pub fn after_edit(self, edit: LineEdit) -> LineSpan {
        let start_line = edit.start_line;
        if edit.line_delta > 0 {
            let inserted = edit.line_delta.unsigned_abs();
            if self.start >= start_line {
                LineSpan::new(self.start + inserted, self.end + inserted)
            } else if self.end > start_line || (edit.continues_previous && self.end == start_line) {
                LineSpan::new(self.start, self.end + inserted)
            } else {
                self
            }
        } else if edit.line_delta < 0 {
            let removed = edit.line_delta.unsigned_abs();
            let deleted_end = start_line + removed;
            let map = |line: usize| {
                if line <= start_line {
                    line
                } else if line >= deleted_end {
                    line - removed
                } else {
                    start_line
                }
            };
            LineSpan::new(map(self.start), map(self.end))
        } else {
            self
        }
    }

    /// Shrink the span so it fits inside a document of `line_count` lines.
    pub fn clamp_to(self, line_count: usize) -> LineSpan {
        let end = self.end.min(line_count);
        LineSpan::new(self.start.min(end), end)
    }
}

impl std::fmt::Display for LineSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
