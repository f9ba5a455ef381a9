use url::Url;

use super::RegionId;
use crate::diff::{DiffKind, DiffSegment, DiffStats};
use crate::text::{LineSpan, join_lines, split_lines};

/// One pending proposed change.
///
/// `original_text` is the snapshot the proposal replaced and the only thing
/// a reject restores. `current_text` and `segments` are a cache of the live
/// span as of the last refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRegion {
    id: RegionId,
    document: Url,
    span: LineSpan,
    original_text: String,
    current_text: String,
    segments: Vec<DiffSegment>,
}

impl DiffRegion {
    pub(crate) fn new(id: RegionId, document: Url, span: LineSpan, original_text: String) -> Self {
        Self {
            id,
            document,
            span,
            original_text,
            current_text: String::new(),
            segments: Vec::new(),
        }
    }

    pub fn id(&self) -> RegionId {
        self.id
    }

    pub fn document(&self) -> &Url {
        &self.document
    }

    pub fn span(&self) -> LineSpan {
        self.span
    }

    pub fn start_line(&self) -> usize {
        self.span.start
    }

    pub fn end_line(&self) -> usize {
        self.span.end
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    pub fn segments(&self) -> &[DiffSegment] {
        &self.segments
    }

    pub fn stats(&self) -> DiffStats {
        DiffStats::from_segments(&self.segments)
    }

    /// Text a segment stands for, taken from the side it lives on.
    pub fn segment_text(&self, segment: &DiffSegment) -> String {
        match segment.kind {
            DiffKind::Removed => {
                let lines = split_lines(&self.original_text);
                lines.get(segment.original.clone()).map(join_lines).unwrap_or_default()
            }
            DiffKind::Unchanged | DiffKind::Added => {
                let lines = split_lines(&self.current_text);
                lines.get(segment.current.clone()).map(join_lines).unwrap_or_default()
            }
        }
    }

    pub(crate) fn set_span(&mut self, span: LineSpan) {
        self.span = span;
    }

    pub(crate) fn set_current(&mut self, current_text: String, segments: Vec<DiffSegment>) {
        self.current_text = current_text;
        self.segments = segments;
    }
}
