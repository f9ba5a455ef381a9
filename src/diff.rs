//! Line-level diffing between a region's original snapshot and its live text.
//!
//! Alignment uses Myers' algorithm from the `similar` crate over line slices.
//! Lines compare by literal string equality, so callers normalize line
//! endings first (see [`crate::text::normalize_line_endings`]).

use std::ops::Range;

use serde::Serialize;
use similar::{Algorithm, DiffTag, capture_diff_slices};

use crate::text::split_lines;

/// Classification of a run of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Unchanged,
    /// Present only in the current text
    Added,
    /// Present only in the original text
    Removed,
}

/// A maximal run of lines sharing one [`DiffKind`].
///
/// Both ranges are always set. For `Added` the original range is empty and
/// anchored where the lines were inserted; for `Removed` the current range is
/// empty and anchored where the lines used to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSegment {
    pub kind: DiffKind,
    pub original: Range<usize>,
    pub current: Range<usize>,
}

impl DiffSegment {
    fn new(kind: DiffKind, original: Range<usize>, current: Range<usize>) -> Self {
        Self {
            kind,
            original,
            current,
        }
    }

    /// Number of lines this segment spans on its own side.
    pub fn line_count(&self) -> usize {
        match self.kind {
            DiffKind::Removed => self.original.len(),
            DiffKind::Unchanged | DiffKind::Added => self.current.len(),
        }
    }
}

/// Line totals per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub unchanged: usize,
    pub added: usize,
    pub removed: usize,
}

impl DiffStats {
    pub fn from_segments(segments: &[DiffSegment]) -> Self {
        let mut stats = Self::default();
        for segment in segments {
            let n = segment.line_count();
            match segment.kind {
                DiffKind::Unchanged => stats.unchanged += n,
                DiffKind::Added => stats.added += n,
                DiffKind::Removed => stats.removed += n,
            }
        }
        stats
    }

    pub fn has_changes(&self) -> bool {
        self.added > 0 || self.removed > 0
    }
}

/// Align `original` against `current` and return the ordered segments
/// covering both inputs.
///
/// Every changed hunk between two unchanged runs is reported as one
/// `Removed` segment followed by one `Added` segment (either may be absent).
/// Empty inputs are valid: two empty inputs give no segments.
pub fn diff_lines<T: AsRef<str>>(original: &[T], current: &[T]) -> Vec<DiffSegment> {
    let original: Vec<&str> = original.iter().map(AsRef::as_ref).collect();
    let current: Vec<&str> = current.iter().map(AsRef::as_ref).collect();

    let ops = capture_diff_slices(Algorithm::Myers, &original, &current);

    let mut segments: Vec<DiffSegment> = Vec::new();
    let mut hunk: Option<(Range<usize>, Range<usize>)> = None;

    for op in &ops {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => {
                if let Some((old, new)) = hunk.take() {
                    push_hunk(&mut segments, old, new);
                }
                push_merged(&mut segments, DiffKind::Unchanged, old_range, new_range);
            }
            DiffTag::Delete | DiffTag::Insert | DiffTag::Replace => {
                hunk = Some(match hunk {
                    None => (old_range, new_range),
                    Some((old, new)) => (old.start..old_range.end, new.start..new_range.end),
                });
            }
        }
    }
    if let Some((old, new)) = hunk {
        push_hunk(&mut segments, old, new);
    }

    segments
}

/// [`diff_lines`] over two texts.
pub fn diff_texts(original: &str, current: &str) -> Vec<DiffSegment> {
    diff_lines(&split_lines(original), &split_lines(current))
}

fn push_hunk(segments: &mut Vec<DiffSegment>, old: Range<usize>, new: Range<usize>) {
    if !old.is_empty() {
        push_merged(segments, DiffKind::Removed, old.clone(), new.start..new.start);
    }
    if !new.is_empty() {
        push_merged(segments, DiffKind::Added, old.end..old.end, new);
    }
}

fn push_merged(
    segments: &mut Vec<DiffSegment>,
    kind: DiffKind,
    original: Range<usize>,
    current: Range<usize>,
) {
    if let Some(last) = segments.last_mut()
        && last.kind == kind
        && last.original.end == original.start
        && last.current.end == current.start
    {
        last.original.end = original.end;
        last.current.end = current.end;
        return;
    }
    segments.push(DiffSegment::new(kind, original, current));
}

/// Per-line classification of the current text of a diffed region.
///
/// Removed lines have no current line of their own; use the segments to
/// find where they are anchored.
pub fn classify_current_lines(segments: &[DiffSegment], current_len: usize) -> Vec<DiffKind> {
    let mut lines = vec![DiffKind::Unchanged; current_len];
    for segment in segments {
        if segment.kind == DiffKind::Added {
            for line in segment.current.clone() {
                if let Some(slot) = lines.get_mut(line) {
                    *slot = DiffKind::Added;
                }
            }
        }
    }
    lines
}
