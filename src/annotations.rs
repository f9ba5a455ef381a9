//! Read-only projection of pending regions for the rendering side.
//!
//! Annotations reflect the registry as of the last refresh and never trigger
//! recomputation themselves.

use serde::Serialize;
use url::Url;

use crate::diff::{DiffKind, DiffSegment, DiffStats, classify_current_lines};
use crate::region::{DiffRegion, DiffRegionRegistry, RegionId};
use crate::text::{LineSpan, split_lines};

/// Per-region state an overlay needs to draw its affordance and highlights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub id: RegionId,
    pub span: LineSpan,
    pub segments: Vec<DiffSegment>,
    /// Classification of each current line in the span
    pub lines: Vec<DiffKind>,
    pub stats: DiffStats,
    #[serde(skip)]
    original_text: String,
    #[serde(skip)]
    current_text: String,
}

impl Annotation {
    fn from_region(region: &DiffRegion) -> Self {
        let segments = region.segments().to_vec();
        Self {
            id: region.id(),
            span: region.span(),
            lines: classify_current_lines(&segments, region.span().len()),
            stats: DiffStats::from_segments(&segments),
            segments,
            original_text: region.original_text().to_string(),
            current_text: region.current_text().to_string(),
        }
    }

    /// Line the accept/reject affordance is drawn above.
    pub fn anchor_line(&self) -> usize {
        self.span.start
    }

    /// The commands the affordance binds, accept first.
    pub fn commands(&self, document: &Url) -> [AnnotationCommand; 2] {
        [
            AnnotationCommand::Accept {
                document: document.clone(),
                id: self.id,
            },
            AnnotationCommand::Reject {
                document: document.clone(),
                id: self.id,
            },
        ]
    }

    /// Unified listing of the region, one line per row: the 1-based document
    /// line number, a marker (`+` added, `-` removed, blank unchanged) and
    /// the line. Removed lines carry the number of the line they sat above.
    pub fn render(&self) -> String {
        let original = split_lines(&self.original_text);
        let current = split_lines(&self.current_text);
        let mut rows = Vec::new();

        for segment in &self.segments {
            let (marker, lines, range) = match segment.kind {
                DiffKind::Unchanged => (' ', &current, segment.current.clone()),
                DiffKind::Added => ('+', &current, segment.current.clone()),
                DiffKind::Removed => ('-', &original, segment.original.clone()),
            };
            for (offset, line) in range.clone().zip(lines.get(range).unwrap_or_default()) {
                let number = match segment.kind {
                    DiffKind::Removed => self.span.start + segment.current.start,
                    DiffKind::Unchanged | DiffKind::Added => self.span.start + offset,
                };
                rows.push(format!("{:<4}{} {}", number + 1, marker, line));
            }
        }
        rows.join("\n")
    }
}

/// A command bound to a rendered affordance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum AnnotationCommand {
    Accept { document: Url, id: RegionId },
    Reject { document: Url, id: RegionId },
}

impl AnnotationCommand {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Accept { .. } => "Accept",
            Self::Reject { .. } => "Reject",
        }
    }

    pub fn id(&self) -> RegionId {
        match self {
            Self::Accept { id, .. } | Self::Reject { id, .. } => *id,
        }
    }
}

/// Pending regions of a document in line order, as annotations.
pub fn list_annotations(registry: &DiffRegionRegistry, uri: &Url) -> Vec<Annotation> {
    registry
        .regions(uri)
        .iter()
        .map(Annotation::from_region)
        .collect()
}
