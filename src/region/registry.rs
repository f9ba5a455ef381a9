//! Per-document registry of pending diff regions.
//!
//! Each document gets an ordered list of regions, created lazily on the first
//! `add_region` and dropped once its last region is removed. Regions of one
//! document never overlap and stay sorted by `start_line`.

use dashmap::DashMap;
use log::{debug, warn};
use url::Url;

use super::{DiffRegion, RegionId};
use crate::diff::DiffSegment;
use crate::error::{RegionError, RegionResult};
use crate::text::{LineEdit, LineSpan, normalize_line_endings};

/// Registry of pending regions keyed by document URI.
pub struct DiffRegionRegistry {
    documents: DashMap<Url, Vec<DiffRegion>>,
}

impl DiffRegionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Register a new pending region.
    ///
    /// Fails with `RegionConflict` if `span` overlaps a region already pending
    /// in the same document. The region's diff stays empty until the next
    /// refresh reads the live text.
    pub fn add_region(&self, uri: &Url, span: LineSpan, original_text: &str) -> RegionResult<RegionId> {
        // NOTE: Explicit two-step pattern to avoid DashMap lifetime ambiguity.
        let mut regions = self.documents.entry(uri.clone()).or_default();

        if let Some(existing) = regions.iter().find(|region| region.span().overlaps(&span)) {
            warn!(
                target: "diff_regions::registry",
                "Rejected region {} in {}: overlaps {} at {}",
                span,
                uri,
                existing.id(),
                existing.span()
            );
            return Err(RegionError::conflict(uri, span, existing.id(), existing.span()));
        }

        let id = RegionId::generate();
        let original = normalize_line_endings(original_text).into_owned();
        let position = regions.partition_point(|region| region.span() <= span);
        regions.insert(position, DiffRegion::new(id, uri.clone(), span, original));

        debug!(
            target: "diff_regions::registry",
            "Added region {} at {} in {} ({} pending)",
            id,
            span,
            uri,
            regions.len()
        );
        Ok(id)
    }

    /// Pending regions of a document ordered by start line. Empty if none.
    pub fn regions(&self, uri: &Url) -> Vec<DiffRegion> {
        self.documents
            .get(uri)
            .map(|regions| regions.clone())
            .unwrap_or_default()
    }

    pub fn get(&self, uri: &Url, id: RegionId) -> Option<DiffRegion> {
        self.documents
            .get(uri)?
            .iter()
            .find(|region| region.id() == id)
            .cloned()
    }

    pub fn contains(&self, uri: &Url, id: RegionId) -> bool {
        self.documents
            .get(uri)
            .is_some_and(|regions| regions.iter().any(|region| region.id() == id))
    }

    pub fn is_empty(&self, uri: &Url) -> bool {
        self.documents.get(uri).is_none_or(|regions| regions.is_empty())
    }

    /// Documents that currently have pending regions.
    pub fn documents(&self) -> Vec<Url> {
        self.documents.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Remove a region. Removing a missing region is a no-op.
    pub fn remove_region(&self, uri: &Url, id: RegionId) -> Option<DiffRegion> {
        let removed = {
            let mut regions = self.documents.get_mut(uri)?;
            let position = regions.iter().position(|region| region.id() == id)?;
            regions.remove(position)
        };
        // Drop the document entry with its last region
        self.documents.remove_if(uri, |_, regions| regions.is_empty());
        debug!(
            target: "diff_regions::registry",
            "Removed region {} from {}",
            id,
            uri
        );
        Some(removed)
    }

    /// Drop every region of a document, returning them in line order.
    ///
    /// Called when the document closes or is replaced wholesale.
    pub fn clear_document(&self, uri: &Url) -> Vec<DiffRegion> {
        self.documents
            .remove(uri)
            .map(|(_, regions)| regions)
            .unwrap_or_default()
    }

    /// Re-anchor every region of a document after an edit.
    ///
    /// Regions at or after the edit move by its delta; a region the edit
    /// lands inside absorbs it. Returns the ids whose span changed.
    pub fn shift_regions_after_edit(&self, uri: &Url, edit: LineEdit) -> Vec<RegionId> {
        if edit.is_noop() {
            return Vec::new();
        }
        let Some(mut regions) = self.documents.get_mut(uri) else {
            return Vec::new();
        };

        let mut moved = Vec::new();
        for region in regions.iter_mut() {
            let span = region.span().after_edit(edit);
            if span != region.span() {
                region.set_span(span);
                moved.push(region.id());
            }
        }
        // The mapping is monotonic, so order only changes between spans
        // that collapsed onto the same line
        regions.sort_by_key(|region| region.span());

        if !moved.is_empty() {
            debug!(
                target: "diff_regions::registry",
                "Edit at line {} ({:+}) moved {} region(s) in {}",
                edit.start_line,
                edit.line_delta,
                moved.len(),
                uri
            );
        }
        moved
    }

    /// Shrink spans that run past the end of a document of `line_count`
    /// lines. Returns the ids whose span changed.
    pub fn clamp_to_line_count(&self, uri: &Url, line_count: usize) -> Vec<RegionId> {
        let Some(mut regions) = self.documents.get_mut(uri) else {
            return Vec::new();
        };

        let mut clamped = Vec::new();
        for region in regions.iter_mut() {
            let span = region.span().clamp_to(line_count);
            if span != region.span() {
                region.set_span(span);
                clamped.push(region.id());
            }
        }
        clamped
    }

    /// Store the live text and diff computed for a region by a refresh.
    ///
    /// Returns whether anything changed.
    pub fn update_current(
        &self,
        uri: &Url,
        id: RegionId,
        current_text: String,
        segments: Vec<DiffSegment>,
    ) -> bool {
        let Some(mut regions) = self.documents.get_mut(uri) else {
            return false;
        };
        let Some(region) = regions.iter_mut().find(|region| region.id() == id) else {
            return false;
        };
        if region.current_text() == current_text && region.segments() == segments.as_slice() {
            return false;
        }
        region.set_current(current_text, segments);
        true
    }
}

impl Default for DiffRegionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_uri(name: &str) -> Url {
        Url::parse(&format!("file:///test/{}.txt", name)).unwrap()
    }

    fn spans(registry: &DiffRegionRegistry, uri: &Url) -> Vec<LineSpan> {
        registry.regions(uri).iter().map(DiffRegion::span).collect()
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = DiffRegionRegistry::new();
        let uri = test_uri("empty");
        assert!(registry.regions(&uri).is_empty());
        assert!(registry.is_empty(&uri));
        assert!(registry.documents().is_empty());
    }

    #[test]
    fn test_regions_are_ordered_by_start_line() {
        let registry = DiffRegionRegistry::new();
        let uri = test_uri("ordered");

        registry.add_region(&uri, LineSpan::new(5, 7), "x").unwrap();
        registry.add_region(&uri, LineSpan::new(0, 1), "y").unwrap();
        registry.add_region(&uri, LineSpan::new(2, 4), "z").unwrap();

        assert_eq!(
            spans(&registry, &uri),
            vec![LineSpan::new(0, 1), LineSpan::new(2, 4), LineSpan::new(5, 7)]
        );
    }

    #[test]
    fn test_overlapping_region_is_a_conflict() {
        let registry = DiffRegionRegistry::new();
        let uri = test_uri("conflict");

        let first = registry.add_region(&uri, LineSpan::new(1, 4), "a").unwrap();
        let err = registry.add_region(&uri, LineSpan::new(3, 6), "b").unwrap_err();

        match err {
            RegionError::RegionConflict { existing, .. } => assert_eq!(existing, first),
            other => panic!("expected RegionConflict, got {other:?}"),
        }
        assert_eq!(registry.regions(&uri).len(), 1);
    }

    #[test]
    fn test_adjacent_regions_do_not_conflict() {
        let registry = DiffRegionRegistry::new();
        let uri = test_uri("adjacent");

        registry.add_region(&uri, LineSpan::new(1, 3), "a").unwrap();
        registry.add_region(&uri, LineSpan::new(3, 5), "b").unwrap();

        assert_eq!(registry.regions(&uri).len(), 2);
    }

    #[test]
    fn test_same_span_in_other_document_is_independent() {
        let registry = DiffRegionRegistry::new();
        let uri1 = test_uri("doc1");
        let uri2 = test_uri("doc2");

        registry.add_region(&uri1, LineSpan::new(0, 2), "a").unwrap();
        registry.add_region(&uri2, LineSpan::new(0, 2), "a").unwrap();

        assert_eq!(registry.regions(&uri1).len(), 1);
        assert_eq!(registry.regions(&uri2).len(), 1);
    }

    #[test]
    fn test_original_text_is_normalized() {
        let registry = DiffRegionRegistry::new();
        let uri = test_uri("crlf");

        let id = registry.add_region(&uri, LineSpan::new(0, 2), "a\r\nb").unwrap();

        assert_eq!(registry.get(&uri, id).unwrap().original_text(), "a\nb");
    }

    #[test]
    fn test_remove_missing_region_is_noop() {
        let registry = DiffRegionRegistry::new();
        let uri = test_uri("missing");
        let id = registry.add_region(&uri, LineSpan::new(0, 1), "a").unwrap();

        assert!(registry.remove_region(&uri, id).is_some());
        assert!(registry.remove_region(&uri, id).is_none());
        assert!(registry.remove_region(&test_uri("other"), id).is_none());
    }

    #[test]
    fn test_removing_last_region_drops_document_entry() {
        let registry = DiffRegionRegistry::new();
        let uri = test_uri("drop");
        let id = registry.add_region(&uri, LineSpan::new(0, 1), "a").unwrap();

        registry.remove_region(&uri, id);

        assert!(registry.documents().is_empty());
        assert!(!registry.contains(&uri, id));
    }

    #[test]
    fn test_shift_after_insertion_above() {
        let registry = DiffRegionRegistry::new();
        let uri = test_uri("shift");
        registry.add_region(&uri, LineSpan::new(1, 3), "a").unwrap();
        registry.add_region(&uri, LineSpan::new(5, 7), "b").unwrap();

        let moved = registry.shift_regions_after_edit(&uri, LineEdit::new(0, 2));

        assert_eq!(moved.len(), 2);
        assert_eq!(spans(&registry, &uri), vec![LineSpan::new(3, 5), LineSpan::new(7, 9)]);
    }

    #[test]
    fn test_shift_between_regions_moves_only_later_ones() {
        let registry = DiffRegionRegistry::new();
        let uri = test_uri("between");
        let first = registry.add_region(&uri, LineSpan::new(1, 3), "a").unwrap();
        let second = registry.add_region(&uri, LineSpan::new(5, 7), "b").unwrap();

        let moved = registry.shift_regions_after_edit(&uri, LineEdit::new(4, -1));

        assert_eq!(moved, vec![second]);
        assert_eq!(registry.get(&uri, first).unwrap().span(), LineSpan::new(1, 3));
        assert_eq!(registry.get(&uri, second).unwrap().span(), LineSpan::new(4, 6));
    }

    #[test]
    fn test_edit_inside_region_widens_it() {
        let registry = DiffRegionRegistry::new();
        let uri = test_uri("absorb");
        let id = registry.add_region(&uri, LineSpan::new(1, 3), "a").unwrap();
        let after = registry.add_region(&uri, LineSpan::new(4, 5), "b").unwrap();

        registry.shift_regions_after_edit(&uri, LineEdit::new(2, 2));

        assert_eq!(registry.get(&uri, id).unwrap().span(), LineSpan::new(1, 5));
        assert_eq!(registry.get(&uri, after).unwrap().span(), LineSpan::new(6, 7));
    }

    #[test]
    fn test_shift_preserves_original_text() {
        let registry = DiffRegionRegistry::new();
        let uri = test_uri("preserve");
        let id = registry.add_region(&uri, LineSpan::new(1, 3), "b\nc").unwrap();

        registry.shift_regions_after_edit(&uri, LineEdit::new(0, 3));

        assert_eq!(registry.get(&uri, id).unwrap().original_text(), "b\nc");
    }

    #[test]
    fn test_clamp_to_line_count() {
        let registry = DiffRegionRegistry::new();
        let uri = test_uri("clamp");
        let id = registry.add_region(&uri, LineSpan::new(2, 6), "a").unwrap();

        let clamped = registry.clamp_to_line_count(&uri, 4);

        assert_eq!(clamped, vec![id]);
        assert_eq!(registry.get(&uri, id).unwrap().span(), LineSpan::new(2, 4));
    }

    #[test]
    fn test_update_current_reports_changes() {
        let registry = DiffRegionRegistry::new();
        let uri = test_uri("update");
        let id = registry.add_region(&uri, LineSpan::new(0, 1), "a").unwrap();
        let segments = crate::diff::diff_texts("a", "b");

        assert!(registry.update_current(&uri, id, "b".to_string(), segments.clone()));
        assert!(!registry.update_current(&uri, id, "b".to_string(), segments));
        assert_eq!(registry.get(&uri, id).unwrap().current_text(), "b");
    }

    #[test]
    fn test_clear_document_returns_regions_in_order() {
        let registry = DiffRegionRegistry::new();
        let uri = test_uri("clear");
        registry.add_region(&uri, LineSpan::new(4, 5), "b").unwrap();
        registry.add_region(&uri, LineSpan::new(0, 1), "a").unwrap();

        let cleared = registry.clear_document(&uri);

        assert_eq!(cleared.len(), 2);
        assert_eq!(cleared[0].span(), LineSpan::new(0, 1));
        assert!(registry.regions(&uri).is_empty());
    }
}
