//! Reconciliation of pending regions against the live document.
//!
//! The controller is the only writer of the registry. It runs every operation
//! to completion before the next event is handled:
//!
//! - edit notifications re-anchor spans and recompute diffs ([`ReconciliationController::handle_edit`])
//! - accept drops a region and leaves the text alone
//! - reject restores the original snapshot, then drops the region
//!
//! Regions are `Pending` while in the registry. Accepted and rejected regions
//! are removed, so any later operation on their id fails with `RegionNotFound`.

mod events;

pub use events::{EditEvent, RegionEvent, Resolution};

use dashmap::DashMap;
use log::{debug, warn};
use url::Url;

use crate::annotations::{Annotation, list_annotations};
use crate::config::{EngineSettings, ReplacePolicy};
use crate::diff::diff_lines;
use crate::document::DocumentHost;
use crate::error::{RegionError, RegionResult};
use crate::region::{DiffRegion, DiffRegionRegistry, RegionId};
use crate::text::{LineEdit, LineSpan, join_lines, line_count, normalize_line_endings, split_lines};

type Subscriber = Box<dyn FnMut(&RegionEvent)>;

pub struct ReconciliationController<H: DocumentHost> {
    registry: DiffRegionRegistry,
    host: H,
    settings: EngineSettings,
    /// Text each document had at its last refresh, used to infer edits when
    /// the shell only reports full text
    last_text: DashMap<Url, String>,
    subscribers: Vec<Subscriber>,
}

impl<H: DocumentHost> ReconciliationController<H> {
    pub fn new(registry: DiffRegionRegistry, host: H) -> Self {
        Self {
            registry,
            host,
            settings: EngineSettings::default(),
            last_text: DashMap::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn registry(&self) -> &DiffRegionRegistry {
        &self.registry
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Register a listener for region lifecycle events.
    pub fn subscribe(&mut self, listener: impl FnMut(&RegionEvent) + 'static) {
        self.subscribers.push(Box::new(listener));
    }

    fn emit(&mut self, event: RegionEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
    }

    fn live_text(&self, uri: &Url) -> RegionResult<String> {
        self.host
            .text(uri)
            .map(|text| normalize_line_endings(&text).into_owned())
            .ok_or_else(|| RegionError::document_not_found(uri))
    }

    /// Track a proposal the caller already wrote into `span`.
    ///
    /// `original_text` is the text the span held before the proposal.
    pub fn add_diff_area(
        &mut self,
        uri: &Url,
        span: LineSpan,
        original_text: &str,
    ) -> RegionResult<RegionId> {
        let text = self.live_text(uri)?;
        let lines = line_count(&text);
        if span.start > span.end || span.end > lines {
            return Err(RegionError::invalid_span(uri, span, lines));
        }

        let id = self.registry.add_region(uri, span, original_text)?;
        self.emit(RegionEvent::Created {
            document: uri.clone(),
            id,
            span,
        });
        self.refresh_against(uri, &text, &[]);
        Ok(id)
    }

    /// Recompute the diff of every pending region of `uri` from the live text.
    ///
    /// Only diff state is recomputed; the document is never written.
    pub fn refresh(&mut self, uri: &Url) -> RegionResult<()> {
        if self.registry.is_empty(uri) {
            return Ok(());
        }
        let text = self.live_text(uri)?;
        self.refresh_against(uri, &text, &[]);
        Ok(())
    }

    /// Entry point for the shell's edit notification: re-anchor spans by the
    /// edit, then refresh against the reported text.
    pub fn handle_edit(&mut self, event: EditEvent) {
        let uri = &event.document;
        if self.registry.is_empty(uri) {
            self.last_text.remove(uri);
            return;
        }
        let text = normalize_line_endings(&event.text);
        let moved = self.registry.shift_regions_after_edit(uri, event.edit);
        self.refresh_against(uri, &text, &moved);
    }

    /// Edit notification without line information. The edits are inferred
    /// by diffing against the text seen at the previous refresh and applied
    /// hunk by hunk, top to bottom.
    pub fn handle_full_text_change(&mut self, uri: &Url, new_text: &str) {
        if self.registry.is_empty(uri) {
            self.last_text.remove(uri);
            return;
        }
        let text = normalize_line_endings(new_text);
        let edits = self
            .last_text
            .get(uri)
            .map(|old| LineEdit::between(&old, &text))
            .unwrap_or_default();
        let mut moved = Vec::new();
        for edit in edits {
            for id in self.registry.shift_regions_after_edit(uri, edit) {
                if !moved.contains(&id) {
                    moved.push(id);
                }
            }
        }
        self.refresh_against(uri, &text, &moved);
    }

    fn refresh_against(&mut self, uri: &Url, text: &str, moved: &[RegionId]) {
        let lines = split_lines(text);
        let mut changed: Vec<RegionId> = moved.to_vec();
        changed.extend(self.registry.clamp_to_line_count(uri, lines.len()));

        for region in self.registry.regions(uri) {
            let span = region.span();
            let current = &lines[span.start..span.end];
            let original = split_lines(region.original_text());
            let segments = diff_lines(&original, current);
            if self
                .registry
                .update_current(uri, region.id(), join_lines(current), segments)
            {
                changed.push(region.id());
            }
        }
        self.last_text.insert(uri.clone(), text.to_string());

        for region in self.registry.regions(uri) {
            if changed.contains(&region.id()) {
                self.emit(RegionEvent::Updated {
                    document: uri.clone(),
                    id: region.id(),
                    span: region.span(),
                });
            }
        }
    }

    /// Commit the region's current text. The document is not touched.
    pub fn accept(&mut self, uri: &Url, id: RegionId) -> RegionResult<DiffRegion> {
        let region = self
            .registry
            .remove_region(uri, id)
            .ok_or_else(|| RegionError::not_found(uri, id))?;

        debug!(
            target: "diff_regions::controller",
            "Accepted region {} at {} in {}",
            id,
            region.span(),
            uri
        );
        self.forget_if_idle(uri);
        self.emit(RegionEvent::Removed {
            document: uri.clone(),
            id,
            resolution: Resolution::Accepted,
        });
        Ok(region)
    }

    /// Restore the region's original text, then drop it.
    ///
    /// If the document cannot be written the region stays pending and the
    /// error is returned.
    pub fn reject(&mut self, uri: &Url, id: RegionId) -> RegionResult<DiffRegion> {
        let region = self
            .registry
            .get(uri, id)
            .ok_or_else(|| RegionError::not_found(uri, id))?;

        let covered = self
            .host
            .replace_lines(uri, region.span(), region.original_text())
            .map_err(|source| {
                warn!(
                    target: "diff_regions::controller",
                    "Reject of region {} in {} failed: {}",
                    id,
                    uri,
                    source
                );
                RegionError::mutation_failed(uri, source)
            })?;

        self.registry.remove_region(uri, id);
        let moved = self
            .registry
            .shift_regions_after_edit(uri, LineEdit::from_replacement(region.span(), covered.len()));

        debug!(
            target: "diff_regions::controller",
            "Rejected region {} in {}: restored {} line(s) at {}",
            id,
            uri,
            covered.len(),
            covered
        );
        self.emit(RegionEvent::Removed {
            document: uri.clone(),
            id,
            resolution: Resolution::Rejected,
        });

        if self.registry.is_empty(uri) {
            self.forget_if_idle(uri);
        } else if let Ok(text) = self.live_text(uri) {
            self.refresh_against(uri, &text, &moved);
        }
        Ok(region)
    }

    /// Accept every pending region of a document.
    pub fn accept_all(&mut self, uri: &Url) -> RegionResult<Vec<DiffRegion>> {
        let ids: Vec<RegionId> = self.registry.regions(uri).iter().map(DiffRegion::id).collect();
        ids.into_iter().map(|id| self.accept(uri, id)).collect()
    }

    /// Reject every pending region of a document, bottom-up so restoring one
    /// region never moves a region that is still waiting.
    ///
    /// Stops at the first failure; regions already rejected stay rejected.
    pub fn reject_all(&mut self, uri: &Url) -> RegionResult<Vec<DiffRegion>> {
        let ids: Vec<RegionId> = self.registry.regions(uri).iter().map(DiffRegion::id).collect();
        ids.into_iter().rev().map(|id| self.reject(uri, id)).collect()
    }

    /// Tear down a document's registry. Regions are dropped without
    /// touching the text.
    pub fn close_document(&mut self, uri: &Url) -> Vec<DiffRegion> {
        let cleared = self.discard_all(uri);
        self.last_text.remove(uri);
        cleared
    }

    fn discard_all(&mut self, uri: &Url) -> Vec<DiffRegion> {
        let cleared = self.registry.clear_document(uri);
        for region in &cleared {
            debug!(
                target: "diff_regions::controller",
                "Discarded region {} in {}",
                region.id(),
                uri
            );
            self.emit(RegionEvent::Removed {
                document: uri.clone(),
                id: region.id(),
                resolution: Resolution::Discarded,
            });
        }
        cleared
    }

    /// Replace an entire document with a proposed rewrite and track it as a
    /// single region spanning the whole document.
    ///
    /// Prior regions of the document are handled per
    /// [`EngineSettings::replace_policy`]. The pre-replace text becomes the
    /// new region's original snapshot.
    pub fn create_from_whole_document_replace(
        &mut self,
        uri: &Url,
        new_text: &str,
    ) -> RegionResult<RegionId> {
        if self.settings.replace_policy == ReplacePolicy::Reject {
            self.reject_all(uri)?;
        }

        let original = self.live_text(uri)?;
        let new_text = normalize_line_endings(new_text).into_owned();
        self.host.set_text(uri, &new_text).map_err(|source| {
            warn!(
                target: "diff_regions::controller",
                "Applying proposed rewrite to {} failed: {}",
                uri,
                source
            );
            RegionError::mutation_failed(uri, source)
        })?;

        self.discard_all(uri);

        let span = LineSpan::new(0, line_count(&new_text));
        let id = self.registry.add_region(uri, span, &original)?;
        debug!(
            target: "diff_regions::controller",
            "Applied proposed rewrite to {} as region {} at {}",
            uri,
            id,
            span
        );
        self.emit(RegionEvent::Created {
            document: uri.clone(),
            id,
            span,
        });
        self.refresh_against(uri, &new_text, &[]);
        Ok(id)
    }

    /// Annotations for the rendering side, as of the last refresh.
    pub fn list_annotations(&self, uri: &Url) -> Vec<Annotation> {
        list_annotations(&self.registry, uri)
    }

    fn forget_if_idle(&mut self, uri: &Url) {
        if self.registry.is_empty(uri) {
            self.last_text.remove(uri);
        }
    }
}
