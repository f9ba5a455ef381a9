//! Error handling types for diff-regions
//!
//! This module provides the error taxonomy surfaced by the registry and the
//! reconciliation controller. None of these are fatal: a failed operation
//! leaves the affected region pending.

use thiserror::Error;
use url::Url;

use crate::document::MutationError;
use crate::region::RegionId;
use crate::text::LineSpan;

/// Errors raised by region operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// A new region would overlap one that is still pending
    #[error("Region {requested} in {uri} overlaps pending region {existing} at {existing_span}")]
    RegionConflict {
        uri: Url,
        requested: LineSpan,
        existing: RegionId,
        existing_span: LineSpan,
    },

    /// The region does not exist or was already accepted or rejected
    #[error("Region {id} not found in {uri}")]
    RegionNotFound { uri: Url, id: RegionId },

    /// The live document could not be written
    #[error("Failed to write {uri}: {source}")]
    DocumentMutationFailed {
        uri: Url,
        #[source]
        source: MutationError,
    },

    /// The span does not fit inside the live document
    #[error("Span {span} is outside {uri} ({line_count} lines)")]
    InvalidSpan {
        uri: Url,
        span: LineSpan,
        line_count: usize,
    },

    /// The host has no open document for this identity
    #[error("Document not found: {uri}")]
    DocumentNotFound { uri: Url },
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;

/// Helper functions for common error patterns
impl RegionError {
    /// Create a region conflict error
    pub fn conflict(
        uri: &Url,
        requested: LineSpan,
        existing: RegionId,
        existing_span: LineSpan,
    ) -> Self {
        RegionError::RegionConflict {
            uri: uri.clone(),
            requested,
            existing,
            existing_span,
        }
    }

    /// Create a region not found error
    pub fn not_found(uri: &Url, id: RegionId) -> Self {
        RegionError::RegionNotFound {
            uri: uri.clone(),
            id,
        }
    }

    /// Create a document mutation error
    pub fn mutation_failed(uri: &Url, source: MutationError) -> Self {
        RegionError::DocumentMutationFailed {
            uri: uri.clone(),
            source,
        }
    }

    /// Create an invalid span error
    pub fn invalid_span(uri: &Url, span: LineSpan, line_count: usize) -> Self {
        RegionError::InvalidSpan {
            uri: uri.clone(),
            span,
            line_count,
        }
    }

    /// Create a document not found error
    pub fn document_not_found(uri: &Url) -> Self {
        RegionError::DocumentNotFound { uri: uri.clone() }
    }
}
