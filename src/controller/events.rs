use url::Url;

use crate::region::RegionId;
use crate::text::{LineEdit, LineSpan};

/// Edit notification fired by the editor shell whenever a live buffer changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEvent {
    pub document: Url,
    pub edit: LineEdit,
    /// Full document text after the edit
    pub text: String,
}

impl EditEvent {
    pub fn new(document: Url, edit: LineEdit, text: impl Into<String>) -> Self {
        Self {
            document,
            edit,
            text: text.into(),
        }
    }
}

/// How a region left the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Accepted,
    Rejected,
    /// Dropped without touching the document (document closed or replaced)
    Discarded,
}

/// Region lifecycle events, delivered to subscribers so overlays can redraw
/// without polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionEvent {
    Created {
        document: Url,
        id: RegionId,
        span: LineSpan,
    },
    /// Span or diff changed during a refresh
    Updated {
        document: Url,
        id: RegionId,
        span: LineSpan,
    },
    Removed {
        document: Url,
        id: RegionId,
        resolution: Resolution,
    },
}

impl RegionEvent {
    pub fn document(&self) -> &Url {
        match self {
            Self::Created { document, .. }
            | Self::Updated { document, .. }
            | Self::Removed { document, .. } => document,
        }
    }

    pub fn id(&self) -> RegionId {
        match self {
            Self::Created { id, .. } | Self::Updated { id, .. } | Self::Removed { id, .. } => *id,
        }
    }
}
