pub mod annotations;
pub mod config;
pub mod controller;
pub mod diff;
pub mod document;
pub mod error;
pub mod region;
pub mod text;

pub use annotations::{Annotation, AnnotationCommand, list_annotations};
pub use config::{EngineSettings, ReplacePolicy};
pub use controller::{EditEvent, ReconciliationController, RegionEvent, Resolution};
pub use diff::{DiffKind, DiffSegment, DiffStats, diff_lines, diff_texts};
pub use document::{DocumentHost, DocumentStore, MutationError};
pub use error::{RegionError, RegionResult};
pub use region::{DiffRegion, DiffRegionRegistry, RegionId};
pub use text::{LineEdit, LineSpan};
