//! Pending change regions and their per-document registry.

mod id;
mod model;
mod registry;

pub use id::RegionId;
pub use model::DiffRegion;
pub use registry::DiffRegionRegistry;
