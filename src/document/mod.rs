pub mod host;
pub mod store;

mod model;

// Re-export main types
pub use host::{DocumentHost, MutationError};
pub use model::Document;
pub use store::{DocumentHandle, DocumentStore};
