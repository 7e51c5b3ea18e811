//! Store Gateway - the document store the lifecycle writes through.
//!
//! The core only needs create/upsert/update/delete, fetch by identifier with
//! a distinguishable `NotFound`, and equality queries. Network transport,
//! pooling and index management belong to the concrete store.
//!
//! ## Example
//!
//! ```ignore
//! use docstate::{DocumentStore, Filter, InMemoryDocumentStore};
//!
//! let store = InMemoryDocumentStore::new();
//! store.create(&product)?;
//! let matches: Vec<Product> = store.query(&Filter::new().eq("canonicalUrl", url))?;
//! ```

mod filter;
mod in_memory;
mod store;

pub use filter::Filter;
pub use in_memory::InMemoryDocumentStore;
pub use store::DocumentStore;

/// Error type for document store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No document with this identifier.
    #[error("document not found: {collection}:{id}")]
    NotFound { collection: String, id: String },
    /// A create collided with an existing identifier.
    #[error("document already exists: {collection}:{id}")]
    Conflict { collection: String, id: String },
    /// Serialization/deserialization error.
    #[error("document serialization error: {0}")]
    Serde(String),
    /// Storage-level error.
    #[error("document storage error: {0}")]
    Storage(String),
}
