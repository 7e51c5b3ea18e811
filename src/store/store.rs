//! DocumentStore - abstract CRUD storage for documents.

use super::{Filter, StoreError};
use crate::document::{Document, DocumentId};

/// Abstract CRUD storage for documents, one collection per document type.
pub trait DocumentStore: Send + Sync {
    /// Insert a new document. Fails with `Conflict` if the identifier exists.
    fn create<D: Document>(&self, doc: &D) -> Result<(), StoreError>;

    /// Insert or replace a document by identifier.
    fn upsert<D: Document>(&self, doc: &D) -> Result<(), StoreError>;

    /// Replace the stored document `id`. Fails with `NotFound` if absent.
    fn update<D: Document>(&self, doc: &D, id: DocumentId) -> Result<(), StoreError>;

    /// Delete a document by identifier. Returns true if it existed.
    fn delete<D: Document>(&self, id: DocumentId) -> Result<bool, StoreError>;

    /// Fetch a document by identifier.
    fn get_by_id<D: Document>(&self, id: DocumentId) -> Result<D, StoreError>;

    /// Documents matching every clause of `filter`, in insertion order.
    fn query<D: Document>(&self, filter: &Filter) -> Result<Vec<D>, StoreError>;
}
