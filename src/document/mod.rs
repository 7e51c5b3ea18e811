//! Documents - the persisted shape of an entity schema.
//!
//! A schema is a plain struct deriving `Document` (collection + identity) and
//! `Diff` (field-level comparison), plus a `Schema` impl for the lifecycle
//! hooks the store needs: natural key, pre-insert derivation and timestamps.
//!
//! ## Example
//!
//! ```ignore
//! use docstate::{Diff, Document, DocumentId, Filter, Schema};
//!
//! #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Document, Diff)]
//! #[document(collection = "tags")]
//! struct Tag {
//!     #[diff(skip)]
//!     pub id: DocumentId,
//!     pub label: String,
//! }
//!
//! impl Schema for Tag {
//!     fn natural_key(&self) -> Filter {
//!         Filter::new().eq("label", self.label.as_str())
//!     }
//! }
//! ```

mod id;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::diff::Diff;
use crate::store::Filter;

pub use id::{DocumentId, InvalidId};

/// Trait for types that can be stored as documents.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection name for this document type (e.g., "products", "categories").
    /// Maps to a collection in MongoDB, a table in SQL, a key prefix in KV stores, etc.
    const COLLECTION: &'static str;

    /// Returns the identifier; nil until the document is first persisted.
    fn id(&self) -> DocumentId;

    fn set_id(&mut self, id: DocumentId);
}

/// How a brand-new document reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertMode {
    /// Plain insert; the store rejects an existing identifier.
    #[default]
    Create,
    /// Insert or replace by identifier.
    Upsert,
}

/// Lifecycle hooks of a concrete entity schema.
pub trait Schema: Document + Diff + Default {
    /// Fields identifying logical equivalence, used to catch re-ingested duplicates.
    fn natural_key(&self) -> Filter;

    fn insert_mode() -> InsertMode {
        InsertMode::Create
    }

    /// Canonicalize fields before every save, ahead of dedup and dirty checks.
    fn normalize(&mut self) {}

    /// Derive computed fields right before the first insert.
    fn before_insert(&mut self) -> Result<(), ExtractionError> {
        Ok(())
    }

    fn stamp_created(&mut self, _at: DateTime<Utc>) {}

    fn stamp_modified(&mut self, _at: DateTime<Utc>) {}

    /// Carry bookkeeping over from the stored record this document duplicates.
    ///
    /// Called when a new document resolves to an existing one by natural key.
    /// The default only adopts the identifier; schemas with derived or
    /// store-managed fields copy those too so the following update keeps them.
    fn adopt(&mut self, existing: &Self) {
        self.set_id(existing.id());
    }
}

/// A schema-specific derived field could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not derive {field} from {input:?}: {reason}")]
pub struct ExtractionError {
    pub field: &'static str,
    pub input: String,
    pub reason: String,
}
