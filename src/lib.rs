//! docstate - lifecycle tracking for document-store entities.
//!
//! A `Tracked` entity knows whether it is new, modified or staged for
//! deletion and turns that into one create/upsert/update/delete call on a
//! `DocumentStore`. New entities are matched by natural key before insert so
//! a re-ingested duplicate becomes an update of the stored record, and a batch
//! job links breadcrumb trails into category chains.

// Lets the derives emit `::docstate::` paths inside this crate too.
extern crate self as docstate;

pub mod codec;
pub mod config;
pub mod dedup;
pub mod diff;
pub mod document;
mod error;
pub mod hierarchy;
pub mod logging;
pub mod models;
pub mod store;
mod tracked;

pub use codec::{CodecError, Encoding, SnapshotCodec};
pub use config::{
    CategoryConfig, DataStoreConfig, LogFormat, LoggingConfig, ModelConfig, RootParent,
    SnapshotConfig,
};
pub use dedup::Resolution;
pub use diff::{diff, ChangeSet, Diff, DiffError, FieldChange};
pub use document::{Document, DocumentId, ExtractionError, InsertMode, InvalidId, Schema};
pub use error::ModelError;
pub use hierarchy::{
    materialize_categories, Categorizable, CategoryMaterializer, MaterializeError,
    MaterializeReport, MaterializedSource,
};
pub use models::{
    extract_company_name, AdditionalProperty, AggregateRating, Article, Breadcrumb, Category,
    Gtin, Offer, Product,
};
pub use store::{DocumentStore, Filter, InMemoryDocumentStore, StoreError};
pub use tracked::{ModelContext, SaveOutcome, Tracked};

// Re-export derive macros
pub use docstate_macros::{Diff, Document};
