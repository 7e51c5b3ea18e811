//! Tracked - lifecycle state machine around a document.
//!
//! A `Tracked<D, S>` owns a document, the baseline it last matched in the
//! store, and the `new` / `dirty` / `deleted` flags. `save()` turns that state
//! into exactly one store operation (or none):
//!
//! ```text
//! New --save (no match)--> Clean
//! New --save (match, changed)--> Dirty --update--> Clean
//! Clean --field mutation--> Dirty
//! Clean/Dirty --delete()--> PendingDelete --save--> New
//! ```
//!
//! ## Example
//!
//! ```ignore
//! let ctx = ModelContext::in_memory(ModelConfig::default());
//! let mut product = ctx.create::<Product>();
//! product.canonical_url = "https://acme.example.com/x".into();
//! product.save()?;          // created, company_name = "example"
//! product.name = "Anvil".into();
//! assert!(product.is_dirty());
//! product.save()?;          // updated
//! product.delete();
//! product.save()?;          // deleted; the instance is new again
//! ```

mod context;
mod detector;

use std::cell::Cell;
use std::fmt;
use std::ops::{Deref, DerefMut};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::codec::SnapshotCodec;
use crate::dedup::{self, Resolution};
use crate::diff::ChangeSet;
use crate::document::{DocumentId, InsertMode, Schema};
use crate::error::ModelError;
use crate::store::{DocumentStore, Filter, StoreError};

pub use context::ModelContext;

/// Which store operation a `save()` resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Inserted (create or upsert).
    Created,
    /// Updated in place, including re-observed duplicates with changes.
    Updated,
    /// Deleted; the instance is new again.
    Deleted,
    /// Nothing to write.
    Unchanged,
}

/// A document plus its persistence state.
pub struct Tracked<D, S> {
    doc: D,
    original: Option<D>,
    is_new: bool,
    is_dirty: Cell<bool>,
    is_deleted: bool,
    ctx: ModelContext<S>,
}

impl<D: Schema, S: DocumentStore> Tracked<D, S> {
    /// A new, empty entity.
    pub fn new(ctx: ModelContext<S>) -> Self {
        Self::with_document(ctx, D::default())
    }

    /// Track `doc` as a new entity.
    pub fn with_document(ctx: ModelContext<S>, doc: D) -> Self {
        Tracked {
            doc,
            original: None,
            is_new: true,
            is_dirty: Cell::new(false),
            is_deleted: false,
            ctx,
        }
    }

    /// Track `doc` as already matching the store (e.g. a query result).
    pub fn from_stored(ctx: ModelContext<S>, doc: D) -> Result<Self, ModelError> {
        let mut tracked = Self::with_document(ctx, D::default());
        tracked.establish(doc, "load")?;
        Ok(tracked)
    }

    pub fn id(&self) -> DocumentId {
        self.doc.id()
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn into_inner(self) -> D {
        self.doc
    }

    /// The baseline last known to match the store, if any.
    pub fn original(&self) -> Option<&D> {
        self.original.as_ref()
    }

    pub fn context(&self) -> &ModelContext<S> {
        &self.ctx
    }

    /// True until the first successful save or load, and again after a delete is saved.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Compare the current fields against the baseline. Always false without one.
    pub fn is_dirty(&self) -> bool {
        let dirty = detector::detect(self.codec(), self.original.as_ref(), &self.doc);
        self.is_dirty.set(dirty);
        dirty
    }

    /// Field-level changes since the baseline; empty without one.
    pub fn changes(&self) -> Result<ChangeSet, ModelError> {
        match &self.original {
            Some(original) => {
                original
                    .diff(&self.doc)
                    .map_err(|source| ModelError::NotComparable {
                        schema: D::COLLECTION,
                        source,
                    })
            }
            None => Ok(ChangeSet::new()),
        }
    }

    /// Stage a delete. Nothing reaches the store until `save()`.
    pub fn delete(&mut self) {
        self.is_deleted = true;
    }

    /// Persist the current state.
    pub fn save(&mut self) -> Result<SaveOutcome, ModelError> {
        if !self.is_deleted {
            self.doc.normalize();
        }
        let outcome = match self.save_new()? {
            Some(outcome) => outcome,
            None => self.save_persisted()?,
        };
        self.settle()?;
        Ok(outcome)
    }

    /// Fetch `id` from the store, replacing all fields and the baseline.
    pub fn load(&mut self, id: DocumentId) -> Result<&D, ModelError> {
        let fetched: D = self.ctx.store().get_by_id(id).map_err(|err| match err {
            StoreError::NotFound { .. } => ModelError::NotFound {
                schema: D::COLLECTION,
                id: id.to_string(),
            },
            StoreError::Serde(reason) => ModelError::CastFailed {
                schema: D::COLLECTION,
                reason,
            },
            other => ModelError::QueryFailed {
                operation: "load",
                schema: D::COLLECTION,
                source: other,
            },
        })?;

        if fetched.id() != id {
            return Err(ModelError::CastFailed {
                schema: D::COLLECTION,
                reason: format!("requested {}, store returned {}", id, fetched.id()),
            });
        }

        self.establish(fetched, "load")?;
        debug!(collection = D::COLLECTION, %id, "loaded document");
        Ok(&self.doc)
    }

    /// Run a query for this schema; results are tracked as loaded.
    pub fn query(&self, filter: &Filter) -> Result<Vec<Tracked<D, S>>, ModelError> {
        self.ctx.query(filter)
    }

    /// Snapshot of the current fields in the configured encoding.
    pub fn serialize(&self) -> Result<Vec<u8>, ModelError> {
        self.codec()
            .encode(&self.doc)
            .map_err(ModelError::serialization("serialize", D::COLLECTION))
    }

    /// Replace all fields from a snapshot.
    ///
    /// A persisted entity takes the snapshot as its new baseline; a new entity
    /// stays new with no baseline.
    pub fn deserialize(&mut self, bytes: &[u8]) -> Result<(), ModelError> {
        let codec = self.codec();
        let doc: D = codec
            .decode(bytes)
            .map_err(ModelError::serialization("deserialize", D::COLLECTION))?;
        if !self.is_new {
            self.original = Some(
                codec
                    .round_trip(&doc)
                    .map_err(ModelError::serialization("deserialize", D::COLLECTION))?,
            );
        }
        self.doc = doc;
        self.is_dirty.set(false);
        Ok(())
    }

    /// Populate from an external JSON payload (e.g. a crawl result) as a new entity.
    pub fn parse(&mut self, json: &str) -> Result<(), ModelError> {
        let doc: D = SnapshotCodec::json()
            .decode(json.as_bytes())
            .map_err(ModelError::serialization("parse", D::COLLECTION))?;
        self.doc = doc;
        self.original = None;
        self.is_new = true;
        self.is_dirty.set(false);
        self.is_deleted = false;
        Ok(())
    }

    fn codec(&self) -> SnapshotCodec {
        self.ctx.codec()
    }

    /// New branch of `save()`. `None` means the document resolved to a stored
    /// record with changes and must continue down the update path.
    fn save_new(&mut self) -> Result<Option<SaveOutcome>, ModelError> {
        if !self.is_new {
            return Ok(None);
        }
        if self.is_deleted {
            debug!(collection = D::COLLECTION, "discarding delete staged on an unsaved document");
            return Ok(Some(SaveOutcome::Unchanged));
        }

        match dedup::resolve(self.ctx.store(), &self.doc)? {
            Resolution::Absent => self.insert().map(Some),
            Resolution::UpToDate(existing) => {
                debug!(
                    collection = D::COLLECTION,
                    id = %existing.id(),
                    "already stored and up to date"
                );
                self.doc = existing;
                Ok(Some(SaveOutcome::Unchanged))
            }
            Resolution::Changed { existing, changes } => {
                info!(
                    collection = D::COLLECTION,
                    id = %existing.id(),
                    %changes,
                    "re-observed document changed; updating stored record"
                );
                self.doc.adopt(&existing);
                self.original = Some(existing);
                self.is_new = false;
                self.is_dirty.set(true);
                Ok(None)
            }
        }
    }

    fn save_persisted(&mut self) -> Result<SaveOutcome, ModelError> {
        if self.is_dirty() && !self.is_deleted {
            self.update()
        } else if self.is_deleted && !self.is_new {
            self.remove()
        } else {
            Ok(SaveOutcome::Unchanged)
        }
    }

    fn insert(&mut self) -> Result<SaveOutcome, ModelError> {
        self.doc
            .before_insert()
            .map_err(|source| ModelError::ExtractionFailed {
                schema: D::COLLECTION,
                source,
            })?;
        if self.doc.id().is_nil() {
            self.doc.set_id(DocumentId::new());
        }
        self.doc.stamp_created(Utc::now());

        let store = self.ctx.store();
        match D::insert_mode() {
            InsertMode::Create => store
                .create(&self.doc)
                .map_err(ModelError::store_write("create", D::COLLECTION))?,
            InsertMode::Upsert => store
                .upsert(&self.doc)
                .map_err(ModelError::store_write("upsert", D::COLLECTION))?,
        }
        info!(collection = D::COLLECTION, id = %self.doc.id(), "created document");
        Ok(SaveOutcome::Created)
    }

    fn update(&mut self) -> Result<SaveOutcome, ModelError> {
        let id = self.persisted_id("update")?;
        self.doc.stamp_modified(Utc::now());
        self.ctx
            .store()
            .update(&self.doc, id)
            .map_err(ModelError::store_write("update", D::COLLECTION))?;
        info!(collection = D::COLLECTION, %id, "updated document");
        Ok(SaveOutcome::Updated)
    }

    fn remove(&mut self) -> Result<SaveOutcome, ModelError> {
        let id = self.persisted_id("delete")?;
        let existed = self
            .ctx
            .store()
            .delete::<D>(id)
            .map_err(ModelError::store_write("delete", D::COLLECTION))?;
        if !existed {
            warn!(collection = D::COLLECTION, %id, "document was already absent from the store");
        }
        // The identity is relinquished; saving again creates a fresh document.
        self.doc.set_id(DocumentId::nil());
        info!(collection = D::COLLECTION, %id, "deleted document");
        Ok(SaveOutcome::Deleted)
    }

    fn persisted_id(&self, operation: &'static str) -> Result<DocumentId, ModelError> {
        let id = self.doc.id();
        if !id.is_valid() {
            return Err(ModelError::InvalidIdentifier {
                operation,
                schema: D::COLLECTION,
                id: id.to_string(),
            });
        }
        Ok(id)
    }

    /// Post-condition shared by every successful `save()` branch.
    fn settle(&mut self) -> Result<(), ModelError> {
        self.is_new = self.is_deleted;
        self.is_dirty();
        self.is_deleted = false;

        if self.is_new {
            self.original = None;
        } else {
            let baseline = self
                .codec()
                .round_trip(&self.doc)
                .map_err(ModelError::serialization("save", D::COLLECTION))?;
            self.original = Some(baseline);
        }
        Ok(())
    }

    fn establish(&mut self, doc: D, operation: &'static str) -> Result<(), ModelError> {
        let baseline = self
            .codec()
            .round_trip(&doc)
            .map_err(ModelError::serialization(operation, D::COLLECTION))?;
        self.doc = doc;
        self.original = Some(baseline);
        self.is_new = false;
        self.is_dirty.set(false);
        self.is_deleted = false;
        Ok(())
    }
}

impl<D, S> Deref for Tracked<D, S> {
    type Target = D;

    fn deref(&self) -> &Self::Target {
        &self.doc
    }
}

impl<D, S> DerefMut for Tracked<D, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.doc
    }
}

impl<D: fmt::Debug, S> fmt::Debug for Tracked<D, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracked")
            .field("doc", &self.doc)
            .field("has_original", &self.original.is_some())
            .field("is_new", &self.is_new)
            .field("is_dirty", &self.is_dirty.get())
            .field("is_deleted", &self.is_deleted)
            .finish()
    }
}
