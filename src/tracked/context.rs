//! ModelContext - the store and configuration an entity is constructed with.

use std::sync::Arc;

use super::Tracked;
use crate::codec::SnapshotCodec;
use crate::config::ModelConfig;
use crate::document::{DocumentId, Schema};
use crate::error::ModelError;
use crate::store::{DocumentStore, Filter, InMemoryDocumentStore};

/// Immutable store handle plus configuration, shared by every entity built from it.
///
/// Cloning is cheap; clones share the store and the configuration.
pub struct ModelContext<S> {
    store: Arc<S>,
    config: Arc<ModelConfig>,
}

impl<S> Clone for ModelContext<S> {
    fn clone(&self) -> Self {
        ModelContext {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
        }
    }
}

impl ModelContext<InMemoryDocumentStore> {
    /// Context over an in-memory store namespaced by `config.data_store.database_name`.
    pub fn in_memory(config: ModelConfig) -> Self {
        let store = InMemoryDocumentStore::from_config(&config.data_store);
        ModelContext::new(store, config)
    }
}

impl<S: DocumentStore> ModelContext<S> {
    pub fn new(store: S, config: ModelConfig) -> Self {
        ModelContext::from_shared(Arc::new(store), Arc::new(config))
    }

    pub fn from_shared(store: Arc<S>, config: Arc<ModelConfig>) -> Self {
        ModelContext { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn shared_store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Codec for the configured snapshot encoding.
    pub fn codec(&self) -> SnapshotCodec {
        SnapshotCodec::new(self.config.snapshot.encoding)
    }

    /// A new, empty entity.
    pub fn create<D: Schema>(&self) -> Tracked<D, S> {
        Tracked::new(self.clone())
    }

    /// Track a document that has not been persisted yet.
    pub fn track<D: Schema>(&self, doc: D) -> Tracked<D, S> {
        Tracked::with_document(self.clone(), doc)
    }

    /// Fetch a document by identifier.
    pub fn load<D: Schema>(&self, id: DocumentId) -> Result<Tracked<D, S>, ModelError> {
        let mut tracked: Tracked<D, S> = Tracked::new(self.clone());
        tracked.load(id)?;
        Ok(tracked)
    }

    /// Run a query and track every result as loaded.
    pub fn query<D: Schema>(&self, filter: &Filter) -> Result<Vec<Tracked<D, S>>, ModelError> {
        let docs: Vec<D> = self
            .store
            .query(filter)
            .map_err(ModelError::query("query", D::COLLECTION))?;
        docs.into_iter()
            .map(|doc| Tracked::from_stored(self.clone(), doc))
            .collect()
    }
}
