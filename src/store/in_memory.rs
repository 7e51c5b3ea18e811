//! InMemoryDocumentStore - HashMap-backed document store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use super::{DocumentStore, Filter, StoreError};
use crate::config::DataStoreConfig;
use crate::document::{Document, DocumentId};

/// Internal stored representation of a document.
struct StoredDocument {
    bytes: Vec<u8>,
    sequence: u64,
}

#[derive(Default)]
struct Storage {
    documents: HashMap<String, StoredDocument>,
    next_sequence: u64,
}

/// In-memory document store backed by a HashMap.
///
/// Storage key is `"database.COLLECTION:id"`. Clone-friendly via Arc.
#[derive(Clone)]
pub struct InMemoryDocumentStore {
    database: String,
    storage: Arc<RwLock<Storage>>,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::with_database("default")
    }

    pub fn with_database(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            storage: Arc::new(RwLock::new(Storage::default())),
        }
    }

    /// Create a store namespaced by the configured database name.
    pub fn from_config(config: &DataStoreConfig) -> Self {
        Self::with_database(config.database_name.clone())
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Number of documents stored in `D`'s collection.
    pub fn count<D: Document>(&self) -> Result<usize, StoreError> {
        let prefix = self.prefix(D::COLLECTION);
        let storage = self.read()?;
        Ok(storage
            .documents
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .count())
    }

    fn prefix(&self, collection: &str) -> String {
        format!("{}.{}:", self.database, collection)
    }

    fn make_key(&self, collection: &str, id: DocumentId) -> String {
        format!("{}{}", self.prefix(collection), id)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Storage>, StoreError> {
        self.storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Storage>, StoreError> {
        self.storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }

    fn encode<D: Document>(doc: &D) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(doc).map_err(|e| StoreError::Serde(e.to_string()))
    }

    fn require_id<D: Document>(id: DocumentId) -> Result<(), StoreError> {
        if id.is_nil() {
            return Err(StoreError::Storage(format!(
                "{} document has no identifier",
                D::COLLECTION
            )));
        }
        Ok(())
    }
}

impl Storage {
    fn put(&mut self, key: String, bytes: Vec<u8>) {
        match self.documents.get_mut(&key) {
            Some(stored) => {
                stored.bytes = bytes;
            }
            None => {
                self.next_sequence += 1;
                self.documents.insert(
                    key,
                    StoredDocument {
                        bytes,
                        sequence: self.next_sequence,
                    },
                );
            }
        }
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn create<D: Document>(&self, doc: &D) -> Result<(), StoreError> {
        Self::require_id::<D>(doc.id())?;
        let key = self.make_key(D::COLLECTION, doc.id());
        let bytes = Self::encode(doc)?;

        let mut storage = self.write()?;
        if storage.documents.contains_key(&key) {
            return Err(StoreError::Conflict {
                collection: D::COLLECTION.to_string(),
                id: doc.id().to_string(),
            });
        }
        storage.put(key, bytes);
        Ok(())
    }

    fn upsert<D: Document>(&self, doc: &D) -> Result<(), StoreError> {
        Self::require_id::<D>(doc.id())?;
        let key = self.make_key(D::COLLECTION, doc.id());
        let bytes = Self::encode(doc)?;

        self.write()?.put(key, bytes);
        Ok(())
    }

    fn update<D: Document>(&self, doc: &D, id: DocumentId) -> Result<(), StoreError> {
        let key = self.make_key(D::COLLECTION, id);
        let bytes = Self::encode(doc)?;

        let mut storage = self.write()?;
        if !storage.documents.contains_key(&key) {
            return Err(StoreError::NotFound {
                collection: D::COLLECTION.to_string(),
                id: id.to_string(),
            });
        }
        storage.put(key, bytes);
        Ok(())
    }

    fn delete<D: Document>(&self, id: DocumentId) -> Result<bool, StoreError> {
        let key = self.make_key(D::COLLECTION, id);
        Ok(self.write()?.documents.remove(&key).is_some())
    }

    fn get_by_id<D: Document>(&self, id: DocumentId) -> Result<D, StoreError> {
        let key = self.make_key(D::COLLECTION, id);
        let storage = self.read()?;

        match storage.documents.get(&key) {
            Some(stored) => {
                serde_json::from_slice(&stored.bytes).map_err(|e| StoreError::Serde(e.to_string()))
            }
            None => Err(StoreError::NotFound {
                collection: D::COLLECTION.to_string(),
                id: id.to_string(),
            }),
        }
    }

    fn query<D: Document>(&self, filter: &Filter) -> Result<Vec<D>, StoreError> {
        let prefix = self.prefix(D::COLLECTION);
        let storage = self.read()?;

        let mut matched: Vec<(u64, Value)> = Vec::new();
        for (key, stored) in storage.documents.iter() {
            if !key.starts_with(&prefix) {
                continue;
            }
            let value: Value = serde_json::from_slice(&stored.bytes)
                .map_err(|e| StoreError::Serde(e.to_string()))?;
            if filter.matches(&value) {
                matched.push((stored.sequence, value));
            }
        }
        matched.sort_by_key(|(sequence, _)| *sequence);

        matched
            .into_iter()
            .map(|(_, value)| {
                serde_json::from_value(value).map_err(|e| StoreError::Serde(e.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, docstate_macros::Document)]
    #[document(collection = "test_docs")]
    struct TestDoc {
        id: DocumentId,
        name: String,
        value: i32,
    }

    fn doc(name: &str, value: i32) -> TestDoc {
        TestDoc {
            id: DocumentId::new(),
            name: name.into(),
            value,
        }
    }

    #[test]
    fn create_and_get() {
        let store = InMemoryDocumentStore::new();
        let d = doc("a", 42);

        store.create(&d).unwrap();
        let loaded: TestDoc = store.get_by_id(d.id).unwrap();
        assert_eq!(loaded, d);
        assert_eq!(store.count::<TestDoc>().unwrap(), 1);
    }

    #[test]
    fn create_fails_on_existing() {
        let store = InMemoryDocumentStore::new();
        let d = doc("a", 1);

        store.create(&d).unwrap();
        let err = store.create(&d).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[test]
    fn create_requires_identifier() {
        let store = InMemoryDocumentStore::new();
        let mut d = doc("a", 1);
        d.id = DocumentId::nil();
        assert!(matches!(store.create(&d), Err(StoreError::Storage(_))));
    }

    #[test]
    fn upsert_inserts_then_replaces() {
        let store = InMemoryDocumentStore::new();
        let mut d = doc("a", 1);

        store.upsert(&d).unwrap();
        d.value = 2;
        store.upsert(&d).unwrap();

        let loaded: TestDoc = store.get_by_id(d.id).unwrap();
        assert_eq!(loaded.value, 2);
        assert_eq!(store.count::<TestDoc>().unwrap(), 1);
    }

    #[test]
    fn update_missing_is_not_found() {
        let store = InMemoryDocumentStore::new();
        let d = doc("a", 1);
        let err = store.update(&d, d.id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = InMemoryDocumentStore::new();
        let err = store.get_by_id::<TestDoc>(DocumentId::new()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn delete_existing_and_missing() {
        let store = InMemoryDocumentStore::new();
        let d = doc("a", 1);
        store.create(&d).unwrap();

        assert!(store.delete::<TestDoc>(d.id).unwrap());
        assert!(!store.delete::<TestDoc>(d.id).unwrap());
        assert_eq!(store.count::<TestDoc>().unwrap(), 0);
    }

    #[test]
    fn query_returns_matches_in_insertion_order() {
        let store = InMemoryDocumentStore::new();
        let first = doc("x", 1);
        let other = doc("y", 2);
        let second = doc("x", 3);
        store.create(&first).unwrap();
        store.create(&other).unwrap();
        store.create(&second).unwrap();

        let found: Vec<TestDoc> = store.query(&Filter::new().eq("name", "x")).unwrap();
        assert_eq!(found, vec![first, second]);
    }

    #[test]
    fn databases_are_isolated_but_clones_share() {
        let store = InMemoryDocumentStore::with_database("one");
        let other = InMemoryDocumentStore::with_database("two");
        let clone = store.clone();
        let d = doc("a", 1);
        store.create(&d).unwrap();

        assert!(clone.get_by_id::<TestDoc>(d.id).is_ok());
        assert!(other.get_by_id::<TestDoc>(d.id).is_err());
    }
}
