//! Store wrapper that counts calls and injects failures.

use std::collections::HashMap;
use std::sync::Mutex;

use docstate::{Document, DocumentId, DocumentStore, Filter, InMemoryDocumentStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Create,
    Upsert,
    Update,
    Delete,
    GetById,
    Query,
}

struct Failure {
    op: Op,
    collection: &'static str,
    remaining_successes: usize,
}

/// `InMemoryDocumentStore` that records every call per (operation, collection).
#[derive(Default)]
pub struct RecordingStore {
    inner: InMemoryDocumentStore,
    calls: Mutex<HashMap<(Op, &'static str), usize>>,
    failures: Mutex<Vec<Failure>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemoryDocumentStore {
        &self.inner
    }

    /// Calls of `op` on `D`'s collection so far.
    pub fn calls<D: Document>(&self, op: Op) -> usize {
        let calls = self.calls.lock().unwrap();
        calls.get(&(op, D::COLLECTION)).copied().unwrap_or(0)
    }

    /// Create, upsert, update and delete calls on `D`'s collection.
    pub fn writes<D: Document>(&self) -> usize {
        [Op::Create, Op::Upsert, Op::Update, Op::Delete]
            .into_iter()
            .map(|op| self.calls::<D>(op))
            .sum()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Let `successes` more `op` calls on `D`'s collection through, then fail every one after.
    pub fn fail_after<D: Document>(&self, op: Op, successes: usize) {
        self.failures.lock().unwrap().push(Failure {
            op,
            collection: D::COLLECTION,
            remaining_successes: successes,
        });
    }

    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    pub fn count<D: Document>(&self) -> usize {
        self.inner.count::<D>().unwrap()
    }

    fn record<D: Document>(&self, op: Op) -> Result<(), StoreError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry((op, D::COLLECTION))
            .or_insert(0) += 1;

        let mut failures = self.failures.lock().unwrap();
        for failure in failures.iter_mut() {
            if failure.op != op || failure.collection != D::COLLECTION {
                continue;
            }
            if failure.remaining_successes == 0 {
                return Err(StoreError::Storage(format!(
                    "injected {:?} failure on {}",
                    op,
                    D::COLLECTION
                )));
            }
            failure.remaining_successes -= 1;
        }
        Ok(())
    }
}

impl DocumentStore for RecordingStore {
    fn create<D: Document>(&self, doc: &D) -> Result<(), StoreError> {
        self.record::<D>(Op::Create)?;
        self.inner.create(doc)
    }

    fn upsert<D: Document>(&self, doc: &D) -> Result<(), StoreError> {
        self.record::<D>(Op::Upsert)?;
        self.inner.upsert(doc)
    }

    fn update<D: Document>(&self, doc: &D, id: DocumentId) -> Result<(), StoreError> {
        self.record::<D>(Op::Update)?;
        self.inner.update(doc, id)
    }

    fn delete<D: Document>(&self, id: DocumentId) -> Result<bool, StoreError> {
        self.record::<D>(Op::Delete)?;
        self.inner.delete::<D>(id)
    }

    fn get_by_id<D: Document>(&self, id: DocumentId) -> Result<D, StoreError> {
        self.record::<D>(Op::GetById)?;
        self.inner.get_by_id(id)
    }

    fn query<D: Document>(&self, filter: &Filter) -> Result<Vec<D>, StoreError> {
        self.record::<D>(Op::Query)?;
        self.inner.query(filter)
    }
}
