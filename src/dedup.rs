//! Deduplication / Upsert Resolver.
//!
//! A new document is looked up by its schema's natural key before insert. A
//! match with differing fields turns the insert into an update of the stored
//! record; an exact match means the store is already up to date.

use tracing::debug;

use crate::diff::ChangeSet;
use crate::document::Schema;
use crate::error::ModelError;
use crate::store::DocumentStore;

/// Outcome of resolving a new document against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<D> {
    /// No stored document shares the natural key.
    Absent,
    /// The first match equals the incoming document on every compared field.
    UpToDate(D),
    /// The first match differs; `changes` maps field to (stored, incoming).
    Changed { existing: D, changes: ChangeSet },
}

/// Stored documents sharing `doc`'s natural key, in store order.
pub fn find_existing<D: Schema, S: DocumentStore>(
    store: &S,
    doc: &D,
) -> Result<Vec<D>, ModelError> {
    store
        .query(&doc.natural_key())
        .map_err(ModelError::query("find_existing", D::COLLECTION))
}

/// Decide between insert, no-op, and merge-then-update for a new document.
pub fn resolve<D: Schema, S: DocumentStore>(
    store: &S,
    doc: &D,
) -> Result<Resolution<D>, ModelError> {
    let matches = find_existing(store, doc)?;
    let count = matches.len();
    let Some(existing) = matches.into_iter().next() else {
        return Ok(Resolution::Absent);
    };
    if count > 1 {
        debug!(
            collection = D::COLLECTION,
            count,
            id = %existing.id(),
            "natural key matched several documents; using the first"
        );
    }

    let changes = existing
        .diff(doc)
        .map_err(|source| ModelError::NotComparable {
            schema: D::COLLECTION,
            source,
        })?;

    if changes.is_empty() {
        Ok(Resolution::UpToDate(existing))
    } else {
        Ok(Resolution::Changed { existing, changes })
    }
}
