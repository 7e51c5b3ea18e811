//! Field Differ - structural, per-field comparison of two documents.
//!
//! Implementations are generated by `#[derive(Diff)]`, which compares every
//! participating field with `PartialEq` (deep equality over nested structs and
//! sequences) and records the old and new value of each field that differs.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Explicit field-by-field comparison for a fixed schema.
pub trait Diff {
    /// Names of the fields that participate in the comparison, in declaration order.
    const FIELDS: &'static [&'static str];

    /// Compare `self` (old) against `other` (new).
    fn diff(&self, other: &Self) -> Result<ChangeSet, DiffError>;
}

/// Compare two documents of the same schema.
pub fn diff<D: Diff>(old: &D, new: &D) -> Result<ChangeSet, DiffError> {
    old.diff(new)
}

/// Old and new value of a changed field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub old: Value,
    pub new: Value,
}

/// Fields that differ between two documents, keyed by field name.
///
/// Built fresh for each comparison and only used as a decision input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    changes: HashMap<&'static str, FieldChange>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a differing field.
    pub fn record<T: Serialize + ?Sized>(
        &mut self,
        field: &'static str,
        old: &T,
        new: &T,
    ) -> Result<(), DiffError> {
        let old = to_value(field, old)?;
        let new = to_value(field, new)?;
        self.changes.insert(field, FieldChange { old, new });
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.changes.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.changes.contains_key(field)
    }

    /// Changed field names, sorted.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<_> = self.changes.keys().copied().collect();
        fields.sort_unstable();
        fields
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldChange)> {
        self.changes.iter().map(|(field, change)| (*field, change))
    }
}

impl fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, field) in self.fields().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            let change = &self.changes[field];
            write!(f, "{}: {} -> {}", field, change.old, change.new)?;
        }
        write!(f, "}}")
    }
}

fn to_value<T: Serialize + ?Sized>(field: &'static str, value: &T) -> Result<Value, DiffError> {
    serde_json::to_value(value).map_err(|e| DiffError::NotComparable {
        field,
        reason: e.to_string(),
    })
}

/// A field value could not be captured for comparison.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    #[error("field {field} is not comparable: {reason}")]
    NotComparable { field: &'static str, reason: String },
}
