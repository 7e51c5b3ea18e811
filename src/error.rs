use crate::codec::CodecError;
use crate::diff::DiffError;
use crate::document::ExtractionError;
use crate::store::StoreError;

/// Errors surfaced by lifecycle operations.
///
/// Every variant names the schema (collection) involved, and store-originated
/// variants also name the operation that failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Snapshot encode/decode failed while saving, loading or deserializing.
    #[error("{operation} {schema}: {source}")]
    Serialization {
        operation: &'static str,
        schema: &'static str,
        #[source]
        source: CodecError,
    },
    /// A derived field could not be computed before insert.
    #[error("save {schema}: {source}")]
    ExtractionFailed {
        schema: &'static str,
        #[source]
        source: ExtractionError,
    },
    /// An update was attempted on a document without a persisted identifier.
    #[error("{operation} {schema}: invalid identifier {id}")]
    InvalidIdentifier {
        operation: &'static str,
        schema: &'static str,
        id: String,
    },
    #[error("{operation} {schema}: store write failed: {source}")]
    StoreWriteFailed {
        operation: &'static str,
        schema: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("{operation} {schema}: query failed: {source}")]
    QueryFailed {
        operation: &'static str,
        schema: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("load {schema}: no document with id {id}")]
    NotFound { schema: &'static str, id: String },
    /// The store returned something that is not a valid `schema` document.
    #[error("load {schema}: store returned an incompatible document: {reason}")]
    CastFailed { schema: &'static str, reason: String },
    #[error("compare {schema}: {source}")]
    NotComparable {
        schema: &'static str,
        #[source]
        source: DiffError,
    },
}

impl ModelError {
    pub(crate) fn serialization(
        operation: &'static str,
        schema: &'static str,
    ) -> impl FnOnce(CodecError) -> ModelError {
        move |source| ModelError::Serialization {
            operation,
            schema,
            source,
        }
    }

    pub(crate) fn store_write(
        operation: &'static str,
        schema: &'static str,
    ) -> impl FnOnce(StoreError) -> ModelError {
        move |source| ModelError::StoreWriteFailed {
            operation,
            schema,
            source,
        }
    }

    pub(crate) fn query(
        operation: &'static str,
        schema: &'static str,
    ) -> impl FnOnce(StoreError) -> ModelError {
        move |source| ModelError::QueryFailed {
            operation,
            schema,
            source,
        }
    }

    /// True for a missing document on load.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ModelError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_operation_and_schema() {
        let err = ModelError::store_write("update", "products")(StoreError::Storage(
            "disk full".into(),
        ));
        assert_eq!(
            err.to_string(),
            "update products: store write failed: document storage error: disk full"
        );
    }

    #[test]
    fn not_found_is_distinguishable() {
        let err = ModelError::NotFound {
            schema: "categories",
            id: "x".into(),
        };
        assert!(err.is_not_found());
        assert!(!ModelError::CastFailed {
            schema: "categories",
            reason: "bad".into()
        }
        .is_not_found());
    }
}
