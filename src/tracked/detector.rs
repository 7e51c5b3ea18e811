//! Change Detector - snapshot comparison against the last known store state.

use tracing::warn;

use crate::codec::SnapshotCodec;
use crate::document::Document;

/// True iff `current` encodes differently from `original`.
///
/// No baseline means the document is new, not dirty. An encoding failure on
/// either side also reports clean, so a transient codec error never causes a write.
pub(crate) fn detect<D: Document>(codec: SnapshotCodec, original: Option<&D>, current: &D) -> bool {
    let Some(original) = original else {
        return false;
    };

    let original_bytes = match codec.encode(original) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(collection = D::COLLECTION, error = %err, "baseline encoding failed; treating as clean");
            return false;
        }
    };
    let current_bytes = match codec.encode(current) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(collection = D::COLLECTION, error = %err, "current encoding failed; treating as clean");
            return false;
        }
    };

    original_bytes != current_bytes
}
