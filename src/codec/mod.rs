//! Snapshot Codec - canonical byte encoding of document field values.
//!
//! Both encodings are order-stable: a struct serializes its fields in
//! declaration order, so logically identical values always produce identical
//! bytes. Schemas must keep that property by using ordered collections
//! (`Vec`, `BTreeMap`) rather than `HashMap`.

mod error;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::document::Document;

pub use error::CodecError;

/// Byte format used for snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// serde_json; readable, interoperable with document stores.
    #[default]
    Json,
    /// bitcode; compact binary, cheaper to compare.
    Bitcode,
}

/// Serializes documents to snapshots and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SnapshotCodec {
    encoding: Encoding,
}

impl SnapshotCodec {
    pub fn new(encoding: Encoding) -> Self {
        SnapshotCodec { encoding }
    }

    pub fn json() -> Self {
        SnapshotCodec::new(Encoding::Json)
    }

    pub fn bitcode() -> Self {
        SnapshotCodec::new(Encoding::Bitcode)
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn encode<D: Document>(&self, doc: &D) -> Result<Vec<u8>, CodecError> {
        let result = match self.encoding {
            Encoding::Json => serde_json::to_vec(doc).map_err(|e| e.to_string()),
            Encoding::Bitcode => bitcode::serialize(doc).map_err(|e| e.to_string()),
        };
        result.map_err(|reason| CodecError::EncodingFailed {
            schema: D::COLLECTION,
            reason,
        })
    }

    pub fn decode<D: Document>(&self, bytes: &[u8]) -> Result<D, CodecError> {
        let result = match self.encoding {
            Encoding::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            Encoding::Bitcode => bitcode::deserialize(bytes).map_err(|e| e.to_string()),
        };
        result.map_err(|reason| CodecError::DecodingFailed {
            schema: D::COLLECTION,
            reason,
        })
    }

    /// Encode then decode, yielding an independent copy that holds exactly
    /// what the codec reproduces.
    pub fn round_trip<D: Document>(&self, doc: &D) -> Result<D, CodecError> {
        let bytes = self.encode(doc)?;
        self.decode(&bytes)
    }

    /// Encode to base64 text, for transports that only carry strings.
    pub fn to_base64<D: Document>(&self, doc: &D) -> Result<String, CodecError> {
        Ok(STANDARD.encode(self.encode(doc)?))
    }

    pub fn from_base64<D: Document>(&self, text: &str) -> Result<D, CodecError> {
        let bytes = STANDARD
            .decode(text)
            .map_err(|e| CodecError::DecodingFailed {
                schema: D::COLLECTION,
                reason: e.to_string(),
            })?;
        self.decode(&bytes)
    }
}
