/// Snapshot codec failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode {schema} snapshot: {reason}")]
    EncodingFailed { schema: &'static str, reason: String },
    #[error("failed to decode {schema} snapshot: {reason}")]
    DecodingFailed { schema: &'static str, reason: String },
}
