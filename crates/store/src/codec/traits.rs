//! Codec trait definition.

use provision_core::Value;

/// Encodes/decodes a content value to/from the bytes a physical store
/// persists.
///
/// All bytes that leave or enter a physical store pass through a codec.
/// Implementations must be `Send + Sync`: stores may be shared across
/// reader threads.
pub trait Codec: Send + Sync {
    /// Serialize a value to bytes.
    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError>;

    /// Deserialize bytes back to a value.
    fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError>;

    /// The codec's identifier, as it appears in a store URI's `codec=`
    /// query parameter.
    fn id(&self) -> &'static str;
}

/// Errors a codec can raise.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CodecError {
    /// Encoding failed.
    #[error("encode error: {0}")]
    Encode(String),
    /// Decoding failed — malformed or truncated input.
    #[error("decode error: {0}")]
    Decode(String),
    /// The `codec=` query parameter named a codec this crate doesn't know.
    #[error("unknown codec: {0}")]
    Unknown(String),
}

impl From<CodecError> for provision_core::Error {
    fn from(e: CodecError) -> Self {
        provision_core::Error::Codec(e.to_string())
    }
}
