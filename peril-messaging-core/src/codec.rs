//! Wire encodings for payloads.
//!
//! Publisher and subscribers on one routing key agree on the codec out of
//! band; the content type stamped on each message is only a hint.

use std::error::Error as StdError;

use serde::{de::DeserializeOwned, Serialize};

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const BINCODE_CONTENT_TYPE: &str = "application/x-bincode";

type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("{format} encode failed: {source}")]
    Encode {
        format: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("{format} decode failed: {source}")]
    Decode {
        format: &'static str,
        #[source]
        source: BoxError,
    },
}

impl CodecError {
    pub fn encode(format: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Encode {
            format,
            source: source.into(),
        }
    }

    pub fn decode(format: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Decode {
            format,
            source: source.into(),
        }
    }
}

/// A symmetric encode/decode pair.
///
/// Implementations must satisfy `decode(encode(v)) == v` for every value
/// of a payload type.
pub trait Codec: Send + Sync + 'static {
    /// The content type stamped on outgoing messages.
    fn content_type(&self) -> &'static str;

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError>;
}

/// JSON via `serde_json`. Used for the small structured game events.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|e| CodecError::encode("json", e))
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(data).map_err(|e| CodecError::decode("json", e))
    }
}

/// Compact binary encoding via `bincode`. Used for append-only log records.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn content_type(&self) -> &'static str {
        BINCODE_CONTENT_TYPE
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(value).map_err(|e| CodecError::encode("bincode", e))
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        bincode::deserialize(data).map_err(|e| CodecError::decode("bincode", e))
    }
}
