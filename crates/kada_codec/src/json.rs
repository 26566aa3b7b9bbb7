//! JSON codec.

use crate::error::{CodecError, CodecResult};
use crate::Codec;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encodes records as compact JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl<T> Codec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, record: &T) -> CodecResult<Vec<u8>> {
        serde_json::to_vec(record).map_err(|err| CodecError::encoding_failed(err.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<T> {
        serde_json::from_slice(bytes).map_err(|err| CodecError::decoding_failed(err.to_string()))
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
