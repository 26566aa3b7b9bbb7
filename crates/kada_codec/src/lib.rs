//! # kada codec
//!
//! Record encoding/decoding for kada.
//!
//! A [`Codec`] turns a record into the byte payload stored for it and back.
//! Codecs are selected by type when a store is constructed, so there is no
//! dynamic dispatch on the hot path.
//!
//! ## Available Codecs
//!
//! - [`JsonCodec`] - Human-readable JSON, the default on-disk format
//! - [`CborCodec`] - Compact CBOR
//!
//! ## Usage
//!
//! ```
//! use kada_codec::{Codec, JsonCodec};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Entry {
//!     name: String,
//! }
//!
//! let entry = Entry { name: "coding".into() };
//! let bytes = JsonCodec.encode(&entry).unwrap();
//! let decoded: Entry = JsonCodec.decode(&bytes).unwrap();
//! assert_eq!(entry, decoded);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cbor;
mod error;
mod json;

pub use cbor::CborCodec;
pub use error::{CodecError, CodecResult};
pub use json::JsonCodec;

/// Encodes and decodes records of type `T`.
///
/// Implementations must round-trip: `decode(encode(r)) == r` for every
/// record they accept. They have no side effects.
pub trait Codec<T>: Send + Sync {
    /// Encodes `record` into a byte payload.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EncodingFailed`] if the record cannot be represented.
    fn encode(&self, record: &T) -> CodecResult<Vec<u8>>;

    /// Decodes a record from `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::DecodingFailed`] on malformed or truncated input.
    fn decode(&self, bytes: &[u8]) -> CodecResult<T>;

    /// File extension for payloads in this format, without the leading dot.
    fn extension(&self) -> &'static str;
}
