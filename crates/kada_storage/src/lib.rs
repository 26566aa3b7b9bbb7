//! # kada storage
//!
//! Keyed byte storage for kada.
//!
//! This crate provides the lowest-level storage abstraction. Backends are
//! **opaque byte stores** addressed by string keys - they do not interpret
//! the payloads they hold.
//!
//! ## Design Principles
//!
//! - One payload per key, written and read as a whole
//! - Exclusive creation is the only operation guarded against other writers
//! - No knowledge of marks, spans or codecs
//!
//! ## Available Backends
//!
//! - [`DirBackend`] - One file per key inside a directory
//! - [`InMemoryBackend`] - For testing and ephemeral storage
//!
//! ## Example
//!
//! ```rust
//! use kada_storage::{StorageBackend, InMemoryBackend};
//!
//! let backend = InMemoryBackend::new();
//! backend.write("coding-start", b"hello world").unwrap();
//! assert_eq!(backend.read("coding-start").unwrap(), b"hello world");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod dir;
mod error;
mod key;
mod memory;

pub use backend::StorageBackend;
pub use dir::DirBackend;
pub use error::{StorageError, StorageResult};
pub use key::validate_key;
pub use memory::InMemoryBackend;
