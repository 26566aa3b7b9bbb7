//! Storage backend trait definition.

use crate::error::StorageResult;

/// A keyed byte store.
///
/// Storage backends are **opaque byte stores**. Each key holds exactly one
/// payload which is always written and read as a whole. The backend does
/// not understand the payloads it holds.
///
/// # Invariants
///
/// - `read` returns exactly the bytes of the last `write` for that key
/// - `create_exclusive` succeeds at most once per key until it is removed
/// - `read_all` yields entries ordered by key
/// - Backends must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::DirBackend`] - For persistent storage
/// - [`super::InMemoryBackend`] - For testing
pub trait StorageBackend: Send + Sync {
    /// Prepares the backend for use. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying location cannot be created.
    fn setup(&self) -> StorageResult<()>;

    /// Reads the payload stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing is stored under `key`, or an I/O error.
    fn read(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Stores `data` under `key`, replacing any previous payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or an I/O error occurs.
    fn write(&self, key: &str, data: &[u8]) -> StorageResult<()>;

    /// Reserves `key` with an empty payload.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if a payload is already stored under `key`.
    fn create_exclusive(&self, key: &str) -> StorageResult<()>;

    /// Removes the payload stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing is stored under `key`, or an I/O error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Returns whether a payload is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or existence cannot be determined.
    fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Reads every stored entry as `(entry name, payload)` pairs.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; no partial results are returned.
    fn read_all(&self) -> StorageResult<Vec<(String, Vec<u8>)>>;
}
