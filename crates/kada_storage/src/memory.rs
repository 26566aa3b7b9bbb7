//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use crate::key::validate_key;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// An in-memory storage backend.
///
/// This backend keeps all payloads in a sorted map and is suitable for:
/// - Unit tests
/// - Ephemeral stores that don't need persistence
///
/// Keys are validated exactly like [`super::DirBackend`] validates them, so
/// code tested against this backend behaves the same on disk.
///
/// # Example
///
/// ```rust
/// use kada_storage::{StorageBackend, InMemoryBackend};
///
/// let backend = InMemoryBackend::new();
/// backend.create_exclusive("coding-start").unwrap();
/// assert!(backend.create_exclusive("coding-start").is_err());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl StorageBackend for InMemoryBackend {
    fn setup(&self) -> StorageResult<()> {
        Ok(())
    }

    fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        validate_key(key)?;
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(key))
    }

    fn write(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        validate_key(key)?;
        self.entries.write().insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn create_exclusive(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        let mut entries = self.entries.write();
        if entries.contains_key(key) {
            return Err(StorageError::already_exists(key));
        }
        entries.insert(key.to_string(), Vec::new());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.entries
            .write()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found(key))
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        validate_key(key)?;
        Ok(self.entries.read().contains_key(key))
    }

    fn read_all(&self) -> StorageResult<Vec<(String, Vec<u8>)>> {
        Ok(self
            .entries
            .read()
            .iter()
            .map(|(key, data)| (key.clone(), data.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_write_and_read() {
        let backend = InMemoryBackend::new();
        backend.write("coding", b"hello").unwrap();
        assert_eq!(backend.read("coding").unwrap(), b"hello");
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn memory_write_overwrites() {
        let backend = InMemoryBackend::new();
        backend.write("coding", b"first").unwrap();
        backend.write("coding", b"second").unwrap();
        assert_eq!(backend.read("coding").unwrap(), b"second");
    }

    #[test]
    fn memory_read_missing() {
        let backend = InMemoryBackend::new();
        assert!(matches!(
            backend.read("missing"),
            Err(StorageError::NotFound { .. })
        ));
    }

    #[test]
    fn memory_create_exclusive_twice() {
        let backend = InMemoryBackend::new();
        backend.create_exclusive("coding-start").unwrap();
        assert!(backend.read("coding-start").unwrap().is_empty());
        assert!(matches!(
            backend.create_exclusive("coding-start"),
            Err(StorageError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn memory_remove() {
        let backend = InMemoryBackend::new();
        backend.write("coding", b"x").unwrap();
        backend.remove("coding").unwrap();
        assert!(!backend.exists("coding").unwrap());
        assert!(matches!(
            backend.remove("coding"),
            Err(StorageError::NotFound { .. })
        ));
    }

    #[test]
    fn memory_read_all_sorted() {
        let backend = InMemoryBackend::new();
        backend.write("b", b"2").unwrap();
        backend.write("a", b"1").unwrap();

        let all = backend.read_all().unwrap();
        assert_eq!(
            all,
            vec![("a".to_string(), b"1".to_vec()), ("b".to_string(), b"2".to_vec())]
        );
    }

    #[test]
    fn memory_rejects_invalid_key() {
        let backend = InMemoryBackend::new();
        assert!(matches!(
            backend.write("../x", b"x"),
            Err(StorageError::InvalidKey { .. })
        ));
        assert!(backend.is_empty());
    }
}
