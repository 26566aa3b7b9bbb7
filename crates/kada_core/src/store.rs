//! Typed record store.

use crate::error::CoreResult;
use kada_codec::Codec;
use kada_storage::StorageBackend;
use std::marker::PhantomData;
use tracing::warn;

/// A store of records of one type.
///
/// `RecordStore<T, C>` joins an opaque [`StorageBackend`] with a [`Codec`]
/// for `T`: records are encoded on the way in and decoded on the way out,
/// one payload per key.
///
/// # Example
///
/// ```rust
/// use kada_codec::JsonCodec;
/// use kada_core::{Mark, RecordStore};
/// use kada_storage::InMemoryBackend;
///
/// let marks: RecordStore<Mark, _> =
///     RecordStore::new(Box::new(InMemoryBackend::new()), JsonCodec);
///
/// let mark = Mark::new("coding", "").as_start();
/// marks.put(&mark.name, &mark).unwrap();
/// assert_eq!(marks.get("coding-start").unwrap(), mark);
/// ```
pub struct RecordStore<T, C> {
    backend: Box<dyn StorageBackend>,
    codec: C,
    _marker: PhantomData<fn() -> T>,
}

impl<T, C: Codec<T>> RecordStore<T, C> {
    /// Creates a store over `backend` using `codec`.
    pub fn new(backend: Box<dyn StorageBackend>, codec: C) -> Self {
        Self {
            backend,
            codec,
            _marker: PhantomData,
        }
    }

    /// Prepares the underlying backend. Idempotent.
    pub fn setup(&self) -> CoreResult<()> {
        self.backend.setup()?;
        Ok(())
    }

    /// Encodes `record` and stores it under `key`, overwriting unconditionally.
    ///
    /// Callers needing create semantics must check [`Self::exists`] or
    /// reserve the key with [`Self::create_exclusive`] first.
    pub fn put(&self, key: &str, record: &T) -> CoreResult<()> {
        let bytes = self.codec.encode(record)?;
        self.backend.write(key, &bytes)?;
        Ok(())
    }

    /// Reserves `key` with an empty placeholder.
    ///
    /// Fails with an already-exists storage error if the key is taken.
    pub fn create_exclusive(&self, key: &str) -> CoreResult<()> {
        self.backend.create_exclusive(key)?;
        Ok(())
    }

    /// Reads and decodes the record stored under `key`.
    pub fn get(&self, key: &str) -> CoreResult<T> {
        let bytes = self.backend.read(key)?;
        Ok(self.codec.decode(&bytes)?)
    }

    /// Removes the record stored under `key`.
    pub fn delete(&self, key: &str) -> CoreResult<()> {
        self.backend.remove(key)?;
        Ok(())
    }

    /// Checks if a record is stored under `key`.
    pub fn exists(&self, key: &str) -> CoreResult<bool> {
        Ok(self.backend.exists(key)?)
    }

    /// Decodes every stored record, ordered by key.
    ///
    /// **Fail-fast**: the first entry that cannot be read or decoded aborts
    /// the whole listing.
    pub fn list_all(&self) -> CoreResult<Vec<T>> {
        let entries = self.backend.read_all()?;
        let mut result = Vec::with_capacity(entries.len());

        for (entry, bytes) in entries {
            let record = self.codec.decode(&bytes).map_err(|err| {
                warn!(entry = %entry, error = %err, "failed to decode record");
                err
            })?;
            result.push(record);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::mark::Mark;
    use kada_codec::{CborCodec, JsonCodec};
    use kada_storage::{DirBackend, InMemoryBackend, StorageError};
    use tempfile::tempdir;

    fn memory_store() -> RecordStore<Mark, JsonCodec> {
        RecordStore::new(Box::new(InMemoryBackend::new()), JsonCodec)
    }

    #[test]
    fn put_and_get() {
        let store = memory_store();
        let mark = Mark::new("coding", "rust");

        store.put("coding", &mark).unwrap();
        assert_eq!(store.get("coding").unwrap(), mark);
    }

    #[test]
    fn put_overwrites() {
        let store = memory_store();
        store.put("coding", &Mark::new("coding", "first")).unwrap();
        store.put("coding", &Mark::new("coding", "second")).unwrap();

        assert_eq!(store.get("coding").unwrap().description, "second");
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = memory_store();
        let err = store.get("coding").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_missing_is_not_found() {
        let store = memory_store();
        assert!(store.delete("coding").unwrap_err().is_not_found());
    }

    #[test]
    fn create_exclusive_then_put() {
        let store = memory_store();
        let mark = Mark::new("coding", "");

        store.create_exclusive("coding").unwrap();
        assert!(store.exists("coding").unwrap());
        assert!(store.create_exclusive("coding").unwrap_err().is_already_exists());

        store.put("coding", &mark).unwrap();
        assert_eq!(store.get("coding").unwrap(), mark);
    }

    #[test]
    fn placeholder_does_not_decode() {
        let store = memory_store();
        store.create_exclusive("coding").unwrap();
        assert!(matches!(store.get("coding"), Err(CoreError::Codec(_))));
    }

    #[test]
    fn list_all_empty() {
        let dir = tempdir().unwrap();
        let backend = DirBackend::new(dir.path(), "json");
        let store: RecordStore<Mark, _> = RecordStore::new(Box::new(backend), JsonCodec);

        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn list_all_in_key_order() {
        let store = memory_store();
        store.put("reading", &Mark::new("reading", "")).unwrap();
        store.put("coding", &Mark::new("coding", "")).unwrap();

        let names: Vec<String> = store.list_all().unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["coding", "reading"]);
    }

    #[test]
    fn list_all_fails_fast_on_corrupt_entry() {
        let dir = tempdir().unwrap();
        let backend = DirBackend::new(dir.path(), "json");
        let store: RecordStore<Mark, _> = RecordStore::new(Box::new(backend), JsonCodec);

        store.put("coding", &Mark::new("coding", "")).unwrap();
        std::fs::write(dir.path().join("broken.json"), b"{\"Name\":").unwrap();

        assert!(matches!(store.list_all(), Err(CoreError::Codec(_))));
    }

    #[test]
    fn invalid_key_is_rejected() {
        let store = memory_store();
        let err = store.put("a/b", &Mark::new("a/b", "")).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Storage(StorageError::InvalidKey { .. })
        ));
    }

    #[test]
    fn cbor_on_disk() {
        let dir = tempdir().unwrap();
        let backend = DirBackend::new(dir.path(), "cbor");
        let store: RecordStore<Mark, _> = RecordStore::new(Box::new(backend), CborCodec);
        let mark = Mark::new("coding", "rust");

        store.put("coding", &mark).unwrap();
        assert!(dir.path().join("coding.cbor").is_file());
        assert_eq!(store.get("coding").unwrap(), mark);
        assert_eq!(store.list_all().unwrap(), vec![mark]);
    }
}
