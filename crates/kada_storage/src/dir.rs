//! Directory-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use crate::key::validate_key;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A directory-based storage backend.
///
/// Every key maps to one file named `<key>.<extension>` directly inside the
/// root directory. Payloads survive process restarts.
///
/// # Concurrency
///
/// Only [`StorageBackend::create_exclusive`] is safe against other processes,
/// since it relies on the filesystem's exclusive-create primitive. Every other
/// operation is a plain unguarded filesystem call.
///
/// # Example
///
/// ```no_run
/// use kada_storage::{StorageBackend, DirBackend};
/// use std::path::Path;
///
/// let backend = DirBackend::new(Path::new("data/marks"), "json");
/// backend.setup().unwrap();
/// backend.write("coding-start", b"{}").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DirBackend {
    root: PathBuf,
    extension: String,
}

impl DirBackend {
    /// Creates a backend rooted at `root` using `extension` for its files.
    ///
    /// Nothing is touched on disk until [`StorageBackend::setup`] or the first
    /// write.
    #[must_use]
    pub fn new(root: &Path, extension: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file extension, without the leading dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns the path of the file holding `key`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the key cannot be used as a file name.
    pub fn entry_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{}", self.extension)))
    }

    fn entry_name(&self, file_name: &str) -> String {
        file_name
            .strip_suffix(&self.extension)
            .and_then(|stem| stem.strip_suffix('.'))
            .unwrap_or(file_name)
            .to_string()
    }
}

impl StorageBackend for DirBackend {
    fn setup(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.entry_path(key)?;
        debug!(path = %path.display(), "reading entry");
        fs::read(&path).map_err(|err| StorageError::from_io(err, key))
    }

    fn write(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.entry_path(key)?;
        debug!(path = %path.display(), len = data.len(), "writing entry");
        fs::write(&path, data)?;
        Ok(())
    }

    fn create_exclusive(&self, key: &str) -> StorageResult<()> {
        let path = self.entry_path(key)?;
        debug!(path = %path.display(), "reserving entry");
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map(drop)
            .map_err(|err| match err.kind() {
                io::ErrorKind::AlreadyExists => StorageError::already_exists(key),
                _ => StorageError::Io(err),
            })
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.entry_path(key)?;
        debug!(path = %path.display(), "removing entry");
        fs::remove_file(&path).map_err(|err| StorageError::from_io(err, key))
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.entry_path(key)?;
        match fs::metadata(&path) {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn read_all(&self) -> StorageResult<Vec<(String, Vec<u8>)>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                continue;
            }
            paths.push(entry.path());
        }
        paths.sort();

        let mut result = Vec::with_capacity(paths.len());
        for path in paths {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let data = fs::read(&path)?;
            result.push((self.entry_name(&file_name), data));
        }

        debug!(root = %self.root.display(), count = result.len(), "read all entries");
        Ok(result)
    }
}
