//! Key validation.

use crate::error::{StorageError, StorageResult};

/// Checks that `key` can be used as a single path component.
///
/// Keys become file names, so anything that would escape the store's root
/// directory or name a special entry is rejected.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] for empty keys, `.` and `..`, and keys
/// containing `/`, `\` or NUL.
pub fn validate_key(key: &str) -> StorageResult<()> {
    let reason = if key.is_empty() {
        "key is empty"
    } else if key == "." || key == ".." {
        "key names a special directory entry"
    } else if key.contains(['/', '\\']) {
        "key contains a path separator"
    } else if key.contains('\0') {
        "key contains a NUL byte"
    } else {
        return Ok(());
    };

    Err(StorageError::InvalidKey {
        key: key.to_string(),
        reason,
    })
}
