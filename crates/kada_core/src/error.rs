//! Error types for kada core.

use std::fmt;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A mark record.
    Mark,
    /// A span record.
    Span,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mark => f.write_str("mark"),
            Self::Span => f.write_str("span"),
        }
    }
}

/// Errors that can occur in kada core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] kada_storage::StorageError),

    /// Codec error.
    #[error("codec error: {0}")]
    Codec(#[from] kada_codec::CodecError),

    /// The record does not exist.
    #[error("{kind} '{name}' does not exist")]
    NotFound {
        /// Kind of the missing record.
        kind: EntityKind,
        /// Name of the missing record.
        name: String,
    },

    /// A record with the same identity already exists.
    #[error("{kind} '{name}' already exists")]
    AlreadyExists {
        /// Kind of the conflicting record.
        kind: EntityKind,
        /// Name of the conflicting record.
        name: String,
    },

    /// More than one span matched a lookup by name.
    #[error("too many ({count}) spans with name '{name}'")]
    AmbiguousSpan {
        /// The requested span name.
        name: String,
        /// How many spans carry that name.
        count: usize,
    },

    /// The record name is unusable.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

impl CoreError {
    /// Creates a not found error.
    pub fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Creates an already exists error.
    pub fn already_exists(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            name: name.into(),
        }
    }

    /// Creates an ambiguous span error.
    pub fn ambiguous_span(name: impl Into<String>, count: usize) -> Self {
        Self::AmbiguousSpan {
            name: name.into(),
            count,
        }
    }

    /// Returns true if the error reports a missing record, at any layer.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Storage(kada_storage::StorageError::NotFound { .. })
        )
    }

    /// Returns true if the error reports a duplicate record, at any layer.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            Self::AlreadyExists { .. }
                | Self::Storage(kada_storage::StorageError::AlreadyExists { .. })
        )
    }

    /// Rewrites storage-level not found / already exists errors as record-level ones.
    pub(crate) fn for_record(self, kind: EntityKind, name: &str) -> Self {
        match self {
            Self::Storage(kada_storage::StorageError::NotFound { .. }) => {
                Self::not_found(kind, name)
            }
            Self::Storage(kada_storage::StorageError::AlreadyExists { .. }) => {
                Self::already_exists(kind, name)
            }
            other => other,
        }
    }
}
