use std::fmt;

use crate::persistence::StorageError;

/// Errors at session boundaries (restore, persist, shutdown).
#[derive(Debug)]
pub enum SessionError {
    Storage(StorageError),
    /// A snapshot could not be encoded or decoded.
    Snapshot {
        key: String,
        source: serde_json::Error,
    },
    /// A stored entry was written under a different schema version.
    Version {
        key: String,
        stored: u32,
        expected: u32,
    },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Snapshot { key, source } => write!(f, "snapshot {key}: {source}"),
            Self::Version {
                key,
                stored,
                expected,
            } => write!(f, "snapshot {key}: version {stored}, expected {expected}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(e) => Some(e),
            Self::Snapshot { source, .. } => Some(source),
            Self::Version { .. } => None,
        }
    }
}

impl From<StorageError> for SessionError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}
