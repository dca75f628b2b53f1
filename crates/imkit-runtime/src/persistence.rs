//! Cross-session storage for window geometry and theme spacing.
//!
//! A [`StateRegistry`] keeps an in-memory map of [`StoredEntry`] values and
//! writes it through a pluggable [`StorageBackend`] when flushed. Entries are
//! opaque versioned byte payloads; [`crate::snapshot`] decides what goes in
//! them.
//!
//! # Design Invariants
//!
//! 1. **Load once, flush explicitly**: the backend is read by
//!    [`StateRegistry::load`] and written only by [`StateRegistry::flush`].
//! 2. **Dirty tracking**: `flush` is a no-op unless `set`/`remove` changed
//!    the map since the last successful flush.
//! 3. **Per-entry tolerance**: backends skip entries they cannot decode
//!    rather than failing the whole load.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Backend unavailable | No writable location | `load` returns `StorageError::Unavailable` |
//! | I/O error on save | Disk full, permissions | `flush` returns the error, registry stays dirty |
//! | Corrupt entry | Bad payload encoding | Entry skipped with `warn!` |
//! | Format version mismatch | Older or newer file layout | Whole file ignored with `warn!` |

use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "state-persistence")]
mod file;

#[cfg(feature = "state-persistence")]
pub use file::FileStorage;

/// Errors from storage backends.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    /// Encoding or decoding the storage container failed.
    Serialization(String),
    /// Stored data was readable but not valid.
    Corruption(String),
    /// The backend has nowhere to read from or write to.
    Unavailable,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Serialization(msg) => write!(f, "serialization error: {msg}"),
            Self::Corruption(msg) => write!(f, "data corruption: {msg}"),
            Self::Unavailable => write!(f, "storage backend unavailable"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// One persisted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    /// Canonical key, e.g. `window::Settings`.
    pub key: String,
    /// Payload schema version, checked by the reader.
    pub version: u32,
    pub data: Vec<u8>,
}

/// Where a [`StateRegistry`] reads and writes its entries.
pub trait StorageBackend {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Read every stored entry. A missing store is an empty map.
    fn load_all(&self) -> StorageResult<HashMap<String, StoredEntry>>;

    /// Replace the stored contents with `entries`.
    fn save_all(&mut self, entries: &HashMap<String, StoredEntry>) -> StorageResult<()>;

    /// Remove everything.
    fn clear(&mut self) -> StorageResult<()>;

    fn is_available(&self) -> bool {
        true
    }
}

/// Backend that lives only as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, StoredEntry>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend, as if a previous session had saved `entries`.
    #[must_use]
    pub fn with_entries(entries: impl IntoIterator<Item = StoredEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.key.clone(), e)).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn load_all(&self) -> StorageResult<HashMap<String, StoredEntry>> {
        Ok(self.entries.clone())
    }

    fn save_all(&mut self, entries: &HashMap<String, StoredEntry>) -> StorageResult<()> {
        self.entries.clone_from(entries);
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        self.entries.clear();
        Ok(())
    }
}

/// In-memory view of persisted state over a backend.
pub struct StateRegistry {
    backend: Box<dyn StorageBackend>,
    cache: HashMap<String, StoredEntry>,
    dirty: bool,
}

impl StateRegistry {
    #[must_use]
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            cache: HashMap::new(),
            dirty: false,
        }
    }

    /// Registry over a fresh [`MemoryStorage`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// Registry over a JSON file at `path`.
    #[cfg(feature = "state-persistence")]
    #[must_use]
    pub fn with_file(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(Box::new(FileStorage::new(path)))
    }

    /// Replace the in-memory map with the backend's contents.
    ///
    /// Returns the number of entries loaded.
    pub fn load(&mut self) -> StorageResult<usize> {
        if !self.backend.is_available() {
            return Err(StorageError::Unavailable);
        }
        self.cache = self.backend.load_all()?;
        self.dirty = false;
        let count = self.cache.len();
        tracing::debug!(backend = %self.backend.name(), count, "loaded session state");
        Ok(count)
    }

    /// Write the map to the backend if anything changed.
    ///
    /// Returns `Ok(true)` if data was written.
    pub fn flush(&mut self) -> StorageResult<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.backend.save_all(&self.cache)?;
        self.dirty = false;
        tracing::debug!(backend = %self.backend.name(), count = self.cache.len(), "flushed session state");
        Ok(true)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StoredEntry> {
        self.cache.get(key)
    }

    /// Store `data` under `key`. Marks the registry dirty only when the
    /// entry actually changed.
    pub fn set(&mut self, key: impl Into<String>, version: u32, data: Vec<u8>) {
        let key = key.into();
        let entry = StoredEntry {
            key: key.clone(),
            version,
            data,
        };
        if self.cache.get(&key) != Some(&entry) {
            self.cache.insert(key, entry);
            self.dirty = true;
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<StoredEntry> {
        let removed = self.cache.remove(key);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    /// Clear the map and the backend.
    pub fn clear(&mut self) -> StorageResult<()> {
        self.backend.clear()?;
        self.cache.clear();
        self.dirty = false;
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Keys starting with `prefix`, sorted.
    #[must_use]
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .cache
            .keys()
            .map(String::as_str)
            .filter(|k| k.starts_with(prefix))
            .collect();
        keys.sort_unstable();
        keys
    }

    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            entry_count: self.cache.len(),
            total_bytes: self.cache.values().map(|e| e.data.len()).sum(),
            dirty: self.dirty,
            backend: self.backend.name().to_owned(),
        }
    }
}

impl fmt::Debug for StateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRegistry")
            .field("backend", &self.backend.name())
            .field("entries", &self.cache.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

/// Size and status of a [`StateRegistry`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub entry_count: usize,
    /// Sum of payload lengths.
    pub total_bytes: usize,
    pub dirty: bool,
    pub backend: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Offline;

    impl StorageBackend for Offline {
        fn name(&self) -> &str {
            "offline"
        }
        fn load_all(&self) -> StorageResult<HashMap<String, StoredEntry>> {
            Err(StorageError::Unavailable)
        }
        fn save_all(&mut self, _: &HashMap<String, StoredEntry>) -> StorageResult<()> {
            Err(StorageError::Unavailable)
        }
        fn clear(&mut self) -> StorageResult<()> {
            Ok(())
        }
        fn is_available(&self) -> bool {
            false
        }
    }

    #[test]
    fn set_marks_dirty_and_flush_clears() {
        let mut reg = StateRegistry::in_memory();
        assert!(!reg.is_dirty());
        reg.set("window::A", 1, b"{}".to_vec());
        assert!(reg.is_dirty());
        assert!(reg.flush().unwrap());
        assert!(!reg.is_dirty());
        assert!(!reg.flush().unwrap());
    }

    #[test]
    fn identical_set_is_not_a_change() {
        let mut reg = StateRegistry::in_memory();
        reg.set("k", 1, vec![1, 2]);
        reg.flush().unwrap();
        reg.set("k", 1, vec![1, 2]);
        assert!(!reg.is_dirty());
        reg.set("k", 2, vec![1, 2]);
        assert!(reg.is_dirty());
    }

    #[test]
    fn load_replaces_cache_from_backend() {
        let seeded = MemoryStorage::with_entries([StoredEntry {
            key: "theme::spacing".into(),
            version: 1,
            data: b"x".to_vec(),
        }]);
        let mut reg = StateRegistry::new(Box::new(seeded));
        reg.set("scratch", 1, vec![]);
        assert_eq!(reg.load().unwrap(), 1);
        assert!(reg.get("scratch").is_none());
        assert_eq!(reg.get("theme::spacing").map(|e| e.version), Some(1));
        assert!(!reg.is_dirty());
    }

    #[test]
    fn remove_only_dirties_when_present() {
        let mut reg = StateRegistry::in_memory();
        assert!(reg.remove("missing").is_none());
        assert!(!reg.is_dirty());
        reg.set("k", 1, vec![]);
        reg.flush().unwrap();
        assert!(reg.remove("k").is_some());
        assert!(reg.is_dirty());
    }

    #[test]
    fn unavailable_backend_fails_load() {
        let mut reg = StateRegistry::new(Box::new(Offline));
        assert!(matches!(reg.load(), Err(StorageError::Unavailable)));
        assert!(!reg.is_available());
    }

    #[test]
    fn failed_flush_stays_dirty() {
        let mut reg = StateRegistry::new(Box::new(Offline));
        reg.set("k", 1, vec![]);
        assert!(reg.flush().is_err());
        assert!(reg.is_dirty());
    }

    #[test]
    fn keys_with_prefix_sorted() {
        let mut reg = StateRegistry::in_memory();
        reg.set("window::b", 1, vec![]);
        reg.set("theme::spacing", 1, vec![]);
        reg.set("window::a", 1, vec![]);
        assert_eq!(reg.keys_with_prefix("window::"), vec!["window::a", "window::b"]);
    }

    #[test]
    fn stats_sum_payloads() {
        let mut reg = StateRegistry::in_memory();
        reg.set("a", 1, vec![0; 3]);
        reg.set("b", 1, vec![0; 4]);
        let stats = reg.stats();
        assert_eq!(stats.entry_count, 2);
        assert_eq!(stats.total_bytes, 7);
        assert!(stats.dirty);
        assert_eq!(stats.backend, "memory");
    }

    #[test]
    fn error_display_and_source() {
        let io: StorageError = std::io::Error::other("disk").into();
        assert!(io.to_string().contains("disk"));
        assert!(std::error::Error::source(&io).is_some());
        assert!(std::error::Error::source(&StorageError::Unavailable).is_none());
    }
}
