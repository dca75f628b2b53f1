//! JSON file backend.
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "entries": {
//!     "window::Settings": { "version": 1, "data_base64": "eyJ4IjoxMC4wLC..." }
//!   }
//! }
//! ```
//!
//! Saves go to `<path>.tmp`, are synced, then renamed over `<path>`, so a
//! crash mid-write leaves the previous file intact.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use super::{StorageBackend, StorageError, StorageResult, StoredEntry};

const FORMAT_VERSION: u32 = 1;
const APP_DIR: &str = "imkit";

#[derive(Serialize, Deserialize)]
struct Document {
    format_version: u32,
    // Sorted so saved files diff cleanly.
    entries: BTreeMap<String, Record>,
}

#[derive(Serialize, Deserialize)]
struct Record {
    version: u32,
    data_base64: String,
}

/// Entries persisted as one JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// The file need not exist yet; it is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_STATE_HOME/imkit/<app>/session.json`, falling back to
    /// `$HOME/.local/state` and then the working directory.
    #[must_use]
    pub fn default_for_app(app: &str) -> Self {
        let base = std::env::var_os("XDG_STATE_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local").join("state")))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join(APP_DIR).join(app).join("session.json"))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_owned();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StorageBackend for FileStorage {
    fn name(&self) -> &str {
        "file"
    }

    fn load_all(&self) -> StorageResult<HashMap<String, StoredEntry>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };
        let doc: Document = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| StorageError::Serialization(format!("{}: {e}", self.path.display())))?;

        if doc.format_version != FORMAT_VERSION {
            tracing::warn!(
                path = %self.path.display(),
                stored = doc.format_version,
                expected = FORMAT_VERSION,
                "session file format mismatch, starting fresh"
            );
            return Ok(HashMap::new());
        }

        let mut entries = HashMap::with_capacity(doc.entries.len());
        for (key, record) in doc.entries {
            match STANDARD.decode(record.data_base64.as_bytes()) {
                Ok(data) => {
                    entries.insert(
                        key.clone(),
                        StoredEntry {
                            key,
                            version: record.version,
                            data,
                        },
                    );
                }
                Err(e) => tracing::warn!(key = %key, error = %e, "undecodable session entry, skipping"),
            }
        }
        Ok(entries)
    }

    fn save_all(&mut self, entries: &HashMap<String, StoredEntry>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let doc = Document {
            format_version: FORMAT_VERSION,
            entries: entries
                .iter()
                .map(|(key, entry)| {
                    (
                        key.clone(),
                        Record {
                            version: entry.version,
                            data_base64: STANDARD.encode(&entry.data),
                        },
                    )
                })
                .collect(),
        };

        let tmp = self.temp_path();
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, &doc)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), entries = entries.len(), "saved session file");
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn is_available(&self) -> bool {
        match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) if parent.exists() => fs::metadata(parent)
                .map(|m| m.is_dir() && !m.permissions().readonly())
                .unwrap_or(false),
            Some(parent) => fs::create_dir_all(parent).is_ok(),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(key: &str, data: &[u8]) -> StoredEntry {
        StoredEntry {
            key: key.into(),
            version: 1,
            data: data.to_vec(),
        }
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(tmp.path().join("nested").join("session.json"));
        let entries: HashMap<_, _> = [entry("window::A", b"{\"x\":1}")]
            .into_iter()
            .map(|e| (e.key.clone(), e))
            .collect();
        storage.save_all(&entries).unwrap();
        assert!(storage.path().exists());
        assert!(!storage.temp_path().exists());
        assert_eq!(storage.load_all().unwrap(), entries);
    }

    #[test]
    fn missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path().join("absent.json"));
        assert!(storage.load_all().unwrap().is_empty());
    }

    #[test]
    fn bad_base64_entry_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.json");
        fs::write(
            &path,
            r#"{"format_version":1,"entries":{"bad":{"version":1,"data_base64":"%%%"},"good":{"version":2,"data_base64":"aGk="}}}"#,
        )
        .unwrap();
        let loaded = FileStorage::new(&path).load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["good"].data, b"hi");
        assert_eq!(loaded["good"].version, 2);
    }

    #[test]
    fn other_format_version_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.json");
        fs::write(&path, r#"{"format_version":99,"entries":{}}"#).unwrap();
        assert!(FileStorage::new(&path).load_all().unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            FileStorage::new(&path).load_all(),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn clear_tolerates_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.json");
        let mut storage = FileStorage::new(&path);
        storage.clear().unwrap();
        fs::write(&path, "{}").unwrap();
        storage.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn default_location_ends_in_app_dir() {
        let storage = FileStorage::default_for_app("demo");
        assert!(storage.path().ends_with("imkit/demo/session.json"));
    }
}
