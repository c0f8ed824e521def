//! Key-value storage backends.
//!
//! The backend is the narrow seam the entity store sits on: a synchronous,
//! always-available, single-writer-at-a-time string map. Values are opaque
//! here; the entity store owns the JSON layer.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::error::StoreError;

/// Synchronous key-value medium.
pub trait StorageBackend: Send + Sync {
    /// Read the value under `key`; `None` if the key was never written.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<B> StorageBackend for Arc<B>
where
    B: StorageBackend + ?Sized,
{
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// In-memory backend.
///
/// Intended for tests and benches. Not persistent.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// File-backed backend: one `<key>.json` file per key under a root directory.
///
/// Writes go through `std::fs` synchronously; any I/O failure surfaces as
/// [`StoreError::Unavailable`]. There is no cross-process locking: two
/// processes sharing a root directory race at last-write-wins granularity.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Unavailable(format!("read {key}: {err}"))),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)
            .map_err(|err| StoreError::Unavailable(format!("create {:?}: {err}", self.root)))?;
        fs::write(self.path_for(key), value)
            .map_err(|err| StoreError::Unavailable(format!("write {key}: {err}")))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Unavailable(format!("remove {key}: {err}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_round_trips_values() {
        let backend = MemoryBackend::new();

        assert_eq!(backend.read("k").unwrap(), None);
        backend.write("k", "v1").unwrap();
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("v1"));
        backend.write("k", "v2").unwrap();
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("v2"));
        backend.remove("k").unwrap();
        assert_eq!(backend.read("k").unwrap(), None);
    }

    #[test]
    fn memory_backend_remove_of_absent_key_is_ok() {
        let backend = MemoryBackend::new();
        backend.remove("never-written").unwrap();
    }

    #[test]
    fn file_backend_persists_across_handles() {
        let dir = tempfile::tempdir().unwrap();

        let first = FileBackend::new(dir.path());
        first.write("k", "persisted").unwrap();

        let second = FileBackend::new(dir.path());
        assert_eq!(second.read("k").unwrap().as_deref(), Some("persisted"));

        second.remove("k").unwrap();
        assert_eq!(first.read("k").unwrap(), None);
    }

    #[test]
    fn file_backend_read_of_absent_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());

        assert_eq!(backend.read("missing").unwrap(), None);
        backend.remove("missing").unwrap();
    }
}
