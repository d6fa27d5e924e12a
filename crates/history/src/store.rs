use crate::HistoryError;
use parking_lot::Mutex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Durable slot holding the serialized history log. Whole-value read and
/// whole-value replace are the only operations ever performed against it.
pub trait HistoryStore: Send {
    /// `Ok(None)` when the slot has never been written (or was deleted).
    fn read(&self) -> Result<Option<String>, HistoryError>;
    fn write(&self, blob: &str) -> Result<(), HistoryError>;
    fn delete(&self) -> Result<(), HistoryError>;
}

/// Single JSON file under the app data directory.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for FileStore {
    fn read(&self) -> Result<Option<String>, HistoryError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(HistoryError::Store(format!(
                "read {}: {err}",
                self.path.display()
            ))),
        }
    }

    fn write(&self, blob: &str) -> Result<(), HistoryError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|err| {
                HistoryError::Store(format!("create {}: {err}", dir.display()))
            })?;
        }
        fs::write(&self.path, blob).map_err(|err| {
            HistoryError::Store(format!("write {}: {err}", self.path.display()))
        })
    }

    fn delete(&self) -> Result<(), HistoryError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(HistoryError::Store(format!(
                "delete {}: {err}",
                self.path.display()
            ))),
        }
    }
}

/// In-memory slot. Clones share the same blob, which lets tests keep a handle
/// on a store after handing it to the log.
#[derive(Clone, Default)]
pub struct MemoryStore {
    blob: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }

    pub fn blob(&self) -> Option<String> {
        self.blob.lock().clone()
    }
}

impl HistoryStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, HistoryError> {
        Ok(self.blob.lock().clone())
    }

    fn write(&self, blob: &str) -> Result<(), HistoryError> {
        *self.blob.lock() = Some(blob.to_string());
        Ok(())
    }

    fn delete(&self) -> Result<(), HistoryError> {
        *self.blob.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_file() -> PathBuf {
        std::env::temp_dir()
            .join(format!("adstudio-test-{}", Uuid::new_v4()))
            .join("history.json")
    }

    #[test]
    fn file_store_round_trips() {
        let path = temp_file();
        let store = FileStore::new(&path);
        assert!(store.read().unwrap().is_none());
        store.write("[]").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("[]"));
        store.delete().unwrap();
        assert!(store.read().unwrap().is_none());
        // Deleting an absent file is not an error.
        store.delete().unwrap();
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn memory_store_clones_share_state() {
        let store = MemoryStore::new();
        let alias = store.clone();
        store.write("payload").unwrap();
        assert_eq!(alias.blob().as_deref(), Some("payload"));
        alias.delete().unwrap();
        assert!(store.blob().is_none());
    }
}
