use chrono::Utc;
use log::{debug, warn};
use std::path::PathBuf;
use thiserror::Error;

mod entry;
mod ids;
mod store;

pub use entry::{AdImage, HistoryEntry, NewHistoryEntry};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use store::{FileStore, HistoryStore, MemoryStore};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history store unavailable: {0}")]
    Store(String),
}

pub fn app_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| std::env::temp_dir());
    base.join("adstudio")
}

/// Default location of the durable history log.
pub fn default_history_path() -> PathBuf {
    app_data_dir().join("history.json")
}

/// The ordered log of completed ad generations: newest first, append-only,
/// whole-log replace on every write. The in-memory sequence is authoritative
/// for the session; a failed durable write is reported but never fatal.
pub struct HistoryLog {
    store: Box<dyn HistoryStore>,
    ids: Box<dyn IdGenerator>,
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new(store: Box<dyn HistoryStore>, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            store,
            ids,
            entries: Vec::new(),
        }
    }

    /// Construct and immediately load whatever the store holds.
    pub fn open(store: Box<dyn HistoryStore>, ids: Box<dyn IdGenerator>) -> Self {
        let mut log = Self::new(store, ids);
        log.load();
        log
    }

    /// Read the full log from the store. An absent or empty slot is an empty
    /// log; an unreadable slot is treated the same and purged so subsequent
    /// loads do not fail on it again.
    pub fn load(&mut self) -> &[HistoryEntry] {
        self.entries = match self.store.read() {
            Ok(Some(blob)) => match serde_json::from_str(&blob) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("discarding unreadable history log: {err}");
                    if let Err(err) = self.store.delete() {
                        warn!("failed to purge corrupt history log: {err}");
                    }
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("history store unavailable, starting empty: {err}");
                Vec::new()
            }
        };
        &self.entries
    }

    /// Assign a fresh id and timestamp, prepend, and persist. Returns the
    /// stored entry so callers can keep its id for a later amendment.
    pub fn append(&mut self, data: NewHistoryEntry) -> &HistoryEntry {
        let entry = HistoryEntry {
            id: self.ids.next_id(),
            timestamp: Utc::now(),
            final_ad: data.final_ad,
            scene_description: data.scene_description,
            video_prompt: data.video_prompt,
        };
        self.entries.insert(0, entry);
        self.persist();
        &self.entries[0]
    }

    /// Fill in the video prompt of an existing entry. Applies once; a second
    /// amendment or an unknown id leaves the log untouched.
    pub fn set_video_prompt(&mut self, id: &str, prompt: &str) {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            warn!("no history entry {id} to amend");
            return;
        };
        if !entry.video_prompt.is_empty() {
            debug!("history entry {id} already has a video prompt");
            return;
        }
        entry.video_prompt = prompt.to_string();
        self.persist();
    }

    /// Drop every entry, in memory and in the store. Irreversible; callers
    /// gate this behind an explicit user confirmation.
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(err) = self.store.delete() {
            warn!("failed to clear history store: {err}");
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn persist(&self) {
        match serde_json::to_string(&self.entries) {
            Ok(blob) => {
                if let Err(err) = self.store.write(&blob) {
                    warn!("failed to persist history log: {err}");
                }
            }
            Err(err) => warn!("failed to serialize history log: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_entry(scene: &str) -> NewHistoryEntry {
        NewHistoryEntry {
            final_ad: AdImage {
                url: format!("data:image/jpeg;base64,{scene}"),
            },
            scene_description: scene.to_string(),
            video_prompt: String::new(),
        }
    }

    fn open_log(store: MemoryStore) -> HistoryLog {
        HistoryLog::open(
            Box::new(store),
            Box::new(SequentialIdGenerator::default()),
        )
    }

    #[test]
    fn append_is_newest_first_with_unique_ids() {
        let store = MemoryStore::new();
        let mut log = open_log(store.clone());
        for scene in ["first", "second", "third"] {
            log.append(new_entry(scene));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.entries()[0].scene_description, "third");
        assert_eq!(log.entries()[2].scene_description, "first");
        let mut ids: Vec<_> = log.entries().iter().map(|e| e.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);

        // The durable copy matches the in-memory order.
        let persisted: Vec<HistoryEntry> =
            serde_json::from_str(&store.blob().unwrap()).unwrap();
        assert_eq!(persisted.len(), 3);
        assert_eq!(persisted[0].scene_description, "third");
    }

    #[test]
    fn amend_changes_only_the_video_prompt() {
        let mut log = open_log(MemoryStore::new());
        log.append(new_entry("older"));
        let id = log.append(new_entry("newer")).id.clone();
        let before: Vec<_> = log
            .entries()
            .iter()
            .map(|e| (e.id.clone(), e.timestamp, e.scene_description.clone()))
            .collect();

        log.set_video_prompt(&id, "A slow dolly zoom...");

        let after: Vec<_> = log
            .entries()
            .iter()
            .map(|e| (e.id.clone(), e.timestamp, e.scene_description.clone()))
            .collect();
        assert_eq!(before, after, "amend must not reorder or rewrite entries");
        assert_eq!(log.get(&id).unwrap().video_prompt, "A slow dolly zoom...");
        assert_eq!(log.entries()[1].video_prompt, "");
    }

    #[test]
    fn amend_applies_only_once() {
        let mut log = open_log(MemoryStore::new());
        let id = log.append(new_entry("scene")).id.clone();
        log.set_video_prompt(&id, "first prompt");
        log.set_video_prompt(&id, "second prompt");
        assert_eq!(log.get(&id).unwrap().video_prompt, "first prompt");
    }

    #[test]
    fn amend_with_unknown_id_is_a_noop() {
        let mut log = open_log(MemoryStore::new());
        log.append(new_entry("scene"));
        log.set_video_prompt("missing", "prompt");
        assert_eq!(log.entries()[0].video_prompt, "");
    }

    #[test]
    fn clear_is_idempotent() {
        let store = MemoryStore::new();
        let mut log = open_log(store.clone());
        log.append(new_entry("scene"));
        log.clear();
        assert!(log.is_empty());
        assert!(store.blob().is_none());
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.load().len(), 0);
    }

    #[test]
    fn corrupt_store_recovers_and_is_purged() {
        let store = MemoryStore::with_blob("{not json at all");
        let mut log = open_log(store.clone());
        assert!(log.is_empty());
        assert!(store.blob().is_none(), "corrupt blob must be purged");

        log.append(new_entry("fresh start"));
        let persisted: Vec<HistoryEntry> =
            serde_json::from_str(&store.blob().unwrap()).unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].scene_description, "fresh start");
    }

    #[test]
    fn load_reads_back_what_was_persisted() {
        let store = MemoryStore::new();
        {
            let mut log = open_log(store.clone());
            log.append(new_entry("survives restart"));
        }
        let log = open_log(store);
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].scene_description, "survives restart");
    }
}
