//! Durable session snapshot storage.
//!
//! The session log is persisted as a single named slot holding a JSON array
//! of `{role, content}` objects, written last-write-wins after each
//! qualifying mutation and read once at session construction. The storage
//! backend sits behind [`SessionStore`] so local disk, an encrypted store,
//! or remote sync can be swapped without touching the state machine.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use super::types::ChatMessage;

/// Errors that can occur reading or writing a session snapshot.
///
/// None of these are fatal: the session manager recovers from a failed load
/// by starting a fresh log, and a failed save degrades to in-memory-only
/// history for the rest of the session.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Underlying storage failed.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored data exists but cannot be decoded.
    #[error("snapshot corrupt: {0}")]
    Corrupt(String),
}

/// Repository interface for the session snapshot slot.
pub trait SessionStore {
    /// Read the prior session log, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when storage fails or the stored data is
    /// undecodable. An absent snapshot is `Ok(None)`, not an error.
    fn load(&self) -> Result<Option<Vec<ChatMessage>>, SnapshotError>;

    /// Overwrite the snapshot with the full log.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the write fails.
    fn save(&self, messages: &[ChatMessage]) -> Result<(), SnapshotError>;
}

/// Session store backed by a single JSON file on local disk.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store persisting to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file path.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Vec<ChatMessage>>, SnapshotError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SnapshotError::Io(e)),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| SnapshotError::Corrupt(e.to_string()))
    }

    fn save(&self, messages: &[ChatMessage]) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json =
            serde_json::to_string(messages).map_err(|e| SnapshotError::Corrupt(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-process session store.
///
/// Clones share the same slot, so tests can hold one handle while the
/// session manager owns another and still observe every write.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<Vec<ChatMessage>>>>,
}

impl MemorySessionStore {
    /// Create a store pre-seeded with a prior session log.
    #[must_use]
    pub fn with_log(messages: Vec<ChatMessage>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(messages))),
        }
    }

    /// The most recently saved log, if any.
    #[must_use]
    pub fn saved(&self) -> Option<Vec<ChatMessage>> {
        self.slot().clone()
    }

    fn slot(&self) -> MutexGuard<'_, Option<Vec<ChatMessage>>> {
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Vec<ChatMessage>>, SnapshotError> {
        Ok(self.slot().clone())
    }

    fn save(&self, messages: &[ChatMessage]) -> Result<(), SnapshotError> {
        *self.slot() = Some(messages.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        std::env::temp_dir().join(format!("corex-snapshot-{name}-{nanos}.json"))
    }

    fn sample_log() -> Vec<ChatMessage> {
        vec![
            ChatMessage::system("directive"),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello!"),
        ]
    }

    #[test]
    fn test_file_store_missing_is_none() {
        let store = FileSessionStore::new(scratch_path("missing"));
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let path = scratch_path("roundtrip");
        let store = FileSessionStore::new(&path);

        store.save(&sample_log()).expect("save");
        let loaded = store.load().expect("load").expect("present");
        assert_eq!(loaded, sample_log());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_file_store_overwrites() {
        let path = scratch_path("overwrite");
        let store = FileSessionStore::new(&path);

        store.save(&sample_log()).expect("first save");
        let shorter = vec![ChatMessage::system("fresh")];
        store.save(&shorter).expect("second save");

        assert_eq!(store.load().expect("load").expect("present"), shorter);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_file_store_corrupt_data() {
        let path = scratch_path("corrupt");
        fs::write(&path, "not json at all {{{").expect("write garbage");

        let store = FileSessionStore::new(&path);
        let err = store.load().expect_err("must report corruption");
        assert!(matches!(err, SnapshotError::Corrupt(_)));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_memory_store_clones_share_slot() {
        let store = MemorySessionStore::default();
        let observer = store.clone();

        store.save(&sample_log()).expect("save");
        assert_eq!(observer.saved(), Some(sample_log()));
    }
}
