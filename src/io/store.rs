use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::model::task::Task;

/// Key holding the active collection
pub const ACTIVE_KEY: &str = "activeTasks";
/// Key holding the archived collection
pub const ARCHIVED_KEY: &str = "archivedTasks";

/// Error type for durable storage. Every variant means the storage is
/// unavailable for this call; none of them is fatal to the caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable at {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("could not encode {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
    #[error("storage rejected write to {key}")]
    Rejected { key: String },
}

/// Key-value persistence for the two task collections and preferences.
///
/// Implementors provide raw string access per key; the typed operations are
/// shared. Loads never fail: unreadable or corrupt data degrades to an empty
/// collection (or an absent preference) and is logged. Saves are synchronous
/// and report failure to the caller.
pub trait DurableStore {
    fn read_key(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write_key(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_key(&mut self, key: &str) -> Result<(), StoreError>;

    /// Called when a stored value cannot be decoded, before anything can
    /// overwrite it. Stores that can keep a copy do so here.
    fn preserve_corrupt(&self, _key: &str) {}

    fn load_active(&self) -> Vec<Task> {
        load_tasks(self, ACTIVE_KEY)
    }

    fn load_archived(&self) -> Vec<Task> {
        load_tasks(self, ARCHIVED_KEY)
    }

    fn load_preference(&self, key: &str) -> Option<String> {
        match self.read_key(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "preference unreadable, treating as absent");
                None
            }
        }
    }

    fn save_active(&mut self, tasks: &[Task]) -> Result<(), StoreError> {
        save_tasks(self, ACTIVE_KEY, tasks)
    }

    fn save_archived(&mut self, tasks: &[Task]) -> Result<(), StoreError> {
        save_tasks(self, ARCHIVED_KEY, tasks)
    }

    fn save_preference(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.write_key(key, value)
    }

    fn remove_preference(&mut self, key: &str) -> Result<(), StoreError> {
        self.remove_key(key)
    }
}

fn load_tasks<S: DurableStore + ?Sized>(store: &S, key: &str) -> Vec<Task> {
    let raw = match store.read_key(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "storage unavailable, starting with an empty list");
            return Vec::new();
        }
    };
    match serde_json::from_str::<Vec<Task>>(&raw) {
        Ok(tasks) => {
            debug!(key, count = tasks.len(), "loaded tasks");
            tasks
        }
        Err(e) => {
            warn!(key, error = %e, "stored tasks are corrupt, starting with an empty list");
            store.preserve_corrupt(key);
            Vec::new()
        }
    }
}

fn save_tasks<S: DurableStore + ?Sized>(
    store: &mut S,
    key: &str,
    tasks: &[Task],
) -> Result<(), StoreError> {
    let json = serde_json::to_string(tasks).map_err(|e| StoreError::Encode {
        key: key.to_string(),
        source: e,
    })?;
    store.write_key(key, &json)?;
    debug!(key, count = tasks.len(), "saved tasks");
    Ok(())
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key inside a directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`. The directory is created lazily on the
    /// first write, so opening never fails.
    pub fn open(dir: &Path) -> Self {
        FileStore {
            dir: dir.to_path_buf(),
        }
    }

    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn io_error(&self, key: &str, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.key_path(key),
            source,
        }
    }
}

impl DurableStore for FileStore {
    fn read_key(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(key, e)),
        }
    }

    fn write_key(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| self.io_error(key, e))?;
        atomic_write(&self.key_path(key), value.as_bytes()).map_err(|e| self.io_error(key, e))
    }

    fn remove_key(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(key, e)),
        }
    }

    fn preserve_corrupt(&self, key: &str) {
        let path = self.key_path(key);
        let backup = path.with_extension("json.bak");
        match fs::copy(&path, &backup) {
            Ok(_) => warn!(backup = %backup.display(), "kept a copy of the corrupt file"),
            Err(e) => warn!(path = %path.display(), error = %e, "could not back up corrupt file"),
        }
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// `HashMap`-backed store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes and removals so far
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Make every subsequent write fail, as a full or read-only disk would
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Seed a raw value, bypassing the write counter
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl DurableStore for MemoryStore {
    fn read_key(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn write_key(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Rejected {
                key: key.to_string(),
            });
        }
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove_key(&mut self, key: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Rejected {
                key: key.to_string(),
            });
        }
        self.values.remove(key);
        self.writes += 1;
        Ok(())
    }
}
