//! Client-local key-value storage backends.

use std::{
    collections::BTreeMap,
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use arc_swap::ArcSwap;
use fnv::FnvHashMap;

use crate::StorageError;

/// Storage keys used by the session.
pub mod keys {
    /// The access token.
    pub const TOKEN: &str = "token";

    /// The refresh token.
    pub const REFRESH_TOKEN: &str = "refreshToken";

    /// Denormalized username of the session owner.
    pub const USERNAME: &str = "username";

    /// Denormalized role of the session owner.
    pub const ROLE: &str = "role";
}

/// A string-keyed storage medium for session state.
///
/// Each call is expected to be atomic on its own. There is no multi-key transaction;
/// concurrent writers to the same key see last-write-wins.
pub trait TokenStorage: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage. Its contents live as long as the storage value.
#[derive(Default)]
pub struct MemoryStorage {
    entries: ArcSwap<FnvHashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.load().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.rcu(|entries| {
            let mut entries = FnvHashMap::clone(entries);
            entries.insert(key.to_string(), value.to_string());
            Arc::new(entries)
        });
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.rcu(|entries| {
            let mut entries = FnvHashMap::clone(entries);
            entries.remove(key);
            Arc::new(entries)
        });
        Ok(())
    }
}

/// Storage persisted as a JSON object in a file, surviving process restarts.
///
/// A missing file reads as empty storage. Each write goes to a uniquely named temporary
/// file in the same directory which is then renamed over the original, so concurrent
/// writers, including other processes, never observe a partially written file.
pub struct FileStorage {
    path: PathBuf,
    write_lock: std::sync::Mutex<()>,
}

impl FileStorage {
    /// Use the file at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: std::sync::Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&serde_json::to_vec_pretty(entries)?)?;
        tmp.persist(&self.path).map_err(std::io::Error::from)?;
        Ok(())
    }

    fn update(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), StorageError> {
        // a poisoned lock only means another writer panicked; the file itself is intact
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut entries = self.read_all()?;
        if f(&mut entries) {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

impl TokenStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}
