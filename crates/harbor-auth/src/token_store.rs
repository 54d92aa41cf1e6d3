use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::AuthError;

/// Key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "token";
/// Key under which the serialized profile is persisted.
pub const USER_KEY: &str = "user";

/// String key-value storage that outlives the process.
///
/// Removing a missing key is not an error.
pub trait SessionStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError::Store` if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError::Store` if the value cannot be removed.
    fn remove(&self, key: &str) -> Result<(), AuthError>;
}

// --- File store ---

type Entries = BTreeMap<String, String>;

/// A JSON object on disk, owner-only permissions. The file is deleted once
/// its last key is removed.
///
/// A file that does not parse is an error for `get` only. `set` replaces it
/// and `remove` deletes it, so a corrupt session can always be cleared.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Outer error: the file could not be read. Inner error: it was read
    /// but is not a JSON object of strings.
    fn read_entries(&self) -> Result<Result<Entries, AuthError>, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Ok(Entries::new())),
            Err(e) => {
                return Err(AuthError::Store(format!("read {}: {e}", self.path.display())));
            }
        };
        if raw.trim().is_empty() {
            return Ok(Ok(Entries::new()));
        }
        Ok(serde_json::from_str(&raw)
            .map_err(|e| AuthError::Store(format!("parse {}: {e}", self.path.display()))))
    }

    /// Entries to start a write from. Unparseable contents are discarded.
    fn entries_for_write(&self) -> Result<Entries, AuthError> {
        Ok(self.read_entries()?.unwrap_or_else(|error| {
            tracing::warn!(%error, "discarding unreadable session file");
            Entries::new()
        }))
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), AuthError> {
        if entries.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path).map_err(|e| {
                    AuthError::Store(format!("failed to delete {}: {e}", self.path.display()))
                })?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AuthError::Store(format!("mkdir {}: {e}", parent.display())))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }

        let body = serde_json::to_string_pretty(entries)
            .map_err(|e| AuthError::Store(format!("serialize session: {e}")))?;
        fs::write(&self.path, body)
            .map_err(|e| AuthError::Store(format!("write {}: {e}", self.path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| AuthError::Store(format!("chmod {}: {e}", self.path.display())))?;
        }

        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AuthError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_entries()??.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.entries_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.entries_for_write()?;
        if entries.remove(key).is_none() && !entries.is_empty() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}

// --- In-memory store ---

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AuthError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}
