// Session/token store.
// Holds the opaque bearer token obtained at login. Absence of a token is the only
// "logged out" signal; presence says nothing about validity.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;

use crate::error::SessionError;

// Fixed key of the persisted slot
pub const TOKEN_KEY: &str = "google_token";

pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// In-process store. Nothing survives a restart; used by tests and embedders
/// that manage persistence themselves.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        MemoryTokenStore { token: Mutex::new(Some(token.to_string())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.lock().ok().and_then(|guard| guard.clone())
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        let mut guard = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

/// Persistent key-value file, one JSON object per profile.
/// The token lives under [`TOKEN_KEY`]; other keys are preserved on write.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> Result<BTreeMap<String, String>, SessionError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_slots(&self, slots: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;
        // Owner-only temp file (0600 on unix), renamed over the target so a
        // reader never sees a half-written session
        let mut file = NamedTempFile::new_in(parent)?;
        file.write_all(serde_json::to_string_pretty(slots)?.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        let _guard = self.lock.lock().ok()?;
        match self.read_slots() {
            Ok(mut slots) => slots.remove(TOKEN_KEY).filter(|t| !t.is_empty()),
            Err(e) => {
                // An unreadable session is treated as logged out
                tracing::warn!("Failed to read session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        let _guard = self.lock.lock().map_err(|_| SessionError::Poisoned)?;
        let mut slots = self.read_slots().unwrap_or_default();
        slots.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_slots(&slots)?;
        tracing::info!("Stored session token in {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let _guard = self.lock.lock().map_err(|_| SessionError::Poisoned)?;
        let mut slots = self.read_slots().unwrap_or_default();
        if slots.remove(TOKEN_KEY).is_some() {
            self.write_slots(&slots)?;
            tracing::info!("Cleared session token from {}", self.path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_clear() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get(), None);
        store.set("abc").unwrap();
        assert_eq!(store.get().as_deref(), Some("abc"));
        store.clear().unwrap();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile").join("session.json");

        FileTokenStore::new(&path).set("tok-1").unwrap();
        // A fresh store on the same path plays the role of a page reload
        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.get().as_deref(), Some("tok-1"));

        reopened.clear().unwrap();
        assert_eq!(FileTokenStore::new(&path).get(), None);
    }

    #[test]
    fn file_store_keeps_unrelated_slots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let store = FileTokenStore::new(&path);
        store.set("tok").unwrap();
        store.clear().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("theme"));
        assert!(!content.contains(TOKEN_KEY));
    }

    #[test]
    fn corrupt_file_reads_as_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.get(), None);
        // Writing replaces the corrupt content
        store.set("fresh").unwrap();
        assert_eq!(store.get().as_deref(), Some("fresh"));
    }

    #[cfg(unix)]
    #[test]
    fn file_store_is_private_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        // A pre-existing world-readable file is replaced, not reused
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        FileTokenStore::new(&path).set("secret").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "session file mode is {:o}", mode);
        // No temp files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_file_clear_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("none.json"));
        store.clear().unwrap();
        assert!(!store.path().exists());
    }
}
