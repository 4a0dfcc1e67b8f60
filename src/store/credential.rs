//! Credential persistence.
//!
//! The connection credential can be remembered across sessions, but only
//! on explicit opt-in and through an injectable port, never via ambient
//! global state — the connect flow receives a [`CredentialStore`] and
//! testing swaps in the in-memory implementation.

use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabgazeError};
use crate::util::atomic_write;

use super::Credential;

/// File holding the remembered credential, under the app config directory.
pub const CREDENTIAL_FILE_NAME: &str = "credential.toml";

/// Port for remembering a connection credential across sessions.
pub trait CredentialStore {
    /// Load the remembered credential, if any.
    fn load(&self) -> Result<Option<Credential>>;

    /// Remember a credential (explicit, user-initiated).
    fn save(&self, credential: &Credential) -> Result<()>;

    /// Forget the remembered credential.
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredCredential {
    connection_string: String,
}

/// Credential store persisting to a TOML file.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store at an explicit path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location under the user config directory.
    pub fn default_location() -> Result<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| TabgazeError::Unsupported {
            feature: "config directory discovery".to_string(),
        })?;
        Ok(Self::new(
            config_dir.join("tabgaze").join(CREDENTIAL_FILE_NAME),
        ))
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            TabgazeError::io(
                format!("Failed to read credential file: {}", self.path.display()),
                e,
            )
        })?;
        let stored: StoredCredential =
            toml::from_str(&content).map_err(|e| TabgazeError::CredentialError {
                message: format!("Invalid credential file: {e}"),
            })?;
        Ok(Some(Credential::new(stored.connection_string)))
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        let stored = StoredCredential {
            connection_string: credential.as_str().to_string(),
        };
        let content = toml::to_string_pretty(&stored).map_err(|e| TabgazeError::CredentialError {
            message: format!("Failed to serialize credential: {e}"),
        })?;
        atomic_write(&self.path, content.as_bytes())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|e| {
                TabgazeError::io(
                    format!("Failed to remove credential file: {}", self.path.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

/// In-memory credential store for tests.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>> {
        Ok(self.slot.lock().expect("credential lock").clone())
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        *self.slot.lock().expect("credential lock") = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock().expect("credential lock") = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("cred.toml"));

        assert!(store.load().unwrap().is_none());

        let cred = Credential::new("AccountName=demo;AccountKey=k==");
        store.save(&cred).unwrap();
        assert_eq!(store.load().unwrap(), Some(cred));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("cred.toml"));
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCredentialStore::new();
        let cred = Credential::new("x");
        store.save(&cred).unwrap();
        assert_eq!(store.load().unwrap(), Some(cred));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
