//! Durable credential persistence.
//!
//! # Design
//! - One credential at most; `save` overwrites, `clear` is idempotent, last write wins.
//! - Stores never validate what they are given; emptiness is normalised on read.
//! - Callers log failures and fall back to an unauthenticated session.

use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::credential::Credential;
use crate::error::StoreError;

/// Key under which the credential is persisted.
pub const TOKEN_KEY: &str = "studylink.jwt_token";

/// Key-value persistence for the current credential.
pub trait TokenStore: Send + Sync {
    /// Persist `credential`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing medium rejects the write.
    fn save(&self, credential: &Credential) -> Result<(), StoreError>;

    /// Current credential, if any. Side-effect free.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing medium cannot be read.
    fn read(&self) -> Result<Option<Credential>, StoreError>;

    /// Remove the credential. Succeeds when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing medium rejects the removal.
    fn clear(&self) -> Result<(), StoreError>;
}

/// In-process store; the credential lives as long as the value.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryTokenStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `credential`.
    #[must_use]
    pub const fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());
        Ok(())
    }

    fn read(&self) -> Result<Option<Credential>, StoreError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Default)]
struct StoredDocument {
    #[serde(rename = "studylink.jwt_token", default)]
    token: Option<String>,
}

/// JSON file store that survives process restarts.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store backed by the document at `path`. Nothing is touched until the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, operation: &'static str, source: io::Error) -> StoreError {
        StoreError::Io {
            operation,
            path: self.path.clone(),
            source,
        }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error("create_dir", err))?;
        }
        let document = StoredDocument {
            token: Some(credential.expose().to_string()),
        };
        let bytes =
            serde_json::to_vec_pretty(&document).map_err(|source| StoreError::Encode { source })?;

        let staging = self.staging_path();
        let mut file = fs::File::create(&staging).map_err(|err| self.io_error("write", err))?;
        file.write_all(&bytes)
            .and_then(|()| file.sync_all())
            .map_err(|err| self.io_error("write", err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error("rename", err))?;
        debug!(path = %self.path.display(), "credential persisted");
        Ok(())
    }

    fn read(&self) -> Result<Option<Credential>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error("read", err)),
        };
        let document: StoredDocument =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
                path: self.path.clone(),
                source,
            })?;
        Ok(document.token.and_then(Credential::new))
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "credential cleared");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error("remove", err)),
        }
    }
}
