//! Persistence for the single opaque session token.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::PathBuf,
    sync::Mutex,
};

use crate::error::TokenStoreError;

/// Key under which the token is stored.
pub const TOKEN_KEY: &str = "token";

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, TokenStoreError>;
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// JSON object on disk holding `{"token": "..."}`. Other keys are preserved.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, TokenStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(TokenStoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| TokenStoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| TokenStoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let raw = serde_json::to_string_pretty(entries).map_err(|source| {
            TokenStoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, raw).map_err(|source| TokenStoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self
            .read_entries()?
            .remove(TOKEN_KEY)
            .filter(|token| !token.is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        // A corrupt file is replaced; an unreadable one is left alone.
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(TokenStoreError::Corrupt { .. }) => BTreeMap::new(),
            Err(err) => return Err(err),
        };
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(TokenStoreError::Corrupt { .. }) => BTreeMap::new(),
            Err(err) => return Err(err),
        };
        entries.remove(TOKEN_KEY);
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(source) => Err(TokenStoreError::Io {
                    path: self.path.clone(),
                    source,
                }),
            };
        }
        self.write_entries(&entries)
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.slot() = None;
        Ok(())
    }
}
