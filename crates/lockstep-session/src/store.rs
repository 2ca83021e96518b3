// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `SessionStore` implementations.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use lockstep_core::{LockstepError, SessionStore};

fn store_error(
    message: impl Into<String>,
    source: impl std::error::Error + Send + Sync + 'static,
) -> LockstepError {
    LockstepError::SessionStore {
        message: message.into(),
        source: Some(Box::new(source)),
    }
}

fn poisoned() -> LockstepError {
    LockstepError::SessionStore {
        message: "memory session store lock poisoned".to_string(),
        source: None,
    }
}

/// In-process store, lost on restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, key: &str) -> Result<Option<String>, LockstepError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), LockstepError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LockstepError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }
}

/// One JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Open the store, creating `dir` if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, LockstepError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            store_error(
                format!("cannot create session directory {}", dir.display()),
                e,
            )
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, LockstepError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(LockstepError::SessionStore {
                message: format!("invalid session key: {key:?}"),
                source: None,
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self, key: &str) -> Result<Option<String>, LockstepError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(store_error(
                format!("cannot read session file {}", path.display()),
                e,
            )),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), LockstepError> {
        let path = self.path_for(key)?;
        std::fs::write(&path, value).map_err(|e| {
            store_error(format!("cannot write session file {}", path.display()), e)
        })
    }

    fn remove(&self, key: &str) -> Result<(), LockstepError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(store_error(
                format!("cannot remove session file {}", path.display()),
                e,
            )),
        }
    }
}
