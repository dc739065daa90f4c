use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fieldops_logging::{ops_debug, ops_warn};
use thiserror::Error;

use crate::persist::{write_atomic, PersistError};

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "userToken";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("session file {path:?} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Key-value string store the session token lives in.
///
/// Components receive the store by reference at construction and read the
/// token at the start of every call.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;

    /// The bearer token, if one is stored and non-blank.
    fn token(&self) -> Option<String> {
        self.get(TOKEN_KEY).filter(|token| !token.trim().is_empty())
    }

    fn clear_token(&self) -> Result<(), SessionError> {
        self.remove(TOKEN_KEY)
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::default();
        store.values().insert(TOKEN_KEY.to_string(), token.into());
        store
    }

    fn values(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.values().remove(key);
        Ok(())
    }
}

/// Session values persisted as a RON map; every read goes to disk.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, SessionError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };
        ron::from_str(&content).map_err(|err| SessionError::Malformed {
            path: self.path.clone(),
            reason: err.to_string(),
        })
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let content = ron::ser::to_string_pretty(values, ron::ser::PrettyConfig::new()).map_err(
            |err| SessionError::Malformed {
                path: self.path.clone(),
                reason: err.to_string(),
            },
        )?;
        write_atomic(&self.path, content)?;
        ops_debug!("Session file {:?} updated", self.path);
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut values) => values.remove(key),
            Err(err) => {
                ops_warn!("Failed to read session: {}", err);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut values = self.load()?;
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}
