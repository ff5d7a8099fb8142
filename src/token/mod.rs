//! Persisted session token storage.
//!
//! The browser client kept one string under the `authToken` local-storage key;
//! here the same slot is a small file on disk, behind a trait so tests can use
//! an in-memory store.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Storage for the single persisted session token.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any.
    fn load(&self) -> Option<String>;
    /// Persist a token, replacing any previous one.
    fn store(&self, token: &str);
    /// Remove the persisted token. Idempotent.
    fn clear(&self);
}

/// File-backed token store.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(_) => None,
        }
    }

    fn store(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        if let Err(err) = std::fs::write(&self.path, token) {
            tracing::warn!("Failed to persist session token: {}", err);
        }
    }

    fn clear(&self) {
        std::fs::remove_file(&self.path).ok();
    }
}

/// In-memory token store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn store(&self, token: &str) {
        *self.token.lock().unwrap() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.lock().unwrap() = None;
    }
}
