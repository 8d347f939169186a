//! Storage backends for the persisted cart.
//!
//! A backend holds one opaque JSON string: the serialized cart. The cart
//! store decides what that string means; backends only read and overwrite it.

use std::future::Future;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tower_sessions::Session;

use crate::models::session_keys;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The session store failed to load or save.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The in-memory slot's lock was poisoned.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A single key-value slot holding the serialized cart.
pub trait CartStorage: Send + Sync {
    /// Read the stored blob. `None` when nothing has been stored yet.
    fn read(&self) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Overwrite the stored blob.
    fn write(&self, blob: String) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Cart slot kept in the visitor's session.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    session: Session,
    key: &'static str,
}

impl SessionStorage {
    /// The cart slot of `session`.
    #[must_use]
    pub const fn cart(session: Session) -> Self {
        Self {
            session,
            key: session_keys::CART,
        }
    }
}

impl CartStorage for SessionStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.session.get::<String>(self.key).await?)
    }

    async fn write(&self, blob: String) -> Result<(), StorageError> {
        Ok(self.session.insert(self.key, blob).await?)
    }
}

/// Process-local slot. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    /// An empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot pre-filled with `blob`.
    #[must_use]
    pub fn with_contents(blob: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }

    /// Current contents of the slot.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|guard| guard.clone())
    }
}

impl CartStorage for MemoryStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        self.slot
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| StorageError::Poisoned)
    }

    async fn write(&self, blob: String) -> Result<(), StorageError> {
        let mut guard = self.slot.lock().map_err(|_| StorageError::Poisoned)?;
        *guard = Some(blob);
        Ok(())
    }
}
