//! Persistent cart store.
//!
//! [`CartStore`] wraps the pure [`Cart`] reducer with write-through
//! persistence: every dispatched action is applied and then immediately
//! written to the backing [`CartStorage`].
//!
//! Loading never fails. Missing or malformed stored data yields an empty
//! cart. If the backend cannot be read or written, the store keeps working
//! in memory only and stops touching the backend.

mod storage;

pub use storage::{CartStorage, MemoryStorage, SessionStorage, StorageError};

use ticket_core::{Cart, CartAction};
use tracing::{debug, error, warn};

/// A cart bound to its storage slot.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    storage: Option<S>,
}

impl<S: CartStorage> CartStore<S> {
    /// Restore the cart from `storage`.
    pub async fn restore(storage: S) -> Self {
        match storage.read().await {
            Ok(Some(blob)) => {
                let cart = serde_json::from_str::<Cart>(&blob).unwrap_or_else(|e| {
                    warn!(error = %e, "Discarding unreadable stored cart");
                    Cart::new()
                });
                Self {
                    cart,
                    storage: Some(storage),
                }
            }
            Ok(None) => Self {
                cart: Cart::new(),
                storage: Some(storage),
            },
            Err(e) => {
                warn!(error = %e, "Cart storage unavailable, keeping cart in memory");
                Self::in_memory()
            }
        }
    }

    /// A store with no backing storage.
    #[must_use]
    pub const fn in_memory() -> Self {
        Self {
            cart: Cart::new(),
            storage: None,
        }
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Whether changes are still being written to storage.
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    /// Apply `action` and persist the result.
    pub async fn dispatch(&mut self, action: CartAction) -> &Cart {
        self.cart.apply(action);
        self.persist().await;
        &self.cart
    }

    async fn persist(&mut self) {
        let Some(storage) = &self.storage else {
            return;
        };

        let blob = match serde_json::to_string(&self.cart) {
            Ok(blob) => blob,
            Err(e) => {
                error!(error = %e, "Failed to serialize cart");
                return;
            }
        };

        let written = storage.write(blob).await;
        match written {
            Ok(()) => debug!(lines = self.cart.lines().len(), "Cart persisted"),
            Err(e) => {
                warn!(error = %e, "Cart storage write failed, keeping cart in memory");
                self.storage = None;
            }
        }
    }
}
