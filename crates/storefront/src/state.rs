//! Application state shared across handlers.

use std::sync::Arc;

use ticket_core::Catalog;

use crate::config::StorefrontConfig;
use crate::middleware::session::{self, VisitorSessionStore};
use crate::services::catalog::{self, CatalogHandle};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogHandle,
    sessions: VisitorSessionStore,
    http: reqwest::Client,
}

impl AppState {
    /// Create a new application state with the catalog still loading.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        Self::with_catalog(config, CatalogHandle::new())
    }

    /// Create an application state around an existing catalog handle.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: CatalogHandle) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                sessions: VisitorSessionStore::default(),
                http: reqwest::Client::new(),
            }),
        }
    }

    /// Create an application state with a catalog that is already loaded.
    #[must_use]
    pub fn with_loaded_catalog(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self::with_catalog(config, CatalogHandle::ready(catalog))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the shared catalog status.
    #[must_use]
    pub fn catalog(&self) -> &CatalogHandle {
        &self.inner.catalog
    }

    /// Get the store backing visitor sessions.
    #[must_use]
    pub fn sessions(&self) -> &VisitorSessionStore {
        &self.inner.sessions
    }

    /// Start sweeping expired sessions in the background.
    pub fn start_session_cleanup(&self) {
        session::spawn_expired_cleanup(
            self.inner.sessions.clone(),
            session::EXPIRED_CLEANUP_PERIOD,
        );
    }

    /// Start fetching the product feed in the background.
    pub fn start_catalog_loading(&self) {
        catalog::load_in_background(
            self.inner.catalog.clone(),
            self.inner.http.clone(),
            self.inner.config.catalog_source.clone(),
        );
    }
}
