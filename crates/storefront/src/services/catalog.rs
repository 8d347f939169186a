//! Product catalog loading.
//!
//! The catalog feed is fetched exactly once, in a background task spawned at
//! startup. The app starts immediately with the catalog in the `Loading`
//! state; the task swaps in `Ready` or `Unavailable` when the single attempt
//! settles. There is no retry.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use thiserror::Error;
use ticket_core::{Catalog, CatalogFeed, Rejection};
use tracing::{error, info, instrument, warn};
use url::Url;

/// Where the product feed lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Fetched over HTTP(S).
    Url(Url),
    /// Read from the local filesystem.
    File(PathBuf),
}

impl CatalogSource {
    /// Interpret a configuration value.
    ///
    /// Values starting with `http://` or `https://` that parse as URLs are
    /// remote; everything else is a file path.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if (value.starts_with("http://") || value.starts_with("https://"))
            && let Ok(url) = Url::parse(value)
        {
            return Self::Url(url);
        }
        Self::File(PathBuf::from(value))
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The catalog could not be loaded.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed server answered with a non-success status.
    #[error("catalog feed returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The feed file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The feed is not valid catalog JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fetch and parse the catalog feed once.
///
/// # Errors
///
/// Returns `CatalogError` on any transport, status or parse failure.
#[instrument(skip_all, fields(source = %source))]
pub async fn load(
    client: &reqwest::Client,
    source: &CatalogSource,
) -> Result<Catalog, CatalogError> {
    let body = match source {
        CatalogSource::Url(url) => {
            let response = client.get(url.clone()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(CatalogError::Status(status));
            }
            response.text().await?
        }
        CatalogSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CatalogError::Io {
                    path: path.clone(),
                    source,
                })?
        }
    };

    let feed: CatalogFeed = serde_json::from_str(&body)?;
    let (catalog, rejected) = Catalog::from_products(feed.products);

    for rejection in rejected {
        match rejection {
            Rejection::NegativePrice(id) => {
                warn!(product_id = %id, "Dropping product with negative price");
            }
            Rejection::DuplicateId(id) => {
                warn!(product_id = %id, "Dropping product with duplicate id");
            }
        }
    }

    Ok(catalog)
}

/// Load progress of the shared catalog.
#[derive(Debug, Clone, Default)]
pub enum CatalogStatus {
    /// The fetch has not settled yet.
    #[default]
    Loading,
    /// The catalog is available.
    Ready(Arc<Catalog>),
    /// The fetch failed; the grid shows an error message.
    Unavailable,
}

/// Shared, swappable catalog status.
#[derive(Debug, Clone, Default)]
pub struct CatalogHandle {
    inner: Arc<RwLock<CatalogStatus>>,
}

impl CatalogHandle {
    /// Create a handle in the `Loading` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle that is already `Ready`.
    #[must_use]
    pub fn ready(catalog: Catalog) -> Self {
        let handle = Self::new();
        handle.set(CatalogStatus::Ready(Arc::new(catalog)));
        handle
    }

    /// Snapshot of the current status.
    #[must_use]
    pub fn status(&self) -> CatalogStatus {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .unwrap_or(CatalogStatus::Unavailable)
    }

    /// The catalog, if it has loaded.
    #[must_use]
    pub fn catalog(&self) -> Option<Arc<Catalog>> {
        match self.status() {
            CatalogStatus::Ready(catalog) => Some(catalog),
            CatalogStatus::Loading | CatalogStatus::Unavailable => None,
        }
    }

    /// Whether the load attempt has finished, successfully or not.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(self.status(), CatalogStatus::Loading)
    }

    pub(crate) fn set(&self, status: CatalogStatus) {
        match self.inner.write() {
            Ok(mut guard) => *guard = status,
            Err(e) => error!(error = %e, "Catalog status lock poisoned"),
        }
    }
}

/// Spawn a background task that loads the catalog into `handle`.
pub fn load_in_background(handle: CatalogHandle, client: reqwest::Client, source: CatalogSource) {
    info!(%source, "Spawning background catalog load");
    tokio::spawn(async move {
        match load(&client, &source).await {
            Ok(catalog) => {
                info!(products = catalog.len(), "Catalog loaded");
                handle.set(CatalogStatus::Ready(Arc::new(catalog)));
            }
            Err(e) => {
                error!(error = %e, %source, "Could not load product catalog");
                handle.set(CatalogStatus::Unavailable);
            }
        }
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_feed() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/products.json")
    }

    #[test]
    fn test_source_parse() {
        assert!(matches!(
            CatalogSource::parse("https://cdn.example/products.json"),
            CatalogSource::Url(_)
        ));
        assert_eq!(
            CatalogSource::parse("data/products.json"),
            CatalogSource::File(PathBuf::from("data/products.json"))
        );
        // A malformed URL is treated as a path and fails at load time.
        assert!(matches!(
            CatalogSource::parse("http://"),
            CatalogSource::File(_)
        ));
    }

    #[tokio::test]
    async fn test_load_bundled_feed() {
        let client = reqwest::Client::new();
        let catalog = load(&client, &CatalogSource::File(sample_feed()))
            .await
            .unwrap();

        assert!(!catalog.is_empty());
        assert!(catalog.products().iter().all(|p| !p.price.is_negative()));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let client = reqwest::Client::new();
        let err = load(
            &client,
            &CatalogSource::File(PathBuf::from("/definitely/not/here.json")),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[tokio::test]
    async fn test_background_load_settles_unavailable_on_failure() {
        let handle = CatalogHandle::new();
        assert!(!handle.is_settled());

        load_in_background(
            handle.clone(),
            reqwest::Client::new(),
            CatalogSource::File(PathBuf::from("/definitely/not/here.json")),
        );

        for _ in 0..100 {
            if handle.is_settled() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(matches!(handle.status(), CatalogStatus::Unavailable));
        assert!(handle.catalog().is_none());
    }

    #[test]
    fn test_ready_handle() {
        let handle = CatalogHandle::ready(Catalog::default());
        assert!(handle.is_settled());
        assert!(handle.catalog().is_some());
    }
}
