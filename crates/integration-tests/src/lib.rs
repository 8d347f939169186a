//! Integration tests for the Ticket Store storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ticket-integration-tests
//! ```
//!
//! Each test boots the full storefront router (sessions, request IDs,
//! tracing) on an ephemeral local port and talks to it with a
//! cookie-keeping `reqwest` client, so every client is a separate visitor.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::{Router, http::StatusCode, routing::get};
use reqwest::Client;
use serde_json::{Value, json};
use ticket_core::{Catalog, CatalogFeed};
use ticket_storefront::config::StorefrontConfig;
use ticket_storefront::services::catalog::CatalogSource;
use ticket_storefront::state::AppState;

/// A product feed with one product per category and a colorless product.
#[must_use]
pub fn sample_feed() -> Value {
    json!({
        "products": [
            {
                "id": "A",
                "title": "Remera Dry-Fit",
                "price": 100,
                "category": "men",
                "image": "images/a.jpg",
                "sizes": ["S", "M"],
                "colors": [
                    { "name": "Blanco", "hex": "#fff" },
                    { "name": "Negro", "hex": "#000" }
                ]
            },
            {
                "id": "B",
                "title": "Calza Tiro Alto",
                "price": 1234.5,
                "category": "women",
                "image": "images/b.jpg",
                "sizes": ["XS"],
                "colors": [{ "name": "Bordó", "hex": "#6d1a36" }]
            },
            {
                "id": 7,
                "title": "Conjunto Escolar",
                "price": "250",
                "category": "kids",
                "image": "images/c.jpg"
            }
        ]
    })
}

/// Build a catalog from [`sample_feed`].
#[must_use]
pub fn sample_catalog() -> Catalog {
    let feed: CatalogFeed =
        serde_json::from_value(sample_feed()).expect("sample feed should deserialize");
    Catalog::from_products(feed.products).0
}

/// Storefront configuration suitable for tests: offline thumbnails and the
/// storefront crate's static directory.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        remote_images: false,
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/static"),
        ..StorefrontConfig::default()
    }
}

/// A storefront running in the background.
pub struct TestServer {
    base_url: String,
    state: AppState,
}

impl TestServer {
    /// Serve `state` on an ephemeral port.
    pub async fn start(state: AppState) -> Self {
        let addr = serve(ticket_storefront::app(state.clone())).await;
        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Serve a storefront whose catalog is already loaded with [`sample_catalog`].
    pub async fn with_sample_catalog() -> Self {
        Self::start(AppState::with_loaded_catalog(test_config(), sample_catalog())).await
    }

    /// Serve a storefront that loads its catalog from `source` in the background.
    pub async fn loading_from(source: CatalogSource) -> Self {
        let config = StorefrontConfig {
            catalog_source: source,
            ..test_config()
        };
        let state = AppState::new(config);
        state.start_catalog_loading();
        Self::start(state).await
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A fresh visitor with its own cookie jar.
    #[must_use]
    pub fn visitor(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Wait until the catalog load has settled.
    pub async fn wait_until_settled(&self) {
        for _ in 0..200 {
            if self.state.catalog().is_settled() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("catalog never settled");
    }
}

/// Serve a static product feed at `/feed.json` with the given status.
///
/// Returns the feed URL.
pub async fn serve_feed(status: StatusCode, body: Value) -> String {
    let router = Router::new().route(
        "/feed.json",
        get(move || {
            let body = body.clone();
            async move { (status, axum::Json(body)) }
        }),
    );
    let addr = serve(router).await;
    format!("http://{addr}/feed.json")
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no local address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server error");
    });

    addr
}
