//! Storefront routes.
//!
//! Every handler except `/` and the health probes answers with an HTML
//! fragment meant to be swapped in by HTMX.
//!
//! ```text
//! GET  /                           full page (filters, grid, overlay, cart sidebar)
//! GET  /health                     liveness
//! GET  /health/ready               503 until the catalog load settles
//!
//! GET  /products?category=...      catalog section (all | men | women | kids)
//! GET  /products/{id}/quick-view   open the detail overlay
//! POST /products/detail/color      pick a color in the overlay
//! POST /products/detail/add        add the overlay's product to the cart
//! POST /products/detail/close      close the overlay
//!
//! GET  /cart                       cart panel lines and total
//! GET  /cart/count                 count badge
//! POST /cart/add                   add from a product card
//! POST /cart/update                change a line's quantity by a delta
//! POST /cart/remove                drop a line
//! ```

pub mod cart;
pub mod home;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Catalog grid and detail overlay endpoints, mounted at `/products`.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}/quick-view", get(products::quick_view))
        .route("/detail/color", post(products::select_color))
        .route("/detail/add", post(products::confirm_add))
        .route("/detail/close", post(products::close))
}

/// Cart panel endpoints, mounted at `/cart`.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// The whole storefront router, before middleware and static files.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(|| async { "ok" }))
        .route("/health/ready", get(readiness))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
}

/// Ready once the catalog has either loaded or failed for good.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.catalog().is_settled() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
