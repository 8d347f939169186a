//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use ticket_core::CatalogFilter;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::routes::cart::CartView;
use crate::routes::products::{CatalogView, DetailView, load_detail};
use crate::services::cart::{CartStore, SessionStorage};
use crate::state::AppState;

/// Home page template.
///
/// The page shell embeds the same partials the HTMX endpoints return, so a
/// full reload shows exactly what the fragments would.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Filter bar and product grid.
    pub catalog: CatalogView,
    /// Cart sidebar contents.
    pub cart: CartView,
    /// Cart badge count.
    pub count: u64,
    /// Open detail overlay, if any.
    pub detail: Option<DetailView>,
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let remote_images = state.config().remote_images;
    let catalog = CatalogView::new(&state.catalog().status(), CatalogFilter::All, remote_images);

    let store = CartStore::restore(SessionStorage::cart(session.clone())).await;
    let detail = load_detail(&session).await;

    HomeTemplate {
        catalog,
        cart: CartView::from(store.cart()),
        count: store.cart().count(),
        detail: DetailView::from_state(&detail, remote_images),
    }
}
