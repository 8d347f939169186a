//! Product route handlers.
//!
//! The catalog grid and the detail overlay are HTMX fragments. The overlay's
//! state lives in the session so that color picks and the add confirmation
//! survive between requests.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use ticket_core::{Catalog, CatalogFilter, Category, DetailAction, DetailState, Product, ProductId};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::{Form, Query};
use crate::models::session_keys;
use crate::routes::cart::{HX_TRIGGER, added_events};
use crate::services::cart::{CartStore, SessionStorage};
use crate::services::catalog::CatalogStatus;
use crate::services::thumbnail::model_thumbnail;
use crate::state::AppState;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub image: String,
    pub thumbnail: String,
    pub category: String,
    pub sizes: Vec<String>,
    pub colors: Vec<ColorView>,
}

/// Color swatch display data for templates.
#[derive(Clone)]
pub struct ColorView {
    pub name: String,
    pub hex: String,
    pub selected: bool,
}

impl ProductView {
    /// Build the card view for `product`.
    #[must_use]
    pub fn new(product: &Product, remote_images: bool) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
            thumbnail: model_thumbnail(product, remote_images),
            category: product.category.to_string(),
            sizes: product.sizes.clone(),
            colors: product
                .colors
                .iter()
                .map(|color| ColorView {
                    name: color.name.clone(),
                    hex: color.hex.clone(),
                    selected: false,
                })
                .collect(),
        }
    }

    /// Mark the swatch matching `hex` as selected.
    #[must_use]
    pub fn with_selected_color(mut self, hex: Option<&str>) -> Self {
        for color in &mut self.colors {
            color.selected = hex == Some(color.hex.as_str());
        }
        self
    }
}

/// Filter button display data for templates.
#[derive(Clone)]
pub struct FilterView {
    pub value: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Catalog section display data: filter bar plus grid.
#[derive(Clone)]
pub struct CatalogView {
    pub filters: Vec<FilterView>,
    pub loading: bool,
    pub unavailable: bool,
    pub products: Vec<ProductView>,
}

impl CatalogView {
    /// Project the catalog status through `filter`.
    #[must_use]
    pub fn new(status: &CatalogStatus, filter: CatalogFilter, remote_images: bool) -> Self {
        let mut view = Self {
            filters: filter_buttons(filter),
            loading: false,
            unavailable: false,
            products: Vec::new(),
        };

        match status {
            CatalogStatus::Loading => view.loading = true,
            CatalogStatus::Unavailable => view.unavailable = true,
            CatalogStatus::Ready(catalog) => {
                view.products = catalog
                    .filtered(filter)
                    .into_iter()
                    .map(|product| ProductView::new(product, remote_images))
                    .collect();
            }
        }

        view
    }
}

/// Label shown on a category's filter button.
const fn filter_label(filter: CatalogFilter) -> &'static str {
    match filter {
        CatalogFilter::All => "TODOS",
        CatalogFilter::Category(Category::Men) => "HOMBRE",
        CatalogFilter::Category(Category::Women) => "MUJER",
        CatalogFilter::Category(Category::Kids) => "NIÑOS",
        CatalogFilter::Category(Category::Other) => "OTROS",
    }
}

fn filter_buttons(active: CatalogFilter) -> Vec<FilterView> {
    std::iter::once(CatalogFilter::All)
        .chain(Category::FILTERABLE.into_iter().map(CatalogFilter::Category))
        .map(|filter| FilterView {
            value: filter.as_str(),
            label: filter_label(filter),
            active: filter == active,
        })
        .collect()
}

/// Detail overlay display data for templates.
#[derive(Clone)]
pub struct DetailView {
    pub product: ProductView,
    pub selected_color: Option<String>,
    pub confirmed: bool,
}

impl DetailView {
    /// Project an overlay state. `None` when the overlay is closed.
    #[must_use]
    pub fn from_state(state: &DetailState, remote_images: bool) -> Option<Self> {
        let product = state.product()?;
        Some(Self {
            product: ProductView::new(product, remote_images)
                .with_selected_color(state.selected_color()),
            selected_color: state.selected_color().map(str::to_string),
            confirmed: state.is_confirmed(),
        })
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the overlay state from the session. Unreadable state counts as closed.
pub async fn load_detail(session: &Session) -> DetailState {
    match session.get::<DetailState>(session_keys::DETAIL).await {
        Ok(state) => state.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable detail overlay state");
            DetailState::default()
        }
    }
}

/// Save the overlay state to the session.
async fn save_detail(
    session: &Session,
    state: &DetailState,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::DETAIL, state).await
}

/// Resolve the loaded catalog or fail with the matching error.
fn loaded_catalog(state: &AppState) -> Result<std::sync::Arc<Catalog>> {
    state
        .catalog()
        .catalog()
        .ok_or(AppError::CatalogUnavailable)
}

// =============================================================================
// Templates
// =============================================================================

/// Catalog section fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/catalog.html")]
pub struct CatalogTemplate {
    pub catalog: CatalogView,
}

/// Detail overlay fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_detail.html")]
pub struct DetailTemplate {
    pub detail: Option<DetailView>,
}

/// Catalog filter query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}

/// Color selection form data.
#[derive(Debug, Deserialize)]
pub struct SelectColorForm {
    pub hex: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the catalog section, optionally filtered by category (HTMX).
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<CatalogTemplate> {
    let filter = match query.category.as_deref() {
        None | Some("") => CatalogFilter::All,
        Some(value) => value
            .parse::<CatalogFilter>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?,
    };

    Ok(CatalogTemplate {
        catalog: CatalogView::new(
            &state.catalog().status(),
            filter,
            state.config().remote_images,
        ),
    })
}

/// Open the detail overlay for a product (HTMX).
#[instrument(skip(state, session))]
pub async fn quick_view(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<DetailTemplate> {
    let catalog = loaded_catalog(&state)?;
    let product = catalog
        .find(&ProductId::new(id.as_str()))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let mut detail = load_detail(&session).await;
    detail.apply(DetailAction::Open(product.clone()));
    save_detail(&session, &detail).await?;

    Ok(DetailTemplate {
        detail: DetailView::from_state(&detail, state.config().remote_images),
    })
}

/// Select a color swatch in the open overlay (HTMX).
#[instrument(skip(state, session))]
pub async fn select_color(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SelectColorForm>,
) -> Result<DetailTemplate> {
    let mut detail = load_detail(&session).await;
    detail.apply(DetailAction::SelectColor(form.hex));
    save_detail(&session, &detail).await?;

    Ok(DetailTemplate {
        detail: DetailView::from_state(&detail, state.config().remote_images),
    })
}

/// Add the open product with the selected color to the cart (HTMX).
///
/// The returned overlay shows the confirmation and closes itself shortly
/// after. The page refreshes and opens the cart the same way a card add does.
#[instrument(skip(state, session))]
pub async fn confirm_add(State(state): State<AppState>, session: Session) -> Result<Response> {
    let mut detail = load_detail(&session).await;
    let Some(action) = detail.apply(DetailAction::ConfirmAdd) else {
        return Ok(DetailTemplate { detail: None }.into_response());
    };

    if let Some(product) = detail.product() {
        add_breadcrumb(
            "cart",
            "Added item from detail overlay",
            Some(&[("product_id", product.id.as_str())]),
        );
    }

    let mut store = CartStore::restore(SessionStorage::cart(session.clone())).await;
    store.dispatch(action).await;
    save_detail(&session, &detail).await?;

    Ok((
        AppendHeaders([(HX_TRIGGER, added_events())]),
        DetailTemplate {
            detail: DetailView::from_state(&detail, state.config().remote_images),
        },
    )
        .into_response())
}

/// Close the detail overlay (HTMX).
#[instrument(skip(session))]
pub async fn close(session: Session) -> Result<DetailTemplate> {
    let mut detail = load_detail(&session).await;
    detail.apply(DetailAction::Close);
    save_detail(&session, &detail).await?;

    Ok(DetailTemplate { detail: None })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use ticket_core::{ColorVariant, Price};

    use super::*;

    fn product(id: &str, category: Category) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Remera {id}"),
            price: Price::new(Decimal::new(123_450, 2)),
            category,
            image: format!("images/{id}.jpg"),
            sizes: vec!["S".to_string(), "M".to_string()],
            colors: vec![
                ColorVariant {
                    name: "Negro".to_string(),
                    hex: "#000".to_string(),
                },
                ColorVariant {
                    name: "Blanco".to_string(),
                    hex: "#fff".to_string(),
                },
            ],
        }
    }

    fn ready(products: Vec<Product>) -> CatalogStatus {
        CatalogStatus::Ready(Arc::new(Catalog::from_products(products).0))
    }

    #[test]
    fn test_product_view_formats_price_and_local_thumbnail() {
        let view = ProductView::new(&product("A", Category::Women), false);
        assert_eq!(view.price, "$1.234,5");
        assert_eq!(view.thumbnail, "/static/images/model-women.svg");
        assert_eq!(view.sizes, vec!["S", "M"]);
        assert!(view.colors.iter().all(|c| !c.selected));
    }

    #[test]
    fn test_catalog_view_filters_and_marks_active_button() {
        let status = ready(vec![
            product("A", Category::Men),
            product("B", Category::Kids),
            product("C", Category::Men),
        ]);

        let view = CatalogView::new(&status, CatalogFilter::Category(Category::Men), false);
        let ids: Vec<_> = view.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C"]);

        let active: Vec<_> = view.filters.iter().filter(|f| f.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active.first().unwrap().value, "men");
        assert_eq!(view.filters.len(), 4);
    }

    #[test]
    fn test_catalog_view_loading_and_unavailable() {
        let view = CatalogView::new(&CatalogStatus::Loading, CatalogFilter::All, true);
        assert!(view.loading);
        assert!(view.products.is_empty());

        let view = CatalogView::new(&CatalogStatus::Unavailable, CatalogFilter::All, true);
        assert!(view.unavailable);
        assert!(!view.loading);
    }

    #[test]
    fn test_catalog_template_renders_messages() {
        let html = CatalogTemplate {
            catalog: CatalogView::new(&CatalogStatus::Loading, CatalogFilter::All, false),
        }
        .render()
        .unwrap();
        assert!(html.contains("Cargando productos…"));

        let html = CatalogTemplate {
            catalog: CatalogView::new(&CatalogStatus::Unavailable, CatalogFilter::All, false),
        }
        .render()
        .unwrap();
        assert!(html.contains("No se pudieron cargar los productos de ejemplo."));
    }

    #[test]
    fn test_detail_view_marks_selected_swatch() {
        let mut state = DetailState::default();
        assert!(DetailView::from_state(&state, false).is_none());

        state.apply(DetailAction::Open(product("A", Category::Men)));
        state.apply(DetailAction::SelectColor("#fff".to_string()));

        let view = DetailView::from_state(&state, false).unwrap();
        assert_eq!(view.selected_color.as_deref(), Some("#fff"));
        let selected: Vec<_> = view
            .product
            .colors
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.hex.as_str())
            .collect();
        assert_eq!(selected, vec!["#fff"]);
        assert!(!view.confirmed);
    }

    #[test]
    fn test_detail_template_shows_confirmation() {
        let mut state = DetailState::default();
        state.apply(DetailAction::Open(product("A", Category::Men)));
        state.apply(DetailAction::ConfirmAdd);

        let html = DetailTemplate {
            detail: DetailView::from_state(&state, false),
        }
        .render()
        .unwrap();
        assert!(html.contains("Añadido"));
        assert!(html.contains("load delay:600ms"));
        assert!(html.contains("REMERA A"));
    }
}
