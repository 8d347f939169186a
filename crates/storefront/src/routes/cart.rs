//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the session and is written back after every
//! change.

use std::num::NonZeroU32;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use ticket_core::{Cart, CartAction, CartLine, LineKey, ProductId};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::Form;
use crate::services::cart::{CartStore, SessionStorage};
use crate::state::AppState;

/// HTMX response header for client-side events.
pub const HX_TRIGGER: &str = "HX-Trigger";

/// The cart changed; refreshes the count badge.
pub const CART_UPDATED: &str = "cart-updated";

/// A line was added outside the cart panel; refreshes the panel.
pub const CART_ADDED: &str = "cart-added";

/// Open the cart sidebar.
pub const CART_OPENED: &str = "cart-opened";

/// `HX-Trigger` value sent after any add, from a card or the detail overlay.
#[must_use]
pub fn added_events() -> String {
    format!("{CART_UPDATED}, {CART_ADDED}, {CART_OPENED}")
}

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub title: String,
    /// Color value posted back with line controls. Empty when the line has none.
    pub color: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&Cart::new())
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            total: cart.total().to_string(),
            item_count: cart.count(),
        }
    }
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.id.to_string(),
            title: line.title.clone(),
            color: line.color.clone().unwrap_or_default(),
            quantity: line.quantity.get(),
            price: line.price.to_string(),
            line_price: line.subtotal().to_string(),
            image: line.image.clone(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Restore the visitor's cart from the session.
async fn load_cart(session: Session) -> CartStore<SessionStorage> {
    CartStore::restore(SessionStorage::cart(session)).await
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
    pub color: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    #[serde(default)]
    pub color: String,
    pub delta: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
    #[serde(default)]
    pub color: String,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Display the cart panel (HTMX).
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let store = load_cart(session).await;

    CartItemsTemplate {
        cart: CartView::from(store.cart()),
    }
}

/// Add item to cart (HTMX).
///
/// Used by the card's add button. Returns the new count badge and asks the
/// page to refresh and open the cart sidebar.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let quantity = NonZeroU32::new(form.quantity.unwrap_or(1))
        .ok_or_else(|| AppError::BadRequest("quantity must be at least 1".to_string()))?;

    let catalog = state
        .catalog()
        .catalog()
        .ok_or(AppError::CatalogUnavailable)?;
    let product = catalog
        .find(&ProductId::new(form.product_id.as_str()))
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[("product_id", form.product_id.as_str())]),
    );

    let mut store = load_cart(session).await;
    let cart = store
        .dispatch(CartAction::Add {
            product: product.clone(),
            quantity,
            color: form.color.filter(|color| !color.is_empty()),
        })
        .await;

    Ok((
        AppendHeaders([(HX_TRIGGER, added_events())]),
        CartCountTemplate {
            count: cart.count(),
        },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Response {
    let mut store = load_cart(session).await;
    let cart = store
        .dispatch(CartAction::ChangeQuantity {
            key: LineKey::new(form.product_id, Some(form.color)),
            delta: form.delta,
        })
        .await;

    (
        AppendHeaders([(HX_TRIGGER, CART_UPDATED)]),
        CartItemsTemplate {
            cart: CartView::from(cart),
        },
    )
        .into_response()
}

/// Remove item from cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Response {
    let mut store = load_cart(session).await;
    let cart = store
        .dispatch(CartAction::Remove {
            key: LineKey::new(form.product_id, Some(form.color)),
        })
        .await;

    (
        AppendHeaders([(HX_TRIGGER, CART_UPDATED)]),
        CartItemsTemplate {
            cart: CartView::from(cart),
        },
    )
        .into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let store = load_cart(session).await;

    CartCountTemplate {
        count: store.cart().count(),
    }
}
