//! Session-related types.
//!
//! Each visitor's cart and detail overlay live in their session.

/// Session keys for per-visitor storefront state.
pub mod keys {
    /// Key for the JSON-encoded cart lines.
    pub const CART: &str = "ticketT01_cart_v1";

    /// Key for the product detail overlay state.
    pub const DETAIL: &str = "ticketT01_detail_v1";
}
