//! Domain models for storefront.
//!
//! Catalog, cart and overlay types live in `ticket-core`; this module only
//! holds what is specific to the web layer.

pub mod session;

pub use session::keys as session_keys;
