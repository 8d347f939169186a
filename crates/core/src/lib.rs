//! Ticket Store Core - Domain types and state reducers.
//!
//! This crate holds everything about the catalog, the product detail overlay
//! and the shopping cart that can be expressed without I/O:
//!
//! - the storefront's product and price types,
//! - catalog filtering,
//! - the cart reducer (merge by product and color, clamped quantities),
//! - the detail overlay reducer.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP,
//! no async. The storefront crate loads the catalog, persists carts and
//! renders HTML around these types.
//!
//! # Modules
//!
//! - [`types`] - Product, price and identifier types
//! - [`catalog`] - The loaded catalog and its category filter
//! - [`cart`] - Cart lines, actions and the cart reducer
//! - [`detail`] - Detail overlay state and its reducer

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod detail;
pub mod types;

pub use cart::{Cart, CartAction, CartLine, DuplicateLine, LineKey, resolve_color};
pub use catalog::{Catalog, CatalogFeed, CatalogFilter, Rejection};
pub use detail::{DetailAction, DetailState};
pub use types::*;
