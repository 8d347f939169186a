//! Core types for the Ticket Store.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;

pub use id::ProductId;
pub use price::Price;
pub use product::{Category, ColorVariant, Product, UnknownCategory};
