//! Business logic services for storefront.
//!
//! # Services
//!
//! - `catalog` - One-shot product feed loading and the shared catalog status
//! - `cart` - Persistent cart store over pluggable storage backends
//! - `thumbnail` - Model thumbnail URLs for product cards

pub mod cart;
pub mod catalog;
pub mod thumbnail;
