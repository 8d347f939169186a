//! Extractors that answer malformed input through [`AppError`].
//!
//! Axum's own `Form` rejects a body it cannot deserialize with 422; the
//! storefront treats every malformed form or query as a plain 400.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// URL-encoded form body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct Form<T>(pub T);

/// Query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);
