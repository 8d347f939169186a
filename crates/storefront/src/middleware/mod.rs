//! Request middleware applied by [`crate::app`].
//!
//! From the outside in: Sentry hub and HTTP transaction, `TraceLayer` with a
//! span carrying the request id, the request id itself, then the cookie
//! session that holds each visitor's cart.

pub mod request_id;
pub mod session;

pub use request_id::{RequestId, make_request_span, request_id_middleware};
pub use session::{VisitorSessionStore, create_session_layer, spawn_expired_cleanup};
