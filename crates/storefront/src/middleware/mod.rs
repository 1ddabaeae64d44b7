//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. Request ID (assign `x-request-id`, echo it on the response)
//! 3. `TraceLayer` (request spans carrying the request ID)
//! 4. Sentry request ID tag
//! 5. Security headers (CSP, framing, caching)
//! 6. Visitor lock (one request per session at a time)
//! 7. Session layer (tower-sessions, holds the cart slot)
//!
//! `/health` and `/static` are mounted below the security headers and skip
//! the last two.

pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod visitor_lock;

pub use request_id::{
    propagate_request_id_layer, request_id, sentry_request_id_middleware, set_request_id_layer,
};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use visitor_lock::{VisitorLocks, visitor_lock_middleware};
