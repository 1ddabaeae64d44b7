//! Per-visitor request serialization.
//!
//! Session data is loaded when a handler first touches it and written back
//! by the session layer after the response is built. Two overlapping
//! requests from the same visitor would each write their own copy of the
//! record and the later save would drop the earlier one's changes. This
//! middleware sits outside the session layer and holds a lock keyed by the
//! session cookie until the inner stack, including the session save, has
//! finished.
//!
//! Requests without a session cookie get a fresh session id and never
//! contend with anyone, so they pass through unlocked.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use moka::future::Cache;
use tokio::sync::Mutex;
use tower_sessions::cookie::Cookie;

use super::session::SESSION_COOKIE_NAME;
use crate::state::AppState;

/// Locks keyed by session id.
///
/// Entries idle for longer than the session lifetime are evicted; by then
/// the session they guard has expired as well.
#[derive(Clone)]
pub struct VisitorLocks {
    locks: Cache<String, Arc<Mutex<()>>>,
}

impl VisitorLocks {
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        Self {
            locks: Cache::builder().time_to_idle(idle).build(),
        }
    }

    /// The lock for `session_id`, created on first use.
    pub async fn lock_for(&self, session_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .get_with(session_id.to_string(), async { Arc::new(Mutex::new(())) })
            .await
    }
}

impl std::fmt::Debug for VisitorLocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitorLocks")
            .field("entries", &self.locks.entry_count())
            .finish()
    }
}

/// Session id carried by the request's cookie header, if any.
fn session_id(request: &Request) -> Option<String> {
    request
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
}

/// Run requests of the same visitor one at a time.
pub async fn visitor_lock_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(id) = session_id(&request) else {
        return next.run(request).await;
    };

    let lock = state.visitor_locks().lock_for(&id).await;
    let _guard = lock.lock().await;
    next.run(request).await
}
