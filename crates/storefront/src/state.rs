//! Application state shared across handlers.

use std::sync::Arc;

use almacen_core::Catalog;

use crate::config::StorefrontConfig;
use crate::middleware::VisitorLocks;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Per-visitor cart state is not
/// held here; it lives in each visitor's session. Only the locks that keep a
/// visitor's requests from overlapping are shared.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    visitor_locks: VisitorLocks,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                visitor_locks: VisitorLocks::new(config.session_idle()),
                config,
                catalog,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get the per-visitor request locks.
    #[must_use]
    pub fn visitor_locks(&self) -> &VisitorLocks {
        &self.inner.visitor_locks
    }
}
