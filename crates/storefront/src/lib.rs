//! Almacén Storefront library.
//!
//! Catalog, cart and checkout served as server-rendered pages with HTMX
//! fragments. Exposed as a library so the router can be tested in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod storage;

use axum::{
    Router,
    extract::Request,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{MemoryStore, SessionStore};

use crate::state::AppState;

/// Build the full application router with its middleware stack.
///
/// Sessions are kept in memory for the lifetime of the process.
pub fn app(state: AppState) -> Router {
    app_with_store(state, MemoryStore::default())
}

/// Build the application router with sessions kept in `store`.
///
/// Only the catalog, cart and checkout routes see the session; `/health`
/// and `/static` are mounted outside it.
pub fn app_with_store<Store>(state: AppState, store: Store) -> Router
where
    Store: SessionStore + Clone,
{
    let session_layer = middleware::create_session_layer(store, state.config());
    let static_dir = ServeDir::new(&state.config().static_dir);

    Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::visitor_lock_middleware,
        ))
        .route("/health", get(health))
        .nest_service("/static", static_dir)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::sentry_request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = middleware::request_id(request).unwrap_or_default(),
                )
            }),
        )
        .layer(middleware::propagate_request_id_layer())
        .layer(middleware::set_request_id_layer())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. There are no dependencies to check.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use almacen_core::Catalog;
    use almacen_core::persist::{self, CART_SLOT};
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{StatusCode, header};
    use axum::response::Response;
    use tower::ServiceExt;
    use tower_sessions::session::{Id, Record};
    use tower_sessions::session_store;

    use super::*;
    use crate::config::StorefrontConfig;

    fn test_state() -> AppState {
        AppState::new(StorefrontConfig::default(), Catalog::builtin())
    }

    fn test_app() -> Router {
        app(test_state())
    }

    /// Memory store that counts how often a session record is written.
    #[derive(Debug, Clone, Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: Arc<AtomicUsize>,
    }

    impl CountingStore {
        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SessionStore for CountingStore {
        async fn create(&self, record: &mut Record) -> session_store::Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.create(record).await
        }

        async fn save(&self, record: &Record) -> session_store::Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.save(record).await
        }

        async fn load(&self, id: &Id) -> session_store::Result<Option<Record>> {
            self.inner.load(id).await
        }

        async fn delete(&self, id: &Id) -> session_store::Result<()> {
            self.inner.delete(id).await
        }
    }

    fn session_cookie(response: &Response) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(String::from)
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request {
        let mut builder = axum::http::Request::post(uri).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request {
        let mut builder = axum::http::Request::get(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app().oneshot(get("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_upstream_request_id_is_echoed() {
        let request = axum::http::Request::get("/health")
            .header("x-request-id", "edge-1234")
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.headers().get("x-request-id").unwrap(), "edge-1234");
    }

    #[tokio::test]
    async fn test_add_to_cart_persists_in_session() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(post_form("/cart/add", None, "index=0&quantity=3"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("hx-trigger").unwrap(),
            routes::CART_UPDATED_EVENT
        );
        let cookie = session_cookie(&response).unwrap();
        assert!(
            body_text(response)
                .await
                .contains("Se han agregado 3 unidades de Leche al carrito.")
        );

        let response = app
            .oneshot(get("/cart/items", Some(&cookie)))
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("Cantidad: 3"));
        assert!(html.contains("Total: $3.000 CLP"));
    }

    #[tokio::test]
    async fn test_batched_add_writes_session_once() {
        let store = CountingStore::default();
        let app = app_with_store(test_state(), store.clone());

        let response = app
            .clone()
            .oneshot(post_form("/cart/add", None, "index=0&quantity=5"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.writes(), 1);

        let cookie = session_cookie(&response).unwrap();
        let response = app
            .clone()
            .oneshot(post_form("/cart/add", Some(&cookie), "index=0&quantity=3"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.writes(), 2);

        // Reading the cart does not write it back
        app.oneshot(get("/cart/items", Some(&cookie))).await.unwrap();
        assert_eq!(store.writes(), 2);

        let id: Id = cookie.split_once('=').unwrap().1.parse().unwrap();
        let record = store.load(&id).await.unwrap().unwrap();
        let raw = record.data.get(CART_SLOT).and_then(|v| v.as_str()).unwrap();
        let cart = persist::decode(raw).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.unit_count(), 8);
    }

    #[tokio::test]
    async fn test_invalid_quantity_is_rejected() {
        let response = test_app()
            .oneshot(post_form("/cart/add", None, "index=1&quantity=-4"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("hx-trigger").is_none());
        assert!(session_cookie(&response).is_none());
        assert!(
            body_text(response)
                .await
                .contains(routes::cart::INVALID_QUANTITY_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_unknown_catalog_index_is_not_found() {
        let response = test_app()
            .oneshot(post_form("/cart/add", None, "index=99&quantity=1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_checkout_on_empty_cart_shows_alert() {
        let response = test_app()
            .oneshot(post_form("/checkout", None, ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("hx-retarget").unwrap(), "#alerts");
        let html = body_text(response).await;
        assert!(html.contains(routes::checkout::EMPTY_CHECKOUT_MESSAGE));
        assert!(!html.contains("Detalles de la compra"));
    }

    #[tokio::test]
    async fn test_complete_without_pending_checkout_conflicts() {
        let response = test_app()
            .oneshot(post_form(
                "/checkout/complete",
                None,
                "token=67e55044-10b1-426f-9247-bb680e5fe0c8",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_every_catalog_image_is_served() {
        let config = StorefrontConfig {
            static_dir: std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("static"),
            ..StorefrontConfig::default()
        };
        let app = app(AppState::new(config, Catalog::builtin()));

        for product in Catalog::builtin().iter() {
            let uri = format!("/static/img/{}", product.image);
            let response = app.clone().oneshot(get(&uri, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");

            let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
            assert!(content_type.to_str().unwrap().starts_with("image/"), "{uri}");
            assert_eq!(
                response.headers().get(header::CACHE_CONTROL).unwrap(),
                "public, max-age=3600"
            );
        }
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let response = test_app().oneshot(get("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
        assert!(response.headers().contains_key("content-security-policy"));
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store, max-age=0"
        );
    }
}
