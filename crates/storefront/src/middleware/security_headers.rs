//! Security and caching headers.
//!
//! Pages and fragments carry the visitor's own cart, so they are never
//! cached. Product images and the stylesheet under `/static` are the same
//! for everyone and may be cached for an hour.

use axum::{
    extract::Request,
    http::{
        HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

/// Content Security Policy. htmx is the only script and comes from unpkg;
/// everything else is same-origin.
pub const CONTENT_SECURITY_POLICY_VALUE: &str = concat!(
    "default-src 'none'; ",
    "script-src 'self' https://unpkg.com; ",
    "style-src 'self'; ",
    "img-src 'self'; ",
    "connect-src 'self'; ",
    "base-uri 'self'; ",
    "form-action 'self'; ",
    "frame-ancestors 'none'",
);

const PRIVATE_CACHE: &str = "no-store, max-age=0";
const STATIC_CACHE: &str = "public, max-age=3600";

/// Whether `path` is a shared static asset.
fn is_static_asset(path: &str) -> bool {
    path.starts_with("/static/")
}

/// Add framing, sniffing, referrer and CSP headers to every response, and a
/// `Cache-Control` that depends on whether the response is visitor-specific.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let cache_control = if is_static_asset(request.uri().path()) {
        STATIC_CACHE
    } else {
        PRIVATE_CACHE
    };

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("same-origin"));
    headers.insert(
        CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY_VALUE),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(cache_control));

    response
}
