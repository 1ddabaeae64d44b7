//! Request correlation ids.
//!
//! `tower_http::request_id` assigns the id: an `x-request-id` sent by an
//! upstream proxy is kept, otherwise a UUID v4 is generated, and the same
//! value is echoed on the response. This module reads it back for the
//! request span and the Sentry scope.

use axum::{extract::Request, middleware::Next, response::Response};
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};

/// Layer that assigns a request id when the client did not send one.
#[must_use]
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Layer that copies the request id onto the response.
#[must_use]
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// The id assigned to `request`, if it is printable.
#[must_use]
pub fn request_id<B>(request: &axum::http::Request<B>) -> Option<&str> {
    request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .filter(|id| !id.is_empty())
}

/// Tag the Sentry scope with the request id so captured errors can be
/// matched to log lines.
pub async fn sentry_request_id_middleware(request: Request, next: Next) -> Response {
    if let Some(id) = request_id(&request) {
        sentry::configure_scope(|scope| scope.set_tag("request_id", id));
    }
    next.run(request).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_request_id_read_from_extension() {
        let mut request = axum::http::Request::get("/").body(Body::empty()).unwrap();
        assert_eq!(request_id(&request), None);

        request
            .extensions_mut()
            .insert(RequestId::new(HeaderValue::from_static("req-42")));
        assert_eq!(request_id(&request), Some("req-42"));
    }

    #[test]
    fn test_empty_request_id_is_ignored() {
        let mut request = axum::http::Request::get("/").body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(RequestId::new(HeaderValue::from_static("")));
        assert_eq!(request_id(&request), None);
    }
}
