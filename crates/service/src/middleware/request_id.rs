//! Request correlation IDs.
//!
//! Checkout extensions call the service through Shopify's edge and then
//! Fly's proxy, either of which may already have tagged the request. The ID
//! chosen here is recorded on the `http_request` span, set as a Sentry tag
//! and echoed back in `x-request-id`.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Header set by the Fly.io proxy on every request.
pub const FLY_REQUEST_ID_HEADER: &str = "fly-request-id";

/// Longest upstream ID that is trusted; anything longer is replaced.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Pick the request ID: `x-request-id`, then `fly-request-id`, then a new
/// UUID v4.
fn resolve_request_id(headers: &HeaderMap) -> String {
    [REQUEST_ID_HEADER, FLY_REQUEST_ID_HEADER]
        .into_iter()
        .filter_map(|name| headers.get(name)?.to_str().ok())
        .map(str::trim)
        .find(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

/// Middleware that tags every request and response with a request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers());

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).expect("header value"));
        }
        map
    }

    #[test]
    fn test_prefers_x_request_id() {
        let map = headers(&[(REQUEST_ID_HEADER, "abc"), (FLY_REQUEST_ID_HEADER, "fly-1")]);
        assert_eq!(resolve_request_id(&map), "abc");
    }

    #[test]
    fn test_falls_back_to_fly() {
        let map = headers(&[(REQUEST_ID_HEADER, "  "), (FLY_REQUEST_ID_HEADER, "fly-1")]);
        assert_eq!(resolve_request_id(&map), "fly-1");
    }

    #[test]
    fn test_generates_uuid() {
        let id = resolve_request_id(&HeaderMap::new());
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_overlong_id_replaced() {
        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        let id = resolve_request_id(&headers(&[(REQUEST_ID_HEADER, &long)]));
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
