//! HTTP middleware stack for the service.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. CORS headers (every response, including rejections)
//! 3. `TraceLayer` (request span with method, uri, status, latency)
//! 4. Request ID (add unique ID to each request)
//!
//! Checkout session authentication is an extractor, not a layer, so that the
//! `OPTIONS` preflight never needs a token.

pub mod cors;
pub mod request_id;
pub mod session_token;

pub use cors::cors_layer;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session_token::{
    Authenticate, CheckoutSession, Identity, SharedAuthenticator, ShopifySessionVerifier,
    Unauthorized,
};
