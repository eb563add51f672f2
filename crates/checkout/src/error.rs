//! Errors raised while talking to the host or the validation service.

use thiserror::Error;

/// Failure somewhere between reading the session token and applying a ZIP.
///
/// None of these ever block checkout; the validator logs them and lets the
/// buyer continue.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The host could not provide a session token.
    #[error("session token unavailable: {0}")]
    SessionToken(String),

    /// The request to the validation service failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a body that is not a validation result.
    #[error("invalid service response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The service endpoint could not be built.
    #[error("invalid service URL: {0}")]
    Url(#[from] url::ParseError),

    /// The host refused the ZIP code update.
    #[error("failed to apply ZIP code: {0}")]
    Mutation(String),
}
