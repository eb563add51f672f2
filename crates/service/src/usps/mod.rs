//! USPS API client.
//!
//! Talks to two USPS endpoints on the same origin:
//! - `POST /oauth2/v3/token` - client-credentials exchange for a bearer token
//! - `GET /addresses/v3/address` - address standardization with ZIP+4
//!
//! # Architecture
//!
//! - One `reqwest::Client` shared by all requests
//! - A fresh token is requested for every lookup; tokens are never cached
//!   (one extra round trip per validation)
//! - No retries: every failure is surfaced as a single failed attempt

pub mod auth;
pub mod client;
pub mod types;

pub use auth::UspsToken;
pub use client::UspsClient;
pub use types::{AddressLookup, AddressQuery, UspsAddress};

use thiserror::Error;

/// Errors that can occur when interacting with the USPS API.
#[derive(Debug, Error)]
pub enum UspsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token exchange was rejected.
    #[error("{0}")]
    AuthenticationFailed(String),

    /// The Addresses API answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot be joined with an endpoint path.
    #[error("Invalid USPS URL: {0}")]
    Url(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usps_error_display() {
        let err = UspsError::AuthenticationFailed(
            "USPS API authentication failed: 401 bad client".to_string(),
        );
        assert_eq!(
            err.to_string(),
            "USPS API authentication failed: 401 bad client"
        );

        let err = UspsError::Api {
            status: 400,
            message: "Invalid ZIP Code.".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid ZIP Code.");
    }
}
