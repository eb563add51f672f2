//! USPS OAuth token exchange.
//!
//! Exchanges the consumer key and secret for a short-lived bearer token.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use super::UspsError;
use crate::config::UspsCredentials;

/// Token endpoint path relative to the USPS origin.
pub const TOKEN_PATH: &str = "oauth2/v3/token";

/// Bearer token obtained from the USPS token endpoint.
#[derive(Debug, Clone)]
pub struct UspsToken {
    /// Bearer token for the Addresses API.
    pub access_token: SecretString,
    /// Unix timestamp when the token expires.
    pub expires_at: i64,
}

/// Request body for the client-credentials grant.
#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'static str,
}

/// Response from the token endpoint.
///
/// USPS documents `expires_in` as a string; numbers are accepted too.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<serde_json::Value>,
}

/// Request a bearer token using client credentials.
///
/// # Errors
///
/// Returns `UspsError::AuthenticationFailed` if the endpoint rejects the
/// credentials, or `UspsError::Http`/`Parse` on transport and body errors.
#[instrument(skip(client, credentials), fields(client_id = %credentials.client_id))]
pub async fn request_token(
    client: &reqwest::Client,
    base_url: &Url,
    credentials: &UspsCredentials,
) -> Result<UspsToken, UspsError> {
    let now = chrono::Utc::now().timestamp();

    let response = client
        .post(base_url.join(TOKEN_PATH)?)
        .json(&TokenRequest {
            client_id: &credentials.client_id,
            client_secret: credentials.client_secret.expose_secret(),
            grant_type: "client_credentials",
        })
        .send()
        .await?;

    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        return Err(UspsError::AuthenticationFailed(format!(
            "USPS API authentication failed: {} {error_text}",
            status.as_u16()
        )));
    }

    let bytes = response.bytes().await?;
    let token: TokenResponse = serde_json::from_slice(&bytes)?;

    Ok(UspsToken {
        access_token: SecretString::from(token.access_token),
        expires_at: now + token.expires_in.as_ref().and_then(lifetime_secs).unwrap_or(0),
    })
}

/// Token lifetime in seconds from a JSON number or numeric string.
fn lifetime_secs(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl UspsToken {
    /// Check if the token has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at
    }
}
