//! USPS Addresses API client.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::instrument;
use url::Url;

use super::auth::{UspsToken, request_token};
use super::types::{AddressLookup, AddressQuery, ApiErrorBody};
use super::UspsError;
use crate::config::{UspsConfig, UspsCredentials};

/// Address endpoint path relative to the USPS origin.
pub const ADDRESS_PATH: &str = "addresses/v3/address";

/// USPS API client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct UspsClient {
    inner: Arc<UspsClientInner>,
}

struct UspsClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl UspsClient {
    /// Create a client for the configured USPS origin.
    ///
    /// # Errors
    ///
    /// Returns `UspsError::Http` if the HTTP client cannot be built.
    pub fn new(config: &UspsConfig) -> Result<Self, UspsError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(UspsClientInner {
                client: builder.build()?,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// The USPS origin this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Exchange client credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// See [`request_token`].
    pub async fn issue_token(&self, credentials: &UspsCredentials) -> Result<UspsToken, UspsError> {
        request_token(&self.inner.client, &self.inner.base_url, credentials).await
    }

    /// Look up an address and its ZIP+4.
    ///
    /// # Errors
    ///
    /// Returns `UspsError::Api` with the authority's message on a non-success
    /// status, or `UspsError::Http`/`Parse` on transport and body errors.
    #[instrument(skip(self, token), fields(city = %query.city, state = %query.state))]
    pub async fn lookup(
        &self,
        query: &AddressQuery,
        token: &UspsToken,
    ) -> Result<AddressLookup, UspsError> {
        let mut url = self.inner.base_url.join(ADDRESS_PATH)?;
        url.query_pairs_mut().extend_pairs(query.params());

        let response = self
            .inner
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(token.access_token.expose_secret())
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiErrorBody>(&bytes)
                .ok()
                .and_then(ApiErrorBody::into_message)
                .unwrap_or_else(|| {
                    format!(
                        "Error: {} {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("Unknown")
                    )
                });

            tracing::warn!(status = status.as_u16(), %message, "USPS address lookup failed");
            return Err(UspsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}
