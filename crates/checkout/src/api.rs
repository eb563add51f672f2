//! Calls to the ZIP+4 validation service.

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;
use url::Url;
use zip4_core::{Address, ErrorBody, ValidateAddressRequest, ValidationResult};

use crate::config::CheckoutConfig;
use crate::error::CheckoutError;

/// Validation path relative to the service origin.
pub const VALIDATE_ADDRESS_PATH: &str = "api/validate-address";

/// How the service answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceReply {
    /// 2xx with a validation result, valid or not.
    Validated(ValidationResult),
    /// Any other status, with the `error` message when the body had one.
    Rejected { status: u16, error: String },
}

/// Something that can validate an address on the checkout's behalf.
#[async_trait]
pub trait ValidationApi: Send + Sync {
    /// Validate one address, authenticated with the buyer's session token.
    async fn validate(
        &self,
        address: &Address,
        session_token: &SecretString,
    ) -> Result<ServiceReply, CheckoutError>;
}

/// [`ValidationApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpValidationApi {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpValidationApi {
    /// Create a client for the configured service.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the endpoint
    /// URL cannot be joined.
    pub fn new(config: &CheckoutConfig) -> Result<Self, CheckoutError> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            endpoint: config.service_url.join(VALIDATE_ADDRESS_PATH)?,
        })
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ValidationApi for HttpValidationApi {
    #[instrument(skip(self, address, session_token), fields(endpoint = %self.endpoint))]
    async fn validate(
        &self,
        address: &Address,
        session_token: &SecretString,
    ) -> Result<ServiceReply, CheckoutError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(session_token.expose_secret())
            .json(&ValidateAddressRequest::new(address.clone()))
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(status = %status, body_len = body.len(), "Validation service replied");

        classify(status, &body)
    }
}

/// Sort a service response into a [`ServiceReply`].
fn classify(status: StatusCode, body: &[u8]) -> Result<ServiceReply, CheckoutError> {
    if status.is_success() {
        return Ok(ServiceReply::Validated(serde_json::from_slice(body)?));
    }

    let error = serde_json::from_slice::<ErrorBody>(body).map_or_else(
        |_| String::from_utf8_lossy(body).into_owned(),
        |body| body.error,
    );
    Ok(ServiceReply::Rejected {
        status: status.as_u16(),
        error,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use zip4_core::NOT_CONFIGURED_MESSAGE;

    use super::*;

    #[test]
    fn test_classify_result() {
        let reply = classify(
            StatusCode::OK,
            br#"{"valid":false,"error":"USPS API not configured"}"#,
        )
        .unwrap();
        let ServiceReply::Validated(result) = reply else {
            panic!("expected a result");
        };
        assert!(result.is_not_configured());
        assert_eq!(result.error.as_deref(), Some(NOT_CONFIGURED_MESSAGE));
    }

    #[test]
    fn test_classify_error_body() {
        let reply = classify(StatusCode::UNAUTHORIZED, br#"{"error":"Unauthorized"}"#).unwrap();
        assert_eq!(
            reply,
            ServiceReply::Rejected {
                status: 401,
                error: "Unauthorized".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_plain_text_error() {
        let reply = classify(StatusCode::METHOD_NOT_ALLOWED, b"Method not allowed").unwrap();
        assert_eq!(
            reply,
            ServiceReply::Rejected {
                status: 405,
                error: "Method not allowed".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_garbage_success_body() {
        let err = classify(StatusCode::OK, b"<html>").unwrap_err();
        assert!(matches!(err, CheckoutError::Parse(_)));
    }

    #[test]
    fn test_endpoint_joins_path() {
        let config = CheckoutConfig::from_url("https://zip4.example.com").unwrap();
        let api = HttpValidationApi::new(&config).unwrap();
        assert_eq!(
            api.endpoint().as_str(),
            "https://zip4.example.com/api/validate-address"
        );
    }
}
