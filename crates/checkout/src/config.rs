//! Checkout client configuration.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ZIP4_SERVICE_URL` - Origin of the validation service
//!   (e.g. `https://zip4.example.com`)

use std::env;

use thiserror::Error;
use url::Url;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where the checkout sends validation requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Service origin; the validation path is joined onto it.
    pub service_url: Url,
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `ZIP4_SERVICE_URL` is missing or not a URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let raw = env::var("ZIP4_SERVICE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("ZIP4_SERVICE_URL".to_string()))?;
        Self::from_url(&raw)
    }

    /// Build a configuration from a service origin.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEnvVar` if `raw` is not an absolute URL.
    pub fn from_url(raw: &str) -> Result<Self, ConfigError> {
        let mut service_url = Url::parse(raw.trim())
            .map_err(|e| ConfigError::InvalidEnvVar("ZIP4_SERVICE_URL".to_string(), e.to_string()))?;

        // Url::join replaces the last segment unless the path ends in '/'
        if !service_url.path().ends_with('/') {
            let path = format!("{}/", service_url.path());
            service_url.set_path(&path);
        }

        Ok(Self { service_url })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url_adds_trailing_slash() {
        let config = CheckoutConfig::from_url("https://zip4.example.com/app").unwrap();
        assert_eq!(config.service_url.as_str(), "https://zip4.example.com/app/");
        assert_eq!(
            config.service_url.join("api/validate-address").unwrap().as_str(),
            "https://zip4.example.com/app/api/validate-address"
        );
    }

    #[test]
    fn test_from_url_bare_origin() {
        let config = CheckoutConfig::from_url("http://127.0.0.1:3000").unwrap();
        assert_eq!(config.service_url.as_str(), "http://127.0.0.1:3000/");
    }

    #[test]
    fn test_from_url_rejects_relative() {
        let err = CheckoutConfig::from_url("/api").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(name, _) if name == "ZIP4_SERVICE_URL"));
    }
}
