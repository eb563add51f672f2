//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::middleware::{SharedAuthenticator, ShopifySessionVerifier};
use crate::services::AddressValidationService;
use crate::usps::{UspsClient, UspsError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Nothing in it is mutated
/// after start-up; requests share no mutable state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServiceConfig,
    validation: AddressValidationService,
    authenticator: SharedAuthenticator,
}

impl AppState {
    /// Create a new application state that verifies Shopify session tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the USPS HTTP client cannot be built.
    pub fn new(config: ServiceConfig) -> Result<Self, UspsError> {
        let authenticator = Arc::new(ShopifySessionVerifier::new(&config.shopify));
        Self::with_authenticator(config, authenticator)
    }

    /// Create a new application state with a custom authenticator.
    ///
    /// # Errors
    ///
    /// Returns an error if the USPS HTTP client cannot be built.
    pub fn with_authenticator(
        config: ServiceConfig,
        authenticator: SharedAuthenticator,
    ) -> Result<Self, UspsError> {
        let client = UspsClient::new(&config.usps)?;
        let validation = AddressValidationService::new(config.usps.clone(), client);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                validation,
                authenticator,
            }),
        })
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    /// Get a reference to the address validation service.
    #[must_use]
    pub fn validation(&self) -> &AddressValidationService {
        &self.inner.validation
    }

    /// Get a reference to the request authenticator.
    #[must_use]
    pub fn authenticator(&self) -> &SharedAuthenticator {
        &self.inner.authenticator
    }
}
