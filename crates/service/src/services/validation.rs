//! ZIP+4 lookup against USPS.
//!
//! Turns an [`AddressQuery`] into a [`ValidationResult`]. Every failure below
//! the HTTP layer (missing credentials, rejected token exchange, authority
//! errors) ends up as `valid: false` with a descriptive message; nothing here
//! retries.

use tracing::instrument;
use zip4_core::{NOT_VALIDATED_MESSAGE, StandardizedAddress, ValidationResult};

use crate::config::UspsConfig;
use crate::usps::{AddressLookup, AddressQuery, UspsClient, UspsError};

/// Why a lookup did not produce a result from the authority.
#[derive(Debug, thiserror::Error)]
pub enum Zip4Error {
    /// Consumer key or secret is unset.
    #[error("USPS API not configured")]
    NotConfigured,

    /// The token exchange failed.
    #[error(transparent)]
    Token(UspsError),

    /// The address lookup failed.
    #[error(transparent)]
    Lookup(UspsError),
}

impl From<Zip4Error> for ValidationResult {
    fn from(err: Zip4Error) -> Self {
        match err {
            Zip4Error::NotConfigured => Self::not_configured(),
            Zip4Error::Token(e) | Zip4Error::Lookup(e) => Self::invalid(e.to_string()),
        }
    }
}

/// Address validation backed by the USPS Addresses API.
#[derive(Clone)]
pub struct AddressValidationService {
    config: UspsConfig,
    client: UspsClient,
}

impl AddressValidationService {
    /// Create the service from explicit USPS settings.
    #[must_use]
    pub const fn new(config: UspsConfig, client: UspsClient) -> Self {
        Self { config, client }
    }

    /// Whether both USPS credentials are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.credentials().is_some()
    }

    /// Fetch the ZIP+4 for an address.
    ///
    /// Credentials are checked before any network call. A new token is
    /// requested on every call, then the lookup runs once it is issued.
    #[instrument(skip(self, query), fields(state = %query.state))]
    pub async fn fetch_zip4(&self, query: &AddressQuery) -> ValidationResult {
        match self.try_fetch_zip4(query).await {
            Ok(result) => result,
            Err(Zip4Error::NotConfigured) => {
                tracing::error!("USPS API credentials not configured");
                ValidationResult::not_configured()
            }
            Err(err) => {
                tracing::warn!(error = %err, "USPS validation failed");
                err.into()
            }
        }
    }

    async fn try_fetch_zip4(&self, query: &AddressQuery) -> Result<ValidationResult, Zip4Error> {
        let credentials = self.config.credentials().ok_or(Zip4Error::NotConfigured)?;

        let token = self
            .client
            .issue_token(&credentials)
            .await
            .map_err(Zip4Error::Token)?;
        tracing::debug!(expires_at = token.expires_at, "USPS token issued");

        let lookup = self
            .client
            .lookup(query, &token)
            .await
            .map_err(Zip4Error::Lookup)?;

        let result = map_lookup(lookup);
        tracing::info!(valid = result.valid, "USPS address validated");
        Ok(result)
    }
}

/// Map the authority's response to a [`ValidationResult`].
///
/// Valid only when both `ZIPCode` and `ZIPPlus4` are present and non-empty.
#[must_use]
pub fn map_lookup(lookup: AddressLookup) -> ValidationResult {
    let AddressLookup {
        address,
        address_additional_info,
    } = lookup;

    let standardized = address.and_then(|a| {
        let zip_code = a.zip_code.filter(|z| !z.is_empty())?;
        let zip_plus4 = a.zip_plus4.filter(|z| !z.is_empty())?;
        Some(StandardizedAddress {
            street_address: a.street_address.unwrap_or_default(),
            secondary_address: a.secondary_address,
            city: a.city.unwrap_or_default(),
            state: a.state.unwrap_or_default(),
            zip_code,
            zip_plus4,
        })
    });

    match standardized {
        Some(address) => ValidationResult::validated(address, address_additional_info),
        None => ValidationResult {
            address_additional_info,
            ..ValidationResult::invalid(NOT_VALIDATED_MESSAGE)
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use zip4_core::AddressAdditionalInfo;

    use super::*;
    use crate::usps::UspsAddress;

    fn usps_address(plus4: Option<&str>) -> UspsAddress {
        UspsAddress {
            street_address: Some("1 MARKET ST".to_string()),
            secondary_address: None,
            city: Some("SAN FRANCISCO".to_string()),
            state: Some("CA".to_string()),
            zip_code: Some("94105".to_string()),
            zip_plus4: plus4.map(str::to_string),
        }
    }

    #[test]
    fn test_map_lookup_full_zip() {
        let result = map_lookup(AddressLookup {
            address: Some(usps_address(Some("1234"))),
            address_additional_info: None,
        });
        assert!(result.valid);
        let address = result.address.as_ref().unwrap();
        assert_eq!(address.zip_code, "94105");
        assert_eq!(address.zip_plus4, "1234");
        assert!(result.error.is_none());
    }

    #[test]
    fn test_map_lookup_missing_plus4() {
        let result = map_lookup(AddressLookup {
            address: Some(usps_address(None)),
            address_additional_info: None,
        });
        assert!(!result.valid);
        assert!(result.address.is_none());
        assert_eq!(result.error.as_deref(), Some(NOT_VALIDATED_MESSAGE));
    }

    #[test]
    fn test_map_lookup_empty_plus4_is_missing() {
        let result = map_lookup(AddressLookup {
            address: Some(usps_address(Some(""))),
            address_additional_info: None,
        });
        assert!(!result.valid);
    }

    #[test]
    fn test_map_lookup_no_address() {
        let result = map_lookup(AddressLookup::default());
        assert_eq!(result, ValidationResult::invalid(NOT_VALIDATED_MESSAGE));
    }

    #[test]
    fn test_map_lookup_keeps_additional_info_when_invalid() {
        let info = AddressAdditionalInfo {
            vacant: Some("Y".to_string()),
            ..AddressAdditionalInfo::default()
        };
        let result = map_lookup(AddressLookup {
            address: Some(usps_address(None)),
            address_additional_info: Some(info.clone()),
        });
        assert!(!result.valid);
        assert_eq!(result.address_additional_info, Some(info));
    }

    #[test]
    fn test_zip4_error_into_result() {
        let result: ValidationResult = Zip4Error::NotConfigured.into();
        assert!(result.is_not_configured());

        let result: ValidationResult = Zip4Error::Lookup(UspsError::Api {
            status: 404,
            message: "Address Not Found.".to_string(),
        })
        .into();
        assert_eq!(result.error.as_deref(), Some("Address Not Found."));
    }

    #[tokio::test]
    async fn test_fetch_without_credentials_skips_network() {
        // Nothing listens on this port; a network attempt would surface an
        // HTTP error instead of the configuration message.
        let config = UspsConfig::unconfigured(url::Url::parse("http://127.0.0.1:9/").unwrap());
        let client = UspsClient::new(&config).unwrap();
        let service = AddressValidationService::new(config, client);

        let query = AddressQuery {
            street_address: "1 Market St".to_string(),
            secondary_address: None,
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            zip_code: Some("94105".to_string()),
        };

        assert!(!service.is_configured());
        let result = service.fetch_zip4(&query).await;
        assert_eq!(result, ValidationResult::not_configured());
    }
}
