//! Validation result returned by the service.

use serde::{Deserialize, Serialize};

use super::zip::ZipCode;

/// Error reported when the service has no USPS credentials.
pub const NOT_CONFIGURED_MESSAGE: &str = "USPS API not configured";

/// Error reported when the authority did not return a full ZIP+4.
pub const NOT_VALIDATED_MESSAGE: &str = "Address could not be validated";

/// Outcome of validating one address against the address authority.
///
/// `valid` is only `true` when the authority returned both the 5-digit code
/// and the 4-digit extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<StandardizedAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_additional_info: Option<AddressAdditionalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Address as normalized by the authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardizedAddress {
    pub street_address: String,
    pub secondary_address: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub zip_plus4: String,
}

/// Delivery-point details passed through from the authority untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressAdditionalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_point: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier_route: Option<String>,
    #[serde(
        default,
        rename = "DPVConfirmation",
        skip_serializing_if = "Option::is_none"
    )]
    pub dpv_confirmation: Option<String>,
    #[serde(default, rename = "DPVCMRA", skip_serializing_if = "Option::is_none")]
    pub dpv_cmra: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub central_delivery_point: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vacant: Option<String>,
}

impl ValidationResult {
    /// A successful validation carrying the normalized address.
    #[must_use]
    pub const fn validated(
        address: StandardizedAddress,
        additional_info: Option<AddressAdditionalInfo>,
    ) -> Self {
        Self {
            valid: true,
            address: Some(address),
            address_additional_info: additional_info,
            error: None,
        }
    }

    /// A failed validation with a descriptive error.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            address: None,
            address_additional_info: None,
            error: Some(message.into()),
        }
    }

    /// The result reported when USPS credentials are absent.
    #[must_use]
    pub fn not_configured() -> Self {
        Self::invalid(NOT_CONFIGURED_MESSAGE)
    }

    /// Whether this result reports missing service credentials.
    #[must_use]
    pub fn is_not_configured(&self) -> bool {
        !self.valid && self.error.as_deref() == Some(NOT_CONFIGURED_MESSAGE)
    }

    /// The combined ZIP+4, present only for a fully valid result.
    #[must_use]
    pub fn full_zip(&self) -> Option<ZipCode> {
        if !self.valid {
            return None;
        }
        let address = self.address.as_ref()?;
        ZipCode::from_parts(&address.zip_code, &address.zip_plus4).ok()
    }
}

/// Error body for 4xx and 5xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
