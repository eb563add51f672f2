//! Wire types for the USPS Addresses API.

use serde::Deserialize;
use zip4_core::{Address, AddressAdditionalInfo, zip5_prefix};

/// Query sent to `GET /addresses/v3/address`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressQuery {
    pub street_address: String,
    pub secondary_address: Option<String>,
    pub city: String,
    pub state: String,
    /// Five-digit prefix of the postal code, if any.
    pub zip_code: Option<String>,
}

impl AddressQuery {
    /// Query parameters in the order USPS documents them.
    ///
    /// Empty secondary address and ZIP code are omitted.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        let mut params = vec![("streetAddress", self.street_address.as_str())];
        if let Some(secondary) = self.secondary_address.as_deref().filter(|s| !s.is_empty()) {
            params.push(("secondaryAddress", secondary));
        }
        params.push(("city", self.city.as_str()));
        params.push(("state", self.state.as_str()));
        if let Some(zip) = self.zip_code.as_deref().filter(|s| !s.is_empty()) {
            params.push(("ZIPCode", zip));
        }
        params
    }
}

impl From<&Address> for AddressQuery {
    fn from(address: &Address) -> Self {
        Self {
            street_address: address.address1.clone(),
            secondary_address: address.secondary().map(str::to_owned),
            city: address.city.clone(),
            state: address.province.clone(),
            zip_code: Some(zip5_prefix(&address.zip)),
        }
    }
}

/// Successful response from the Addresses API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressLookup {
    #[serde(default)]
    pub address: Option<UspsAddress>,
    #[serde(default)]
    pub address_additional_info: Option<AddressAdditionalInfo>,
}

/// Standardized address returned by USPS.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UspsAddress {
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub secondary_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, rename = "ZIPCode")]
    pub zip_code: Option<String>,
    #[serde(default, rename = "ZIPPlus4")]
    pub zip_plus4: Option<String>,
}

/// Error body returned by the Addresses API.
///
/// USPS nests the message under `error`; a top-level `message` is accepted too.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message
            .or_else(|| self.error.and_then(|e| e.message))
            .filter(|m| !m.is_empty())
    }
}
