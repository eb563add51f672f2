//! Capabilities the checkout host provides to the validator.
//!
//! The host owns the buyer's session, the shipping address and the
//! instructions describing what this checkout allows. The validator only
//! sees them through these types, so tests and other hosts can supply their
//! own.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use zip4_core::ZipCode;

use crate::error::CheckoutError;

/// Shipping address as the checkout reports it.
///
/// Every field may be missing while the buyer is still typing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province_code: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

/// What this checkout lets an extension change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructions {
    /// The buyer may enter or edit a delivery address.
    pub can_select_custom_address: bool,
    /// Cart attributes may be updated.
    pub can_update_attributes: bool,
}

impl Default for Instructions {
    /// A regular storefront checkout, where both are allowed.
    fn default() -> Self {
        Self {
            can_select_custom_address: true,
            can_update_attributes: true,
        }
    }
}

/// Source of the buyer's session token, sent as the bearer credential to the
/// validation service.
#[async_trait]
pub trait SessionTokenSource: Send + Sync {
    /// Fetch a fresh token. Called once per lookup.
    async fn session_token(&self) -> Result<SecretString, CheckoutError>;
}

/// Writes a validated ZIP+4 back to the checkout's shipping address.
#[async_trait]
pub trait ShippingAddressMutator: Send + Sync {
    async fn apply_zip(&self, zip: &ZipCode) -> Result<(), CheckoutError>;
}

/// Everything the validator needs from the host.
#[derive(Clone)]
pub struct CheckoutHost {
    pub session: Arc<dyn SessionTokenSource>,
    pub mutator: Arc<dyn ShippingAddressMutator>,
    pub instructions: Instructions,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shipping_address_from_checkout_json() {
        let address: ShippingAddress = serde_json::from_value(serde_json::json!({
            "address1": "1 Market St",
            "city": "San Francisco",
            "provinceCode": "CA",
            "zip": "94105",
            "countryCode": "US",
            "firstName": "Ada"
        }))
        .unwrap();

        assert_eq!(address.province_code.as_deref(), Some("CA"));
        assert_eq!(address.country_code.as_deref(), Some("US"));
        assert!(address.address2.is_none());
    }

    #[test]
    fn test_instructions_default_allows_everything() {
        let instructions = Instructions::default();
        assert!(instructions.can_select_custom_address);
        assert!(instructions.can_update_attributes);
    }
}
