//! Shipping address as exchanged between the checkout and the service.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The only country the address authority can validate.
pub const SUPPORTED_COUNTRY: &str = "US";

/// Errors found while checking an address before it is sent upstream.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    /// The request body had no `address` object.
    #[error("Address is required")]
    MissingAddress,
    /// A required field was absent or empty.
    #[error("{0} is required")]
    Missing(RequiredField),
    /// The country is not [`SUPPORTED_COUNTRY`].
    #[error("Only US addresses are supported")]
    UnsupportedCountry,
}

/// Address fields that must be non-empty, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    Address1,
    City,
    Province,
    Zip,
    Country,
}

impl RequiredField {
    /// All required fields in check order.
    pub const ALL: [Self; 5] = [
        Self::Address1,
        Self::City,
        Self::Province,
        Self::Zip,
        Self::Country,
    ];

    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Address1 => "address1",
            Self::City => "city",
            Self::Province => "province",
            Self::Zip => "zip",
            Self::Country => "country",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete address, every required field present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street line.
    pub address1: String,
    /// Apartment, suite, unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    pub city: String,
    /// Two-letter state code.
    pub province: String,
    /// Postal code as entered.
    pub zip: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
}

impl Address {
    /// Whether the address authority can validate this address.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.country == SUPPORTED_COUNTRY
    }

    /// Fail with [`AddressError::UnsupportedCountry`] for non-US addresses.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCountry` unless `country` is `US`.
    pub fn ensure_supported(&self) -> Result<(), AddressError> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(AddressError::UnsupportedCountry)
        }
    }

    /// Secondary line, with an empty string treated as absent.
    #[must_use]
    pub fn secondary(&self) -> Option<&str> {
        self.address2.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Address as received on the wire, before required fields are checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPayload {
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl AddressPayload {
    fn field(&self, field: RequiredField) -> Option<&str> {
        let value = match field {
            RequiredField::Address1 => &self.address1,
            RequiredField::City => &self.city,
            RequiredField::Province => &self.province,
            RequiredField::Zip => &self.zip,
            RequiredField::Country => &self.country,
        };
        value.as_deref().filter(|s| !s.is_empty())
    }

    /// The first required field that is absent or empty.
    #[must_use]
    pub fn first_missing(&self) -> Option<RequiredField> {
        RequiredField::ALL
            .into_iter()
            .find(|field| self.field(*field).is_none())
    }

    /// Convert into a complete [`Address`].
    ///
    /// # Errors
    ///
    /// Returns `Missing` naming the first absent field, checked in the order
    /// of [`RequiredField::ALL`].
    pub fn into_address(self) -> Result<Address, AddressError> {
        if let Some(field) = self.first_missing() {
            return Err(AddressError::Missing(field));
        }

        let require = |value: Option<String>, field| value.ok_or(AddressError::Missing(field));

        Ok(Address {
            address1: require(self.address1, RequiredField::Address1)?,
            address2: self.address2,
            city: require(self.city, RequiredField::City)?,
            province: require(self.province, RequiredField::Province)?,
            zip: require(self.zip, RequiredField::Zip)?,
            country: require(self.country, RequiredField::Country)?,
        })
    }
}

impl From<Address> for AddressPayload {
    fn from(address: Address) -> Self {
        Self {
            address1: Some(address.address1),
            address2: address.address2,
            city: Some(address.city),
            province: Some(address.province),
            zip: Some(address.zip),
            country: Some(address.country),
        }
    }
}

/// Body of `POST /api/validate-address`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateAddressRequest {
    #[serde(default)]
    pub address: Option<AddressPayload>,
}

impl ValidateAddressRequest {
    /// Wrap a complete address.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address: Some(address.into()),
        }
    }

    /// Extract the address, checking required fields and country.
    ///
    /// # Errors
    ///
    /// Returns `MissingAddress`, `Missing(field)` or `UnsupportedCountry`,
    /// in that order of precedence.
    pub fn into_address(self) -> Result<Address, AddressError> {
        let address = self
            .address
            .ok_or(AddressError::MissingAddress)?
            .into_address()?;
        address.ensure_supported()?;
        Ok(address)
    }
}
