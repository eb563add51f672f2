//! Local checks run before any network call.

use zip4_core::{Address, SUPPORTED_COUNTRY, ZipCode};

use crate::host::ShippingAddress;
use crate::validator::ValidationState;

/// Shown when the ZIP is neither `12345` nor `12345-6789`.
pub const ZIP_FORMAT_MESSAGE: &str = "Enter a valid ZIP code, like 12345 or 12345-6789";

/// What to do with an address after local checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precheck {
    /// The outcome is known without asking the service.
    Settled(ValidationState),
    /// Ask the service; the ZIP has been cut to its 5-digit base.
    Lookup(Address),
}

/// Run the local checks on a shipping address.
///
/// Checks run in order: country, ZIP format, required fields, ZIP+4 already
/// present. Only a US address with a well-formed 5-digit ZIP and all required
/// fields produces a lookup.
#[must_use]
pub fn precheck(address: &ShippingAddress) -> Precheck {
    if address.country_code.as_deref() != Some(SUPPORTED_COUNTRY) {
        return Precheck::Settled(ValidationState::Valid);
    }

    let Ok(zip) = ZipCode::parse(address.zip.as_deref().unwrap_or_default()) else {
        return Precheck::Settled(ValidationState::Invalid(ZIP_FORMAT_MESSAGE.to_string()));
    };

    let fields = [
        ("Address", address.address1.as_deref()),
        ("City", address.city.as_deref()),
        ("State", address.province_code.as_deref()),
    ];
    for (label, value) in fields {
        if non_empty(value).is_none() {
            return Precheck::Settled(ValidationState::Invalid(format!("{label} is required")));
        }
    }

    if zip.is_plus4() {
        return Precheck::Settled(ValidationState::Valid);
    }

    Precheck::Lookup(Address {
        address1: non_empty(address.address1.as_deref())
            .unwrap_or_default()
            .to_string(),
        address2: non_empty(address.address2.as_deref()).map(str::to_string),
        city: non_empty(address.city.as_deref())
            .unwrap_or_default()
            .to_string(),
        province: non_empty(address.province_code.as_deref())
            .unwrap_or_default()
            .to_string(),
        zip: zip.zip5().to_string(),
        country: SUPPORTED_COUNTRY.to_string(),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
