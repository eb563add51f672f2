//! Core types for ZIP+4 validation.
//!
//! This module provides type-safe wrappers for the address validation
//! request/response contract.

pub mod address;
pub mod result;
pub mod zip;

pub use address::{
    Address, AddressError, AddressPayload, RequiredField, SUPPORTED_COUNTRY,
    ValidateAddressRequest,
};
pub use result::{
    AddressAdditionalInfo, ErrorBody, NOT_CONFIGURED_MESSAGE, NOT_VALIDATED_MESSAGE,
    StandardizedAddress, ValidationResult,
};
pub use zip::{ZipCode, ZipCodeError, zip5_prefix};
