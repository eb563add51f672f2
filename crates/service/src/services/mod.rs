//! Business logic services.

pub mod validation;

pub use validation::{AddressValidationService, Zip4Error, map_lookup};
