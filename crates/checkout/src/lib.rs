//! Checkout-side ZIP+4 validation.
//!
//! [`AddressValidator`] owns one background task that turns shipping address
//! changes into a [`ValidationState`]. The checkout reads that state through
//! [`intercept`] to allow or block progress, and through [`banner`] to decide
//! what to render.
//!
//! Policy: local format problems block; anything inconclusive from the
//! service lets the buyer continue.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod banner;
pub mod config;
pub mod error;
pub mod host;
pub mod intercept;
pub mod precheck;
pub mod validator;

pub use api::{HttpValidationApi, ServiceReply, ValidationApi};
pub use banner::{Banner, BannerMessage, BannerStatus, banner};
pub use config::{CheckoutConfig, ConfigError};
pub use error::CheckoutError;
pub use host::{
    CheckoutHost, Instructions, SessionTokenSource, ShippingAddress, ShippingAddressMutator,
};
pub use intercept::{Behavior, InterceptDecision, InterceptError, intercept};
pub use precheck::{Precheck, precheck};
pub use validator::{AddressValidator, ValidationState};
