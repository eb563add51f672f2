//! ZIP+4 Core - Shared types library.
//!
//! This crate provides the types shared by both halves of the ZIP+4 address
//! validation integration:
//! - `service` - HTTP endpoint that talks to the USPS Address API
//! - `checkout` - checkout-extension logic that calls the service
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Both sides agree on the wire format by sharing these types.
//!
//! # Modules
//!
//! - [`types`] - Addresses, ZIP codes, and validation results

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
