//! ZIP+4 address validation service library.
//!
//! This crate provides the service functionality as a library, allowing it
//! to be tested and embedded. The binary in `main.rs` only wires
//! configuration, logging and the listener around [`routes::router`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod usps;

pub use config::{ServiceConfig, UspsConfig, UspsCredentials};
pub use routes::{VALIDATE_ADDRESS_PATH, router};
pub use state::AppState;
