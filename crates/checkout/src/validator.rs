//! Address validation state machine.
//!
//! ```text
//! Idle ──address──▶ Validating ──▶ Valid | Invalid(reason)
//!                        ▲                    │
//!                        └──────address───────┘
//! ```
//!
//! One worker task owns all transitions. Address changes are published on a
//! `watch` channel, so the worker only ever sees the newest address; a lookup
//! still running when a newer address arrives is dropped before it can write
//! state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use zip4_core::{Address, NOT_VALIDATED_MESSAGE, ZipCode};

use crate::api::{ServiceReply, ValidationApi};
use crate::error::CheckoutError;
use crate::host::{CheckoutHost, ShippingAddress};
use crate::intercept::{InterceptDecision, intercept};
use crate::precheck::{Precheck, precheck};

/// Where validation of the current shipping address stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationState {
    /// No address seen yet. Allows progress.
    #[default]
    Idle,
    /// A service lookup is in flight. Allows progress.
    Validating,
    Valid,
    /// Blocks progress with the given reason.
    Invalid(String),
}

impl ValidationState {
    /// Whether validation has reached `Valid` or `Invalid`.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Valid | Self::Invalid(_))
    }
}

/// Outcome of one service lookup, before the fail-open policy is applied.
#[derive(Debug)]
enum Lookup {
    /// Full ZIP+4 returned.
    Validated(ZipCode),
    /// The service answered but could not validate the address.
    NotValidated(String),
    /// The service has no USPS credentials.
    Misconfigured,
    /// The service refused the request.
    Rejected { status: u16, error: String },
}

/// Handle to the validation worker.
///
/// Dropping the handle stops the worker.
pub struct AddressValidator {
    addresses: watch::Sender<Option<ShippingAddress>>,
    state: watch::Receiver<ValidationState>,
    misconfigured: Arc<AtomicU64>,
    worker: JoinHandle<()>,
}

impl AddressValidator {
    /// Start the worker on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn spawn(api: Arc<dyn ValidationApi>, host: CheckoutHost) -> Self {
        let (addresses, address_rx) = watch::channel(None);
        let (state_tx, state) = watch::channel(ValidationState::Idle);
        let misconfigured = Arc::new(AtomicU64::new(0));

        let worker = Worker {
            api,
            host,
            misconfigured: Arc::clone(&misconfigured),
        };
        let worker = tokio::spawn(worker.run(address_rx, state_tx));

        Self {
            addresses,
            state,
            misconfigured,
            worker,
        }
    }

    /// Report a new shipping address. Supersedes any lookup in flight.
    pub fn address_changed(&self, address: ShippingAddress) {
        self.addresses.send_replace(Some(address));
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ValidationState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ValidationState> {
        self.state.clone()
    }

    /// Intercept decision for the current state.
    #[must_use]
    pub fn intercept(&self, can_block_progress: bool) -> InterceptDecision {
        intercept(&self.state.borrow(), can_block_progress)
    }

    /// How many lookups found the service without USPS credentials.
    #[must_use]
    pub fn misconfigured_count(&self) -> u64 {
        self.misconfigured.load(Ordering::Relaxed)
    }
}

impl Drop for AddressValidator {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

struct Worker {
    api: Arc<dyn ValidationApi>,
    host: CheckoutHost,
    misconfigured: Arc<AtomicU64>,
}

impl Worker {
    async fn run(
        self,
        mut addresses: watch::Receiver<Option<ShippingAddress>>,
        state: watch::Sender<ValidationState>,
    ) {
        let mut superseded = false;

        loop {
            if !superseded && addresses.changed().await.is_err() {
                break;
            }
            superseded = false;

            let Some(address) = addresses.borrow_and_update().clone() else {
                continue;
            };

            let lookup = match precheck(&address) {
                Precheck::Settled(next) => {
                    tracing::debug!(state = ?next, "Address settled locally");
                    state.send_replace(next);
                    continue;
                }
                Precheck::Lookup(lookup) => lookup,
            };

            state.send_replace(ValidationState::Validating);

            tokio::select! {
                biased;

                changed = addresses.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    tracing::debug!("Lookup superseded by a newer address");
                    superseded = true;
                }
                next = self.resolve(&lookup) => {
                    state.send_replace(next);
                }
            }
        }
    }

    /// Look up an address and apply the fail-open policy.
    ///
    /// Every outcome other than a local check failure ends in `Valid`.
    async fn resolve(&self, address: &Address) -> ValidationState {
        match self.lookup(address).await {
            Ok(Lookup::Validated(zip)) => {
                if let Err(err) = self.apply(&zip).await {
                    tracing::warn!(error = %err, zip = %zip, "Could not apply ZIP+4");
                }
            }
            Ok(Lookup::NotValidated(reason)) => {
                tracing::warn!(reason = %reason, "Address not validated, allowing checkout");
            }
            Ok(Lookup::Misconfigured) => {
                self.misconfigured.fetch_add(1, Ordering::Relaxed);
                tracing::error!("Validation service has no USPS credentials, allowing checkout");
            }
            Ok(Lookup::Rejected { status, error }) => {
                tracing::warn!(status, error = %error, "Validation service rejected the request");
            }
            Err(err) => {
                tracing::warn!(error = %err, "Validation request failed, allowing checkout");
            }
        }

        ValidationState::Valid
    }

    async fn lookup(&self, address: &Address) -> Result<Lookup, CheckoutError> {
        let token = self.host.session.session_token().await?;

        let lookup = match self.api.validate(address, &token).await? {
            ServiceReply::Validated(result) if result.is_not_configured() => Lookup::Misconfigured,
            ServiceReply::Validated(result) => match result.full_zip() {
                Some(zip) => Lookup::Validated(zip),
                None => Lookup::NotValidated(
                    result
                        .error
                        .unwrap_or_else(|| NOT_VALIDATED_MESSAGE.to_string()),
                ),
            },
            ServiceReply::Rejected { status, error } => Lookup::Rejected { status, error },
        };

        Ok(lookup)
    }

    async fn apply(&self, zip: &ZipCode) -> Result<(), CheckoutError> {
        if !self.host.instructions.can_select_custom_address {
            tracing::debug!(zip = %zip, "Custom addresses not allowed, ZIP+4 not applied");
            return Ok(());
        }

        self.host.mutator.apply_zip(zip).await?;
        tracing::info!(zip = %zip, "ZIP+4 applied");
        Ok(())
    }
}
