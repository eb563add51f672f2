//! Buyer-journey intercept decision.

use serde::{Deserialize, Serialize};

use crate::validator::ValidationState;

/// Reason attached to every block.
pub const BLOCK_REASON: &str = "Address validation required";

/// Field path the checkout highlights when blocking.
pub const ZIP_TARGET: &str = "$.cart.deliveryGroups[0].deliveryAddress.zip";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    Allow,
    Block,
}

/// Error shown against a checkout field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptError {
    pub message: String,
    pub target: String,
}

/// Answer to the checkout's "may the buyer continue?" question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptDecision {
    pub behavior: Behavior,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<InterceptError>,
}

impl InterceptDecision {
    #[must_use]
    pub const fn allow() -> Self {
        Self {
            behavior: Behavior::Allow,
            reason: None,
            errors: Vec::new(),
        }
    }

    /// Block progress and point the buyer at the ZIP field.
    #[must_use]
    pub fn block(message: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Block,
            reason: Some(BLOCK_REASON.to_string()),
            errors: vec![InterceptError {
                message: message.into(),
                target: ZIP_TARGET.to_string(),
            }],
        }
    }

    #[must_use]
    pub fn is_block(&self) -> bool {
        self.behavior == Behavior::Block
    }
}

/// Decide whether checkout may progress.
///
/// Depends only on its arguments. Only `Invalid` blocks, and only when the
/// checkout says blocking is possible; `Idle` and `Validating` allow.
#[must_use]
pub fn intercept(state: &ValidationState, can_block_progress: bool) -> InterceptDecision {
    match state {
        ValidationState::Invalid(reason) if can_block_progress => InterceptDecision::block(reason),
        _ => InterceptDecision::allow(),
    }
}
