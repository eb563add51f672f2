//! What the extension renders above the delivery address.

use serde::Serialize;

use crate::host::Instructions;
use crate::validator::ValidationState;

/// Title of every banner.
pub const BANNER_TITLE: &str = "address-validation";

/// Translation key shown when the buyer cannot edit the address.
pub const CUSTOM_ADDRESS_UNSUPPORTED: &str = "customAddressChangesAreNotSupported";

/// Translation key shown when cart attributes are locked.
pub const ATTRIBUTES_UNSUPPORTED: &str = "attributeChangesAreNotSupported";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerStatus {
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BannerMessage {
    /// Key into the extension's locale files.
    Translate(&'static str),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub title: &'static str,
    pub status: BannerStatus,
    pub message: BannerMessage,
}

impl Banner {
    const fn warning(key: &'static str) -> Self {
        Self {
            title: BANNER_TITLE,
            status: BannerStatus::Warning,
            message: BannerMessage::Translate(key),
        }
    }
}

/// The banner to render, if any.
///
/// Instruction warnings take precedence over the validation state.
#[must_use]
pub fn banner(instructions: &Instructions, state: &ValidationState) -> Option<Banner> {
    if !instructions.can_select_custom_address {
        return Some(Banner::warning(CUSTOM_ADDRESS_UNSUPPORTED));
    }
    if !instructions.can_update_attributes {
        return Some(Banner::warning(ATTRIBUTES_UNSUPPORTED));
    }

    match state {
        ValidationState::Invalid(reason) => Some(Banner {
            title: BANNER_TITLE,
            status: BannerStatus::Critical,
            message: BannerMessage::Text(reason.clone()),
        }),
        _ => None,
    }
}
