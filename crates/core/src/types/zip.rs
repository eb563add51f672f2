//! US ZIP code type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Five digits, optionally followed by a hyphen and four more.
static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{5})(?:-(\d{4}))?$").expect("Invalid regex"));

/// Errors that can occur when parsing a [`ZipCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ZipCodeError {
    /// The input string is empty.
    #[error("ZIP code cannot be empty")]
    Empty,
    /// The input is not `12345` or `12345-6789`.
    #[error("ZIP code must be 5 digits or ZIP+4 (12345-6789)")]
    InvalidFormat,
}

/// A US ZIP code, with or without the ZIP+4 delivery-point extension.
///
/// ## Examples
///
/// ```
/// use zip4_core::ZipCode;
///
/// let zip = ZipCode::parse("94105").unwrap();
/// assert!(!zip.is_plus4());
///
/// let full = ZipCode::parse("94105-1234").unwrap();
/// assert_eq!(full.plus4(), Some("1234"));
/// assert_eq!(full.to_string(), "94105-1234");
///
/// assert!(ZipCode::parse("9410").is_err());
/// assert!(ZipCode::parse("94105-12").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ZipCode {
    zip5: String,
    plus4: Option<String>,
}

impl ZipCode {
    /// Parse a `ZipCode`, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or does not match
    /// `^\d{5}(-\d{4})?$`.
    pub fn parse(s: &str) -> Result<Self, ZipCodeError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ZipCodeError::Empty);
        }

        let caps = ZIP_RE.captures(s).ok_or(ZipCodeError::InvalidFormat)?;
        let zip5 = caps
            .get(1)
            .map(|m| m.as_str().to_owned())
            .ok_or(ZipCodeError::InvalidFormat)?;
        let plus4 = caps.get(2).map(|m| m.as_str().to_owned());

        Ok(Self { zip5, plus4 })
    }

    /// Build a full ZIP+4 from the two parts returned by the address authority.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` unless `zip5` is five digits and `plus4` is four.
    pub fn from_parts(zip5: &str, plus4: &str) -> Result<Self, ZipCodeError> {
        Self::parse(&format!("{zip5}-{plus4}"))
    }

    /// The five-digit base code.
    #[must_use]
    pub fn zip5(&self) -> &str {
        &self.zip5
    }

    /// The four-digit extension, if present.
    #[must_use]
    pub fn plus4(&self) -> Option<&str> {
        self.plus4.as_deref()
    }

    /// Returns `true` when the extension is present.
    #[must_use]
    pub const fn is_plus4(&self) -> bool {
        self.plus4.is_some()
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.plus4 {
            Some(plus4) => write!(f, "{}-{plus4}", self.zip5),
            None => write!(f, "{}", self.zip5),
        }
    }
}

impl std::str::FromStr for ZipCode {
    type Err = ZipCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ZipCode {
    type Error = ZipCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ZipCode> for String {
    fn from(zip: ZipCode) -> Self {
        zip.to_string()
    }
}

/// First five characters of a raw postal string.
///
/// The service forwards only this prefix to the address authority, whatever
/// the buyer typed after it.
#[must_use]
pub fn zip5_prefix(raw: &str) -> String {
    raw.trim().chars().take(5).collect()
}
