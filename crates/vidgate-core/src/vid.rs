//! Vendor identifier canonicalization.
//!
//! Operators type VIDs in whatever form they find on the peripheral's
//! label: `046d`, `046D`, `0x046D`, `0X046d`. This module turns that text
//! into two distinct values:
//!
//! - a [`Vid`], the validated display form that keeps the operator's prefix
//!   convention but uppercases the hex digits, and
//! - a [`CanonicalKey`], the prefix-free uppercase form used strictly for
//!   equality and deduplication.
//!
//! # Examples
//!
//! ```
//! use vidgate_core::{Vid, canonical_key};
//!
//! let with_prefix = Vid::normalize(" 0X046d ").unwrap();
//! let without_prefix = Vid::normalize("046d").unwrap();
//!
//! assert_eq!(with_prefix.as_str(), "0x046D");
//! assert_eq!(without_prefix.as_str(), "046D");
//! assert_eq!(with_prefix.canonical_key(), without_prefix.canonical_key());
//! assert_eq!(canonical_key("0x046d").as_str(), "046D");
//! ```

use crate::{
    Result,
    constants::{VID_PREFIX, VID_PREFIX_UPPER},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated vendor identifier in display form.
///
/// A `Vid` always matches `(0x)?[0-9A-F]+`: an optional lowercase `0x`
/// prefix followed by one or more uppercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Vid(String);

impl Vid {
    /// Validate and normalize raw operator input.
    ///
    /// Surrounding whitespace is trimmed. The input must consist of an
    /// optional `0x`/`0X` prefix followed by at least one hex digit.
    ///
    /// # Errors
    /// Returns `Error::InvalidFormat` if the trimmed input is empty, has no
    /// digits after the prefix, or contains a non-hex character.
    pub fn normalize(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_format(raw, "VID is empty"));
        }

        let (prefixed, digits) = match strip_prefix(trimmed) {
            Some(digits) => (true, digits),
            None => (false, trimmed),
        };

        if digits.is_empty() {
            return Err(Error::invalid_format(raw, "no hex digits after prefix"));
        }

        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(Error::invalid_format(
                raw,
                format!("'{bad}' is not a hex digit"),
            ));
        }

        let digits = digits.to_ascii_uppercase();
        if prefixed {
            Ok(Vid(format!("{VID_PREFIX}{digits}")))
        } else {
            Ok(Vid(digits))
        }
    }

    /// Get the display form as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the operator entered this VID with a `0x` prefix.
    #[must_use]
    pub fn has_prefix(&self) -> bool {
        self.0.starts_with(VID_PREFIX)
    }

    /// Derive the deduplication key for this VID.
    #[must_use]
    pub fn canonical_key(&self) -> CanonicalKey {
        canonical_key(&self.0)
    }

    /// Consume the VID and return the display string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Vid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Vid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Vid::normalize(s)
    }
}

impl TryFrom<String> for Vid {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Vid::normalize(&value)
    }
}

impl From<Vid> for String {
    fn from(vid: Vid) -> Self {
        vid.0
    }
}

impl AsRef<str> for Vid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Prefix-free, uppercase form of a VID used for equality checks.
///
/// Never shown to operators; two entries with the same key are the same
/// peripheral vendor regardless of how they were typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// Get the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<str> for CanonicalKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CanonicalKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Compute the canonical key of arbitrary VID text.
///
/// Trims whitespace, strips one optional `0x`/`0X` prefix and uppercases the
/// remainder. No validation is performed: device-sourced lists are keyed
/// verbatim so that later additions dedupe against them.
#[must_use]
pub fn canonical_key(text: &str) -> CanonicalKey {
    let trimmed = text.trim();
    let body = strip_prefix(trimmed).unwrap_or(trimmed);
    CanonicalKey(body.to_uppercase())
}

fn strip_prefix(text: &str) -> Option<&str> {
    text.strip_prefix(VID_PREFIX)
        .or_else(|| text.strip_prefix(VID_PREFIX_UPPER))
}
