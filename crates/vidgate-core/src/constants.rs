//! Core constants for VID allow-list management.
//!
//! This module centralizes the literal values shared by the canonicalizer,
//! the reconciliation coordinator and the device gateways, so that every
//! crate in the workspace agrees on prefixes, sentinels and reboot tags.
//!
//! # Usage
//!
//! ```
//! use vidgate_core::constants::*;
//!
//! assert_eq!(VID_PREFIX, "0x");
//! assert_eq!(DEFAULT_REBOOT_REASON, "APPLY_VID_ALLOW_LIST");
//! ```

// ============================================================================
// Identifier Format
// ============================================================================

/// Canonical hexadecimal prefix emitted by the canonicalizer.
///
/// Input carrying either `0x` or `0X` is normalized to this lowercase form;
/// the hex digits that follow are always uppercased.
///
/// # Examples
///
/// ```
/// use vidgate_core::constants::VID_PREFIX;
/// use vidgate_core::Vid;
///
/// let vid = Vid::normalize("0X18d1").unwrap();
/// assert!(vid.as_str().starts_with(VID_PREFIX));
/// ```
pub const VID_PREFIX: &str = "0x";

/// Alternate (uppercase) spelling of the prefix accepted on input.
pub const VID_PREFIX_UPPER: &str = "0X";

// ============================================================================
// Reboot
// ============================================================================

/// Reason tag attached to reboot requests issued after an allow-list change.
///
/// Device firmware records this tag in its boot log.
pub const DEFAULT_REBOOT_REASON: &str = "APPLY_VID_ALLOW_LIST";

/// Whether reboot requests ask the system to show its confirmation dialog.
///
/// The system dialog text is fixed by the firmware and cannot be customized.
pub const DEFAULT_REBOOT_CONFIRM: bool = true;

// ============================================================================
// Notifications
// ============================================================================

/// Placeholder shown when a disallowed-VID notification carries no identifier.
pub const UNKNOWN_VID: &str = "(unknown)";
