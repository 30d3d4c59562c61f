//! Common types shared across gateway implementations.
//!
//! This module defines the reboot request passed to
//! [`DeviceGateway::reboot`](crate::traits::DeviceGateway::reboot) and the
//! disallowed-VID notification delivered by
//! [`DisallowedVidSource`](crate::traits::DisallowedVidSource).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vidgate_core::constants::{DEFAULT_REBOOT_CONFIRM, DEFAULT_REBOOT_REASON, UNKNOWN_VID};

/// Parameters of a reboot issued after an allow-list change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebootRequest {
    /// Show the system confirmation dialog before rebooting.
    ///
    /// When `false` the device reboots immediately.
    pub confirm: bool,

    /// Reason tag recorded by the firmware.
    pub reason: String,
}

impl RebootRequest {
    /// Create a new reboot request.
    pub fn new(confirm: bool, reason: impl Into<String>) -> Self {
        Self {
            confirm,
            reason: reason.into(),
        }
    }
}

impl Default for RebootRequest {
    fn default() -> Self {
        Self::new(DEFAULT_REBOOT_CONFIRM, DEFAULT_REBOOT_REASON)
    }
}

/// Notification that the device blocked a peripheral.
///
/// The platform broadcast may omit the identifier, in which case `vid`
/// is `None` and [`vid_or_unknown`](Self::vid_or_unknown) yields the
/// `(unknown)` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisallowedVidEvent {
    /// Blocked vendor identifier, as reported by the device.
    pub vid: Option<String>,

    /// When the event was received.
    pub timestamp: DateTime<Utc>,
}

impl DisallowedVidEvent {
    /// Create an event for a known VID with the current timestamp.
    pub fn new(vid: impl Into<String>) -> Self {
        Self {
            vid: Some(vid.into()),
            timestamp: Utc::now(),
        }
    }

    /// Create an event whose identifier was missing from the broadcast.
    pub fn unknown() -> Self {
        Self {
            vid: None,
            timestamp: Utc::now(),
        }
    }

    /// Set a custom timestamp (for replaying recorded events).
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// The blocked VID, or the `(unknown)` placeholder.
    pub fn vid_or_unknown(&self) -> &str {
        self.vid.as_deref().unwrap_or(UNKNOWN_VID)
    }
}
