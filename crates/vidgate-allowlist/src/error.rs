//! Error types for allow-list reconciliation.

use thiserror::Error;
use vidgate_core::CanonicalKey;
use vidgate_hardware::DeviceError;

/// Result type alias for coordinator operations.
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Errors reported by [`AllowListCoordinator`](crate::AllowListCoordinator).
///
/// `InvalidFormat`, `AlreadyExists` and `OutOfRange` are resolved locally
/// and never reach the device. `Device` always leaves the staged state as
/// it was before the failing call.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The text is not a hexadecimal VID.
    #[error(transparent)]
    InvalidFormat(#[from] vidgate_core::Error),

    /// A VID with the same canonical key is already staged.
    #[error("Already exists: {key}")]
    AlreadyExists { key: CanonicalKey },

    /// Index outside the staged list.
    #[error("Index {index} out of range for {len} staged entries")]
    OutOfRange { index: usize, len: usize },

    /// The device call failed.
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// Another operation is in flight; retry once it completes.
    #[error("Another allow-list operation is in progress")]
    TransientBusy,
}

impl ReconcileError {
    /// Whether the request can simply be retried later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientBusy)
    }

    /// Whether the error came from the device rather than local validation.
    pub fn is_device(&self) -> bool {
        matches!(self, Self::Device(_))
    }
}

/// Failed enable/disable toggle.
///
/// Carries the value a presentation layer should restore its toggle to,
/// which is always the negation of the value that was attempted.
#[derive(Debug, Error)]
#[error("Toggle failed, revert to {}", on_off(.revert_to))]
pub struct ToggleFailure {
    /// Why the toggle failed.
    #[source]
    pub error: ReconcileError,

    /// Last known-good enable flag.
    pub revert_to: bool,
}

fn on_off(enabled: &bool) -> &'static str {
    if *enabled { "ON" } else { "OFF" }
}
