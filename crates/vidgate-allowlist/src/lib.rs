//! VID allow-list reconciliation.
//!
//! [`AllowListCoordinator`] keeps a staged allow list and enable flag in
//! memory and reconciles them with a [`DeviceGateway`]:
//!
//! - **Staging**: [`add_vid`](AllowListCoordinator::add_vid) validates and
//!   dedupes by canonical key; [`remove_vid`](AllowListCoordinator::remove_vid)
//!   removes by index. Neither touches the device.
//! - **Committing**: [`apply`](AllowListCoordinator::apply),
//!   [`clear`](AllowListCoordinator::clear) and
//!   [`set_enabled`](AllowListCoordinator::set_enabled) write to the device
//!   and request a reboot, since allow-list changes only take effect after
//!   one.
//! - **Loading**: [`load`](AllowListCoordinator::load) resynchronizes the
//!   staged state with the device.
//!
//! A single busy gate serializes all of the above. Disallowed-VID
//! notifications are handled separately by
//! [`DisallowedVidMonitor`](vidgate_hardware::DisallowedVidMonitor) and are
//! never blocked by the gate.
//!
//! [`DeviceGateway`]: vidgate_hardware::DeviceGateway

pub mod config;
pub mod coordinator;
pub mod error;
pub mod outcome;
pub mod state;

pub use config::AllowListConfig;
pub use coordinator::AllowListCoordinator;
pub use error::{ReconcileError, Result, ToggleFailure};
pub use outcome::{Applied, Cleared, Toggled};
pub use state::AllowListState;
