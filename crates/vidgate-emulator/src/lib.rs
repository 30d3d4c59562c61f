//! Emulated point-of-sale terminal.
//!
//! This crate provides a [`DeviceGateway`](vidgate_hardware::DeviceGateway)
//! that behaves like a terminal's allow-list service without any hardware:
//! writes land in a stored configuration, a reboot makes them enforced, and
//! probing a VID against the enforced configuration raises the same
//! disallowed-VID notifications a real terminal broadcasts.

pub mod gateway;
pub mod notifier;
pub mod state;

pub use gateway::{EmulatedGateway, ProbeOutcome};
pub use notifier::EmulatedDisallowedSource;
pub use state::{AllowListSnapshot, DeviceState};
