//! Device abstraction layer for point-of-sale VID allow lists.
//!
//! This crate provides trait-based abstractions for the terminal services
//! the allow-list coordinator depends on: reading and writing the device's
//! VID allow list, toggling enforcement, requesting a reboot, and receiving
//! "blocked peripheral" notifications. The traits let the coordinator run
//! against mock implementations (for development and testing), an emulated
//! terminal, or a real vendor driver.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All device I/O is asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Injected**: Gateways are passed to their consumers explicitly; there
//!   is no process-wide device singleton.
//! - **Thread-safe**: All traits require `Send` (and `Sync` for gateways).
//! - **Error-aware**: All operations return `Result<T>` with detailed error information.
//!
//! # Device Gateway
//!
//! The [`DeviceGateway`] trait is the allow-list API of a terminal:
//!
//! ```no_run
//! use vidgate_hardware::traits::DeviceGateway;
//! use vidgate_hardware::error::Result;
//!
//! async fn describe<G: DeviceGateway>(gateway: &G) -> Result<String> {
//!     let enabled = gateway.is_allow_list_enabled().await?;
//!     let list = gateway.get_allow_list().await?;
//!     Ok(format!("enabled={enabled} vids={list:?}"))
//! }
//! ```
//!
//! # Disallowed VID Notifications
//!
//! The [`DisallowedVidSource`] trait delivers one event per blocked
//! peripheral. [`DisallowedVidMonitor`] is the callback registration point
//! that polls a source and fans events out to subscribers.
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`][error::Result] which uses the
//! [`DeviceError`] error type.
//!
//! [`DeviceGateway`]: traits::DeviceGateway
//! [`DisallowedVidSource`]: traits::DisallowedVidSource
//! [`DisallowedVidMonitor`]: monitor::DisallowedVidMonitor

pub mod error;
pub mod mock;
pub mod monitor;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DeviceError, Result};
pub use traits::{DeviceGateway, DisallowedVidSource};
pub use types::{DisallowedVidEvent, RebootRequest};

pub use monitor::{DisallowedVidCallback, DisallowedVidMonitor, MonitorHandle, MonitorStats};
