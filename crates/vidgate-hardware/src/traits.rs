//! Device trait definitions.
//!
//! This module defines the contract between the allow-list coordinator and
//! the point-of-sale terminal: [`DeviceGateway`] for reading and writing the
//! VID allow list, and [`DisallowedVidSource`] for the asynchronous
//! "blocked peripheral" notifications the platform broadcasts.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{DisallowedVidEvent, RebootRequest};
use std::future::Future;

/// Access to a terminal's VID allow list.
///
/// Allow-list writes and the enable flag only take effect after a reboot.
/// Implementations persist what they are given; issuing the reboot is the
/// caller's responsibility.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. Use generic type parameters:
///
/// ```no_run
/// use vidgate_hardware::traits::DeviceGateway;
/// use vidgate_hardware::error::Result;
///
/// async fn count_allowed<G: DeviceGateway>(gateway: &G) -> Result<usize> {
///     Ok(gateway.get_allow_list().await?.len())
/// }
/// ```
///
/// # Examples
///
/// ```no_run
/// use vidgate_hardware::traits::DeviceGateway;
/// use vidgate_hardware::types::RebootRequest;
/// use vidgate_hardware::error::Result;
///
/// async fn allow_only<G: DeviceGateway>(gateway: &mut G, vids: &[String]) -> Result<()> {
///     if vids.is_empty() {
///         gateway.clear_allow_list().await?;
///     } else {
///         gateway.set_allow_list(vids).await?;
///     }
///     gateway.reboot(&RebootRequest::default())
/// }
/// ```
pub trait DeviceGateway: Send + Sync {
    /// Read the allow list currently stored on the device.
    ///
    /// Entries are returned in device order and exactly as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be reached or refuses the read.
    async fn get_allow_list(&self) -> Result<Vec<String>>;

    /// Store a new allow list on the device.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `vids` is empty ([`DeviceError::InvalidArgument`](crate::DeviceError::InvalidArgument));
    ///   use [`clear_allow_list`](Self::clear_allow_list) instead
    /// - The device cannot be reached or refuses the write
    async fn set_allow_list(&mut self, vids: &[String]) -> Result<()>;

    /// Remove every entry from the device allow list.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be reached or refuses the write.
    async fn clear_allow_list(&mut self) -> Result<()>;

    /// Read the allow-list enforcement flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be reached.
    async fn is_allow_list_enabled(&self) -> Result<bool>;

    /// Store the allow-list enforcement flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be reached or refuses the write.
    async fn set_allow_list_enabled(&mut self, enabled: bool) -> Result<()>;

    /// Ask the device to reboot.
    ///
    /// Returns once the request has been issued; the reboot itself happens
    /// asynchronously and its completion is never reported back.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be issued.
    fn reboot(&mut self, request: &RebootRequest) -> Result<()>;
}

/// Source of "blocked peripheral" notifications.
///
/// The returned future is `Send` so that a
/// [`DisallowedVidMonitor`](crate::monitor::DisallowedVidMonitor) can poll
/// the source from a spawned task. Implementations may still be written
/// with `async fn`.
///
/// # Examples
///
/// ```no_run
/// use vidgate_hardware::traits::DisallowedVidSource;
/// use vidgate_hardware::error::Result;
///
/// async fn log_blocked<S: DisallowedVidSource>(source: &mut S) -> Result<()> {
///     loop {
///         let event = source.next_event().await?;
///         println!("[Blocked VID detected] {}", event.vid_or_unknown());
///     }
/// }
/// ```
pub trait DisallowedVidSource: Send {
    /// Wait for the next notification.
    ///
    /// # Errors
    ///
    /// Returns an error once the source is closed or disconnected; no
    /// further events will be produced after that.
    fn next_event(&mut self) -> impl Future<Output = Result<DisallowedVidEvent>> + Send;
}
