//! Mock disallowed-VID source for testing and development.
//!
//! This module provides a simulated notification channel that can be fed
//! programmatically, standing in for the platform broadcast a terminal
//! sends when it blocks a peripheral.

use crate::{DeviceError, Result, traits::DisallowedVidSource, types::DisallowedVidEvent};
use tokio::sync::mpsc;

/// Mock disallowed-VID source.
///
/// Events are received through an internal channel. Tests push events with
/// a [`MockDisallowedHandle`].
///
/// # Examples
///
/// ```
/// use vidgate_hardware::mock::MockDisallowedSource;
/// use vidgate_hardware::traits::DisallowedVidSource;
///
/// #[tokio::main]
/// async fn main() -> vidgate_hardware::Result<()> {
///     let (mut source, handle) = MockDisallowedSource::new();
///
///     tokio::spawn(async move {
///         handle.send_vid("0x1A86").await.unwrap();
///         handle.send_unknown().await.unwrap();
///     });
///
///     assert_eq!(source.next_event().await?.vid_or_unknown(), "0x1A86");
///     assert_eq!(source.next_event().await?.vid_or_unknown(), "(unknown)");
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockDisallowedSource {
    /// Channel receiver for simulated notifications
    event_rx: mpsc::Receiver<DisallowedVidEvent>,
}

impl MockDisallowedSource {
    /// Create a new mock source.
    ///
    /// Returns a tuple of (MockDisallowedSource, MockDisallowedHandle) where
    /// the handle is used to simulate notifications.
    pub fn new() -> (Self, MockDisallowedHandle) {
        Self::with_capacity(32)
    }

    /// Create a new mock source with a custom channel capacity.
    pub fn with_capacity(capacity: usize) -> (Self, MockDisallowedHandle) {
        let (event_tx, event_rx) = mpsc::channel(capacity);
        (Self { event_rx }, MockDisallowedHandle { event_tx })
    }
}

impl DisallowedVidSource for MockDisallowedSource {
    async fn next_event(&mut self) -> Result<DisallowedVidEvent> {
        self.event_rx
            .recv()
            .await
            .ok_or_else(|| DeviceError::disconnected("Disallowed VID channel closed"))
    }
}

/// Handle for feeding a mock disallowed-VID source.
///
/// Cloneable; all clones feed the same source.
#[derive(Debug, Clone)]
pub struct MockDisallowedHandle {
    /// Channel sender for simulated notifications
    event_tx: mpsc::Sender<DisallowedVidEvent>,
}

impl MockDisallowedHandle {
    /// Send a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the source has been dropped and the channel is closed.
    pub async fn send_event(&self, event: DisallowedVidEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| DeviceError::disconnected("Disallowed VID channel closed"))
    }

    /// Send a notification for a specific VID.
    ///
    /// # Errors
    ///
    /// Returns an error if the source has been dropped and the channel is closed.
    pub async fn send_vid(&self, vid: impl Into<String>) -> Result<()> {
        self.send_event(DisallowedVidEvent::new(vid)).await
    }

    /// Send a notification whose VID is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the source has been dropped and the channel is closed.
    pub async fn send_unknown(&self) -> Result<()> {
        self.send_event(DisallowedVidEvent::unknown()).await
    }

    /// Whether the source is still listening.
    pub fn is_closed(&self) -> bool {
        self.event_tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_source_delivers_in_order() {
        let (mut source, handle) = MockDisallowedSource::new();

        tokio::spawn(async move {
            handle.send_vid("046D").await.unwrap();
            handle.send_vid("18D1").await.unwrap();
        });

        let first = source.next_event().await.unwrap();
        let second = source.next_event().await.unwrap();
        assert_eq!(first.vid.as_deref(), Some("046D"));
        assert_eq!(second.vid.as_deref(), Some("18D1"));
    }

    #[tokio::test]
    async fn test_mock_source_unknown_vid() {
        let (mut source, handle) = MockDisallowedSource::new();

        handle.send_unknown().await.unwrap();

        let event = source.next_event().await.unwrap();
        assert_eq!(event.vid, None);
        assert_eq!(event.vid_or_unknown(), "(unknown)");
    }

    #[tokio::test]
    async fn test_mock_source_closed_channel() {
        let (mut source, handle) = MockDisallowedSource::new();

        drop(handle);

        let result = source.next_event().await;
        assert!(matches!(result, Err(DeviceError::Disconnected { .. })));
    }

    #[tokio::test]
    async fn test_mock_handle_detects_dropped_source() {
        let (source, handle) = MockDisallowedSource::new();
        assert!(!handle.is_closed());

        drop(source);

        assert!(handle.is_closed());
        assert!(handle.send_vid("046D").await.is_err());
    }
}
