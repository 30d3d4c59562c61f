//! Disallowed-VID notifications raised by the emulated terminal.

use tokio::sync::mpsc;
use vidgate_hardware::{DeviceError, DisallowedVidEvent, DisallowedVidSource, Result};

/// Channel capacity for pending notifications.
pub(crate) const NOTIFICATION_CAPACITY: usize = 64;

/// Receives the notifications an [`EmulatedGateway`](crate::EmulatedGateway)
/// raises when a probe is blocked.
///
/// Closes once every gateway sharing the channel has been dropped.
#[derive(Debug)]
pub struct EmulatedDisallowedSource {
    events: mpsc::Receiver<DisallowedVidEvent>,
}

impl EmulatedDisallowedSource {
    pub(crate) fn new(events: mpsc::Receiver<DisallowedVidEvent>) -> Self {
        Self { events }
    }
}

impl DisallowedVidSource for EmulatedDisallowedSource {
    async fn next_event(&mut self) -> Result<DisallowedVidEvent> {
        self.events
            .recv()
            .await
            .ok_or_else(|| DeviceError::disconnected("emulated terminal"))
    }
}
