//! File-backed emulated terminal.
//!
//! [`EmulatedGateway`] implements [`DeviceGateway`] on top of a JSON state
//! file, so separate processes (for example successive CLI runs) see the
//! same terminal. The file is read on every call; nothing is cached.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::mpsc;
use tracing::{debug, info};
use vidgate_core::Vid;
use vidgate_hardware::{DeviceError, DeviceGateway, DisallowedVidEvent, RebootRequest, Result};

use crate::notifier::{EmulatedDisallowedSource, NOTIFICATION_CAPACITY};
use crate::state::{AllowListSnapshot, DeviceState};

/// Result of plugging a peripheral into the emulated terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The enforced configuration accepts the VID.
    Accepted,
    /// The enforced configuration blocks the VID; a notification was raised.
    Blocked,
}

impl ProbeOutcome {
    /// Whether the peripheral was blocked.
    pub fn is_blocked(self) -> bool {
        matches!(self, Self::Blocked)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("accepted"),
            Self::Blocked => f.write_str("blocked"),
        }
    }
}

/// Emulated terminal backed by a JSON state file.
///
/// A missing state file is a factory-fresh terminal: empty lists and
/// enforcement off in both the stored and enforced configuration.
///
/// # Examples
///
/// ```no_run
/// use vidgate_emulator::EmulatedGateway;
/// use vidgate_hardware::{DeviceGateway, RebootRequest};
///
/// #[tokio::main]
/// async fn main() -> vidgate_hardware::Result<()> {
///     let (mut gateway, _notifications) = EmulatedGateway::open("terminal.json");
///
///     gateway.set_allow_list(&["046D".to_string()]).await?;
///     gateway.set_allow_list_enabled(true).await?;
///     assert!(!gateway.probe("1A86").await?.is_blocked());
///
///     gateway.reboot(&RebootRequest::default())?;
///     assert!(gateway.probe("1A86").await?.is_blocked());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct EmulatedGateway {
    path: PathBuf,
    notifications: mpsc::Sender<DisallowedVidEvent>,
}

impl EmulatedGateway {
    /// Attach to the terminal stored at `path`.
    ///
    /// The returned source receives a notification for every blocked probe.
    pub fn open(path: impl Into<PathBuf>) -> (Self, EmulatedDisallowedSource) {
        let (notifications, events) = mpsc::channel(NOTIFICATION_CAPACITY);
        let gateway = Self {
            path: path.into(),
            notifications,
        };
        (gateway, EmulatedDisallowedSource::new(events))
    }

    /// Create (or overwrite) a terminal that booted with `snapshot` active.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Io`] if the state file cannot be written.
    pub async fn provision(
        path: impl Into<PathBuf>,
        snapshot: AllowListSnapshot,
    ) -> Result<(Self, EmulatedDisallowedSource)> {
        let (gateway, source) = Self::open(path);
        gateway.write_state(&DeviceState::booted(snapshot)).await?;
        info!(path = %gateway.path.display(), "Provisioned emulated terminal");
        Ok((gateway, source))
    }

    /// Location of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current stored and enforced configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Io`] or [`DeviceError::StateCorrupted`] if the
    /// state file cannot be read.
    pub async fn state(&self) -> Result<DeviceState> {
        self.read_state().await
    }

    /// Plug a peripheral with `vid` into the terminal.
    ///
    /// The check runs against the enforced configuration, so writes made
    /// since the last reboot have no effect yet.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::InvalidArgument`] if `vid` is not a hex VID
    /// - [`DeviceError::Io`] or [`DeviceError::StateCorrupted`] if the state
    ///   file cannot be read
    pub async fn probe(&self, vid: &str) -> Result<ProbeOutcome> {
        let vid = Vid::normalize(vid).map_err(invalid_vid)?;
        let state = self.read_state().await?;

        if state.enforced.accepts(&vid.canonical_key()) {
            debug!(%vid, "Peripheral accepted");
            return Ok(ProbeOutcome::Accepted);
        }

        info!(%vid, "Peripheral blocked");
        let event = DisallowedVidEvent::new(vid.as_str());
        if let Err(e) = self.notifications.try_send(event) {
            debug!("Dropped disallowed VID notification: {}", e);
        }
        Ok(ProbeOutcome::Blocked)
    }

    async fn read_state(&self) -> Result<DeviceState> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => decode_state(&self.path, &text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DeviceState::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_state(&self, state: &DeviceState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, encode_state(state)?).await?;
        Ok(())
    }

    async fn update_stored<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut AllowListSnapshot),
    {
        let mut state = self.read_state().await?;
        change(&mut state.stored);
        self.write_state(&state).await
    }

    /// Promote the stored configuration to enforced, in place.
    fn reboot_state_file(&self) -> Result<DeviceState> {
        let mut state = match std::fs::read_to_string(&self.path) {
            Ok(text) => decode_state(&self.path, &text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => DeviceState::default(),
            Err(e) => return Err(e.into()),
        };

        state.reboot();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, encode_state(&state)?)?;
        Ok(state)
    }
}

/// Run blocking file I/O, moved off the async worker on a multi-thread
/// runtime. Current-thread runtimes cannot hand the worker off, so the I/O
/// runs inline there.
fn blocking_io<T>(io: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(io)
        }
        _ => io(),
    }
}

fn invalid_vid(error: vidgate_core::Error) -> DeviceError {
    DeviceError::invalid_argument(error.to_string())
}

fn decode_state(path: &Path, text: &str) -> Result<DeviceState> {
    serde_json::from_str(text)
        .map_err(|e| DeviceError::state_corrupted(format!("{}: {e}", path.display())))
}

fn encode_state(state: &DeviceState) -> Result<String> {
    serde_json::to_string_pretty(state).map_err(|e| DeviceError::state_corrupted(e.to_string()))
}

impl DeviceGateway for EmulatedGateway {
    async fn get_allow_list(&self) -> Result<Vec<String>> {
        Ok(self.read_state().await?.stored.allow_list)
    }

    async fn set_allow_list(&mut self, vids: &[String]) -> Result<()> {
        if vids.is_empty() {
            return Err(DeviceError::invalid_argument("vendorIds is null or empty"));
        }
        self.update_stored(|s| s.allow_list = vids.to_vec()).await?;
        debug!(count = vids.len(), "Stored allow list");
        Ok(())
    }

    async fn clear_allow_list(&mut self) -> Result<()> {
        self.update_stored(|s| s.allow_list.clear()).await?;
        debug!("Cleared stored allow list");
        Ok(())
    }

    async fn is_allow_list_enabled(&self) -> Result<bool> {
        Ok(self.read_state().await?.stored.enabled)
    }

    async fn set_allow_list_enabled(&mut self, enabled: bool) -> Result<()> {
        self.update_stored(|s| s.enabled = enabled).await?;
        debug!(enabled, "Stored allow-list flag");
        Ok(())
    }

    /// Reboots immediately; `confirm` is recorded in the log only.
    ///
    /// The trait method is synchronous, so the state file is rewritten with
    /// blocking I/O, handed off the worker thread when the runtime allows.
    fn reboot(&mut self, request: &RebootRequest) -> Result<()> {
        let state = blocking_io(|| self.reboot_state_file())?;

        info!(
            reason = %request.reason,
            confirm = request.confirm,
            reboot_count = state.reboot_count,
            "Emulated terminal rebooted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vidgate_hardware::DisallowedVidSource;

    fn gateway(dir: &TempDir) -> (EmulatedGateway, EmulatedDisallowedSource) {
        EmulatedGateway::open(dir.path().join("terminal.json"))
    }

    #[tokio::test]
    async fn test_missing_file_is_fresh_terminal() {
        let dir = TempDir::new().unwrap();
        let (gateway, _events) = gateway(&dir);

        assert!(gateway.get_allow_list().await.unwrap().is_empty());
        assert!(!gateway.is_allow_list_enabled().await.unwrap());
        assert_eq!(gateway.state().await.unwrap(), DeviceState::default());
    }

    #[tokio::test]
    async fn test_writes_persist_across_instances() {
        let dir = TempDir::new().unwrap();
        let (mut first, _events) = gateway(&dir);

        first
            .set_allow_list(&["046D".to_string(), "0x18D1".to_string()])
            .await
            .unwrap();
        first.set_allow_list_enabled(true).await.unwrap();

        let (second, _events) = gateway(&dir);
        let stored = second.get_allow_list().await.unwrap();
        assert_eq!(stored, vec!["046D", "0x18D1"]);
        assert!(second.is_allow_list_enabled().await.unwrap());
    }

    #[tokio::test]
    async fn test_set_empty_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (mut gateway, _events) = gateway(&dir);

        let result = gateway.set_allow_list(&[]).await;

        assert!(matches!(result, Err(DeviceError::InvalidArgument { .. })));
        assert!(!gateway.path().exists());
    }

    #[tokio::test]
    async fn test_corrupted_state_file() {
        let dir = TempDir::new().unwrap();
        let (gateway, _events) = gateway(&dir);
        std::fs::write(gateway.path(), "not json").unwrap();

        let result = gateway.get_allow_list().await;

        assert!(matches!(result, Err(DeviceError::StateCorrupted { .. })));
    }

    #[tokio::test]
    async fn test_blocked_probe_raises_notification() {
        let dir = TempDir::new().unwrap();
        let (gateway, mut events) = EmulatedGateway::provision(
            dir.path().join("terminal.json"),
            AllowListSnapshot::new(["046D"], true),
        )
        .await
        .unwrap();

        let accepted = gateway.probe("0x046d").await.unwrap();
        let blocked = gateway.probe("0x1a86").await.unwrap();
        assert_eq!(accepted, ProbeOutcome::Accepted);
        assert_eq!(blocked, ProbeOutcome::Blocked);

        let event = events.next_event().await.unwrap();
        assert_eq!(event.vid_or_unknown(), "0x1A86");
    }

    #[tokio::test]
    async fn test_probe_rejects_invalid_vid() {
        let dir = TempDir::new().unwrap();
        let (gateway, _events) = gateway(&dir);

        let result = gateway.probe("usb").await;

        assert!(matches!(result, Err(DeviceError::InvalidArgument { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_reboot_on_multi_thread_runtime() {
        let dir = TempDir::new().unwrap();
        let (mut gateway, _events) = gateway(&dir);
        gateway.set_allow_list_enabled(true).await.unwrap();

        gateway.reboot(&RebootRequest::default()).unwrap();

        let state = gateway.state().await.unwrap();
        assert_eq!(state.reboot_count, 1);
        assert!(state.enforced.enabled);
        assert!(!state.reboot_pending());
    }

    #[tokio::test]
    async fn test_reboot_on_current_thread_runtime() {
        let dir = TempDir::new().unwrap();
        let (mut gateway, _events) = gateway(&dir);

        gateway.reboot(&RebootRequest::default()).unwrap();

        assert_eq!(gateway.state().await.unwrap().reboot_count, 1);
    }

    #[tokio::test]
    async fn test_source_closes_with_gateway() {
        let dir = TempDir::new().unwrap();
        let (gateway, mut events) = gateway(&dir);
        drop(gateway);

        let result = events.next_event().await;

        assert!(matches!(result, Err(DeviceError::Disconnected { .. })));
    }
}
