//! Allow-list reconciliation coordinator.
//!
//! The coordinator owns the staged allow list and enable flag, and is the
//! only component that writes to the device. Every operation runs under a
//! single busy gate: a call made while another one is in flight fails
//! immediately with [`ReconcileError::TransientBusy`] instead of queueing.
//!
//! # Staged vs device state
//!
//! ```text
//!   add_vid / remove_vid          apply / clear / set_enabled
//! ┌──────────────────────┐      ┌──────────────────────────────┐
//! │ staged (in memory)   │─────►│ device (stored, pre-reboot)  │──► reboot
//! └──────────────────────┘      └──────────────────────────────┘
//!            ▲                                 │
//!            └──────── load / load_list ◄──────┘
//! ```
//!
//! Staged state only changes after the device confirms a write. A failed
//! device call leaves it exactly as it was.

use crate::config::AllowListConfig;
use crate::error::{ReconcileError, Result, ToggleFailure};
use crate::outcome::{Applied, Cleared, Toggled};
use crate::state::AllowListState;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use vidgate_core::{AddResult, RemoveResult, Vid, VidEntry};
use vidgate_hardware::{DeviceGateway, RebootRequest};

/// Reconciles a staged VID allow list with a device.
///
/// # Examples
///
/// ```no_run
/// use vidgate_allowlist::{AllowListConfig, AllowListCoordinator};
/// use vidgate_hardware::mock::MockGateway;
///
/// #[tokio::main]
/// async fn main() -> vidgate_allowlist::Result<()> {
///     let (gateway, _device) = MockGateway::with_state(&["046D"], true);
///     let coordinator = AllowListCoordinator::new(gateway, AllowListConfig::default());
///
///     coordinator.load().await?;
///     coordinator.add_vid("0x18d1")?;
///     let applied = coordinator.apply().await?;
///     println!("{applied}");
///     Ok(())
/// }
/// ```
pub struct AllowListCoordinator<G> {
    session: Mutex<Session<G>>,
    config: AllowListConfig,
}

/// Everything guarded by the busy gate.
struct Session<G> {
    gateway: G,
    state: AllowListState,
}

impl<G: DeviceGateway> AllowListCoordinator<G> {
    /// Create a coordinator with an empty staged list and the flag off.
    ///
    /// Call [`load`](Self::load) to synchronize with the device.
    pub fn new(gateway: G, config: AllowListConfig) -> Self {
        Self {
            session: Mutex::new(Session {
                gateway,
                state: AllowListState::default(),
            }),
            config,
        }
    }

    /// Coordinator configuration.
    pub fn config(&self) -> &AllowListConfig {
        &self.config
    }

    /// Release the gateway, discarding the staged state.
    pub fn into_gateway(self) -> G {
        self.session.into_inner().gateway
    }

    fn acquire(&self, operation: &'static str) -> Result<MutexGuard<'_, Session<G>>> {
        self.session.try_lock().map_err(|_| {
            debug!(
                operation,
                "Rejected: another allow-list operation is in flight"
            );
            ReconcileError::TransientBusy
        })
    }

    /// Read the device enable flag into the staged state.
    ///
    /// # Errors
    ///
    /// - [`ReconcileError::TransientBusy`] if another operation is running
    /// - [`ReconcileError::Device`] if the read fails; the staged flag is kept
    pub async fn load_enabled_flag(&self) -> Result<bool> {
        let mut session = self.acquire("load_enabled_flag")?;
        session.load_enabled_flag().await
    }

    /// Replace the staged list with the device list.
    ///
    /// Device entries are taken verbatim, without validation or dedupe.
    ///
    /// # Errors
    ///
    /// - [`ReconcileError::TransientBusy`] if another operation is running
    /// - [`ReconcileError::Device`] if the read fails; the staged list is kept
    pub async fn load_list(&self) -> Result<usize> {
        let mut session = self.acquire("load_list")?;
        session.load_list().await
    }

    /// Load the enable flag, then the list, in one gate span.
    ///
    /// Stops at the first device error. A flag loaded before a failing list
    /// read is kept.
    pub async fn load(&self) -> Result<AllowListState> {
        let mut session = self.acquire("load")?;
        session.load_enabled_flag().await?;
        session.load_list().await?;
        Ok(session.state.clone())
    }

    /// Validate `raw` and stage it at the end of the list.
    ///
    /// Returns the index of the new entry.
    ///
    /// # Errors
    ///
    /// - [`ReconcileError::InvalidFormat`] if `raw` is not a hex VID
    /// - [`ReconcileError::AlreadyExists`] if the same canonical key is staged
    /// - [`ReconcileError::TransientBusy`] if another operation is running
    pub fn add_vid(&self, raw: &str) -> Result<usize> {
        let mut session = self.acquire("add_vid")?;
        let vid = Vid::normalize(raw)?;

        match session.state.store.add(vid) {
            AddResult::Added(index) => {
                debug!(index, "Staged VID");
                Ok(index)
            }
            AddResult::DuplicateRejected(key) => {
                debug!(%key, "Rejected duplicate VID");
                Err(ReconcileError::AlreadyExists { key })
            }
        }
    }

    /// Remove the staged entry at `index`.
    ///
    /// # Errors
    ///
    /// - [`ReconcileError::OutOfRange`] if `index` is past the end
    /// - [`ReconcileError::TransientBusy`] if another operation is running
    pub fn remove_vid(&self, index: usize) -> Result<VidEntry> {
        let mut session = self.acquire("remove_vid")?;
        let len = session.state.store.len();

        match session.state.store.remove_at(index) {
            RemoveResult::Removed(entry) => {
                debug!(index, vid = entry.raw(), "Unstaged VID");
                Ok(entry)
            }
            RemoveResult::OutOfRange => Err(ReconcileError::OutOfRange { index, len }),
        }
    }

    /// Write the staged list to the device and request a reboot.
    ///
    /// An empty staged list takes the [`clear`](Self::clear) path; the
    /// device is never sent an empty set.
    ///
    /// # Errors
    ///
    /// - [`ReconcileError::TransientBusy`] if another operation is running
    /// - [`ReconcileError::Device`] if the write fails; nothing is rebooted
    ///   and the staged list is kept
    pub async fn apply(&self) -> Result<Applied> {
        let mut session = self.acquire("apply")?;

        if session.state.store.is_empty() {
            debug!("Staged list is empty, clearing device list instead");
            let cleared = session.clear(&self.config.reboot).await?;
            return Ok(Applied {
                count: 0,
                reboot_issued: cleared.reboot_issued,
            });
        }

        session.apply(&self.config.reboot).await
    }

    /// Clear the device list and the staged list, then request a reboot.
    ///
    /// # Errors
    ///
    /// - [`ReconcileError::TransientBusy`] if another operation is running
    /// - [`ReconcileError::Device`] if the clear fails; the staged list is kept
    pub async fn clear(&self) -> Result<Cleared> {
        let mut session = self.acquire("clear")?;
        session.clear(&self.config.reboot).await
    }

    /// Write the enable flag to the device.
    ///
    /// Enabling requests a reboot; disabling does not.
    ///
    /// # Errors
    ///
    /// Returns a [`ToggleFailure`] whose `revert_to` is `!enabled` when the
    /// coordinator is busy or the device write fails. The staged flag is
    /// left unchanged.
    pub async fn set_enabled(&self, enabled: bool) -> std::result::Result<Toggled, ToggleFailure> {
        let failure = |error| ToggleFailure {
            error,
            revert_to: !enabled,
        };

        let mut session = self.acquire("set_enabled").map_err(failure)?;
        session
            .set_enabled(enabled, &self.config.reboot)
            .await
            .map_err(failure)
    }

    /// Copy of the staged state.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::TransientBusy`] if another operation is running.
    pub fn snapshot(&self) -> Result<AllowListState> {
        let session = self.acquire("snapshot")?;
        Ok(session.state.clone())
    }
}

impl<G: DeviceGateway> Session<G> {
    async fn load_enabled_flag(&mut self) -> Result<bool> {
        let enabled = self.gateway.is_allow_list_enabled().await.map_err(|e| {
            warn!("Failed to read allow-list flag: {}", e);
            e
        })?;

        self.state.enabled = enabled;
        debug!(enabled, "Loaded allow-list flag");
        Ok(enabled)
    }

    async fn load_list(&mut self) -> Result<usize> {
        let vids = self.gateway.get_allow_list().await.map_err(|e| {
            warn!("Failed to read allow list: {}", e);
            e
        })?;

        self.state.store.replace_all(vids);
        let count = self.state.store.len();
        debug!(count, "Loaded allow list");
        Ok(count)
    }

    async fn apply(&mut self, reboot: &RebootRequest) -> Result<Applied> {
        let vids = self.state.store.to_vec();

        self.gateway.set_allow_list(&vids).await.map_err(|e| {
            warn!("Failed to apply allow list: {}", e);
            e
        })?;

        info!(count = vids.len(), "Applied allow list");
        Ok(Applied {
            count: vids.len(),
            reboot_issued: self.request_reboot(reboot),
        })
    }

    async fn clear(&mut self, reboot: &RebootRequest) -> Result<Cleared> {
        self.gateway.clear_allow_list().await.map_err(|e| {
            warn!("Failed to clear allow list: {}", e);
            e
        })?;

        let dropped = self.state.store.len();
        self.state.store.clear();
        info!(dropped, "Cleared allow list");

        Ok(Cleared {
            dropped,
            reboot_issued: self.request_reboot(reboot),
        })
    }

    async fn set_enabled(&mut self, enabled: bool, reboot: &RebootRequest) -> Result<Toggled> {
        self.gateway
            .set_allow_list_enabled(enabled)
            .await
            .map_err(|e| {
                warn!(enabled, "Failed to set allow-list flag: {}", e);
                e
            })?;

        self.state.enabled = enabled;
        info!(enabled, "Allow-list flag set");

        let reboot_issued = enabled && self.request_reboot(reboot);
        Ok(Toggled {
            enabled,
            reboot_issued,
        })
    }

    /// Fire-and-forget; a failure to issue the request is only logged.
    fn request_reboot(&mut self, request: &RebootRequest) -> bool {
        match self.gateway.reboot(request) {
            Ok(()) => {
                info!(reason = %request.reason, confirm = request.confirm, "Reboot requested");
                true
            }
            Err(e) => {
                warn!("Failed to request reboot: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidgate_hardware::DeviceError;
    use vidgate_hardware::mock::{GatewayCall, GatewayOp, MockGateway, MockGatewayHandle};

    type Fixture = (AllowListCoordinator<MockGateway>, MockGatewayHandle);

    fn coordinator(allow_list: &[&str], enabled: bool) -> Fixture {
        let (gateway, device) = MockGateway::with_state(allow_list, enabled);
        let coordinator = AllowListCoordinator::new(gateway, AllowListConfig::default());
        (coordinator, device)
    }

    #[tokio::test]
    async fn test_new_coordinator_is_empty() {
        let (coordinator, device) = coordinator(&["046D"], true);

        let state = coordinator.snapshot().unwrap();
        assert!(state.store().is_empty());
        assert!(!state.enabled());
        assert!(device.calls().is_empty());
    }

    #[tokio::test]
    async fn test_load_reads_flag_then_list() {
        let (coordinator, device) = coordinator(&["046D", "0x18d1"], true);

        let state = coordinator.load().await.unwrap();

        assert!(state.enabled());
        assert_eq!(state.vids(), vec!["046D", "0x18d1"]);
        assert_eq!(
            device.calls(),
            vec![GatewayCall::IsEnabled, GatewayCall::GetAllowList]
        );
    }

    #[tokio::test]
    async fn test_load_keeps_flag_when_list_read_fails() {
        let (coordinator, device) = coordinator(&["046D"], true);
        device.fail_next(GatewayOp::GetAllowList, DeviceError::timeout(500));

        let result = coordinator.load().await;

        assert!(matches!(
            result,
            Err(ReconcileError::Device(DeviceError::Timeout { .. }))
        ));
        let state = coordinator.snapshot().unwrap();
        assert!(state.enabled());
        assert!(state.store().is_empty());
    }

    #[tokio::test]
    async fn test_add_invalid_vid_does_not_touch_store() {
        let (coordinator, _device) = coordinator(&[], false);

        let result = coordinator.add_vid("0xZZ");

        assert!(matches!(result, Err(ReconcileError::InvalidFormat(_))));
        assert!(coordinator.snapshot().unwrap().store().is_empty());
    }

    #[tokio::test]
    async fn test_disable_does_not_reboot() {
        let (coordinator, device) = coordinator(&[], true);

        let toggled = coordinator.set_enabled(false).await.unwrap();

        assert_eq!(
            toggled,
            Toggled {
                enabled: false,
                reboot_issued: false,
            }
        );
        assert_eq!(device.reboot_count(), 0);
        assert!(!device.is_enabled());
    }

    #[tokio::test]
    async fn test_reboot_failure_is_not_propagated() {
        let (coordinator, device) = coordinator(&[], false);
        coordinator.add_vid("046D").unwrap();
        device.fail_next(GatewayOp::Reboot, DeviceError::rejected("reboot", "denied"));

        let applied = coordinator.apply().await.unwrap();

        assert_eq!(
            applied,
            Applied {
                count: 1,
                reboot_issued: false,
            }
        );
        assert_eq!(device.allow_list(), vec!["046D"]);
    }

    #[tokio::test]
    async fn test_reboot_uses_configured_request() {
        let (gateway, device) = MockGateway::new();
        let config = AllowListConfig::default().with_reboot(RebootRequest::new(false, "KIOSK"));
        let coordinator = AllowListCoordinator::new(gateway, config);

        coordinator.set_enabled(true).await.unwrap();

        assert_eq!(device.reboots(), vec![RebootRequest::new(false, "KIOSK")]);
    }

    #[tokio::test]
    async fn test_into_gateway_returns_device() {
        let (coordinator, device) = coordinator(&["046D"], false);
        let gateway = coordinator.into_gateway();

        assert_eq!(gateway.get_allow_list().await.unwrap(), vec!["046D"]);
        assert_eq!(device.call_count(GatewayOp::GetAllowList), 1);
    }
}
