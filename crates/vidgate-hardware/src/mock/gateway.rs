//! Mock device gateway for testing and development.
//!
//! This module provides an in-memory terminal that records every call made
//! through [`DeviceGateway`] and lets tests inject failures and latency
//! through a [`MockGatewayHandle`].

use crate::{DeviceError, Result, traits::DeviceGateway, types::RebootRequest};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Gateway operation, used to target failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    GetAllowList,
    SetAllowList,
    ClearAllowList,
    IsEnabled,
    SetEnabled,
    Reboot,
}

/// A call observed by the mock gateway, with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    GetAllowList,
    SetAllowList(Vec<String>),
    ClearAllowList,
    IsEnabled,
    SetEnabled(bool),
    Reboot(RebootRequest),
}

impl GatewayCall {
    /// The operation this call targets.
    pub fn op(&self) -> GatewayOp {
        match self {
            Self::GetAllowList => GatewayOp::GetAllowList,
            Self::SetAllowList(_) => GatewayOp::SetAllowList,
            Self::ClearAllowList => GatewayOp::ClearAllowList,
            Self::IsEnabled => GatewayOp::IsEnabled,
            Self::SetEnabled(_) => GatewayOp::SetEnabled,
            Self::Reboot(_) => GatewayOp::Reboot,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    allow_list: Vec<String>,
    enabled: bool,
    connected: bool,
    latency: Option<Duration>,
    calls: Vec<GatewayCall>,
    failures: HashMap<GatewayOp, VecDeque<DeviceError>>,
}

/// Mock gateway for testing and development.
///
/// The device state lives behind a shared lock so that the paired
/// [`MockGatewayHandle`] can inspect and steer it while the gateway itself
/// is owned by the code under test.
///
/// # Examples
///
/// ```
/// use vidgate_hardware::mock::MockGateway;
/// use vidgate_hardware::traits::DeviceGateway;
///
/// #[tokio::main]
/// async fn main() -> vidgate_hardware::Result<()> {
///     let (mut gateway, handle) = MockGateway::new();
///
///     gateway.set_allow_list(&["046D".to_string()]).await?;
///
///     assert_eq!(handle.allow_list(), vec!["046D"]);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,

    /// Device name
    name: String,
}

impl MockGateway {
    /// Create a new mock gateway with the default name and an empty,
    /// disabled allow list.
    pub fn new() -> (Self, MockGatewayHandle) {
        Self::with_name("Mock POS Terminal".to_string())
    }

    /// Create a new mock gateway with a custom name.
    pub fn with_name(name: String) -> (Self, MockGatewayHandle) {
        let state = Arc::new(Mutex::new(MockState {
            connected: true,
            ..MockState::default()
        }));

        let gateway = Self {
            state: Arc::clone(&state),
            name: name.clone(),
        };

        let handle = MockGatewayHandle { state, name };

        (gateway, handle)
    }

    /// Create a mock gateway that already stores `allow_list` and `enabled`.
    pub fn with_state(allow_list: &[&str], enabled: bool) -> (Self, MockGatewayHandle) {
        let (gateway, handle) = Self::new();
        handle.set_device_state(allow_list, enabled);
        (gateway, handle)
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        lock_state(&self.state)
    }

    /// Record the call, then fail it if the device is offline or a failure
    /// is queued for the operation.
    fn begin(&self, call: GatewayCall) -> Result<()> {
        let mut state = self.lock();
        let op = call.op();
        state.calls.push(call);

        if !state.connected {
            return Err(DeviceError::disconnected(self.name.clone()));
        }

        match state.failures.get_mut(&op).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn simulate_latency(&self) {
        let latency = self.lock().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new().0
    }
}

impl DeviceGateway for MockGateway {
    async fn get_allow_list(&self) -> Result<Vec<String>> {
        self.simulate_latency().await;
        self.begin(GatewayCall::GetAllowList)?;
        Ok(self.lock().allow_list.clone())
    }

    async fn set_allow_list(&mut self, vids: &[String]) -> Result<()> {
        self.simulate_latency().await;
        self.begin(GatewayCall::SetAllowList(vids.to_vec()))?;
        if vids.is_empty() {
            return Err(DeviceError::invalid_argument("vendorIds is null or empty"));
        }
        self.lock().allow_list = vids.to_vec();
        Ok(())
    }

    async fn clear_allow_list(&mut self) -> Result<()> {
        self.simulate_latency().await;
        self.begin(GatewayCall::ClearAllowList)?;
        self.lock().allow_list.clear();
        Ok(())
    }

    async fn is_allow_list_enabled(&self) -> Result<bool> {
        self.simulate_latency().await;
        self.begin(GatewayCall::IsEnabled)?;
        Ok(self.lock().enabled)
    }

    async fn set_allow_list_enabled(&mut self, enabled: bool) -> Result<()> {
        self.simulate_latency().await;
        self.begin(GatewayCall::SetEnabled(enabled))?;
        self.lock().enabled = enabled;
        Ok(())
    }

    fn reboot(&mut self, request: &RebootRequest) -> Result<()> {
        self.begin(GatewayCall::Reboot(request.clone()))
    }
}

/// Handle for controlling a mock gateway.
///
/// This handle shares state with its [`MockGateway`]. It can be cloned and
/// shared across tasks.
///
/// # Examples
///
/// ```
/// use vidgate_hardware::DeviceError;
/// use vidgate_hardware::mock::{GatewayOp, MockGateway};
/// use vidgate_hardware::traits::DeviceGateway;
///
/// #[tokio::main]
/// async fn main() {
///     let (mut gateway, handle) = MockGateway::new();
///
///     handle.fail_next(GatewayOp::SetAllowList, DeviceError::communication("binder died"));
///
///     assert!(gateway.set_allow_list(&["046D".to_string()]).await.is_err());
///     assert!(gateway.set_allow_list(&["046D".to_string()]).await.is_ok());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MockGatewayHandle {
    state: Arc<Mutex<MockState>>,

    /// Device name
    name: String,
}

impl MockGatewayHandle {
    fn lock(&self) -> MutexGuard<'_, MockState> {
        lock_state(&self.state)
    }

    /// Overwrite the stored allow list and enable flag without recording
    /// a call.
    pub fn set_device_state(&self, allow_list: &[&str], enabled: bool) {
        let mut state = self.lock();
        state.allow_list = allow_list.iter().map(|s| (*s).to_string()).collect();
        state.enabled = enabled;
    }

    /// Fail the next call to `op` with `error`.
    ///
    /// Failures queue up per operation and are consumed in order.
    pub fn fail_next(&self, op: GatewayOp, error: DeviceError) {
        self.lock().failures.entry(op).or_default().push_back(error);
    }

    /// Simulate the driver handle going away (or coming back).
    ///
    /// While disconnected every call fails with
    /// [`DeviceError::Disconnected`].
    pub fn set_connected(&self, connected: bool) {
        self.lock().connected = connected;
    }

    /// Delay every async gateway call by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.lock().latency = latency;
    }

    /// Allow list currently stored on the mock device.
    pub fn allow_list(&self) -> Vec<String> {
        self.lock().allow_list.clone()
    }

    /// Enable flag currently stored on the mock device.
    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    /// Every call observed so far, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    /// Number of observed calls targeting `op`.
    pub fn call_count(&self, op: GatewayOp) -> usize {
        self.lock().calls.iter().filter(|c| c.op() == op).count()
    }

    /// Number of reboot requests issued so far.
    pub fn reboot_count(&self) -> usize {
        self.call_count(GatewayOp::Reboot)
    }

    /// Reboot requests issued so far, in order.
    pub fn reboots(&self) -> Vec<RebootRequest> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                GatewayCall::Reboot(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget every recorded call.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn lock_state(state: &Mutex<MockState>) -> MutexGuard<'_, MockState> {
    // Poisoned only if a test panicked mid-call; the state is still usable.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
