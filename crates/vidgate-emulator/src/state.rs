//! Persisted terminal state.
//!
//! A terminal keeps two copies of its allow-list configuration:
//!
//! - **stored**: what the last write put in device storage
//! - **enforced**: what the running firmware checks peripherals against
//!
//! Writes only touch `stored`. A reboot copies `stored` over `enforced`,
//! which is why every allow-list change needs one.

use serde::{Deserialize, Serialize};
use vidgate_core::{CanonicalKey, canonical_key};

/// Allow list and enforcement flag at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowListSnapshot {
    /// VIDs exactly as written.
    pub allow_list: Vec<String>,

    /// Whether the allow list is enforced.
    pub enabled: bool,
}

impl AllowListSnapshot {
    /// Create a snapshot.
    pub fn new<I, S>(allow_list: I, enabled: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allow_list: allow_list.into_iter().map(Into::into).collect(),
            enabled,
        }
    }

    /// Whether a peripheral with this canonical key would be accepted.
    ///
    /// With enforcement off every peripheral is accepted.
    pub fn accepts(&self, key: &CanonicalKey) -> bool {
        !self.enabled || self.allow_list.iter().any(|v| canonical_key(v) == *key)
    }
}

/// Full emulated terminal state, as written to the state file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceState {
    /// Written but not yet active.
    pub stored: AllowListSnapshot,

    /// Active since the last reboot.
    pub enforced: AllowListSnapshot,

    /// Reboots performed since the state file was created.
    pub reboot_count: u64,
}

impl DeviceState {
    /// State of a terminal that was configured and rebooted.
    pub fn booted(snapshot: AllowListSnapshot) -> Self {
        Self {
            stored: snapshot.clone(),
            enforced: snapshot,
            reboot_count: 0,
        }
    }

    /// Whether stored changes are waiting for a reboot.
    pub fn reboot_pending(&self) -> bool {
        self.stored != self.enforced
    }

    /// Promote stored configuration to enforced.
    pub fn reboot(&mut self) {
        self.enforced = self.stored.clone();
        self.reboot_count += 1;
    }
}
