//! Staged allow-list state.

use vidgate_core::{AllowListStore, VidEntry};

/// The proposed allow list and enable flag, not yet confirmed on the device.
///
/// Owned exclusively by the coordinator. Callers only ever see clones
/// returned by [`AllowListCoordinator::snapshot`](crate::AllowListCoordinator::snapshot).
/// Nothing here is persisted; a new session starts empty and resynchronizes
/// with a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowListState {
    pub(crate) store: AllowListStore,
    pub(crate) enabled: bool,
}

impl AllowListState {
    /// Staged entries.
    pub fn store(&self) -> &AllowListStore {
        &self.store
    }

    /// Last known device enable flag.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Staged entries in display order.
    pub fn entries(&self) -> impl Iterator<Item = &VidEntry> {
        self.store.iter()
    }

    /// Raw texts in staged order.
    pub fn vids(&self) -> Vec<String> {
        self.store.to_vec()
    }
}
