//! Coordinator configuration.

use serde::{Deserialize, Serialize};
use vidgate_hardware::RebootRequest;

/// Configuration for [`AllowListCoordinator`](crate::AllowListCoordinator).
///
/// Every field has a default, so a partial (or empty) TOML table
/// deserializes cleanly.
///
/// # Examples
///
/// ```
/// use vidgate_allowlist::AllowListConfig;
///
/// let config = AllowListConfig::default();
/// assert!(config.reboot.confirm);
/// assert_eq!(config.reboot.reason, "APPLY_VID_ALLOW_LIST");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowListConfig {
    /// Reboot issued after a successful apply, clear or enable.
    pub reboot: RebootRequest,
}

impl AllowListConfig {
    /// Override the reboot request.
    pub fn with_reboot(mut self, reboot: RebootRequest) -> Self {
        self.reboot = reboot;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AllowListConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AllowListConfig::default());
    }

    #[test]
    fn test_reboot_override() {
        let config: AllowListConfig =
            serde_json::from_str(r#"{"reboot": {"confirm": false, "reason": "KIOSK"}}"#).unwrap();

        assert_eq!(config.reboot, RebootRequest::new(false, "KIOSK"));
    }

    #[test]
    fn test_with_reboot() {
        let config = AllowListConfig::default().with_reboot(RebootRequest::new(false, "X"));
        assert!(!config.reboot.confirm);
    }
}
