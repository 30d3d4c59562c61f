//! CLI configuration file.
//!
//! ```toml
//! [reboot]
//! confirm = true
//! reason = "APPLY_VID_ALLOW_LIST"
//!
//! [device]
//! state_path = "vidgate-terminal.json"
//! ```
//!
//! Every key is optional. Command-line flags override the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use vidgate_allowlist::AllowListConfig;
use vidgate_hardware::RebootRequest;

use crate::cli::GlobalOpts;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "vidgate.toml";

/// Default emulated terminal state file.
pub const DEFAULT_STATE_FILE: &str = "vidgate-terminal.json";

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub reboot: RebootRequest,
    pub device: DeviceConfig,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeviceConfig {
    pub state_path: PathBuf,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_FILE),
        }
    }
}

/// Settings for one run, after overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub state_path: PathBuf,
    pub coordinator: AllowListConfig,
}

impl Config {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Load the file named by `--config`, else `./vidgate.toml` if it
    /// exists, else defaults.
    pub fn discover(global: &GlobalOpts) -> Result<Self> {
        if let Some(path) = &global.config {
            return Self::load(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            tracing::debug!(path = %fallback.display(), "Using configuration file");
            return Self::load(fallback);
        }

        Ok(Self::default())
    }

    pub fn into_settings(self, global: &GlobalOpts) -> Settings {
        let mut reboot = self.reboot;
        if global.no_confirm {
            reboot.confirm = false;
        }

        Settings {
            state_path: global.state.clone().unwrap_or(self.device.state_path),
            coordinator: AllowListConfig { reboot },
        }
    }
}
