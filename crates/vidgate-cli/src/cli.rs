//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Manage the VID allow list of a point-of-sale terminal.
///
/// Every command loads the terminal's current list first, so the staged
/// list always starts from what the device has stored.
#[derive(Parser, Debug)]
#[command(name = "vidgate", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Configuration file (defaults to ./vidgate.toml when present)
    #[arg(short, long, global = true, env = "VIDGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emulated terminal state file, overriding [device] state_path
    #[arg(short, long, global = true, env = "VIDGATE_STATE")]
    pub state: Option<PathBuf>,

    /// Reboot without the confirmation dialog
    #[arg(long, global = true)]
    pub no_confirm: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the enable flag and the stored allow list
    Show,

    /// Add VIDs to the allow list and apply it
    Add {
        /// VIDs such as 046D or 0x18D1
        #[arg(required = true)]
        vids: Vec<String>,
    },

    /// Remove a VID from the allow list and apply it
    Remove {
        /// VID to remove, in any prefix or case form
        vid: String,
    },

    /// Replace the allow list with exactly these VIDs and apply it
    Set {
        #[arg(required = true)]
        vids: Vec<String>,
    },

    /// Remove every VID from the allow list
    Clear,

    /// Turn allow-list enforcement on (requests a reboot)
    Enable,

    /// Turn allow-list enforcement off
    Disable,

    /// Plug a peripheral into the emulated terminal
    Probe {
        vid: String,
    },
}
