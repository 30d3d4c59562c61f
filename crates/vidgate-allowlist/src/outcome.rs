//! Results of device-side allow-list operations.
//!
//! The `Display` impls produce the short status line a presentation layer
//! shows once the operation returns.

use std::fmt;

/// Staged list was written to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    /// Entries written. Zero means the device list was cleared.
    pub count: usize,

    /// Whether a reboot request was issued afterwards.
    pub reboot_issued: bool,
}

/// Device list was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cleared {
    /// Staged entries dropped by the clear.
    pub dropped: usize,

    /// Whether a reboot request was issued afterwards.
    pub reboot_issued: bool,
}

/// Enforcement flag was written to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggled {
    /// The flag now stored on the device.
    pub enabled: bool,

    /// Whether a reboot request was issued afterwards.
    pub reboot_issued: bool,
}

impl fmt::Display for Applied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Applied {} item(s)", self.count)?;
        if self.reboot_issued {
            f.write_str(", rebooting...")?;
        }
        Ok(())
    }
}

impl fmt::Display for Cleared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cleared")?;
        if self.reboot_issued {
            f.write_str(", rebooting...")?;
        }
        Ok(())
    }
}

impl fmt::Display for Toggled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.enabled { "ON" } else { "OFF" };
        write!(f, "Allow List: {state}")?;
        if self.reboot_issued {
            f.write_str(" (rebooting to apply)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(3, true, "Applied 3 item(s), rebooting...")]
    #[case(0, true, "Applied 0 item(s), rebooting...")]
    #[case(2, false, "Applied 2 item(s)")]
    fn test_applied_display(#[case] count: usize, #[case] reboot: bool, #[case] expected: &str) {
        let outcome = Applied {
            count,
            reboot_issued: reboot,
        };
        assert_eq!(outcome.to_string(), expected);
    }

    #[rstest]
    #[case(true, "Cleared, rebooting...")]
    #[case(false, "Cleared")]
    fn test_cleared_display(#[case] reboot: bool, #[case] expected: &str) {
        let outcome = Cleared {
            dropped: 4,
            reboot_issued: reboot,
        };
        assert_eq!(outcome.to_string(), expected);
    }

    #[rstest]
    #[case(true, true, "Allow List: ON (rebooting to apply)")]
    #[case(true, false, "Allow List: ON")]
    #[case(false, false, "Allow List: OFF")]
    fn test_toggled_display(#[case] enabled: bool, #[case] reboot: bool, #[case] expected: &str) {
        let outcome = Toggled {
            enabled,
            reboot_issued: reboot,
        };
        assert_eq!(outcome.to_string(), expected);
    }
}
