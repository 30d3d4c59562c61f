//! Error types for device gateway operations.
//!
//! Every failure reported by a terminal's allow-list API funnels into
//! [`DeviceError`]. Callers above the gateway never interpret the cause;
//! they only propagate it.

/// Result type alias for device operations.
pub type Result<T> = std::result::Result<T, DeviceError>;

/// Errors that can occur while talking to the terminal.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// Device is not connected or the driver handle is gone.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Operation timed out after specified duration.
    #[error("Operation timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Argument rejected before reaching the device.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The device refused the request.
    #[error("{operation} rejected by device: {message}")]
    Rejected { operation: String, message: String },

    /// Device communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Persisted device state could not be read back.
    #[error("Device state corrupted: {message}")]
    StateCorrupted { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl DeviceError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a new rejected error.
    pub fn rejected(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new state corrupted error.
    pub fn state_corrupted(message: impl Into<String>) -> Self {
        Self::StateCorrupted {
            message: message.into(),
        }
    }

    /// Create a generic error with custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_error() {
        let error = DeviceError::disconnected("PosManager");
        assert!(matches!(error, DeviceError::Disconnected { .. }));
        assert_eq!(error.to_string(), "Device disconnected: PosManager");
    }

    #[test]
    fn test_timeout_error() {
        let error = DeviceError::timeout(3000);
        assert!(matches!(error, DeviceError::Timeout { .. }));
        assert_eq!(error.to_string(), "Operation timeout after 3000ms");
    }

    #[test]
    fn test_invalid_argument_error() {
        let error = DeviceError::invalid_argument("vendorIds is null or empty");
        assert!(matches!(error, DeviceError::InvalidArgument { .. }));
        assert_eq!(
            error.to_string(),
            "Invalid argument: vendorIds is null or empty"
        );
    }

    #[test]
    fn test_rejected_error() {
        let error = DeviceError::rejected("setVidAllowList", "permission denied");
        assert_eq!(
            error.to_string(),
            "setVidAllowList rejected by device: permission denied"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "state.json");
        let error: DeviceError = io.into();
        assert!(matches!(error, DeviceError::Io(_)));
    }

    #[test]
    fn test_error_display() {
        let errors = vec![
            DeviceError::disconnected("Device1"),
            DeviceError::timeout(1000),
            DeviceError::communication("binder died"),
            DeviceError::state_corrupted("bad json"),
            DeviceError::other("boom"),
        ];

        for error in errors {
            let _ = format!("{}", error);
            let _ = format!("{:?}", error);
        }
    }
}
