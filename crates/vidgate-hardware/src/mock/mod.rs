//! Mock device implementations for testing and development.
//!
//! This module provides simulated devices that can be controlled
//! programmatically without requiring a physical terminal.

pub mod gateway;
pub mod notifier;

// Re-export commonly used types
pub use gateway::{GatewayCall, GatewayOp, MockGateway, MockGatewayHandle};
pub use notifier::{MockDisallowedHandle, MockDisallowedSource};
