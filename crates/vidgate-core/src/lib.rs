pub mod constants;
pub mod error;
pub mod store;
pub mod vid;

pub use error::{Error, Result};
pub use store::{AddResult, AllowListStore, RemoveResult, VidEntry};
pub use vid::{CanonicalKey, Vid, canonical_key};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
