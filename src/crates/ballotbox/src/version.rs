// Version information module for ballotbox
//
// Provides version constants reported by the health endpoint and at startup

/// Version string for the ballotbox crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
