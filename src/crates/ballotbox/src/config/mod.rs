//! Configuration module for ballotbox
//!
//! Provides TOML server configuration with environment overrides, and the
//! network guard applied to voter routes.

pub mod server;

pub use server::network::{network_guard_middleware, NetworkGuard};
pub use server::{
    DatabaseConfig, SecurityConfig, ServerConfig, ServerConfigError, ServerInfoConfig,
    VotingConfig,
};
