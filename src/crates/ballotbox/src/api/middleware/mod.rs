//! API middleware layer
//!
//! Request tracing, the admin session guard and form validation helpers.

pub mod auth;
pub mod logging;
pub mod validation;

pub use auth::{require_admin, session_from_jar};
pub use logging::logging_layer;
pub use validation::{parse_count, validate_not_empty, validate_string_length, validate_uuid};
