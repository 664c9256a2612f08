//! HTTP layer
//!
//! Provides the axum router for the voting server:
//! - Liveness and health checks
//! - Admin login and the admin console (agendas, items, tokens, exports)
//! - Voter ballot and submission behind the network guard

pub mod error;
pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use response::SuccessResponse;
pub use routes::{create_router, AppState};
