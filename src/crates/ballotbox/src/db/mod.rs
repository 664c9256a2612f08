//! Database module
//!
//! SQLite connectivity, row models, repositories and error handling for the
//! voting store.

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;

pub use connection::{DatabaseConnection, DatabasePool};
pub use error::{DatabaseError, DbResult};
