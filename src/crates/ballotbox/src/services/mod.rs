//! Voting services
//!
//! Each service owns a clone of the database pool and applies the voting
//! rules on top of the repositories. Handlers talk to services only.

pub mod admin_gate;
pub mod catalog;
pub mod settings;
pub mod submission;
pub mod tally;
pub mod token_store;

pub use admin_gate::{AdminGate, AdminSession};
pub use catalog::{AgendaWithItems, Catalog, Removed};
pub use settings::SettingsStore;
pub use submission::{SubmissionEngine, SubmissionReport};
pub use tally::{AgendaSummary, Dashboard, ItemStatus, ItemTally, TallyReporter};
pub use token_store::{TokenCounts, TokenStatus, TokenStore};
