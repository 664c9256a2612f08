//! API request handlers
//!
//! Organized by audience: public health, admin login, admin console, voters.

pub mod admin;
pub mod auth;
pub mod health;
pub mod voter;

pub use admin::{
    admin_not_found, cleanup_vote, create_agenda, create_vote, dashboard, delete_agenda, delete_tokens, end_vote,
    export_logs, generate_tokens, item_status, start_vote, update_settings,
};
pub use auth::{login, login_page, logout};
pub use health::{health, index};
pub use voter::{ballot, submit_vote};
