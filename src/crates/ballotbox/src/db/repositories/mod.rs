//! Repository pattern implementations for database access
//!
//! One stateless repository per table. Functions that take a generic
//! `SqliteExecutor` can run against the pool or inside a transaction.

pub mod agenda_repo;
pub mod setting_repo;
pub mod token_repo;
pub mod vote_item_repo;
pub mod vote_record_repo;

pub use agenda_repo::AgendaRepository;
pub use setting_repo::SettingRepository;
pub use token_repo::TokenRepository;
pub use vote_item_repo::VoteItemRepository;
pub use vote_record_repo::VoteRecordRepository;
