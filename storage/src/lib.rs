//! Storage crate: interaction history, persisted reminders and schema migrations.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – InteractionRecord, QaPair, ReminderRecord
//! - [`repository`] – HistoryStore trait
//! - [`interaction_repo`] – InteractionRepository (SQLite)
//! - [`reminder_repo`] – ReminderRepository (SQLite)
//! - [`migrations`] – versioned schema steps
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod interaction_repo;
pub mod migrations;
mod models;
mod reminder_repo;
mod repository;
mod sqlite_pool;

pub use error::StorageError;
pub use interaction_repo::InteractionRepository;
pub use models::{InteractionRecord, QaPair, ReminderRecord};
pub use reminder_repo::ReminderRepository;
pub use repository::HistoryStore;
pub use sqlite_pool::SqlitePoolManager;
