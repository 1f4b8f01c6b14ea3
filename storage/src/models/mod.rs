//! Persisted row models.

mod interaction_record;
mod reminder_record;

pub use interaction_record::{InteractionRecord, QaPair};
pub use reminder_record::ReminderRecord;
