//! User-facing texts and per-category system roles.

use chrono::{DateTime, Local, Utc};

use crate::core::Category;

pub const MSG_CHOOSE_CATEGORY: &str = "Choose a category:";
pub const MSG_SELECT_CATEGORY_FIRST: &str = "Please select a category first:";
pub const MSG_DIARY_PROMPT: &str = "Enter a task in the format:\n\nTask | 2024-12-30 15:00";
pub const MSG_MODEL_FAILED: &str =
    "Sorry, I could not get an answer right now. Please try again later.";
pub const MSG_TASK_NOT_SAVED: &str = "Could not save the task. Please try again later.";
pub const MSG_UNKNOWN_MENU_ITEM: &str = "Unknown menu item.";
/// Cause shown when the reminder time cannot be represented.
pub const MSG_TIME_OUT_OF_RANGE: &str = "the date is out of range";

/// Display format for reminder times.
pub const REMINDER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn category_entry_text(category: Category) -> &'static str {
    match category {
        Category::Programming => {
            "Category: Programming. Ask your questions and I will try to help!"
        }
        Category::Database => "Category: Database. How can I help?",
        Category::Chat => "Category: Chat. What would you like to talk about?",
    }
}

/// System role sent with every question in the category.
pub fn system_role(category: Category) -> &'static str {
    match category {
        Category::Programming => {
            "You are an experienced software engineer. Answer programming questions with \
             concise explanations and code examples where useful."
        }
        Category::Database => {
            "You are a database expert. Help with schema design, SQL queries, indexing and \
             troubleshooting."
        }
        Category::Chat => "You are a friendly conversation partner. Keep answers short and natural.",
    }
}

pub fn format_task_added(task_text: &str, target_time: DateTime<Utc>) -> String {
    format!(
        "Task added: {}\nReminder at: {}",
        task_text,
        target_time.with_timezone(&Local).format(REMINDER_TIME_FORMAT)
    )
}

pub fn format_reminder(task_text: &str) -> String {
    format!("Reminder: {}", task_text)
}

pub fn format_task_parse_error(cause: &dyn std::fmt::Display) -> String {
    format!(
        "Could not add the task: {}\nUse the format: Task | 2024-12-30 15:00",
        cause
    )
}

pub fn format_schedule_error(cause: &dyn std::fmt::Display) -> String {
    format!("Could not schedule the reminder: {}", cause)
}
