//! Command types for habit lifecycle operations.
//!
//! Commands carry caller intent into the service layer; defaults for
//! optional display attributes are applied by the service, not here.

/// Reminder fields supplied alongside habit creation or a reminder upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderSpec {
    pub enabled: bool,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateHabitCommand {
    pub owner_id: i64,
    pub title: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub duration: u32,
    pub reminder: Option<ReminderSpec>,
}
