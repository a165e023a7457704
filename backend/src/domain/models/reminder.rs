use serde::{Deserialize, Serialize};

use super::habit::HabitError;

/// Daily reminder for a habit; natural key is (owner_id, habit_id),
/// so at most one row exists per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainReminder {
    pub owner_id: i64,
    pub habit_id: i64,
    pub enabled: bool,
    /// Wall-clock "HH:MM", 24-hour
    pub time: String,
}

impl DomainReminder {
    pub fn to_shared(&self) -> shared::ReminderSetting {
        shared::ReminderSetting {
            owner_id: self.owner_id,
            habit_id: self.habit_id,
            enabled: self.enabled,
            time: self.time.clone(),
        }
    }
}

/// Validate a reminder time as 24-hour "HH:MM". Any time of day is legal,
/// including times already past for the current day.
pub fn validate_reminder_time(time: &str) -> Result<(), HabitError> {
    let invalid = || HabitError::Validation(format!("Invalid reminder time '{}', expected HH:MM", time));

    let (hours, minutes) = time.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    Ok(())
}
