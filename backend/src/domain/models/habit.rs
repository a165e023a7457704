use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Policy limit on habit duration, matching the client-side picker bound.
pub const MAX_DURATION_DAYS: u32 = 365;

/// Default symbolic icon applied when the client omits one.
pub const DEFAULT_ICON: &str = "star";

/// Default symbolic gradient applied when the client omits one.
pub const DEFAULT_COLOR: &str = "sunset";

/// A habit as the domain layer sees it.
///
/// `current_day` only ever increases, by exactly 1 per accepted completion.
/// `last_completed_on` records the calendar date the store most recently
/// accepted an increment for; it is the anchor for marker reconciliation
/// after a crash between the increment and the marker write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainHabit {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub icon: String,
    pub color: String,
    pub duration: u32,
    pub current_day: u32,
    pub is_active: bool,
    pub show_on_home: bool,
    pub last_completed_on: Option<NaiveDate>,
    pub created_at: String,
    pub updated_at: String,
}

impl DomainHabit {
    pub fn is_finished(&self) -> bool {
        self.current_day >= self.duration
    }

    pub fn progress_percent(&self) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        let percent = self.current_day as f64 / self.duration as f64 * 100.0;
        percent.clamp(0.0, 100.0)
    }

    /// Convert to the API representation, deriving the display fields.
    pub fn to_shared(&self, completed_today: bool) -> shared::Habit {
        shared::Habit {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title.clone(),
            icon: self.icon.clone(),
            color: self.color.clone(),
            duration: self.duration,
            current_day: self.current_day,
            is_active: self.is_active,
            show_on_home: self.show_on_home,
            completed_today,
            is_finished: self.is_finished(),
            progress_percent: self.progress_percent(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }
}

/// Fields for a habit that does not yet have a store-assigned id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHabit {
    pub owner_id: i64,
    pub title: String,
    pub icon: String,
    pub color: String,
    pub duration: u32,
    pub created_at: String,
    pub updated_at: String,
}

/// Why a completion attempt was refused without touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityBlock {
    /// Paused habits cannot be completed
    Inactive,
    /// current_day already equals duration; terminal until deleted
    Finished,
}

impl std::fmt::Display for EligibilityBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EligibilityBlock::Inactive => write!(f, "habit is paused"),
            EligibilityBlock::Finished => write!(f, "habit is already finished"),
        }
    }
}

/// Error taxonomy for habit lifecycle operations.
///
/// `AlreadyCompletedToday` and `NotEligible` are normal outcomes the client
/// renders as alternate control states, not error banners.
#[derive(Debug, thiserror::Error)]
pub enum HabitError {
    #[error("{0}")]
    Validation(String),
    #[error("habit {0} not found")]
    NotFound(i64),
    #[error("habit already completed today")]
    AlreadyCompletedToday,
    #[error("{0}")]
    NotEligible(EligibilityBlock),
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn habit(current_day: u32, duration: u32) -> DomainHabit {
        DomainHabit {
            id: 1,
            owner_id: 42,
            title: "Test habit".to_string(),
            icon: DEFAULT_ICON.to_string(),
            color: DEFAULT_COLOR.to_string(),
            duration,
            current_day,
            is_active: true,
            show_on_home: true,
            last_completed_on: None,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            updated_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn progress_percent_scales_with_current_day() {
        assert_eq!(habit(0, 30).progress_percent(), 0.0);
        assert_eq!(habit(15, 30).progress_percent(), 50.0);
        assert_eq!(habit(30, 30).progress_percent(), 100.0);
    }

    #[test]
    fn progress_percent_is_clamped() {
        // A corrupt row should never render above 100%
        assert_eq!(habit(40, 30).progress_percent(), 100.0);
        assert_eq!(habit(1, 0).progress_percent(), 0.0);
    }

    #[test]
    fn is_finished_only_at_duration() {
        assert!(!habit(29, 30).is_finished());
        assert!(habit(30, 30).is_finished());
    }

    #[test]
    fn to_shared_derives_display_fields() {
        let api = habit(3, 10).to_shared(true);
        assert_eq!(api.current_day, 3);
        assert!(api.completed_today);
        assert!(!api.is_finished);
        assert_eq!(api.progress_percent, 30.0);
    }
}
