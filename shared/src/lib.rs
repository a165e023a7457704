use serde::{Deserialize, Serialize};

/// A habit ("askeza") as rendered by the mini-app client.
///
/// Progress fields (`completed_today`, `is_finished`, `progress_percent`)
/// are derived by the backend at read time and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Store-assigned identifier; clients never invent ids
    pub id: i64,
    /// Telegram account id of the owner
    pub owner_id: i64,
    pub title: String,
    /// Symbolic icon name, opaque to the backend
    pub icon: String,
    /// Symbolic two-color gradient name, opaque to the backend
    pub color: String,
    /// Total days to complete
    pub duration: u32,
    /// Days completed so far (0..=duration)
    pub current_day: u32,
    /// Paused habits cannot be completed
    pub is_active: bool,
    /// Display-only flag for the home screen
    pub show_on_home: bool,
    /// True iff a completion marker exists for today
    pub completed_today: bool,
    /// True iff current_day == duration
    pub is_finished: bool,
    /// current_day / duration * 100, clamped to [0, 100]
    pub progress_percent: f64,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    /// RFC 3339 timestamp of the last mutation
    pub updated_at: String,
}

/// Optional daily reminder for a habit; at most one per (owner, habit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderSetting {
    pub owner_id: i64,
    pub habit_id: i64,
    pub enabled: bool,
    /// Wall-clock time in 24-hour "HH:MM" format
    pub time: String,
}

/// Reminder fields supplied at habit creation or via the reminder endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetReminderRequest {
    pub enabled: bool,
    /// Wall-clock time in 24-hour "HH:MM" format
    pub time: String,
}

impl Default for SetReminderRequest {
    fn default() -> Self {
        Self {
            enabled: true,
            time: "12:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateHabitRequest {
    pub owner_id: i64,
    pub title: String,
    /// Symbolic icon name; backend default applies when omitted
    pub icon: Option<String>,
    /// Symbolic gradient name; backend default applies when omitted
    pub color: Option<String>,
    /// Total days to complete (1..=365)
    pub duration: u32,
    /// Optional reminder persisted together with the new habit
    pub reminder: Option<SetReminderRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteHabitRequest {
    /// Client-local calendar date ("YYYY-MM-DD"); the server's local date
    /// is used when omitted
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitListResponse {
    pub habits: Vec<Habit>,
}

/// Time-of-day bucket driving the background art selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    Morning,
    Day,
    Evening,
    Night,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPeriodResponse {
    pub period: DayPeriod,
    /// Local hour the bucket was computed from (0..=23)
    pub hour: u32,
}

/// Machine-readable error body returned by the REST layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error code ("validation", "not_found", "already_completed_today",
    /// "not_eligible", "persistence")
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
        }
    }
}
