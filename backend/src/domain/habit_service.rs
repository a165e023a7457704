//! Habit ("askeza") lifecycle service.
//!
//! This module contains the core business logic for habit-streak management:
//! creating a habit, advancing its streak exactly once per calendar day,
//! pausing/resuming it, reminder upserts, and deletion with dependent
//! cleanup.
//!
//! ## Business Rules
//!
//! - Title must be non-empty after trimming; duration is 1..=365 days
//! - A habit advances by exactly 1 per accepted completion and never past
//!   its duration; finished habits are terminal until deleted
//! - Paused habits cannot be completed
//! - Every precondition is checked before any mutating storage call, and the
//!   completion marker is written only after the store confirms the
//!   increment, so a marker can only exist for a durably persisted day
//! - No automatic retry: storage failures surface to the caller and leave
//!   both the store and the guard unchanged

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::commands::habit::CreateHabitCommand;
use crate::domain::completion_guard::CompletionGuard;
use crate::domain::models::habit::{
    DomainHabit, EligibilityBlock, HabitError, NewHabit, DEFAULT_COLOR, DEFAULT_ICON,
    MAX_DURATION_DAYS,
};
use crate::domain::models::reminder::{validate_reminder_time, DomainReminder};
use crate::storage::traits::{HabitStorage, ReminderStorage};

/// Service for managing the habit lifecycle and its once-per-day guarantee.
#[derive(Clone)]
pub struct HabitService {
    habits: Arc<dyn HabitStorage>,
    reminders: Arc<dyn ReminderStorage>,
    guard: CompletionGuard,
    // Serializes the check-then-act sequence per habit; the REST deployment
    // is not UI-gated, so two concurrent callers must not both pass the check
    locks: Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl HabitService {
    pub fn new(
        habits: Arc<dyn HabitStorage>,
        reminders: Arc<dyn ReminderStorage>,
        guard: CompletionGuard,
    ) -> Self {
        Self {
            habits,
            reminders,
            guard,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Today in the server's local wall clock, calendar-date granularity.
    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    async fn lock_for(&self, habit_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(habit_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn require_habit(&self, habit_id: i64) -> Result<DomainHabit, HabitError> {
        self.habits
            .get_habit(habit_id)
            .await?
            .ok_or(HabitError::NotFound(habit_id))
    }

    /// Create a new habit.
    ///
    /// All validation happens before any storage call; the habit only exists
    /// for the caller once the store has confirmed the assigned id.
    pub async fn create_habit(&self, command: CreateHabitCommand) -> Result<shared::Habit, HabitError> {
        info!("Creating habit for owner {}: {:?}", command.owner_id, command.title);

        let title = command.title.trim().to_string();
        if title.is_empty() {
            return Err(HabitError::Validation("Habit title cannot be empty".to_string()));
        }
        if command.duration == 0 || command.duration > MAX_DURATION_DAYS {
            return Err(HabitError::Validation(format!(
                "Habit duration must be between 1 and {} days",
                MAX_DURATION_DAYS
            )));
        }
        if let Some(ref reminder) = command.reminder {
            validate_reminder_time(&reminder.time)?;
        }

        let now = Utc::now().to_rfc3339();
        let new_habit = NewHabit {
            owner_id: command.owner_id,
            title,
            icon: command.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            color: command.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            duration: command.duration,
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        let id = self.habits.create_habit(&new_habit).await?;

        if let Some(reminder) = command.reminder {
            self.reminders
                .upsert_reminder(&DomainReminder {
                    owner_id: command.owner_id,
                    habit_id: id,
                    enabled: reminder.enabled,
                    time: reminder.time,
                })
                .await?;
        }

        info!("Created habit {} for owner {}", id, command.owner_id);

        let habit = DomainHabit {
            id,
            owner_id: new_habit.owner_id,
            title: new_habit.title,
            icon: new_habit.icon,
            color: new_habit.color,
            duration: new_habit.duration,
            current_day: 0,
            is_active: true,
            show_on_home: true,
            last_completed_on: None,
            created_at: now.clone(),
            updated_at: now,
        };
        Ok(habit.to_shared(false))
    }

    /// Advance a habit's streak for the given calendar day, at most once.
    ///
    /// Check order: guard marker first (fail fast on the common "already
    /// done" path), then existence, then eligibility. The marker is written
    /// only after the store confirms the increment, so a crash between the
    /// two leaves a retryable state that `reconcile` repairs.
    pub async fn complete_habit(&self, habit_id: i64, today: NaiveDate) -> Result<shared::Habit, HabitError> {
        info!("Completing habit {} for {}", habit_id, today);

        let lock = self.lock_for(habit_id).await;
        let _serialized = lock.lock().await;

        if self.guard.has_completed_on(habit_id, today).await? {
            return Err(HabitError::AlreadyCompletedToday);
        }

        let habit = self.require_habit(habit_id).await?;

        // Crash-window repair: the store already holds today's increment but
        // the marker never landed. Backfill it instead of incrementing again.
        if habit.last_completed_on == Some(today) {
            warn!("Habit {} already incremented on {} without a marker, backfilling", habit_id, today);
            self.guard.mark_completed(habit_id, today).await?;
            return Err(HabitError::AlreadyCompletedToday);
        }

        if !habit.is_active {
            return Err(HabitError::NotEligible(EligibilityBlock::Inactive));
        }
        if habit.is_finished() {
            return Err(HabitError::NotEligible(EligibilityBlock::Finished));
        }

        let new_day = habit.current_day + 1;
        let updated_at = Utc::now().to_rfc3339();
        self.habits
            .update_current_day(habit_id, new_day, today, &updated_at)
            .await?;

        // Only after the store confirmed the increment
        self.guard.mark_completed(habit_id, today).await?;

        info!("Habit {} advanced to day {}/{}", habit_id, new_day, habit.duration);

        let updated = DomainHabit {
            current_day: new_day,
            last_completed_on: Some(today),
            updated_at,
            ..habit
        };
        Ok(updated.to_shared(true))
    }

    /// Flip the active flag. Paused habits stay listed but cannot be
    /// completed until resumed.
    pub async fn toggle_active(&self, habit_id: i64, today: NaiveDate) -> Result<shared::Habit, HabitError> {
        info!("Toggling active flag for habit {}", habit_id);

        let mut habit = self.require_habit(habit_id).await?;
        let updated_at = Utc::now().to_rfc3339();
        self.habits
            .set_active(habit_id, !habit.is_active, &updated_at)
            .await?;

        habit.is_active = !habit.is_active;
        habit.updated_at = updated_at;
        let completed_today = self.guard.has_completed_on(habit_id, today).await?;
        Ok(habit.to_shared(completed_today))
    }

    /// Flip the home-screen visibility flag. Display-only.
    pub async fn toggle_show_on_home(&self, habit_id: i64, today: NaiveDate) -> Result<shared::Habit, HabitError> {
        info!("Toggling home visibility for habit {}", habit_id);

        let mut habit = self.require_habit(habit_id).await?;
        let updated_at = Utc::now().to_rfc3339();
        self.habits
            .set_show_on_home(habit_id, !habit.show_on_home, &updated_at)
            .await?;

        habit.show_on_home = !habit.show_on_home;
        habit.updated_at = updated_at;
        let completed_today = self.guard.has_completed_on(habit_id, today).await?;
        Ok(habit.to_shared(completed_today))
    }

    /// Delete a habit together with its completion markers and reminder.
    /// Safe to call when the habit or any dependent record is already gone.
    pub async fn delete_habit(&self, habit_id: i64) -> Result<(), HabitError> {
        info!("Deleting habit {}", habit_id);

        self.habits.delete_habit(habit_id).await?;
        self.guard.clear(habit_id).await?;
        self.reminders.delete_reminders(habit_id).await?;

        let mut locks = self.locks.lock().await;
        locks.remove(&habit_id);
        Ok(())
    }

    /// Upsert the reminder for a habit. Any time of day is legal.
    pub async fn set_reminder(
        &self,
        habit_id: i64,
        enabled: bool,
        time: String,
    ) -> Result<shared::ReminderSetting, HabitError> {
        info!("Setting reminder for habit {}: enabled={}, time={}", habit_id, enabled, time);

        validate_reminder_time(&time)?;
        let habit = self.require_habit(habit_id).await?;

        let reminder = DomainReminder {
            owner_id: habit.owner_id,
            habit_id,
            enabled,
            time,
        };
        self.reminders.upsert_reminder(&reminder).await?;
        Ok(reminder.to_shared())
    }

    /// List an owner's habits in creation order, with derived display
    /// fields computed against `today`. Runs marker reconciliation first so
    /// a crash in the completion window never re-blocks the user.
    pub async fn list_habits(&self, owner_id: i64, today: NaiveDate) -> Result<Vec<shared::Habit>, HabitError> {
        info!("Listing habits for owner {}", owner_id);

        self.reconcile(owner_id).await?;

        let habits = self.habits.list_habits(owner_id).await?;
        let mut result = Vec::with_capacity(habits.len());
        for habit in habits {
            let completed_today = self.guard.has_completed_on(habit.id, today).await?;
            result.push(habit.to_shared(completed_today));
        }
        Ok(result)
    }

    /// Backfill markers for increments the store confirmed but whose marker
    /// write never happened (crash window). The marker is dated to the day
    /// the store says the increment landed, so the user is not re-blocked
    /// and a second real increment that day stays impossible.
    pub async fn reconcile(&self, owner_id: i64) -> Result<u32, HabitError> {
        let mut backfilled = 0;
        for habit in self.habits.list_habits(owner_id).await? {
            if let Some(date) = habit.last_completed_on {
                if !self.guard.has_completed_on(habit.id, date).await? {
                    warn!("Backfilling completion marker for habit {} on {}", habit.id, date);
                    self.guard.mark_completed(habit.id, date).await?;
                    backfilled += 1;
                }
            }
        }
        Ok(backfilled)
    }
}
