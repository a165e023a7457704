//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer. The
//! lifecycle manager depends on these interfaces only; there is no runtime
//! probing of the backing store.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::models::habit::{DomainHabit, NewHabit};
use crate::domain::models::reminder::DomainReminder;

/// Trait defining the interface for habit storage operations.
///
/// Id generation is the store's responsibility: `create_habit` returns the
/// assigned id and callers never invent their own.
#[async_trait]
pub trait HabitStorage: Send + Sync {
    /// Store a new habit and return its assigned id
    async fn create_habit(&self, habit: &NewHabit) -> Result<i64>;

    /// Retrieve a specific habit by id
    async fn get_habit(&self, habit_id: i64) -> Result<Option<DomainHabit>>;

    /// List all habits for an owner in creation order (id ascending)
    async fn list_habits(&self, owner_id: i64) -> Result<Vec<DomainHabit>>;

    /// Advance the streak counter. `completed_on` records the calendar date
    /// the store accepted the increment for; it anchors marker reconciliation.
    async fn update_current_day(
        &self,
        habit_id: i64,
        current_day: u32,
        completed_on: NaiveDate,
        updated_at: &str,
    ) -> Result<()>;

    /// Set the active flag
    async fn set_active(&self, habit_id: i64, is_active: bool, updated_at: &str) -> Result<()>;

    /// Set the home-screen visibility flag
    async fn set_show_on_home(&self, habit_id: i64, show_on_home: bool, updated_at: &str) -> Result<()>;

    /// Delete a habit by id
    /// Returns true if the habit was found and deleted, false otherwise
    async fn delete_habit(&self, habit_id: i64) -> Result<bool>;
}

/// Trait defining the interface for reminder storage operations.
#[async_trait]
pub trait ReminderStorage: Send + Sync {
    /// Insert or replace the reminder for (owner, habit); the pair is a
    /// natural key so at most one row exists
    async fn upsert_reminder(&self, reminder: &DomainReminder) -> Result<()>;

    /// Retrieve the reminder for (owner, habit), if any
    async fn get_reminder(&self, owner_id: i64, habit_id: i64) -> Result<Option<DomainReminder>>;

    /// Delete all reminders for a habit
    /// Returns true if a row was deleted, false otherwise
    async fn delete_reminders(&self, habit_id: i64) -> Result<bool>;
}

/// Trait defining the interface for completion marker storage.
///
/// A marker's presence alone means "completed on that day"; markers are
/// written once, never updated, and removed only when their habit is deleted.
#[async_trait]
pub trait MarkerStorage: Send + Sync {
    /// Check whether a marker exists for (habit, date)
    async fn has_marker(&self, habit_id: i64, date: NaiveDate) -> Result<bool>;

    /// Write the marker for (habit, date); a second write for the same key
    /// is a no-op
    async fn insert_marker(&self, habit_id: i64, date: NaiveDate) -> Result<()>;

    /// Remove all markers for a habit (delete path)
    async fn clear_markers(&self, habit_id: i64) -> Result<()>;
}
