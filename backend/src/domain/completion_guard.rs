//! Daily completion guard.
//!
//! Answers "has habit H already been completed on calendar day D?" and
//! records "H was completed on D". The marker is a separate entity from
//! `current_day` on the habit: the counter alone cannot say whether today's
//! increment was already applied once a crash-and-retry or a second session
//! enters the picture. Keying by (habit, date) also gives completion history
//! for free.
//!
//! "Today" is calendar-date granularity in the caller's local clock, not a
//! rolling 24-hour window: completing at 23:59 and again at 00:01 are two
//! different days and both succeed.

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

use crate::storage::traits::MarkerStorage;

#[derive(Clone)]
pub struct CompletionGuard {
    markers: Arc<dyn MarkerStorage>,
}

impl CompletionGuard {
    pub fn new(markers: Arc<dyn MarkerStorage>) -> Self {
        Self { markers }
    }

    /// Pure read, no side effect.
    pub async fn has_completed_on(&self, habit_id: i64, date: NaiveDate) -> Result<bool> {
        self.markers.has_marker(habit_id, date).await
    }

    /// Record a completion. Calling this twice for the same key is a no-op
    /// the second time.
    pub async fn mark_completed(&self, habit_id: i64, date: NaiveDate) -> Result<()> {
        info!("Marking habit {} completed on {}", habit_id, date);
        self.markers.insert_marker(habit_id, date).await
    }

    /// Remove all markers for a habit (delete path).
    pub async fn clear(&self, habit_id: i64) -> Result<()> {
        self.markers.clear_markers(habit_id).await
    }
}
