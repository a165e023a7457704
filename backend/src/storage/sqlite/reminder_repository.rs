//! SQLite-backed reminder repository.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;

use super::connection::SqliteConnection;
use crate::domain::models::reminder::DomainReminder;
use crate::storage::traits::ReminderStorage;

#[derive(Clone)]
pub struct ReminderRepository {
    connection: SqliteConnection,
}

impl ReminderRepository {
    pub fn new(connection: SqliteConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl ReminderStorage for ReminderRepository {
    async fn upsert_reminder(&self, reminder: &DomainReminder) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO reminders (owner_id, habit_id, enabled, time)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(reminder.owner_id)
        .bind(reminder.habit_id)
        .bind(reminder.enabled as i64)
        .bind(&reminder.time)
        .execute(self.connection.pool())
        .await?;
        Ok(())
    }

    async fn get_reminder(&self, owner_id: i64, habit_id: i64) -> Result<Option<DomainReminder>> {
        let row = sqlx::query(
            "SELECT owner_id, habit_id, enabled, time FROM reminders WHERE owner_id = ? AND habit_id = ?",
        )
        .bind(owner_id)
        .bind(habit_id)
        .fetch_optional(self.connection.pool())
        .await?;

        Ok(row.map(|r| DomainReminder {
            owner_id: r.get("owner_id"),
            habit_id: r.get("habit_id"),
            enabled: r.get::<i64, _>("enabled") != 0,
            time: r.get("time"),
        }))
    }

    async fn delete_reminders(&self, habit_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reminders WHERE habit_id = ?")
            .bind(habit_id)
            .execute(self.connection.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
