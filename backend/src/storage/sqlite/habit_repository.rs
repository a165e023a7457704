//! SQLite-backed habit repository.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{sqlite::SqliteRow, Row};

use super::connection::SqliteConnection;
use crate::domain::models::habit::{DomainHabit, NewHabit};
use crate::storage::traits::HabitStorage;

#[derive(Clone)]
pub struct HabitRepository {
    connection: SqliteConnection,
}

impl HabitRepository {
    pub fn new(connection: SqliteConnection) -> Self {
        Self { connection }
    }

    fn row_to_habit(row: &SqliteRow) -> Result<DomainHabit> {
        let last_completed_on: Option<String> = row.get("last_completed_on");
        let last_completed_on = last_completed_on
            .map(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d"))
            .transpose()
            .map_err(|e| anyhow::anyhow!("Invalid last_completed_on date: {}", e))?;

        Ok(DomainHabit {
            id: row.get("id"),
            owner_id: row.get("owner_id"),
            title: row.get("title"),
            icon: row.get("icon"),
            color: row.get("color"),
            duration: row.get::<i64, _>("duration") as u32,
            current_day: row.get::<i64, _>("current_day") as u32,
            is_active: row.get::<i64, _>("is_active") != 0,
            show_on_home: row.get::<i64, _>("show_on_home") != 0,
            last_completed_on,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl HabitStorage for HabitRepository {
    async fn create_habit(&self, habit: &NewHabit) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO habits (owner_id, title, icon, color, duration,
                                current_day, is_active, show_on_home,
                                created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 0, 1, 1, ?, ?)
            "#,
        )
        .bind(habit.owner_id)
        .bind(&habit.title)
        .bind(&habit.icon)
        .bind(&habit.color)
        .bind(habit.duration as i64)
        .bind(&habit.created_at)
        .bind(&habit.updated_at)
        .execute(self.connection.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn get_habit(&self, habit_id: i64) -> Result<Option<DomainHabit>> {
        let row = sqlx::query("SELECT * FROM habits WHERE id = ?")
            .bind(habit_id)
            .fetch_optional(self.connection.pool())
            .await?;

        match row {
            Some(r) => Ok(Some(Self::row_to_habit(&r)?)),
            None => Ok(None),
        }
    }

    async fn list_habits(&self, owner_id: i64) -> Result<Vec<DomainHabit>> {
        let rows = sqlx::query("SELECT * FROM habits WHERE owner_id = ? ORDER BY id ASC")
            .bind(owner_id)
            .fetch_all(self.connection.pool())
            .await?;

        rows.iter().map(Self::row_to_habit).collect()
    }

    async fn update_current_day(
        &self,
        habit_id: i64,
        current_day: u32,
        completed_on: NaiveDate,
        updated_at: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE habits
            SET current_day = ?, last_completed_on = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(current_day as i64)
        .bind(completed_on.format("%Y-%m-%d").to_string())
        .bind(updated_at)
        .bind(habit_id)
        .execute(self.connection.pool())
        .await?;
        Ok(())
    }

    async fn set_active(&self, habit_id: i64, is_active: bool, updated_at: &str) -> Result<()> {
        sqlx::query("UPDATE habits SET is_active = ?, updated_at = ? WHERE id = ?")
            .bind(is_active as i64)
            .bind(updated_at)
            .bind(habit_id)
            .execute(self.connection.pool())
            .await?;
        Ok(())
    }

    async fn set_show_on_home(&self, habit_id: i64, show_on_home: bool, updated_at: &str) -> Result<()> {
        sqlx::query("UPDATE habits SET show_on_home = ?, updated_at = ? WHERE id = ?")
            .bind(show_on_home as i64)
            .bind(updated_at)
            .bind(habit_id)
            .execute(self.connection.pool())
            .await?;
        Ok(())
    }

    async fn delete_habit(&self, habit_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM habits WHERE id = ?")
            .bind(habit_id)
            .execute(self.connection.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
