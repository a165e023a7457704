//! SQLite-backed completion marker repository.
//!
//! Markers live in the same durable store as habits rather than in
//! device-local storage, so every session of the same user sees the
//! same "completed today" answer.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use super::connection::SqliteConnection;
use crate::storage::traits::MarkerStorage;

#[derive(Clone)]
pub struct MarkerRepository {
    connection: SqliteConnection,
}

impl MarkerRepository {
    pub fn new(connection: SqliteConnection) -> Self {
        Self { connection }
    }

    fn date_key(date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }
}

#[async_trait]
impl MarkerStorage for MarkerRepository {
    async fn has_marker(&self, habit_id: i64, date: NaiveDate) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM completion_markers WHERE habit_id = ? AND date = ?")
            .bind(habit_id)
            .bind(Self::date_key(date))
            .fetch_optional(self.connection.pool())
            .await?;
        Ok(row.is_some())
    }

    async fn insert_marker(&self, habit_id: i64, date: NaiveDate) -> Result<()> {
        // Idempotent: a second write for the same (habit, date) is a no-op
        sqlx::query("INSERT OR IGNORE INTO completion_markers (habit_id, date) VALUES (?, ?)")
            .bind(habit_id)
            .bind(Self::date_key(date))
            .execute(self.connection.pool())
            .await?;
        Ok(())
    }

    async fn clear_markers(&self, habit_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM completion_markers WHERE habit_id = ?")
            .bind(habit_id)
            .execute(self.connection.pool())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> MarkerRepository {
        let connection = SqliteConnection::init_test()
            .await
            .expect("Failed to create test database");
        MarkerRepository::new(connection)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_check_marker() {
        let repo = setup_test().await;
        let d = date("2024-01-01");

        assert!(!repo.has_marker(5, d).await.unwrap());
        repo.insert_marker(5, d).await.expect("Failed to insert marker");
        assert!(repo.has_marker(5, d).await.unwrap());

        // Different date, different key
        assert!(!repo.has_marker(5, date("2024-01-02")).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_marker_twice_is_noop() {
        let repo = setup_test().await;
        let d = date("2024-01-01");

        repo.insert_marker(5, d).await.unwrap();
        repo.insert_marker(5, d)
            .await
            .expect("Second insert for the same key should not fail");
        assert!(repo.has_marker(5, d).await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_markers_removes_all_dates() {
        let repo = setup_test().await;
        repo.insert_marker(5, date("2024-01-01")).await.unwrap();
        repo.insert_marker(5, date("2024-01-02")).await.unwrap();
        repo.insert_marker(6, date("2024-01-01")).await.unwrap();

        repo.clear_markers(5).await.expect("Failed to clear markers");

        assert!(!repo.has_marker(5, date("2024-01-01")).await.unwrap());
        assert!(!repo.has_marker(5, date("2024-01-02")).await.unwrap());
        // Other habits are untouched
        assert!(repo.has_marker(6, date("2024-01-01")).await.unwrap());
    }
}
