use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:compass.db";

/// SqliteConnection manages the shared pool and schema setup.
#[derive(Clone)]
pub struct SqliteConnection {
    pool: Arc<SqlitePool>,
}

impl SqliteConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        // Connect to the database
        let pool = SqlitePool::connect(url).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize the standard database
    pub async fn init() -> Result<Self> {
        Self::new(DATABASE_URL).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Habits: one row per askeza; current_day advances by 1 per accepted
        // completion; last_completed_on anchors marker reconciliation
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS habits (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                icon TEXT NOT NULL,
                color TEXT NOT NULL,
                duration INTEGER NOT NULL,
                current_day INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1,
                show_on_home INTEGER NOT NULL DEFAULT 1,
                last_completed_on TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_habits_owner_id
            ON habits(owner_id);
            "#,
        )
        .execute(pool)
        .await?;

        // Reminders: (owner_id, habit_id) is a natural key
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS reminders (
                owner_id INTEGER NOT NULL,
                habit_id INTEGER NOT NULL,
                enabled INTEGER NOT NULL DEFAULT 1,
                time TEXT NOT NULL DEFAULT '12:00',
                PRIMARY KEY (owner_id, habit_id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Completion markers: presence of (habit_id, date) means "completed
        // that day"; keyed by date so completion history needs no migration
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS completion_markers (
                habit_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                PRIMARY KEY (habit_id, date)
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
