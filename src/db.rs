use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::info;

/// Connects to the database and brings the schema up to date.
///
/// Foreign keys are switched on explicitly so the attendance cascade
/// is enforced by the engine. Writers queue on the database lock for up
/// to `busy_timeout` before giving up.
pub async fn init_db(
    database_url: &str,
    max_connections: u32,
    busy_timeout: Duration,
) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL: {}", database_url))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    migrate(&pool).await?;
    info!(max_connections, "Database ready");

    Ok(pool)
}

/// Idempotent; safe to run on every startup.
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")
}

/// Fresh in-memory database with the schema applied.
///
/// A single connection that never expires, since every new in-memory
/// connection would see an empty database.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    migrate(&pool).await.unwrap();
    pool
}

/// File-backed database shared by several connections, removed on drop.
#[cfg(test)]
pub struct FileDb {
    pub pool: SqlitePool,
    path: std::path::PathBuf,
}

#[cfg(test)]
impl FileDb {
    pub async fn new(max_connections: u32) -> Self {
        let path = std::env::temp_dir().join(format!("hrms-test-{}.db", uuid::Uuid::new_v4()));
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let pool = init_db(&url, max_connections, Duration::from_secs(5)).await.unwrap();
        Self { pool, path }
    }
}

#[cfg(test)]
impl Drop for FileDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", self.path.display(), suffix));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn migrations_are_idempotent() {
        let pool = test_pool().await;
        migrate(&pool).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('employees', 'attendance') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(tables, vec!["attendance".to_string(), "employees".to_string()]);
    }

    #[actix_web::test]
    async fn foreign_keys_are_enforced() {
        let pool = test_pool().await;

        let result = sqlx::query(
            "INSERT INTO attendance (id, employee_id, date, status, created_at) VALUES ('a', 'ghost', '2024-01-01', 'Present', '2024-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await;

        assert!(result.is_err());
    }

    #[actix_web::test]
    async fn file_database_runs_in_wal_mode() {
        let db = FileDb::new(2).await;

        let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(mode, "wal");

        migrate(&db.pool).await.unwrap();
    }
}
