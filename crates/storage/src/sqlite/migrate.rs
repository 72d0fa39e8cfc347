use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Applies versioned schema migrations that have not run yet.
///
/// Version 1 creates users, interviews, feedback and their indexes.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS users (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        // `id` is nullable: legacy rows without an id are kept and filtered out
        // when the dashboard is built.
        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS interviews (
                    row_id INTEGER PRIMARY KEY,
                    id TEXT UNIQUE,
                    owner_id TEXT NOT NULL,
                    role TEXT NOT NULL,
                    interview_type TEXT NOT NULL,
                    techstack TEXT NOT NULL,
                    company TEXT,
                    finalized INTEGER NOT NULL CHECK (finalized IN (0, 1)),
                    created_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS feedback (
                    id INTEGER PRIMARY KEY,
                    interview_id TEXT NOT NULL,
                    user_id TEXT NOT NULL,
                    total_score INTEGER NOT NULL CHECK (total_score BETWEEN 0 AND 100),
                    created_at TEXT NOT NULL,
                    UNIQUE (interview_id, user_id)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_interviews_owner_created
                    ON interviews (owner_id, created_at);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_interviews_finalized_created
                    ON interviews (finalized, created_at);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(version = 1, "applied sqlite migration");
    }

    Ok(())
}
