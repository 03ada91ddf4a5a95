use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply_schema(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Create all tables and indexes. Idempotent.
///
/// The two UNIQUE columns, `files.hash` and `analyses.file_id`, are
/// the schema-level invariants the services race through: concurrent
/// inserts of the same content or the same analysis resolve at this
/// layer, not in application code.
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS files (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            hash TEXT NOT NULL UNIQUE,
            location TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS analyses (
            id TEXT PRIMARY KEY,
            file_id TEXT NOT NULL UNIQUE,
            paragraph_count INTEGER NOT NULL,
            word_count INTEGER NOT NULL,
            character_count INTEGER NOT NULL,
            word_cloud_location TEXT,
            analyzed_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comparisons (
            id TEXT PRIMARY KEY,
            original_file_id TEXT NOT NULL,
            compared_file_id TEXT NOT NULL,
            similarity_percentage REAL NOT NULL,
            compared_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_comparisons_original ON comparisons(original_file_id)")
        .execute(pool)
        .await?;

    Ok(())
}
