//! SQLite-backed record index.
//!
//! Implements [`FileIndex`] and [`AnalysisIndex`] over a [`SqlitePool`],
//! translating each operation into SQL against the schema created by
//! `migrate`. Conflict-tolerant inserts use `ON CONFLICT ... DO
//! NOTHING` plus a re-read, so the uniqueness invariants hold across
//! concurrent callers and across processes.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use docsim_core::models::{AnalysisRecord, FileRecord, SimilarityRecord};
use docsim_core::store::{AnalysisIndex, FileIndex, InsertOutcome};

/// SQLite implementation of the record index traits.
#[derive(Clone)]
pub struct SqliteIndex {
    pool: SqlitePool,
}

impl SqliteIndex {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn ts_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_default()
}

fn row_to_file(row: &SqliteRow) -> FileRecord {
    let created_at: i64 = row.get("created_at");
    FileRecord {
        id: row.get("id"),
        name: row.get("name"),
        hash: row.get("hash"),
        location: row.get("location"),
        created_at: ts_to_datetime(created_at),
    }
}

fn row_to_analysis(row: &SqliteRow) -> AnalysisRecord {
    let analyzed_at: i64 = row.get("analyzed_at");
    AnalysisRecord {
        id: row.get("id"),
        file_id: row.get("file_id"),
        paragraph_count: row.get("paragraph_count"),
        word_count: row.get("word_count"),
        character_count: row.get("character_count"),
        word_cloud_location: row.get("word_cloud_location"),
        analyzed_at: ts_to_datetime(analyzed_at),
    }
}

#[async_trait]
impl FileIndex for SqliteIndex {
    async fn insert_file(&self, record: &FileRecord) -> Result<InsertOutcome<FileRecord>> {
        let result = sqlx::query(
            r#"
            INSERT INTO files (id, name, hash, location, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(hash) DO NOTHING
            "#,
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.hash)
        .bind(&record.location)
        .bind(record.created_at.timestamp())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(InsertOutcome::Inserted);
        }

        // Another caller claimed this hash first; surface their record.
        let existing = self
            .find_file_by_hash(&record.hash)
            .await?
            .ok_or_else(|| anyhow::anyhow!("hash conflict but no stored record for it"))?;
        Ok(InsertOutcome::Conflict(existing))
    }

    async fn get_file(&self, id: &str) -> Result<Option<FileRecord>> {
        let row =
            sqlx::query("SELECT id, name, hash, location, created_at FROM files WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.as_ref().map(row_to_file))
    }

    async fn find_file_by_hash(&self, hash: &str) -> Result<Option<FileRecord>> {
        let row =
            sqlx::query("SELECT id, name, hash, location, created_at FROM files WHERE hash = ?")
                .bind(hash)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.as_ref().map(row_to_file))
    }
}

#[async_trait]
impl AnalysisIndex for SqliteIndex {
    async fn insert_analysis(
        &self,
        record: &AnalysisRecord,
    ) -> Result<InsertOutcome<AnalysisRecord>> {
        let result = sqlx::query(
            r#"
            INSERT INTO analyses (id, file_id, paragraph_count, word_count,
                                  character_count, word_cloud_location, analyzed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(file_id) DO NOTHING
            "#,
        )
        .bind(&record.id)
        .bind(&record.file_id)
        .bind(record.paragraph_count)
        .bind(record.word_count)
        .bind(record.character_count)
        .bind(&record.word_cloud_location)
        .bind(record.analyzed_at.timestamp())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(InsertOutcome::Inserted);
        }

        let existing = self
            .get_analysis_for_file(&record.file_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("file_id conflict but no stored analysis for it"))?;
        Ok(InsertOutcome::Conflict(existing))
    }

    async fn get_analysis_for_file(&self, file_id: &str) -> Result<Option<AnalysisRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, file_id, paragraph_count, word_count, character_count,
                   word_cloud_location, analyzed_at
            FROM analyses WHERE file_id = ?
            "#,
        )
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(row_to_analysis))
    }

    async fn insert_comparison(&self, record: &SimilarityRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO comparisons (id, original_file_id, compared_file_id,
                                     similarity_percentage, compared_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.original_file_id)
        .bind(&record.compared_file_id)
        .bind(record.similarity_percentage)
        .bind(record.compared_at.timestamp())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
