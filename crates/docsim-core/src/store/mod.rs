//! Record index abstraction for docsim.
//!
//! The two traits here define the persisted-record operations each
//! subsystem needs, enabling pluggable backends (SQLite in the
//! application crate, [`memory::MemoryIndex`] for tests).
//!
//! Both uniqueness invariants of the data model (one [`FileRecord`]
//! per content hash, one [`AnalysisRecord`] per file) are enforced by
//! the index itself: the insert operations are conflict-tolerant and
//! report the surviving record instead of failing, so concurrent
//! callers on different processes race safely through the backing
//! store's constraints rather than through application-level locks.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.
//! A miss is `Ok(None)`; `Err` is reserved for backend faults.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{AnalysisRecord, FileRecord, SimilarityRecord};

/// Outcome of a conflict-tolerant insert.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome<T> {
    /// The record was inserted and is now the stored one.
    Inserted,
    /// A record with the same uniqueness key already existed; the
    /// stored record is returned unchanged.
    Conflict(T),
}

/// Index over [`FileRecord`]s, keyed by id with a unique content hash.
#[async_trait]
pub trait FileIndex: Send + Sync {
    /// Insert `record` unless a record with the same content hash
    /// already exists, in which case the existing record wins.
    async fn insert_file(&self, record: &FileRecord) -> Result<InsertOutcome<FileRecord>>;

    /// Fetch a file record by id.
    async fn get_file(&self, id: &str) -> Result<Option<FileRecord>>;

    /// Fetch a file record by content hash.
    async fn find_file_by_hash(&self, hash: &str) -> Result<Option<FileRecord>>;
}

#[async_trait]
impl<T: FileIndex + ?Sized> FileIndex for std::sync::Arc<T> {
    async fn insert_file(&self, record: &FileRecord) -> Result<InsertOutcome<FileRecord>> {
        (**self).insert_file(record).await
    }

    async fn get_file(&self, id: &str) -> Result<Option<FileRecord>> {
        (**self).get_file(id).await
    }

    async fn find_file_by_hash(&self, hash: &str) -> Result<Option<FileRecord>> {
        (**self).find_file_by_hash(hash).await
    }
}

/// Index over the analyzer's records: cached analyses and append-only
/// comparisons.
#[async_trait]
pub trait AnalysisIndex: Send + Sync {
    /// Insert `record` unless an analysis for the same file already
    /// exists; the first successful analysis wins.
    async fn insert_analysis(&self, record: &AnalysisRecord)
        -> Result<InsertOutcome<AnalysisRecord>>;

    /// Fetch the cached analysis for a file, if one exists.
    async fn get_analysis_for_file(&self, file_id: &str) -> Result<Option<AnalysisRecord>>;

    /// Append a comparison record. Comparisons are never deduplicated.
    async fn insert_comparison(&self, record: &SimilarityRecord) -> Result<()>;
}

#[async_trait]
impl<T: AnalysisIndex + ?Sized> AnalysisIndex for std::sync::Arc<T> {
    async fn insert_analysis(
        &self,
        record: &AnalysisRecord,
    ) -> Result<InsertOutcome<AnalysisRecord>> {
        (**self).insert_analysis(record).await
    }

    async fn get_analysis_for_file(&self, file_id: &str) -> Result<Option<AnalysisRecord>> {
        (**self).get_analysis_for_file(file_id).await
    }

    async fn insert_comparison(&self, record: &SimilarityRecord) -> Result<()> {
        (**self).insert_comparison(record).await
    }
}
