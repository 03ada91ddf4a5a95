//! In-memory index implementation for testing.
//!
//! Uses `HashMap` and `Vec` behind `std::sync::RwLock` for thread
//! safety. Mirrors the conflict semantics of the SQLite backend: the
//! first record to claim a content hash or a file id wins, later
//! inserts observe the stored record.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{AnalysisRecord, FileRecord, SimilarityRecord};

use super::{AnalysisIndex, FileIndex, InsertOutcome};

/// In-memory record index for tests.
#[derive(Default)]
pub struct MemoryIndex {
    files: RwLock<HashMap<String, FileRecord>>,
    analyses: RwLock<HashMap<String, AnalysisRecord>>,
    comparisons: RwLock<Vec<SimilarityRecord>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored comparisons, oldest first.
    pub fn comparisons(&self) -> Vec<SimilarityRecord> {
        self.comparisons.read().unwrap().clone()
    }

    /// Number of stored file records.
    pub fn file_count(&self) -> usize {
        self.files.read().unwrap().len()
    }
}

#[async_trait]
impl FileIndex for MemoryIndex {
    async fn insert_file(&self, record: &FileRecord) -> Result<InsertOutcome<FileRecord>> {
        let mut files = self.files.write().unwrap();
        if let Some(existing) = files.values().find(|f| f.hash == record.hash) {
            return Ok(InsertOutcome::Conflict(existing.clone()));
        }
        files.insert(record.id.clone(), record.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn get_file(&self, id: &str) -> Result<Option<FileRecord>> {
        Ok(self.files.read().unwrap().get(id).cloned())
    }

    async fn find_file_by_hash(&self, hash: &str) -> Result<Option<FileRecord>> {
        let files = self.files.read().unwrap();
        Ok(files.values().find(|f| f.hash == hash).cloned())
    }
}

#[async_trait]
impl AnalysisIndex for MemoryIndex {
    async fn insert_analysis(
        &self,
        record: &AnalysisRecord,
    ) -> Result<InsertOutcome<AnalysisRecord>> {
        let mut analyses = self.analyses.write().unwrap();
        if let Some(existing) = analyses.get(&record.file_id) {
            return Ok(InsertOutcome::Conflict(existing.clone()));
        }
        analyses.insert(record.file_id.clone(), record.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn get_analysis_for_file(&self, file_id: &str) -> Result<Option<AnalysisRecord>> {
        Ok(self.analyses.read().unwrap().get(file_id).cloned())
    }

    async fn insert_comparison(&self, record: &SimilarityRecord) -> Result<()> {
        self.comparisons.write().unwrap().push(record.clone());
        Ok(())
    }
}
