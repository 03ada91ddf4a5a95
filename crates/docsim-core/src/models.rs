//! Core record models for docsim.
//!
//! These types represent the persisted records of the two subsystems:
//! the file store owns [`FileRecord`]; the analyzer owns
//! [`AnalysisRecord`] and [`SimilarityRecord`] and never mutates file
//! records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::stats::TextStats;

/// Metadata for a stored document.
///
/// The content hash is the record's deduplication key: content equality
/// implies identifier equality, enforced by a unique constraint in the
/// backing index. The display name is whatever the first uploader
/// supplied and plays no part in identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Record UUID, assigned at creation and never reused.
    pub id: String,
    /// Display name supplied by the caller on first upload.
    pub name: String,
    /// Lowercase hex SHA-256 digest of the raw bytes.
    pub hash: String,
    /// Location of the durably stored bytes (blob file path).
    pub location: String,
    pub created_at: DateTime<Utc>,
}

/// Cached structural statistics for one stored document.
///
/// At most one analysis exists per file; the first successful
/// computation wins and is returned unchanged forever after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    /// The analyzed file's identifier (unique across analyses).
    pub file_id: String,
    pub paragraph_count: i64,
    pub word_count: i64,
    pub character_count: i64,
    /// Location of the rendered word-cloud image, when generation succeeded.
    pub word_cloud_location: Option<String>,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Build a fresh analysis record with a new id and the current time.
    pub fn new(file_id: &str, stats: TextStats, word_cloud_location: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            file_id: file_id.to_string(),
            paragraph_count: stats.paragraphs,
            word_count: stats.words,
            character_count: stats.characters,
            word_cloud_location,
            analyzed_at: now_secs(),
        }
    }
}

/// One pairwise comparison between two stored documents.
///
/// Comparisons are append-only: every request produces a new record,
/// in call order, with no deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityRecord {
    pub id: String,
    pub original_file_id: String,
    pub compared_file_id: String,
    /// Normalized inverse edit distance, in `[0, 100]`.
    pub similarity_percentage: f64,
    pub compared_at: DateTime<Utc>,
}

impl SimilarityRecord {
    /// Build a fresh comparison record, preserving the caller's argument
    /// order in the original/compared fields.
    pub fn new(original_file_id: &str, compared_file_id: &str, percentage: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            original_file_id: original_file_id.to_string(),
            compared_file_id: compared_file_id.to_string(),
            similarity_percentage: percentage,
            compared_at: now_secs(),
        }
    }
}

/// Compute the lowercase hex SHA-256 digest of a document's raw bytes.
///
/// This digest is the store's deduplication key; it is deterministic and
/// collision probability is treated as negligible. Empty input hashes
/// like any other content.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Current time truncated to whole seconds.
///
/// Record timestamps round-trip through second-precision storage, so
/// they are created at that precision to keep the first returned record
/// identical to every cached re-read.
pub fn now_secs() -> DateTime<Utc> {
    DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap_or_default()
}
