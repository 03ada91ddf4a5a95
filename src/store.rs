//! Content-addressed file store.
//!
//! [`FileStore`] owns the raw document bytes (one blob file per record
//! under the storage root) and the hash-addressed identity layer: a
//! document's SHA-256 digest is its deduplication key, and re-uploading
//! known content returns the original identifier without writing
//! anything.
//!
//! The duplicate race is resolved by the index, not here: when two
//! concurrent `put` calls carry the same bytes, both may pass the
//! fast-path hash lookup, but only one insert lands. The loser removes
//! its just-written blob and returns the winner's record.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use docsim_core::models::{content_hash, now_secs, FileRecord};
use docsim_core::store::{FileIndex, InsertOutcome};

use crate::error::{Error, Result};

/// The analyzer's view of the store: document bytes by identifier.
///
/// Implemented by [`FileStore`] for same-process deployments and by
/// `RemoteStore` when the analyzer talks to a store service over HTTP.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch a stored document's exact bytes.
    ///
    /// Fails with [`Error::NotFound`] for unknown identifiers and
    /// [`Error::Unavailable`] when the store cannot be reached at all.
    async fn fetch(&self, id: &str) -> Result<Vec<u8>>;
}

/// Durable, deduplicated storage of document bytes.
pub struct FileStore<I> {
    index: I,
    storage_root: PathBuf,
}

impl<I: FileIndex> FileStore<I> {
    pub fn new(index: I, storage_root: impl Into<PathBuf>) -> Self {
        Self {
            index,
            storage_root: storage_root.into(),
        }
    }

    /// Store a document, deduplicating by content.
    ///
    /// First-ever content gets a fresh identifier, a blob file, and a
    /// record; known content returns the existing record untouched, and
    /// the supplied `name` and `bytes` of a duplicate are discarded.
    /// Empty input is legal and dedups like any other content.
    pub async fn put(&self, name: &str, bytes: &[u8]) -> Result<FileRecord> {
        let hash = content_hash(bytes);

        if let Some(existing) = self.index.find_file_by_hash(&hash).await? {
            debug!(id = %existing.id, "duplicate content, returning existing record");
            return Ok(existing);
        }

        fs::create_dir_all(&self.storage_root).await?;
        let id = Uuid::new_v4().to_string();
        let location = self.storage_root.join(format!("{}.txt", id));
        fs::write(&location, bytes).await?;

        let record = FileRecord {
            id,
            name: name.to_string(),
            hash,
            location: location.to_string_lossy().into_owned(),
            created_at: now_secs(),
        };

        match self.index.insert_file(&record).await? {
            InsertOutcome::Inserted => Ok(record),
            InsertOutcome::Conflict(existing) => {
                // Lost the race against a concurrent upload of the same
                // content; drop our blob and hand back the winner.
                let _ = fs::remove_file(&record.location).await;
                debug!(id = %existing.id, "concurrent duplicate upload, returning winner");
                Ok(existing)
            }
        }
    }

    /// Return the exact bytes stored for `id`.
    pub async fn get(&self, id: &str) -> Result<Vec<u8>> {
        let record = self.get_metadata(id).await?;
        Ok(fs::read(Path::new(&record.location)).await?)
    }

    /// Return the record for `id`.
    pub async fn get_metadata(&self, id: &str) -> Result<FileRecord> {
        self.index
            .get_file(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("file {}", id)))
    }
}

#[async_trait]
impl<I: FileIndex> DocumentSource for FileStore<I> {
    async fn fetch(&self, id: &str) -> Result<Vec<u8>> {
        self.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsim_core::store::memory::MemoryIndex;
    use std::sync::Arc;

    fn test_store() -> (FileStore<Arc<MemoryIndex>>, Arc<MemoryIndex>, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let index = Arc::new(MemoryIndex::new());
        let store = FileStore::new(index.clone(), tmp.path().join("blobs"));
        (store, index, tmp)
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let (store, _, _tmp) = test_store();
        let record = store.put("doc.txt", b"Hello world.").await.unwrap();
        let bytes = store.get(&record.id).await.unwrap();
        assert_eq!(bytes, b"Hello world.");
    }

    #[tokio::test]
    async fn test_put_duplicate_content_keeps_first_name() {
        let (store, index, _tmp) = test_store();
        let first = store.put("first.txt", b"same content").await.unwrap();
        let second = store.put("second.txt", b"same content").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "first.txt");
        assert_eq!(index.file_count(), 1);
    }

    #[tokio::test]
    async fn test_put_distinct_content_gets_distinct_ids() {
        let (store, _, _tmp) = test_store();
        let a = store.put("a.txt", b"alpha").await.unwrap();
        let b = store.put("b.txt", b"beta").await.unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.hash, b.hash);
    }

    #[tokio::test]
    async fn test_put_empty_bytes_is_stored() {
        let (store, _, _tmp) = test_store();
        let record = store.put("empty.txt", b"").await.unwrap();
        assert_eq!(store.get(&record.id).await.unwrap(), Vec::<u8>::new());

        // And it dedups like any other content.
        let again = store.put("also-empty.txt", b"").await.unwrap();
        assert_eq!(record.id, again.id);
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let (store, _, _tmp) = test_store();
        match store.get("missing-id").await {
            Err(Error::NotFound(_)) => {}
            other => panic!("expected NotFound, got {:?}", other.map(|b| b.len())),
        }
        match store.get_metadata("missing-id").await {
            Err(Error::NotFound(_)) => {}
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_metadata_carries_hash_and_location() {
        let (store, _, _tmp) = test_store();
        let record = store.put("doc.txt", b"content").await.unwrap();
        let metadata = store.get_metadata(&record.id).await.unwrap();
        assert_eq!(metadata, record);
        assert_eq!(metadata.hash, content_hash(b"content"));
        assert!(metadata.location.ends_with(&format!("{}.txt", record.id)));
    }
}
