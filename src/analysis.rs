//! Text analyzer: cached statistics, word-cloud retrieval, and
//! pairwise similarity.
//!
//! `analyze` is a strict cache: the first successful computation for a
//! file is the one every later call returns, byte for byte, with no
//! re-fetch and no recomputation. Word-cloud generation is best-effort
//! enrichment: its failure is logged and absorbed, never surfaced as an
//! operation failure, and the analysis record is written once, complete,
//! after the attempt.
//!
//! `compare` is the opposite of a cache: every call recomputes the
//! Levenshtein similarity and appends a new comparison record.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::fs;
use tracing::{debug, warn};

use docsim_core::models::{AnalysisRecord, SimilarityRecord};
use docsim_core::similarity::similarity_percentage;
use docsim_core::stats::text_stats;
use docsim_core::store::{AnalysisIndex, InsertOutcome};

use crate::error::{Error, Result};
use crate::store::DocumentSource;
use crate::wordcloud::Generator;

/// Computes and caches per-document statistics and cross-document
/// similarity, reading documents only through the store's contract.
pub struct Analyzer<I> {
    index: I,
    source: Arc<dyn DocumentSource>,
    generator: Generator,
    storage_root: PathBuf,
}

impl<I: AnalysisIndex> Analyzer<I> {
    pub fn new(
        index: I,
        source: Arc<dyn DocumentSource>,
        generator: Generator,
        storage_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            index,
            source,
            generator,
            storage_root: storage_root.into(),
        }
    }

    /// Compute structural statistics for a stored document.
    ///
    /// Returns the cached record when one exists. Otherwise fetches the
    /// bytes, computes paragraph/word/character counts, attempts the
    /// word-cloud enrichment, and persists the record exactly once. A
    /// concurrent analyzer may win the insert; its record is returned.
    pub async fn analyze(&self, file_id: &str) -> Result<AnalysisRecord> {
        if let Some(existing) = self.index.get_analysis_for_file(file_id).await? {
            debug!(%file_id, "returning cached analysis");
            return Ok(existing);
        }

        let bytes = self.source.fetch(file_id).await?;
        let text = decode_text(file_id, bytes)?;
        let stats = text_stats(&text);
        let word_cloud_location = self.render_word_cloud(file_id, &text).await;

        let record = AnalysisRecord::new(file_id, stats, word_cloud_location);
        match self.index.insert_analysis(&record).await? {
            InsertOutcome::Inserted => Ok(record),
            InsertOutcome::Conflict(existing) => Ok(existing),
        }
    }

    /// Best-effort word-cloud rendering; never fails the analysis.
    async fn render_word_cloud(&self, file_id: &str, text: &str) -> Option<String> {
        if text.is_empty() || !self.generator.is_enabled() {
            return None;
        }
        match self.generator.render(text).await {
            Ok(Some(image)) => {
                let location = self.storage_root.join(format!("wordcloud_{}.png", file_id));
                if let Err(e) = fs::create_dir_all(&self.storage_root).await {
                    warn!(%file_id, error = %e, "could not create storage root for word cloud");
                    return None;
                }
                match fs::write(&location, &image).await {
                    Ok(()) => Some(location.to_string_lossy().into_owned()),
                    Err(e) => {
                        warn!(%file_id, error = %e, "failed to store word cloud image");
                        None
                    }
                }
            }
            Ok(None) => None,
            Err(e) => {
                warn!(%file_id, error = %e, "word cloud generation failed");
                None
            }
        }
    }

    /// Return the stored word-cloud image for a file.
    ///
    /// NotFound covers both cases a caller cannot distinguish: the file
    /// was never analyzed, or generation failed and left no image.
    pub async fn get_word_cloud(&self, file_id: &str) -> Result<Vec<u8>> {
        let record = self
            .index
            .get_analysis_for_file(file_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("analysis for file {}", file_id)))?;
        let location = record
            .word_cloud_location
            .ok_or_else(|| Error::NotFound(format!("word cloud for file {}", file_id)))?;
        Ok(fs::read(&location).await?)
    }

    /// Compare two stored documents by Levenshtein similarity.
    ///
    /// Both documents are fetched fresh; the resulting percentage is a
    /// pure function of their content. Every call appends a new record.
    pub async fn compare(&self, original_id: &str, compared_id: &str) -> Result<SimilarityRecord> {
        let original = decode_text(original_id, self.source.fetch(original_id).await?)?;
        let compared = decode_text(compared_id, self.source.fetch(compared_id).await?)?;

        let percentage = similarity_percentage(&original, &compared);
        let record = SimilarityRecord::new(original_id, compared_id, percentage);
        self.index.insert_comparison(&record).await?;
        Ok(record)
    }
}

fn decode_text(file_id: &str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|_| Error::Validation(format!("file {} is not valid UTF-8 text", file_id)))
}
