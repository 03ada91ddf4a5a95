//! CLI command implementations.
//!
//! Each `run_*` function is the body of one `docsim` subcommand: it
//! opens the services against the configured database and storage
//! root, performs the operation, and prints a plain `key: value`
//! report to stdout.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use docsim_core::models::FileRecord;

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::db;
use crate::error::Error;
use crate::sqlite_index::SqliteIndex;
use crate::store::{DocumentSource, FileStore};
use crate::store_client::RemoteStore;
use crate::wordcloud::Generator;

struct Services {
    store: Arc<FileStore<SqliteIndex>>,
    analyzer: Analyzer<SqliteIndex>,
    pool: SqlitePool,
}

async fn open_services(config: &Config) -> Result<Services> {
    let pool = db::connect(config).await?;
    let index = SqliteIndex::new(pool.clone());

    let store = Arc::new(FileStore::new(index.clone(), &config.storage.root));
    let source: Arc<dyn DocumentSource> = match &config.analyzer.store_url {
        Some(url) => Arc::new(RemoteStore::new(url, config.analyzer.store_timeout_secs)?),
        None => store.clone(),
    };
    let generator = Generator::from_config(&config.wordcloud)?;
    let analyzer = Analyzer::new(index, source, generator, &config.storage.root);

    Ok(Services {
        store,
        analyzer,
        pool,
    })
}

fn format_ts(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn print_file_record(record: &FileRecord) {
    println!("id:         {}", record.id);
    println!("name:       {}", record.name);
    println!("hash:       {}", record.hash);
    println!("location:   {}", record.location);
    println!("created_at: {}", format_ts(record.created_at));
}

/// `docsim put` — store a document from a local file.
pub async fn run_put(config: &Config, path: &Path, name: Option<String>) -> Result<()> {
    let bytes = std::fs::read(path)?;
    if bytes.is_empty() {
        return Err(Error::Validation(format!("{} is empty", path.display())).into());
    }
    let name = name.unwrap_or_else(|| {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string())
    });

    let services = open_services(config).await?;
    let record = services.store.put(&name, &bytes).await?;
    print_file_record(&record);
    services.pool.close().await;
    Ok(())
}

/// `docsim get` — write a stored document's bytes to stdout.
pub async fn run_get(config: &Config, id: &str) -> Result<()> {
    let services = open_services(config).await?;
    let bytes = services.store.get(id).await?;
    services.pool.close().await;
    std::io::stdout().write_all(&bytes)?;
    Ok(())
}

/// `docsim metadata` — print a stored document's record.
pub async fn run_metadata(config: &Config, id: &str) -> Result<()> {
    let services = open_services(config).await?;
    let record = services.store.get_metadata(id).await?;
    print_file_record(&record);
    services.pool.close().await;
    Ok(())
}

/// `docsim analyze` — print a document's structural statistics.
pub async fn run_analyze(config: &Config, id: &str) -> Result<()> {
    let services = open_services(config).await?;
    let record = services.analyzer.analyze(id).await?;

    println!("id:          {}", record.id);
    println!("file_id:     {}", record.file_id);
    println!("paragraphs:  {}", record.paragraph_count);
    println!("words:       {}", record.word_count);
    println!("characters:  {}", record.character_count);
    println!(
        "word_cloud:  {}",
        record.word_cloud_location.as_deref().unwrap_or("(none)")
    );
    println!("analyzed_at: {}", format_ts(record.analyzed_at));

    services.pool.close().await;
    Ok(())
}

/// `docsim wordcloud` — write a document's word-cloud image to a file.
pub async fn run_wordcloud(config: &Config, id: &str, out: &Path) -> Result<()> {
    let services = open_services(config).await?;
    let bytes = services.analyzer.get_word_cloud(id).await?;
    services.pool.close().await;

    std::fs::write(out, &bytes)?;
    println!("wrote {} bytes to {}", bytes.len(), out.display());
    Ok(())
}

/// `docsim compare` — compare two stored documents by edit distance.
pub async fn run_compare(config: &Config, original_id: &str, compared_id: &str) -> Result<()> {
    let services = open_services(config).await?;
    let record = services.analyzer.compare(original_id, compared_id).await?;

    println!("id:          {}", record.id);
    println!("original:    {}", record.original_file_id);
    println!("compared:    {}", record.compared_file_id);
    println!("similarity:  {:.2}%", record.similarity_percentage);
    println!("compared_at: {}", format_ts(record.compared_at));

    services.pool.close().await;
    Ok(())
}
