//! # docsim CLI
//!
//! The `docsim` binary is the primary interface for the document
//! store and analyzer. It provides commands for database
//! initialization, document storage and retrieval, statistics,
//! word-cloud export, pairwise comparison, and starting the HTTP
//! server.
//!
//! ## Usage
//!
//! ```bash
//! docsim --config ./config/docsim.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docsim init` | Create the SQLite database and run schema migrations |
//! | `docsim put <path>` | Store a document, deduplicated by content |
//! | `docsim get <id>` | Write a document's bytes to stdout |
//! | `docsim metadata <id>` | Print a document's record |
//! | `docsim analyze <id>` | Compute (or return cached) statistics |
//! | `docsim wordcloud <id> --out <path>` | Export the word-cloud image |
//! | `docsim compare <a> <b>` | Similarity percentage between two documents |
//! | `docsim serve` | Start the HTTP API server |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use docsim::{commands, config, migrate, server};

/// docsim — a content-addressed document store with text statistics
/// and similarity comparison.
///
/// All commands accept a `--config` flag pointing to a TOML
/// configuration file. See `config/docsim.example.toml` for a full
/// example.
#[derive(Parser)]
#[command(
    name = "docsim",
    about = "docsim — content-addressed document store with text statistics and similarity comparison",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/docsim.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and all required tables
    /// (files, analyses, comparisons). Idempotent; running it
    /// multiple times is safe.
    Init,

    /// Store a document from a local file.
    ///
    /// Content is deduplicated by SHA-256 hash: storing known content
    /// returns the original identifier and writes nothing.
    Put {
        /// Path to the document to store.
        path: PathBuf,

        /// Display name recorded with the document (defaults to the
        /// file name). Ignored when the content is already stored.
        #[arg(long)]
        name: Option<String>,
    },

    /// Write a stored document's exact bytes to stdout.
    Get {
        /// Document identifier.
        id: String,
    },

    /// Print a stored document's record (name, hash, location).
    Metadata {
        /// Document identifier.
        id: String,
    },

    /// Compute structural statistics for a stored document.
    ///
    /// The first call computes and caches paragraph/word/character
    /// counts and attempts a word-cloud rendering; later calls return
    /// the cached record unchanged.
    Analyze {
        /// Document identifier.
        id: String,
    },

    /// Export a document's word-cloud image.
    ///
    /// Fails with "not found" when the document was never analyzed or
    /// the rendering did not succeed.
    Wordcloud {
        /// Document identifier.
        id: String,

        /// Output path for the image bytes.
        #[arg(long)]
        out: PathBuf,
    },

    /// Compare two stored documents by Levenshtein edit distance.
    ///
    /// Every invocation recomputes the similarity and appends a new
    /// comparison record.
    Compare {
        /// The original document's identifier.
        original_id: String,

        /// The compared document's identifier.
        compared_id: String,
    },

    /// Start the HTTP API server.
    ///
    /// Binds to the address configured in `[server].bind` and serves
    /// the store and analyzer endpoints.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("DOCSIM_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Put { path, name } => {
            commands::run_put(&cfg, &path, name).await?;
        }
        Commands::Get { id } => {
            commands::run_get(&cfg, &id).await?;
        }
        Commands::Metadata { id } => {
            commands::run_metadata(&cfg, &id).await?;
        }
        Commands::Analyze { id } => {
            commands::run_analyze(&cfg, &id).await?;
        }
        Commands::Wordcloud { id, out } => {
            commands::run_wordcloud(&cfg, &id, &out).await?;
        }
        Commands::Compare {
            original_id,
            compared_id,
        } => {
            commands::run_compare(&cfg, &original_id, &compared_id).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
