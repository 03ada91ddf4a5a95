//! # docsim
//!
//! A content-addressed document store with text statistics and
//! similarity comparison.
//!
//! Documents are deduplicated by SHA-256 content hash: re-uploading
//! known content returns the original identifier without writing
//! anything. The analyzer computes cached paragraph/word/character
//! statistics per document (with a best-effort word-cloud rendering
//! via an external generator) and compares any two documents by
//! Levenshtein edit distance.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   put/get    ┌───────────────┐
//! │  Store   │─────────────▶│ SQLite + blob │
//! │          │              │   directory   │
//! └────┬─────┘              └───────────────┘
//!      │ DocumentSource
//!      ▼
//! ┌──────────┐   best-effort   ┌────────────────┐
//! │ Analyzer │────────────────▶│ word-cloud API │
//! │          │                 └────────────────┘
//! └────┬─────┘
//!      ▼
//!  CLI (docsim) / HTTP server
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! docsim init                          # create database
//! docsim put report.txt                # store a document
//! docsim analyze <id>                  # paragraph/word/char counts
//! docsim compare <id-a> <id-b>         # similarity percentage
//! docsim serve                         # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Error taxonomy |
//! | [`store`] | Content-addressed file store |
//! | [`store_client`] | HTTP client for a remote store |
//! | [`analysis`] | Statistics, word cloud, similarity |
//! | [`wordcloud`] | External word-cloud generator client |
//! | [`sqlite_index`] | SQLite record index |
//! | [`server`] | HTTP API server |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod analysis;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod migrate;
pub mod server;
pub mod sqlite_index;
pub mod store;
pub mod store_client;
pub mod wordcloud;
