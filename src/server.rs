//! HTTP API server.
//!
//! Exposes the store and analyzer over a small JSON/bytes API, the
//! boundary the original gateway and collaborating services consume.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/files?name=` | Store a document (raw body), deduplicated by content |
//! | `GET`  | `/files/{id}` | Fetch a document's exact bytes |
//! | `GET`  | `/files/{id}/metadata` | Fetch a document's record |
//! | `POST` | `/analysis/{file_id}` | Compute (or return cached) statistics |
//! | `GET`  | `/analysis/{file_id}/wordcloud` | Fetch the rendered word-cloud image |
//! | `POST` | `/analysis/compare` | Compare two documents by edit distance |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! All error responses share one JSON shape:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "file 1234 not found" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404),
//! `upstream_unavailable` (503), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support
//! browser-based clients.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use docsim_core::models::{AnalysisRecord, FileRecord, SimilarityRecord};

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::db;
use crate::error::Error;
use crate::sqlite_index::SqliteIndex;
use crate::store::{DocumentSource, FileStore};
use crate::store_client::RemoteStore;
use crate::wordcloud::Generator;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    store: Arc<FileStore<SqliteIndex>>,
    analyzer: Arc<Analyzer<SqliteIndex>>,
}

/// Start the HTTP server on the configured bind address.
///
/// Requires the database schema to exist (`docsim init`). Runs until
/// the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let pool = db::connect(config).await?;
    let index = SqliteIndex::new(pool);

    let store = Arc::new(FileStore::new(index.clone(), &config.storage.root));
    let source: Arc<dyn DocumentSource> = match &config.analyzer.store_url {
        Some(url) => Arc::new(RemoteStore::new(url, config.analyzer.store_timeout_secs)?),
        None => store.clone(),
    };
    let generator = Generator::from_config(&config.wordcloud)?;
    let analyzer = Arc::new(Analyzer::new(
        index,
        source,
        generator,
        &config.storage.root,
    ));

    let state = AppState { store, analyzer };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/files", post(handle_put_file))
        .route("/files/{id}", get(handle_get_file))
        .route("/files/{id}/metadata", get(handle_get_metadata))
        .route("/analysis/compare", post(handle_compare))
        .route("/analysis/{file_id}", post(handle_analyze))
        .route("/analysis/{file_id}/wordcloud", get(handle_get_word_cloud))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    let bind_addr = &config.server.bind;
    println!("docsim server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"not_found"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Error::Validation(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            Error::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "upstream_unavailable"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        AppError {
            status,
            code: code.to_string(),
            message: err.to_string(),
        }
    }
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /files ============

#[derive(Deserialize)]
struct PutParams {
    name: Option<String>,
}

/// Store a document. The raw request body is the document content;
/// an empty body is rejected before anything is written.
async fn handle_put_file(
    State(state): State<AppState>,
    Query(params): Query<PutParams>,
    body: Bytes,
) -> Result<Json<FileRecord>, AppError> {
    if body.is_empty() {
        return Err(Error::Validation("empty upload".to_string()).into());
    }
    let name = params.name.as_deref().unwrap_or("untitled");
    let record = state.store.put(name, &body).await?;
    Ok(Json(record))
}

// ============ GET /files/{id} ============

async fn handle_get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let bytes = state.store.get(&id).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        bytes,
    )
        .into_response())
}

// ============ GET /files/{id}/metadata ============

async fn handle_get_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FileRecord>, AppError> {
    let record = state.store.get_metadata(&id).await?;
    Ok(Json(record))
}

// ============ POST /analysis/{file_id} ============

async fn handle_analyze(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Json<AnalysisRecord>, AppError> {
    let record = state.analyzer.analyze(&file_id).await?;
    Ok(Json(record))
}

// ============ GET /analysis/{file_id}/wordcloud ============

async fn handle_get_word_cloud(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Response, AppError> {
    let bytes = state.analyzer.get_word_cloud(&file_id).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}

// ============ POST /analysis/compare ============

#[derive(Deserialize)]
struct CompareRequest {
    original_file_id: String,
    compared_file_id: String,
}

async fn handle_compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<SimilarityRecord>, AppError> {
    let record = state
        .analyzer
        .compare(&request.original_file_id, &request.compared_file_id)
        .await?;
    Ok(Json(record))
}
