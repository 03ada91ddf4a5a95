//! HTTP client for a remote docsim store.
//!
//! When the analyzer is deployed apart from the store, it reaches the
//! store's `GET /files/{id}` endpoint through this client. Status
//! mapping keeps the error taxonomy intact across the wire: a 404 is
//! the store's NotFound and passes through as ours, while transport
//! errors, timeouts, and 5xx responses become [`Error::Unavailable`]
//! so callers know a retry may succeed.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::store::DocumentSource;

/// Remote [`DocumentSource`] backed by another docsim server.
pub struct RemoteStore {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteStore {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Other(e.into()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl DocumentSource for RemoteStore {
    async fn fetch(&self, id: &str) -> Result<Vec<u8>> {
        let url = format!("{}/files/{}", self.base_url, id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Unavailable(format!("store at {}: {}", self.base_url, e)))?;

        let status = response.status();
        if status.is_success() {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| Error::Unavailable(format!("store at {}: {}", self.base_url, e)))?;
            return Ok(bytes.to_vec());
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("file {}", id)));
        }
        if status.is_server_error() {
            return Err(Error::Unavailable(format!(
                "store at {} returned {}",
                self.base_url, status
            )));
        }
        Err(Error::Other(anyhow::anyhow!(
            "store at {} returned {}",
            self.base_url,
            status
        )))
    }
}
