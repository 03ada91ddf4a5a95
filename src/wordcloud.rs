//! Word-cloud rendering via an external generator.
//!
//! The generator is a fallible, non-authoritative dependency: the
//! analyzer treats any failure here (transport error, non-success
//! status, timeout) as "no word cloud", never as a failed analysis.
//! Errors therefore stay `anyhow` and are consumed by the caller.
//!
//! Two providers, selected by `[wordcloud].provider`:
//! - **`disabled`** (default) — no generation is attempted.
//! - **`remote`** — `POST` the document text as JSON to the configured
//!   URL and take the response body as the rendered image bytes. The
//!   request is bounded by `timeout_secs`.

use anyhow::{bail, Result};
use std::time::Duration;

use crate::config::WordCloudConfig;

/// Word-cloud generator backend.
pub enum Generator {
    Disabled,
    Remote { url: String, client: reqwest::Client },
}

impl Generator {
    /// Instantiate the generator described by the configuration.
    pub fn from_config(config: &WordCloudConfig) -> Result<Self> {
        match config.provider.as_str() {
            "disabled" => Ok(Self::Disabled),
            "remote" => {
                let url = config
                    .url
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("wordcloud.url required for remote provider"))?;
                let client = reqwest::Client::builder()
                    .timeout(Duration::from_secs(config.timeout_secs))
                    .build()?;
                Ok(Self::Remote { url, client })
            }
            other => bail!(
                "Unknown wordcloud provider: '{}'. Must be disabled or remote.",
                other
            ),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Render a word-cloud image for `text`.
    ///
    /// Returns `Ok(None)` when generation is disabled, `Ok(Some(bytes))`
    /// with the raw image on success, and an error on any generator
    /// failure.
    pub async fn render(&self, text: &str) -> Result<Option<Vec<u8>>> {
        match self {
            Self::Disabled => Ok(None),
            Self::Remote { url, client } => {
                let body = serde_json::json!({ "text": text });
                let response = client.post(url).json(&body).send().await?;
                let status = response.status();
                if !status.is_success() {
                    let body_text = response.text().await.unwrap_or_default();
                    bail!("word cloud generator returned {}: {}", status, body_text);
                }
                Ok(Some(response.bytes().await?.to_vec()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_is_default_provider() {
        let generator = Generator::from_config(&WordCloudConfig::default()).unwrap();
        assert!(!generator.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_renders_nothing() {
        let generator = Generator::from_config(&WordCloudConfig::default()).unwrap();
        let result = generator.render("some text").await.unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_remote_requires_url() {
        let config = WordCloudConfig {
            provider: "remote".to_string(),
            url: None,
            timeout_secs: 5,
        };
        assert!(Generator::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_generator_is_an_error_not_a_panic() {
        let config = WordCloudConfig {
            provider: "remote".to_string(),
            // Nothing listens here; the connection is refused immediately.
            url: Some("http://127.0.0.1:1/wordcloud".to_string()),
            timeout_secs: 2,
        };
        let generator = Generator::from_config(&config).unwrap();
        assert!(generator.render("some text").await.is_err());
    }
}
