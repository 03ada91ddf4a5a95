use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub wordcloud: WordCloudConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding document blobs and rendered word-cloud images.
    pub root: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WordCloudConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            provider: "disabled".to_string(),
            url: None,
            timeout_secs: 10,
        }
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AnalyzerConfig {
    /// Base URL of a remote docsim store. When set, the analyzer fetches
    /// document bytes over HTTP instead of from the local store.
    #[serde(default)]
    pub store_url: Option<String>,
    #[serde(default = "default_store_timeout_secs")]
    pub store_timeout_secs: u64,
}

fn default_store_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

impl WordCloudConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.wordcloud.is_enabled() {
        if config.wordcloud.url.is_none() {
            anyhow::bail!(
                "wordcloud.url must be set when provider is '{}'",
                config.wordcloud.provider
            );
        }
        if config.wordcloud.timeout_secs == 0 {
            anyhow::bail!("wordcloud.timeout_secs must be > 0");
        }
    }

    match config.wordcloud.provider.as_str() {
        "disabled" | "remote" => {}
        other => anyhow::bail!(
            "Unknown wordcloud provider: '{}'. Must be disabled or remote.",
            other
        ),
    }

    if let Some(ref url) = config.analyzer.store_url {
        if url.trim().is_empty() {
            anyhow::bail!("analyzer.store_url must not be empty when set");
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_minimal_config_defaults() {
        let file = write_config(
            r#"
[db]
path = "/tmp/docsim.sqlite"

[storage]
root = "/tmp/blobs"

[server]
bind = "127.0.0.1:7400"
"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.wordcloud.provider, "disabled");
        assert!(!config.wordcloud.is_enabled());
        assert_eq!(config.wordcloud.timeout_secs, 10);
        assert!(config.analyzer.store_url.is_none());
    }

    #[test]
    fn test_remote_wordcloud_requires_url() {
        let file = write_config(
            r#"
[db]
path = "/tmp/docsim.sqlite"

[storage]
root = "/tmp/blobs"

[wordcloud]
provider = "remote"

[server]
bind = "127.0.0.1:7400"
"#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("wordcloud.url"));
    }

    #[test]
    fn test_unknown_wordcloud_provider_rejected() {
        let file = write_config(
            r#"
[db]
path = "/tmp/docsim.sqlite"

[storage]
root = "/tmp/blobs"

[wordcloud]
provider = "imagemagick"
url = "http://localhost:1"

[server]
bind = "127.0.0.1:7400"
"#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unknown wordcloud provider"));
    }
}
