// Table acquisition: the async seam between remote or local sources and the
// synchronous parsing pipeline.
//
// A load suspends only while fetching bytes. There is no retry, no cache,
// and no cancellation: a fetch either completes or fails once.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// TableFetcher
// ---------------------------------------------------------------------------

/// Provider of raw table bytes. Implementations decide what a source string
/// means (URL, relative path, in-memory key for tests).
#[async_trait]
pub trait TableFetcher: Send + Sync {
    async fn fetch_bytes(&self, source: &str) -> Result<Vec<u8>, FetchError>;
}

// ---------------------------------------------------------------------------
// HTTP fetcher
// ---------------------------------------------------------------------------

/// Fetches tables over HTTP with a shared reqwest client. Non-2xx statuses
/// are errors; timeouts are whatever reqwest defaults to.
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TableFetcher for HttpFetcher {
    async fn fetch_bytes(&self, source: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .http
            .get(source)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::Http {
                url: source.to_string(),
                source: e,
            })?;
        let bytes = response.bytes().await.map_err(|e| FetchError::Http {
            url: source.to_string(),
            source: e,
        })?;
        Ok(bytes.to_vec())
    }
}

// ---------------------------------------------------------------------------
// File fetcher
// ---------------------------------------------------------------------------

/// Reads tables from disk, resolving sources relative to a base directory.
pub struct FileFetcher {
    base: PathBuf,
}

impl FileFetcher {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

#[async_trait]
impl TableFetcher for FileFetcher {
    async fn fetch_bytes(&self, source: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.base.join(source);
        tokio::fs::read(&path).await.map_err(|e| FetchError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
