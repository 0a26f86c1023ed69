use crate::error::{ReportDiffError, Result};
use crate::types::Document;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default request timeout, matching the collector's page fetch timeout
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

/// Where a report document is read from
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSource {
    Url(Url),
    File(PathBuf),
}

impl DocumentSource {
    /// Classify a location: `http`/`https` URLs are fetched, anything else is a path
    pub fn parse(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
            _ => Self::File(PathBuf::from(location)),
        }
    }
}

/// HTTP client wrapper for fetching report documents and branch pages
#[derive(Debug, Clone)]
pub struct ReportClient {
    client: Client,
}

impl ReportClient {
    /// Create a client with the given request timeout
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self { client })
    }

    /// Load a document from a URL or a local file
    pub async fn load_document(&self, source: &DocumentSource) -> Result<Document> {
        match source {
            DocumentSource::Url(url) => self.fetch_document(url.as_str()).await,
            DocumentSource::File(path) => load_document_file(path),
        }
    }

    /// Fetch and validate a document over HTTP
    pub async fn fetch_document(&self, url: &str) -> Result<Document> {
        let body = self.fetch_text(url).await?;
        Document::from_json(&body)
    }

    /// Fetch a URL as text, treating any non-success status as an error
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportDiffError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Read and validate a document from disk
pub fn load_document_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let content = std::fs::read_to_string(path)?;
    Document::from_json(&content)
}
