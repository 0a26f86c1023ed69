use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for report-diff operations
pub type Result<T> = std::result::Result<T, ReportDiffError>;

/// Error types for loading, collecting and rendering comparison reports
#[derive(Debug, Error)]
pub enum ReportDiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid report document: {message}")]
    InvalidDocument { message: String },

    #[error("Dataset '{name}' not found in document. Available datasets: {available}")]
    MissingDataset { name: String, available: String },

    #[error("No branch reports could be collected")]
    NothingCollected,
}

impl ReportDiffError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new invalid document error
    pub fn invalid_document<S: Into<String>>(message: S) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }
}
