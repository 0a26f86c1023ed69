//! Comparison report renderers
//!
//! Rendering is decoupled from output: every renderer returns a finished string
//! and leaves writing it anywhere to the caller.

use crate::types::{Comparison, Document};
use chrono::{DateTime, FixedOffset, Utc};

pub mod html;

pub use html::HtmlReportRenderer;

/// Trait for rendering a branch comparison in a specific format
pub trait ReportRenderer {
    /// Render the comparison between two datasets
    fn render_report(&self, comparison: &Comparison<'_>, metadata: &ReportMetadata) -> String;

    /// Render the page shown when the document could not be loaded
    fn render_failure(&self, message: &str, metadata: &ReportMetadata) -> String;
}

/// Metadata for report generation
#[derive(Debug, Clone)]
pub struct ReportMetadata {
    /// When the underlying data was collected, if known
    pub collected_at: Option<DateTime<FixedOffset>>,
    /// When the report is being rendered
    pub generated_at: DateTime<Utc>,
}

impl ReportMetadata {
    /// Create metadata stamped with the current time
    pub fn new() -> Self {
        Self {
            collected_at: None,
            generated_at: Utc::now(),
        }
    }

    /// Metadata for a loaded document
    pub fn for_document(document: &Document) -> Self {
        Self::new().with_collected_at(document.timestamp)
    }

    pub fn with_collected_at(mut self, collected_at: DateTime<FixedOffset>) -> Self {
        self.collected_at = Some(collected_at);
        self
    }

    /// Override the render time
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }
}

impl Default for ReportMetadata {
    fn default() -> Self {
        Self::new()
    }
}
