//! Report Diff - branch-vs-master comparison reports for model telemetry
//!
//! This crate loads a collected report document holding one analysis report per
//! branch, aligns the reference ("master") dataset with a variant dataset, and
//! renders the differences as a self-contained HTML page. It also contains the
//! collector that builds such documents from each branch's published report page.

// Core modules
pub mod config;
pub mod error;
pub mod types;

// Comparison engine
pub mod diff;
pub mod formatter;
pub mod matcher;
pub mod parse;
pub mod relative_time;
pub mod renderers;

// Input and collection
pub mod client;
pub mod collector;

// Re-export main types for convenience
pub use client::{load_document_file, DocumentSource, ReportClient};
pub use collector::{parse_branch_page, Collector};
pub use config::{ConfigLoader, ReportConfig};
pub use diff::{compute_diff, DiffResult, Emphasis};
pub use error::{ReportDiffError, Result};
pub use matcher::{match_row, RowMatch};
pub use parse::{parse_value, CellValue};
pub use renderers::{HtmlReportRenderer, ReportMetadata, ReportRenderer};
pub use types::{Comparison, Document, Report, Row, Table};

/// Load a document and render the comparison page.
///
/// Any load or selection failure is rendered as the error page instead, so the
/// returned page is always displayable; the error is handed back alongside it.
pub async fn render_comparison(
    client: &ReportClient,
    source: &DocumentSource,
    reference: &str,
    comparison: Option<&str>,
) -> (String, Option<ReportDiffError>) {
    let renderer = HtmlReportRenderer::new();

    let document = match client.load_document(source).await {
        Ok(document) => document,
        Err(err) => {
            let page = renderer.render_failure(&err.to_string(), &ReportMetadata::new());
            return (page, Some(err));
        }
    };

    let metadata = ReportMetadata::for_document(&document);
    match document.select(reference, comparison) {
        Ok(selected) => (renderer.render_report(&selected, &metadata), None),
        Err(err) => (renderer.render_failure(&err.to_string(), &metadata), Some(err)),
    }
}
