//! HTML report renderer for branch comparison reports

use super::{ReportMetadata, ReportRenderer};
use crate::types::Comparison;

mod components;
mod table_renderer;
mod templates;

pub use components::{HtmlComponents, NO_MATCH_MARKER};
pub use table_renderer::TableRenderer;
pub use templates::HtmlTemplate;

/// Title used for the time-based engagement section when the data carries none
const ENGAGEMENT_TIME_TITLE: &str = "Engagement Rate Analysis (time)";
/// Title used for the distance-based engagement section when the data carries none
const ENGAGEMENT_DISTANCE_TITLE: &str = "Engagement Rate Analysis (distance)";

/// HTML report renderer producing a self-contained page
pub struct HtmlReportRenderer {
    /// Whether to embed the stylesheet in the page
    pub include_styles: bool,
}

impl HtmlReportRenderer {
    /// Create a new HTML report renderer with embedded styles
    pub fn new() -> Self {
        Self {
            include_styles: true,
        }
    }

    /// Create an HTML renderer without embedded styles
    pub fn without_styles() -> Self {
        Self {
            include_styles: false,
        }
    }

    /// Assemble the report body for a comparison.
    ///
    /// Engagement by time and by distance come first, then segment counts, then
    /// every table of the reference dataset in document order.
    pub fn render_fragment(&self, comparison: &Comparison<'_>) -> String {
        let labels = (comparison.reference_name, comparison.comparison_name);
        let reference = comparison.reference;
        let other = comparison.comparison;

        let mut html = String::new();
        html.push_str(&HtmlComponents::engagement_section(
            ENGAGEMENT_TIME_TITLE,
            reference.sections.engagement_time.as_ref(),
            other.sections.engagement_time.as_ref(),
            labels,
        ));
        html.push_str(&HtmlComponents::engagement_section(
            ENGAGEMENT_DISTANCE_TITLE,
            reference.sections.engagement_distance.as_ref(),
            other.sections.engagement_distance.as_ref(),
            labels,
        ));
        html.push_str(&HtmlComponents::segments_section(
            &reference.segments,
            &other.segments,
            labels,
        ));

        let table_renderer =
            TableRenderer::new(comparison.reference_name, comparison.comparison_name);
        let tables: String = reference
            .tables
            .iter()
            .map(|(key, table)| table_renderer.render_table(key, table, other.tables.get(key)))
            .collect();

        html.push_str(r#"<div class="tables">"#);
        if tables.is_empty() {
            html.push_str(&HtmlComponents::no_data());
        } else {
            html.push_str(&tables);
        }
        html.push_str("</div>");

        html
    }
}

impl Default for HtmlReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for HtmlReportRenderer {
    fn render_report(&self, comparison: &Comparison<'_>, metadata: &ReportMetadata) -> String {
        let title = format!("{} vs {}", comparison.reference_name, comparison.comparison_name);
        HtmlTemplate::new(self.include_styles).render(
            &title,
            &HtmlComponents::report_header(comparison, metadata),
            &self.render_fragment(comparison),
        )
    }

    fn render_failure(&self, message: &str, metadata: &ReportMetadata) -> String {
        HtmlTemplate::new(self.include_styles).render(
            "Model Report",
            &HtmlComponents::failure_header(metadata),
            &HtmlComponents::error_message(message),
        )
    }
}
