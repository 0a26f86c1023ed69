//! Reusable HTML components for comparison reports

use super::super::ReportMetadata;
use crate::diff::{compute_diff, Emphasis};
use crate::formatter::{self, format_value_cell, html::escape, DELTA_PLACEHOLDER};
use crate::parse::CellValue;
use crate::relative_time::time_ago;
use crate::types::{Comparison, EngagementSection, Metadata, Segments};

/// Marker shown on the comparison side of a reference row with no counterpart
pub const NO_MATCH_MARKER: &str = "NO MATCH";

/// Reusable HTML components for report generation
pub struct HtmlComponents;

impl HtmlComponents {
    /// Render one comparison row: label, reference value, delta, comparison value.
    ///
    /// A delta is shown only when both sides are numeric and differ by more than
    /// the noise threshold.
    pub fn value_row(label_html: &str, reference: &CellValue, comparison: &CellValue) -> String {
        let (reference_emphasis, comparison_emphasis, delta) =
            match (reference.numeric(), comparison.numeric()) {
                (Some(ref_value), Some(cmp_value)) => {
                    let diff = compute_diff(ref_value, cmp_value);
                    let delta = if diff.is_significant() {
                        let percent = reference.has_percent() || comparison.has_percent();
                        Self::delta_cell(
                            &formatter::format_delta(diff.difference, diff.sign, percent),
                            if diff.difference > 0.0 { "delta-positive" } else { "delta-negative" },
                        )
                    } else {
                        Self::placeholder_delta()
                    };
                    (diff.reference_emphasis, diff.comparison_emphasis, delta)
                }
                _ => (Emphasis::Neutral, Emphasis::Neutral, Self::placeholder_delta()),
            };

        format!(
            r#"<tr class="comparison-row"><td class="row-id">{}</td><td class="reference-cell">{}</td>{}<td class="comparison-cell">{}</td></tr>"#,
            label_html,
            format_value_cell(reference, reference_emphasis),
            delta,
            format_value_cell(comparison, comparison_emphasis)
        )
    }

    /// Render a reference row whose counterpart is missing from the comparison table
    pub fn error_row(label_html: &str, reference: &CellValue) -> String {
        format!(
            r#"<tr class="comparison-row error-row"><td class="row-id">{}</td><td class="reference-cell">{}</td>{}<td class="comparison-cell no-match">{}</td></tr>"#,
            label_html,
            format_value_cell(reference, Emphasis::Neutral),
            Self::placeholder_delta(),
            NO_MATCH_MARKER
        )
    }

    /// Table header shared by every comparison table
    pub fn comparison_head(
        first_column: &str,
        reference_label: &str,
        comparison_label: &str,
    ) -> String {
        format!(
            r#"<thead><tr><th>{}</th><th>{}</th><th class="delta-head">Δ</th><th>{}</th></tr></thead>"#,
            escape(first_column),
            escape(reference_label),
            escape(comparison_label)
        )
    }

    /// Engagement rate summary; an absent side reads as zero rates with empty details
    pub fn engagement_section(
        default_title: &str,
        reference: Option<&EngagementSection>,
        comparison: Option<&EngagementSection>,
        labels: (&str, &str),
    ) -> String {
        if reference.is_none() && comparison.is_none() {
            return String::new();
        }

        let title = [reference, comparison]
            .into_iter()
            .flatten()
            .map(|section| section.title.as_str())
            .find(|title| !title.is_empty())
            .unwrap_or(default_title);

        let empty = EngagementSection::default();
        let reference_rates = reference.unwrap_or(&empty).rates();
        let comparison_rates = comparison.unwrap_or(&empty).rates();

        let rows: String = reference_rates
            .iter()
            .zip(comparison_rates.iter())
            .map(|((label, ref_cell), (_, cmp_cell))| {
                Self::value_row(&escape(label), ref_cell, cmp_cell)
            })
            .collect();

        Self::summary_section("engagement-section", title, "Mode", rows, labels)
    }

    /// Segment count summary
    pub fn segments_section(
        reference: &Segments,
        comparison: &Segments,
        labels: (&str, &str),
    ) -> String {
        let counts = [
            ("Total segments", reference.total, comparison.total),
            ("Chill mode segments", reference.chill_mode, comparison.chill_mode),
            (
                "Experimental mode segments",
                reference.experimental_mode,
                comparison.experimental_mode,
            ),
        ];

        let rows: String = counts
            .iter()
            .map(|(label, ref_count, cmp_count)| {
                Self::value_row(
                    &escape(label),
                    &Self::count_cell(*ref_count),
                    &Self::count_cell(*cmp_count),
                )
            })
            .collect();

        Self::summary_section("segments-section", "Segments", "Segments", rows, labels)
    }

    /// Page header: which branches are compared and how fresh the data is
    pub fn report_header(comparison: &Comparison<'_>, metadata: &ReportMetadata) -> String {
        format!(
            r#"
        <header class="report-header">
            <h1>{} <span class="versus">vs</span> {}</h1>
            <div class="branch-sources">{}{}</div>
            {}
        </header>
        "#,
            escape(comparison.reference_name),
            escape(comparison.comparison_name),
            Self::branch_source(comparison.reference_name, &comparison.reference.metadata),
            Self::branch_source(comparison.comparison_name, &comparison.comparison.metadata),
            Self::freshness(metadata)
        )
    }

    /// Header used when no report could be produced
    pub fn failure_header(metadata: &ReportMetadata) -> String {
        format!(
            r#"
        <header class="report-header">
            <h1>Model Report</h1>
            {}
        </header>
        "#,
            Self::freshness(metadata)
        )
    }

    /// The error block replacing the whole report
    pub fn error_message(message: &str) -> String {
        format!(
            r#"<div class="report-error" role="alert"><strong>Failed to load report</strong><p>{}</p></div>"#,
            escape(message)
        )
    }

    /// Notice shown when the reference dataset has no comparable tables
    pub fn no_data() -> String {
        r#"<p class="no-data">No comparable tables in this report.</p>"#.to_string()
    }

    fn freshness(metadata: &ReportMetadata) -> String {
        match &metadata.collected_at {
            Some(collected_at) => format!(
                r#"<div class="timestamp" title="{}">Updated {}</div>"#,
                collected_at.to_rfc3339(),
                time_ago(collected_at, &metadata.generated_at)
            ),
            None => format!(
                r#"<div class="timestamp">Generated {}</div>"#,
                metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        }
    }

    fn branch_source(name: &str, metadata: &Metadata) -> String {
        let label = metadata.branch_name.as_deref().unwrap_or(name);
        match metadata.url.as_deref() {
            Some(url) => format!(
                r#"<a class="branch-link" href="{}">{}</a>"#,
                escape(url),
                escape(label)
            ),
            None => format!(r#"<span class="branch-link">{}</span>"#, escape(label)),
        }
    }

    fn summary_section(
        class: &str,
        title: &str,
        first_column: &str,
        rows: String,
        (reference_label, comparison_label): (&str, &str),
    ) -> String {
        format!(
            r#"
        <section class="summary-section {}">
            <h2>{}</h2>
            <table class="comparison">{}<tbody>{}</tbody></table>
        </section>
        "#,
            class,
            escape(title),
            Self::comparison_head(first_column, reference_label, comparison_label),
            rows
        )
    }

    fn count_cell(count: u64) -> CellValue {
        CellValue::Number {
            value: count as f64,
            text: count.to_string(),
        }
    }

    fn delta_cell(text: &str, class: &str) -> String {
        format!(r#"<td class="delta {}">{}</td>"#, class, escape(text))
    }

    fn placeholder_delta() -> String {
        Self::delta_cell(DELTA_PLACEHOLDER, "delta-unchanged")
    }
}
