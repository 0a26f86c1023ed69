//! HTML renderer for generic metric tables
//!
//! A table pair is rendered as one sub-table per metric column. Reference rows are
//! aligned with comparison rows by the identifier column, so the two tables may
//! differ in row order and row set.

use super::components::HtmlComponents;
use crate::formatter::html::escape;
use crate::matcher::{match_row, RowMatch};
use crate::types::{Row, Table};
use once_cell::sync::Lazy;
use regex::Regex;

/// An identifier ending in a parenthesised qualifier, e.g. `toyota corolla (2020)`
static QUALIFIER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)\s*(\([^()]*\))\s*$").expect("Failed to compile qualifier regex")
});

/// Renders reference/comparison table pairs
pub struct TableRenderer<'a> {
    reference_label: &'a str,
    comparison_label: &'a str,
}

impl<'a> TableRenderer<'a> {
    /// Create a renderer with the column labels for each side
    pub fn new(reference_label: &'a str, comparison_label: &'a str) -> Self {
        Self {
            reference_label,
            comparison_label,
        }
    }

    /// Render every metric of `reference` against `comparison`.
    ///
    /// Returns an empty string when the comparison side has no such table or the
    /// reference table has no metric columns.
    pub fn render_table(&self, key: &str, reference: &Table, comparison: Option<&Table>) -> String {
        let Some(comparison) = comparison else {
            return String::new();
        };
        let Some(id_column) = reference.id_column() else {
            return String::new();
        };

        let title = if reference.title.trim().is_empty() {
            key
        } else {
            reference.title.as_str()
        };

        reference
            .metric_columns()
            .iter()
            .map(|metric| self.render_metric(key, title, id_column, metric, reference, comparison))
            .collect()
    }

    fn render_metric(
        &self,
        key: &str,
        title: &str,
        id_column: &str,
        metric: &str,
        reference: &Table,
        comparison: &Table,
    ) -> String {
        let rows: String = reference
            .rows
            .iter()
            .map(|row| self.render_row(row, &comparison.rows, id_column, metric))
            .collect();

        format!(
            r#"
        <section class="comparison-table" data-table="{}" data-metric="{}">
            <h3 class="table-title">{}</h3>
            <div class="table-metric">{}</div>
            <table class="comparison">{}<tbody>{}</tbody></table>
        </section>
        "#,
            escape(key),
            escape(metric),
            escape(title),
            escape(metric),
            HtmlComponents::comparison_head(id_column, self.reference_label, self.comparison_label),
            rows
        )
    }

    fn render_row(&self, row: &Row, candidates: &[Row], id_column: &str, metric: &str) -> String {
        let label = Self::render_identifier(row.identifier(id_column).as_deref());

        match match_row(row, candidates, id_column) {
            RowMatch::Matched(counterpart) => {
                HtmlComponents::value_row(&label, row.get(metric), counterpart.get(metric))
            }
            RowMatch::Unmatched => HtmlComponents::error_row(&label, row.get(metric)),
        }
    }

    /// Upper-case an identifier, moving a trailing parenthetical qualifier onto a
    /// second, less prominent line.
    pub fn render_identifier(identifier: Option<&str>) -> String {
        let Some(identifier) = identifier else {
            return r#"<span class="row-id-missing">n/a</span>"#.to_string();
        };

        match QUALIFIER_PATTERN.captures(identifier) {
            Some(caps) if !caps[1].is_empty() => format!(
                r#"{}<br><span class="row-id-qualifier">{}</span>"#,
                escape(&caps[1].to_uppercase()),
                escape(&caps[2].to_uppercase())
            ),
            _ => escape(&identifier.to_uppercase()),
        }
    }
}
