//! Value formatting for report cells
//!
//! Every function here is total: malformed input is rendered as best-effort
//! plain text instead of failing.

use crate::diff::Emphasis;
use crate::parse::CellValue;

/// Text shown in place of a delta when there is no meaningful change
pub const DELTA_PLACEHOLDER: &str = "—";

/// Decimal places kept when displaying deltas
pub const DELTA_DECIMALS: usize = 4;

/// Number formatting utilities
pub mod number {
    use once_cell::sync::Lazy;
    use regex::{Captures, Regex};

    static NUMBER_RUN_PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(\d+)(\.\d+)?").expect("Failed to compile number run regex")
    });

    /// Insert thousands separators into every integer run of `text`.
    ///
    /// Fractional digits and all non-numeric text are left untouched, so
    /// `"1234.5678 miles"` becomes `"1,234.5678 miles"`.
    pub fn format_numbers(text: &str) -> String {
        NUMBER_RUN_PATTERN
            .replace_all(text, |caps: &Captures| {
                let fraction = caps.get(2).map_or("", |m| m.as_str());
                format!("{}{}", group_thousands(&caps[1]), fraction)
            })
            .into_owned()
    }

    /// Group an all-digit string in threes from the right
    pub fn group_thousands(digits: &str) -> String {
        let len = digits.len();
        let mut grouped = String::with_capacity(len + len / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        grouped
    }

    /// Format `value` with at most `places` decimals, dropping trailing zeros
    /// and a dangling decimal point.
    pub fn format_decimal(value: f64, places: usize) -> String {
        let formatted = format!("{:.*}", places, value);
        let trimmed = if formatted.contains('.') {
            formatted.trim_end_matches('0').trim_end_matches('.')
        } else {
            formatted.as_str()
        };

        match trimmed {
            "-0" | "" => "0".to_string(),
            other => other.to_string(),
        }
    }

    /// Render a signed delta such as `+5`, `-1.25%` or `+12,000`
    pub fn format_delta(difference: f64, sign: &str, percent: bool) -> String {
        let magnitude = format_numbers(&format_decimal(difference, super::DELTA_DECIMALS));
        let suffix = if percent { "%" } else { "" };
        format!("{sign}{magnitude}{suffix}")
    }
}

/// HTML escaping utilities
pub mod html {
    /// Escape text for inclusion in HTML element content or attribute values
    pub fn escape(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#x27;")
    }
}

pub use number::{format_decimal, format_delta, format_numbers};

/// Render a value cell in the given emphasis.
///
/// Percentages that carry a detail are shown prominently with the detail stacked
/// underneath: the detail's first token (thousands-separated) on one line and the
/// remainder verbatim on the next.
pub fn format_value_cell(cell: &CellValue, emphasis: Emphasis) -> String {
    let class = emphasis.css_class();

    match cell {
        CellValue::Percentage {
            text,
            detail: Some(detail),
            ..
        } => {
            let (first, rest) = match detail.split_once(' ') {
                Some((first, rest)) => (first, rest),
                None => (detail.as_str(), ""),
            };
            let rest_line = if rest.is_empty() {
                String::new()
            } else {
                format!(r#"<span class="detail-line">{}</span>"#, html::escape(rest))
            };

            format!(
                r#"<div class="value-cell {class}"><span class="value-primary">{}</span><span class="value-detail"><span class="detail-line">{}</span>{}</span></div>"#,
                html::escape(text),
                html::escape(&format_numbers(first)),
                rest_line
            )
        }
        CellValue::Missing => {
            format!(r#"<div class="value-cell {class} value-missing">n/a</div>"#)
        }
        other => format!(
            r#"<div class="value-cell {class}">{}</div>"#,
            html::escape(&format_numbers(&other.raw_text()))
        ),
    }
}
