//! Cell value parsing
//!
//! Table cells arrive as loosely typed JSON scalars. They are classified once at
//! ingestion into a [`CellValue`] so the renderers only ever match over a closed set
//! of shapes instead of re-sniffing strings.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tokens that mean "no value" rather than zero
const MISSING_TOKENS: [&str; 2] = ["undefined", "null"];

/// A number with one trailing `%`, optionally followed by a parenthesised detail,
/// e.g. `42.0% (1234 miles)`. The number itself is checked by [`parse_value`].
static PERCENTAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([^%()]*?)\s*%\s*(?:\((.*)\))?\s*$")
        .expect("Failed to compile percentage regex")
});

/// Parse a raw cell into a finite number.
///
/// Absent input, empty text and the `undefined`/`null` sentinels yield `None`, as
/// does anything that is not a finite decimal. A percent suffix must be stripped by
/// the caller beforehand.
pub fn parse_value(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim();
    if text.is_empty() || MISSING_TOKENS.contains(&text) {
        return None;
    }

    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// A classified table cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Absent, empty or an explicit missing sentinel
    Missing,
    /// Free-form text that is not numeric
    Plain(String),
    /// A plain decimal number together with its original text
    Number { value: f64, text: String },
    /// A percentage such as `42.0%`, with the optional parenthesised detail
    Percentage {
        value: f64,
        text: String,
        detail: Option<String>,
    },
}

impl CellValue {
    /// Classify raw cell text
    pub fn classify(raw: Option<&str>) -> Self {
        let Some(text) = raw else {
            return Self::Missing;
        };
        let trimmed = text.trim();
        if trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed) {
            return Self::Missing;
        }

        if let Some(caps) = PERCENTAGE_PATTERN.captures(trimmed) {
            let number = caps.get(1).map_or("", |m| m.as_str());
            if let Some(value) = parse_value(Some(number)) {
                let detail = caps
                    .get(2)
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|d| !d.is_empty());
                let text = format!("{number}%");
                return Self::Percentage { value, text, detail };
            }
        }

        match parse_value(Some(trimmed)) {
            Some(value) => Self::Number {
                value,
                text: trimmed.to_string(),
            },
            None => Self::Plain(text.to_string()),
        }
    }

    /// Build a percentage cell from an already-numeric rate and its detail string
    pub fn percentage(value: f64, detail: &str) -> Self {
        let detail = detail.trim();
        Self::Percentage {
            value,
            text: format!("{}%", crate::formatter::format_decimal(value, 2)),
            detail: (!detail.is_empty()).then(|| detail.to_string()),
        }
    }

    /// Numeric value, if the cell parsed as a number or percentage
    pub fn numeric(&self) -> Option<f64> {
        match self {
            Self::Number { value, .. } | Self::Percentage { value, .. } => Some(*value),
            Self::Missing | Self::Plain(_) => None,
        }
    }

    /// Whether the original text carried a `%` sign
    pub fn has_percent(&self) -> bool {
        match self {
            Self::Percentage { .. } => true,
            Self::Plain(text) => text.contains('%'),
            Self::Missing | Self::Number { .. } => false,
        }
    }

    /// The raw text this cell was classified from; empty for missing cells
    pub fn raw_text(&self) -> String {
        match self {
            Self::Missing => String::new(),
            Self::Plain(text) | Self::Number { text, .. } => text.clone(),
            Self::Percentage { text, detail, .. } => match detail {
                Some(detail) => format!("{text} ({detail})"),
                None => text.clone(),
            },
        }
    }

    /// Whether this cell is missing
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}
