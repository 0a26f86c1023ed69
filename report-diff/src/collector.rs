//! Branch report collection
//!
//! Each branch publishes an `analyse_branch.html` page. The collector pulls the
//! headline numbers and every HTML table out of those pages and assembles them
//! into the [`Document`] the renderers consume.

use crate::client::ReportClient;
use crate::error::{ReportDiffError, Result};
use crate::types::{
    Document, EngagementSection, Metadata, OrderedMap, Report, Row, Sections, Segments, Table,
};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

/// How far past a section heading its rates are searched for, in characters
const SECTION_WINDOW: usize = 500;

static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("Failed to compile tag regex"));
static H1_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1>").expect("Failed to compile h1 regex"));
static H2_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h2\b[^>]*>(.*?)</h2>").expect("Failed to compile h2 regex"));
static TABLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<table\b[^>]*>(.*?)</table>").expect("Failed to compile table regex")
});
static ROW_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>").expect("Failed to compile row regex"));
static CELL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(th|td)\b[^>]*>(.*?)</(?:th|td)>").expect("Failed to compile cell regex")
});
static NUMERIC_ENTITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&#(?:[xX]([0-9a-fA-F]{1,6})|([0-9]{1,7}));")
        .expect("Failed to compile entity regex")
});
static BRANCH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\['([^']+)'").expect("Failed to compile branch regex"));
static KEY_SEPARATOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("Failed to compile key regex"));
static TOTAL_SEGMENTS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Total segments:\s*(\d+)").expect("Failed to compile segments regex"));
static CHILL_SEGMENTS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Chill mode segments:\s*(\d+)").expect("Failed to compile segments regex")
});
static EXPERIMENTAL_SEGMENTS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Experimental mode segments:\s*(\d+)").expect("Failed to compile segments regex")
});
static OVERALL_RATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Overall engagement rate:\s*([\d\.]+)%\s*\(([^\)]+)\)")
        .expect("Failed to compile rate regex")
});
static CHILL_RATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Chill mode:\s*([\d\.]+)%\s*\(([^\)]+)\)").expect("Failed to compile rate regex")
});
static EXPERIMENTAL_RATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Experimental mode:\s*([\d\.]+)%\s*\(([^\)]+)\)")
        .expect("Failed to compile rate regex")
});

/// Collects branch pages into a report document
pub struct Collector {
    client: ReportClient,
}

impl Collector {
    pub fn new(client: ReportClient) -> Self {
        Self { client }
    }

    /// Fetch and extract a single branch page
    pub async fn collect_branch(&self, url: &str) -> Result<Report> {
        let html = self.client.fetch_text(url).await?;
        Ok(parse_branch_page(&html, url))
    }

    /// Collect every source in order.
    ///
    /// `on_branch` is told the outcome of each branch. Failed branches are left out
    /// of the document; it is an error only when none succeed.
    pub async fn collect_all<F>(
        &self,
        sources: &OrderedMap<String>,
        mut on_branch: F,
    ) -> Result<Document>
    where
        F: FnMut(&str, &Result<Report>),
    {
        let mut data = OrderedMap::new();

        for (branch, url) in sources.iter() {
            let outcome = self.collect_branch(url).await;
            on_branch(branch, &outcome);
            if let Ok(report) = outcome {
                data.insert(branch.to_string(), report);
            }
        }

        if data.is_empty() {
            return Err(ReportDiffError::NothingCollected);
        }

        Ok(Document {
            timestamp: Utc::now().fixed_offset(),
            data,
        })
    }
}

/// Extract a branch report from an `analyse_branch.html` page
pub fn parse_branch_page(html: &str, url: &str) -> Report {
    let page_title = H1_PATTERN.captures(html).map(|caps| html_to_text(&caps[1]));
    let branch_name = page_title
        .as_deref()
        .and_then(|title| BRANCH_PATTERN.captures(title))
        .map(|caps| caps[1].to_string());

    let body_text = decode_entities(&TAG_PATTERN.replace_all(html, ""));

    Report {
        metadata: Metadata {
            page_title,
            url: Some(url.to_string()),
            branch_name,
        },
        segments: Segments {
            total: extract_count(&TOTAL_SEGMENTS_PATTERN, &body_text),
            chill_mode: extract_count(&CHILL_SEGMENTS_PATTERN, &body_text),
            experimental_mode: extract_count(&EXPERIMENTAL_SEGMENTS_PATTERN, &body_text),
        },
        sections: Sections {
            engagement_time: extract_engagement_section("time", &body_text),
            engagement_distance: extract_engagement_section("distance", &body_text),
        },
        tables: extract_tables(html),
    }
}

fn extract_count(pattern: &Regex, text: &str) -> u64 {
    pattern
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

/// The section exists only when its overall rate can be found
fn extract_engagement_section(name: &str, text: &str) -> Option<EngagementSection> {
    let title = format!("Engagement Rate Analysis ({name})");
    let start = text.find(&title)?;
    let window = &text[start..];
    let window = match window.char_indices().nth(SECTION_WINDOW) {
        Some((end, _)) => &window[..end],
        None => window,
    };

    let (overall, overall_detail) = extract_rate(&OVERALL_RATE_PATTERN, window)?;
    let (chill_mode, chill_mode_detail) =
        extract_rate(&CHILL_RATE_PATTERN, window).unwrap_or_default();
    let (experimental_mode, experimental_mode_detail) =
        extract_rate(&EXPERIMENTAL_RATE_PATTERN, window).unwrap_or_default();

    Some(EngagementSection {
        title,
        overall,
        overall_detail,
        chill_mode,
        chill_mode_detail,
        experimental_mode,
        experimental_mode_detail,
    })
}

fn extract_rate(pattern: &Regex, text: &str) -> Option<(f64, String)> {
    let caps = pattern.captures(text)?;
    let rate = caps[1].parse().ok()?;
    Some((rate, caps[2].to_string()))
}

fn extract_tables(html: &str) -> OrderedMap<Table> {
    let headings: Vec<(usize, String)> = H2_PATTERN
        .captures_iter(html)
        .filter_map(|caps| caps.get(0).map(|m| (m.end(), html_to_text(&caps[1]))))
        .collect();

    let mut tables = OrderedMap::new();
    for (index, caps) in TABLE_PATTERN.captures_iter(html).enumerate() {
        let Some(whole) = caps.get(0) else { continue };

        let title = headings
            .iter()
            .take_while(|(end, _)| *end <= whole.start())
            .last()
            .map(|(_, text)| text.clone())
            .unwrap_or_else(|| format!("Table {}", index + 1));

        let Some(table) = extract_table(&caps[1], title) else {
            continue;
        };

        tables.insert(table_key(&table.title, index), table);
    }
    tables
}

fn extract_table(inner: &str, title: String) -> Option<Table> {
    let mut rows = ROW_PATTERN.captures_iter(inner);
    let header_row = rows.next()?;

    let headers = unique_headers(
        CELL_PATTERN
            .captures_iter(&header_row[1])
            .map(|cell| html_to_text(&cell[2]))
            .collect(),
    );
    if headers.is_empty() {
        return None;
    }

    let rows = rows
        .filter_map(|row| {
            let cells: Vec<String> = CELL_PATTERN
                .captures_iter(&row[1])
                .filter(|cell| cell[1].eq_ignore_ascii_case("td"))
                .map(|cell| html_to_text(&cell[2]))
                .collect();
            if cells.is_empty() {
                return None;
            }
            Some(Row::from_pairs(
                headers.iter().cloned().zip(cells.into_iter().map(Some)),
            ))
        })
        .collect();

    Some(Table { title, headers, rows })
}

/// Suffix repeated header names so every column stays addressable
fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .map(|header| {
            let count = seen.entry(header.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                header
            } else {
                format!("{header}_{count}")
            }
        })
        .collect()
}

/// Lower-case the title and collapse non-alphanumeric runs into `_`
fn table_key(title: &str, index: usize) -> String {
    let lowered = title.to_lowercase();
    let key = KEY_SEPARATOR_PATTERN.replace_all(&lowered, "_");
    let key = key.trim_matches('_');
    if key.is_empty() {
        format!("table_{index}")
    } else {
        key.to_string()
    }
}

fn html_to_text(fragment: &str) -> String {
    clean_text(&decode_entities(&TAG_PATTERN.replace_all(fragment, "")))
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode the common named entities and every numeric character reference.
///
/// `&amp;` is decoded last so `&amp;lt;` stays the literal text `&lt;`.
fn decode_entities(text: &str) -> String {
    let named = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'");

    NUMERIC_ENTITY_PATTERN
        .replace_all(&named, |caps: &Captures| {
            let code = match (caps.get(1), caps.get(2)) {
                (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
                (None, Some(decimal)) => decimal.as_str().parse().ok(),
                (None, None) => None,
            };
            match code.and_then(char::from_u32) {
                Some('\u{a0}') => " ".to_string(),
                Some(ch) => ch.to_string(),
                None => caps[0].to_string(),
            }
        })
        .replace("&amp;", "&")
}
