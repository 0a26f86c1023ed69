use crate::error::{ReportDiffError, Result};
use crate::parse::CellValue;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::de::{self, DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;

/// Default name of the reference dataset
pub const DEFAULT_REFERENCE: &str = "master";

static MISSING_CELL: CellValue = CellValue::Missing;

/// A string-keyed map that keeps the order keys appeared in the source document
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> OrderedMap<V> {
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert a value, replacing an existing entry in place
    pub fn insert(&mut self, key: String, value: V) {
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    /// Keep only the entries for which `keep` returns true, preserving order
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &V) -> bool,
    {
        self.entries.retain(|(key, value)| keep(key.as_str(), value));
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, (key, _))| (key.clone(), position))
            .collect();
    }

    /// Keys in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Mutable entries in document order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut V)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut map = OrderedMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Deserialize a value where `null` means "use the default"
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a count that may arrive as a float, `null` or a negative number
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .filter(|count| count.is_finite() && *count >= 0.0)
        .map_or(0, |count| count.round() as u64))
}

/// Deserialize an ISO-8601 timestamp; one without an offset is taken as UTC
fn lenient_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_timestamp(&text).ok_or_else(|| de::Error::custom(format!("invalid timestamp '{text}'")))
}

/// Parse an RFC 3339 timestamp, or a naive `YYYY-MM-DDTHH:MM:SS[.fff]` one as UTC
pub fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp);
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

/// The fetched payload: one report per branch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// When the data was collected
    #[serde(deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<FixedOffset>,
    /// Branch name to report, in document order
    pub data: OrderedMap<Report>,
}

/// The pair of reports a rendered comparison is built from
#[derive(Debug, Clone, Copy)]
pub struct Comparison<'a> {
    pub reference_name: &'a str,
    pub reference: &'a Report,
    pub comparison_name: &'a str,
    pub comparison: &'a Report,
}

impl Document {
    /// Parse a document from JSON text.
    ///
    /// A document without datasets is rejected. Tables the renderers cannot
    /// address are dropped, so that side reads as "table missing".
    pub fn from_json(text: &str) -> Result<Self> {
        let mut document: Document = serde_json::from_str(text)?;
        if document.data.is_empty() {
            return Err(ReportDiffError::invalid_document("the document holds no datasets"));
        }
        document.drop_invalid_tables();
        Ok(document)
    }

    /// Remove tables with empty or duplicate headers.
    ///
    /// Returns one description per dropped table.
    pub fn drop_invalid_tables(&mut self) -> Vec<String> {
        let mut dropped = Vec::new();
        for (branch, report) in self.data.iter_mut() {
            report.tables.retain(|key, table| match table.validate() {
                Ok(()) => true,
                Err(message) => {
                    dropped.push(format!("table '{key}' of dataset '{branch}': {message}"));
                    false
                }
            });
        }
        dropped
    }

    /// Select the reference dataset and its comparison.
    ///
    /// Without an explicit comparison name the first dataset other than the
    /// reference is used.
    pub fn select<'a>(
        &'a self,
        reference: &'a str,
        comparison: Option<&'a str>,
    ) -> Result<Comparison<'a>> {
        let reference_report = self
            .data
            .get(reference)
            .ok_or_else(|| self.missing_dataset(reference))?;

        let comparison_name = match comparison {
            Some(name) => name,
            None => self
                .data
                .keys()
                .find(|key| *key != reference)
                .ok_or_else(|| self.missing_dataset("<comparison>"))?,
        };
        let comparison_report = self
            .data
            .get(comparison_name)
            .ok_or_else(|| self.missing_dataset(comparison_name))?;

        Ok(Comparison {
            reference_name: reference,
            reference: reference_report,
            comparison_name,
            comparison: comparison_report,
        })
    }

    fn missing_dataset(&self, name: &str) -> ReportDiffError {
        ReportDiffError::MissingDataset {
            name: name.to_string(),
            available: self.data.keys().collect::<Vec<_>>().join(", "),
        }
    }
}

/// One branch's full analysis result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: Metadata,
    #[serde(deserialize_with = "null_as_default")]
    pub segments: Segments,
    #[serde(deserialize_with = "null_as_default")]
    pub sections: Sections,
    pub tables: OrderedMap<Table>,
}

/// Where a report came from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub page_title: Option<String>,
    pub url: Option<String>,
    pub branch_name: Option<String>,
}

/// Segment counts per driving mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Segments {
    #[serde(deserialize_with = "lenient_count")]
    pub total: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub chill_mode: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub experimental_mode: u64,
}

/// The schema-known sections of a report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Sections {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_time: Option<EngagementSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_distance: Option<EngagementSection>,
}

/// Engagement rates, overall and per driving mode, each with a detail string
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementSection {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub overall: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub overall_detail: String,
    #[serde(deserialize_with = "null_as_default")]
    pub chill_mode: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub chill_mode_detail: String,
    #[serde(deserialize_with = "null_as_default")]
    pub experimental_mode: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub experimental_mode_detail: String,
}

impl EngagementSection {
    /// Rates as `(label, cell)` pairs in display order
    pub fn rates(&self) -> [(&'static str, CellValue); 3] {
        [
            ("Overall", CellValue::percentage(self.overall, &self.overall_detail)),
            ("Chill mode", CellValue::percentage(self.chill_mode, &self.chill_mode_detail)),
            (
                "Experimental mode",
                CellValue::percentage(self.experimental_mode, &self.experimental_mode_detail),
            ),
        ]
    }
}

/// A generic metrics table discovered at runtime
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// First header is the row identifier column, the rest are metric names
    pub headers: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rows: Vec<Row>,
}

impl Table {
    /// Name of the row identifier column
    pub fn id_column(&self) -> Option<&str> {
        self.headers.first().map(String::as_str)
    }

    /// Every header after the identifier column
    pub fn metric_columns(&self) -> &[String] {
        self.headers.get(1..).unwrap_or(&[])
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.headers.is_empty() {
            return Err("headers must not be empty".to_string());
        }

        let mut seen = HashSet::new();
        for header in &self.headers {
            if !seen.insert(header.as_str()) {
                return Err(format!("duplicate header '{header}'"));
            }
        }
        Ok(())
    }
}

/// One table row: column name to classified cell, in column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    /// Build a row from raw column texts
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<String>)>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(column, raw)| {
                    let cell = CellValue::classify(raw.as_deref());
                    (column, cell)
                })
                .collect(),
        }
    }

    /// The cell under `column`; absent columns read as missing
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map_or(&MISSING_CELL, |(_, cell)| cell)
    }

    /// Raw text under `column`, `None` when missing
    pub fn raw(&self, column: &str) -> Option<String> {
        let cell = self.get(column);
        (!cell.is_missing()).then(|| cell.raw_text())
    }

    /// The row's identifier value
    pub fn identifier(&self, id_column: &str) -> Option<String> {
        self.raw(id_column)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, cell) in &self.cells {
            let raw = (!cell.is_missing()).then(|| cell.raw_text());
            map.serialize_entry(column, &raw)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a row object mapping column names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Row, A::Error> {
                let mut cells = Vec::new();
                while let Some((column, value)) =
                    access.next_entry::<String, serde_json::Value>()?
                {
                    let cell = match value {
                        serde_json::Value::Null => CellValue::Missing,
                        serde_json::Value::String(text) => CellValue::classify(Some(&text)),
                        serde_json::Value::Number(number) => {
                            CellValue::classify(Some(&number.to_string()))
                        }
                        serde_json::Value::Bool(flag) => CellValue::Plain(flag.to_string()),
                        _ => {
                            return Err(de::Error::custom(format!(
                                "column '{column}' holds a nested value, expected a scalar"
                            )))
                        }
                    };
                    cells.push((column, cell));
                }
                Ok(Row { cells })
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "timestamp": "2024-05-01T12:00:00+00:00",
        "data": {
            "master": {
                "metadata": {
                    "page_title": "Report ['master']",
                    "url": null,
                    "branch_name": "master"
                },
                "segments": {"total": 120, "chill_mode": 70},
                "tables": {
                    "zeta": {
                        "title": "Zeta",
                        "headers": ["id", "v"],
                        "rows": [{"id": "a", "v": 1.5}]
                    },
                    "alpha": {"title": "Alpha", "headers": ["id"], "rows": []}
                }
            },
            "wmi": {}
        }
    }"#;

    #[test]
    fn test_document_parsing_defaults() {
        let document = Document::from_json(DOCUMENT).unwrap();
        let master = document.data.get("master").unwrap();

        assert_eq!(master.segments.total, 120);
        assert_eq!(master.segments.experimental_mode, 0);
        assert!(master.sections.engagement_time.is_none());
        assert_eq!(master.metadata.branch_name.as_deref(), Some("master"));

        let wmi = document.data.get("wmi").unwrap();
        assert!(wmi.tables.is_empty());
        assert_eq!(wmi.segments, Segments::default());
    }

    #[test]
    fn test_tables_keep_document_order() {
        let document = Document::from_json(DOCUMENT).unwrap();
        let master = document.data.get("master").unwrap();
        let keys: Vec<&str> = master.tables.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_numeric_json_cells_are_classified() {
        let document = Document::from_json(DOCUMENT).unwrap();
        let table = document.data.get("master").unwrap().tables.get("zeta").unwrap();
        assert_eq!(table.rows[0].get("v").numeric(), Some(1.5));
        assert_eq!(table.rows[0].identifier("id"), Some("a".to_string()));
        assert!(table.rows[0].get("absent").is_missing());
    }

    #[test]
    fn test_select_defaults_to_first_variant() {
        let document = Document::from_json(DOCUMENT).unwrap();
        let comparison = document.select(DEFAULT_REFERENCE, None).unwrap();
        assert_eq!(comparison.reference_name, "master");
        assert_eq!(comparison.comparison_name, "wmi");
    }

    #[test]
    fn test_select_missing_dataset() {
        let document = Document::from_json(DOCUMENT).unwrap();
        let err = document.select("release", None).unwrap_err();
        assert!(err.to_string().contains("release"));
        assert!(err.to_string().contains("master, wmi"));

        assert!(document.select("master", Some("nightly")).is_err());
    }

    fn single_table_document(table: &str) -> String {
        format!(
            r#"{{"timestamp": "2024-05-01T12:00:00Z",
                "data": {{"master": {{"tables": {{
                    "good": {{"headers": ["id", "v"]}},
                    "t": {table}
                }}}}}}}}"#
        )
    }

    #[test]
    fn test_empty_headers_table_is_dropped() {
        let text = single_table_document(r#"{"title": "T", "headers": []}"#);
        let document = Document::from_json(&text).unwrap();
        let tables = &document.data.get("master").unwrap().tables;

        assert!(tables.get("t").is_none());
        assert_eq!(tables.keys().collect::<Vec<_>>(), vec!["good"]);
    }

    #[test]
    fn test_duplicate_headers_table_is_dropped() {
        let mut document: Document =
            serde_json::from_str(&single_table_document(r#"{"headers": ["id", "id"]}"#)).unwrap();

        let dropped = document.drop_invalid_tables();
        assert_eq!(dropped.len(), 1);
        assert!(dropped[0].contains("duplicate header 'id'"));
        assert!(dropped[0].contains("dataset 'master'"));
        assert_eq!(document.data.get("master").unwrap().tables.len(), 1);
    }

    #[test]
    fn test_empty_document_rejected() {
        let text = r#"{"timestamp": "2024-05-01T12:00:00Z", "data": {}}"#;
        let err = Document::from_json(text).unwrap_err();
        assert!(matches!(err, ReportDiffError::InvalidDocument { .. }));
    }

    #[test]
    fn test_nested_cell_rejected() {
        let text = single_table_document(r#"{"headers": ["id"], "rows": [{"id": [1]}]}"#);
        assert!(matches!(Document::from_json(&text).unwrap_err(), ReportDiffError::Json(_)));
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let text = r#"{"timestamp": "2024-05-01T12:00:00.250", "data": {"master": {}}}"#;
        let document = Document::from_json(text).unwrap();
        assert_eq!(document.timestamp.offset().local_minus_utc(), 0);
        assert_eq!(document.timestamp.to_rfc3339(), "2024-05-01T12:00:00.250+00:00");

        assert!(parse_timestamp("2024-05-01 08:30:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_float_and_negative_counts() {
        let text = r#"{"timestamp": "2024-05-01T12:00:00Z",
            "data": {"master": {"segments": {
                "total": 120.0, "chill_mode": null, "experimental_mode": -4
            }}}}"#;
        let document = Document::from_json(text).unwrap();
        let segments = document.data.get("master").unwrap().segments;

        assert_eq!(segments.total, 120);
        assert_eq!(segments.chill_mode, 0);
        assert_eq!(segments.experimental_mode, 0);
    }

    #[test]
    fn test_ordered_map_retain_keeps_lookup() {
        let mut map: OrderedMap<u32> =
            [("a", 1), ("b", 2), ("c", 3)].into_iter().map(|(k, v)| (k.to_string(), v)).collect();

        map.retain(|key, _| key != "a");
        map.insert("b".to_string(), 20);

        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(map.get("b"), Some(&20));
        assert_eq!(map.get("c"), Some(&3));
        assert_eq!(map.get("a"), None);
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let document = Document::from_json(DOCUMENT).unwrap();
        let json = serde_json::to_string(&document).unwrap();
        assert!(json.find("\"zeta\"").unwrap() < json.find("\"alpha\"").unwrap());

        let reparsed = Document::from_json(&json).unwrap();
        assert_eq!(reparsed.data.len(), 2);
    }
}
