//! Shared fixtures for report-diff integration tests

#![allow(dead_code)]

use report_diff::Document;
use serde_json::{json, Value};

/// Report with a single latency table
pub fn latency_report(p50: &str) -> Value {
    json!({
        "metadata": {"page_title": "Report", "url": null, "branch_name": null},
        "segments": {"total": 10, "chill_mode": 6, "experimental_mode": 4},
        "sections": {},
        "tables": {
            "latency": {
                "title": "Latency",
                "headers": ["id", "p50"],
                "rows": [{"id": "A", "p50": p50}]
            }
        }
    })
}

/// Wrap branch reports into a document payload
pub fn document_json(master: Value, variant_name: &str, variant: Value) -> Value {
    let mut data = serde_json::Map::new();
    data.insert("master".to_string(), master);
    data.insert(variant_name.to_string(), variant);
    json!({
        "timestamp": "2024-05-01T12:00:00+00:00",
        "data": Value::Object(data)
    })
}

/// Parse a payload into a validated document
pub fn document(payload: &Value) -> Document {
    Document::from_json(&payload.to_string()).expect("fixture document should be valid")
}

/// The bundled sample document
pub fn sample_document_text() -> &'static str {
    include_str!("fixtures/data.json")
}

/// The bundled sample branch page
pub fn sample_branch_page() -> &'static str {
    include_str!("fixtures/analyse_branch.html")
}
