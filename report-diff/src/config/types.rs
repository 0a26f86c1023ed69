use crate::types::{OrderedMap, DEFAULT_REFERENCE};
use serde::{Deserialize, Serialize};

/// Configuration file looked up when none is given
pub const DEFAULT_CONFIG_PATH: &str = "model-report.toml";

/// Settings for collecting branch data and rendering the comparison page
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Dataset every other dataset is compared against
    pub reference: String,
    /// Dataset to compare; the first non-reference dataset when unset
    pub comparison: Option<String>,
    /// Collected document: a file path or an http(s) URL
    pub data: String,
    /// Where the rendered page is written
    pub output: String,
    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,
    /// Branch name to `analyse_branch.html` page URL
    pub sources: OrderedMap<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            reference: DEFAULT_REFERENCE.to_string(),
            comparison: None,
            data: "public/data.json".to_string(),
            output: "public/index.html".to_string(),
            timeout_seconds: 15,
            sources: OrderedMap::new(),
        }
    }
}
