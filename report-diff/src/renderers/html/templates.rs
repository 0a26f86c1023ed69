//! HTML page template with embedded CSS for self-contained reports

use crate::formatter::html::escape;

/// HTML template generator for comparison reports
pub struct HtmlTemplate {
    include_styles: bool,
}

impl HtmlTemplate {
    /// Create a new HTML template
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    /// Render a complete HTML page around a header and a body fragment
    pub fn render(&self, title: &str, header: &str, body: &str) -> String {
        let styles = if self.include_styles {
            format!("<style>{}</style>", Self::embedded_css())
        } else {
            String::new()
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Model Report - {}</title>
    {}
</head>
<body>
    <div class="container">
        {}
        <main id="report" role="main">
            {}
        </main>
    </div>
</body>
</html>
"#,
            escape(title),
            styles,
            header,
            body
        )
    }

    fn embedded_css() -> &'static str {
        r#"
:root {
    --bg: #0f1115;
    --panel: #171a21;
    --border: #2a2f3a;
    --text: #e6e8ec;
    --muted: #7d8594;
    --positive: #3fb950;
    --negative: #f85149;
    --accent: #58a6ff;
}
* { box-sizing: border-box; }
body {
    margin: 0;
    background: var(--bg);
    color: var(--text);
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    font-size: 14px;
}
.container { max-width: 960px; margin: 0 auto; padding: 24px 16px 48px; }
.report-header { margin-bottom: 24px; }
.report-header h1 { margin: 0 0 8px; font-size: 24px; }
.report-header .versus { color: var(--muted); font-weight: 400; }
.branch-sources { display: flex; gap: 12px; }
.branch-link { color: var(--accent); text-decoration: none; }
.timestamp { color: var(--muted); margin-top: 6px; }
.summary-section, .comparison-table {
    background: var(--panel);
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 16px;
    margin-bottom: 16px;
}
.summary-section h2, .table-title { margin: 0 0 4px; font-size: 16px; }
.table-metric { color: var(--muted); margin-bottom: 8px; }
table.comparison { width: 100%; border-collapse: collapse; }
table.comparison th, table.comparison td {
    padding: 6px 8px;
    border-bottom: 1px solid var(--border);
    text-align: right;
    vertical-align: top;
}
table.comparison th:first-child, table.comparison td:first-child { text-align: left; }
.row-id { font-weight: 600; }
.row-id-qualifier, .row-id-missing { color: var(--muted); font-weight: 400; font-size: 12px; }
.value-highlighted { font-weight: 700; }
.value-dimmed { color: var(--muted); }
.value-missing { font-style: italic; }
.value-primary { display: block; }
.value-detail { display: block; color: var(--muted); font-size: 11px; }
.detail-line { display: block; }
.delta { font-variant-numeric: tabular-nums; }
.delta-positive { color: var(--positive); }
.delta-negative { color: var(--negative); }
.delta-unchanged { color: var(--muted); }
.error-row .no-match { color: var(--negative); font-weight: 700; }
.no-data { color: var(--muted); text-align: center; }
.report-error {
    border: 1px solid var(--negative);
    border-radius: 8px;
    padding: 16px;
    color: var(--negative);
}
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_styles() {
        let page =
            HtmlTemplate::new(true).render("master vs wmi", "<header></header>", "<p>body</p>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Model Report - master vs wmi</title>"));
        assert!(page.contains("<style>"));
        assert!(page.contains("<p>body</p>"));
    }

    #[test]
    fn test_render_without_styles() {
        let page = HtmlTemplate::new(false).render("t", "", "");
        assert!(!page.contains("<style>"));
    }
}
