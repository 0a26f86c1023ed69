use crate::error::Result;
use std::fs;
use std::path::Path;

/// Generate the default model-report.toml template
pub fn generate_default_config_template() -> String {
    r#"# Model report configuration

# Dataset every other dataset is compared against
reference = "master"

# Dataset to compare against the reference (defaults to the first other dataset)
comparison = "wmi"

# Collected document consumed by `render`: a file path or an http(s) URL
data = "public/data.json"

# Rendered comparison page
output = "public/index.html"

# HTTP request timeout in seconds
timeout_seconds = 15

# Branch report pages scraped by `collect`
[sources]
master = "https://commaai.github.io/model_reports/master/analyse_branch.html"
wmi = "https://commaai.github.io/model_reports/a27b3122-733e-4a65-938b-acfebebbe5e8/100/analyse_branch.html"
"#
    .to_string()
}

/// Write the default configuration unless a file already exists.
///
/// Returns whether a file was written. `overwrite` replaces an existing file.
pub fn ensure_config_file_exists<P: AsRef<Path>>(config_path: P, overwrite: bool) -> Result<bool> {
    let path = config_path.as_ref();
    if path.exists() && !overwrite {
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, generate_default_config_template())?;
    Ok(true)
}
