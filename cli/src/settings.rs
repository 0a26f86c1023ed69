use crate::error::Result;
use report_diff::config::{ConfigLoader, DEFAULT_CONFIG_PATH, ReportConfig};
use std::fs;
use std::path::Path;

/// Load the configuration. An explicit path must exist; the default file is optional.
pub fn load_config(path: Option<&str>) -> Result<ReportConfig> {
    let config = match path {
        Some(path) => ConfigLoader::load_with_validation(path)?,
        None => ConfigLoader::load_or_default(DEFAULT_CONFIG_PATH)?,
    };
    Ok(config)
}

/// Write a generated file, creating its parent directory
pub fn write_output(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use report_diff::ReportDiffError;
    use tempfile::tempdir;

    #[test]
    fn test_explicit_config_must_exist() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing.toml");

        let err = load_config(Some(&missing.to_string_lossy())).unwrap_err();
        assert!(matches!(err, CliError::Report(ReportDiffError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_write_output_creates_directories() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("public").join("index.html");

        write_output(&path, "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");
    }
}
