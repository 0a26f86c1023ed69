use crate::config::types::ReportConfig;
use crate::config::validator::ConfigValidator;
use crate::error::{ReportDiffError, Result};
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<ReportConfig> {
        let content = std::fs::read_to_string(&path).map_err(|_| ReportDiffError::ConfigNotFound {
            path: path.as_ref().to_path_buf(),
        })?;

        let config: ReportConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load and validate configuration, naming the file in parse errors
    pub fn load_with_validation<P: AsRef<Path>>(path: P) -> Result<ReportConfig> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(ReportDiffError::ConfigNotFound {
                path: path_ref.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path_ref)?;
        let config: ReportConfig = toml::from_str(&content).map_err(|e| {
            ReportDiffError::invalid_config(format!(
                "Failed to parse TOML in {}: {}",
                path_ref.display(),
                e
            ))
        })?;

        ConfigValidator::validate_with_context(&config, path_ref)?;
        Ok(config)
    }

    /// Load the file when it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<ReportConfig> {
        if path.as_ref().exists() {
            Self::load_with_validation(path)
        } else {
            Ok(ReportConfig::default())
        }
    }
}

impl ReportConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate_with_context(self, "configuration")
    }
}
