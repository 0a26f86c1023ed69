use crate::config::types::ReportConfig;
use crate::error::{ReportDiffError, Result};
use std::path::Path;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration, naming `config_path` in error messages
    pub fn validate_with_context<P: AsRef<Path>>(
        config: &ReportConfig,
        config_path: P,
    ) -> Result<()> {
        let config_path_str = config_path.as_ref().to_string_lossy();

        if config.reference.trim().is_empty() {
            return Err(ReportDiffError::invalid_config(format!(
                "Empty 'reference' dataset name in {}",
                config_path_str
            )));
        }

        if config.comparison.as_deref() == Some(config.reference.as_str()) {
            return Err(ReportDiffError::invalid_config(format!(
                "'comparison' must differ from 'reference' ('{}') in {}",
                config.reference, config_path_str
            )));
        }

        if config.timeout_seconds == 0 {
            return Err(ReportDiffError::invalid_config(format!(
                "'timeout_seconds' must be greater than zero in {}",
                config_path_str
            )));
        }

        for (branch, source) in config.sources.iter() {
            let is_http = url::Url::parse(source)
                .map(|url| matches!(url.scheme(), "http" | "https"))
                .unwrap_or(false);
            if !is_http {
                return Err(ReportDiffError::invalid_config(format!(
                    "Source for branch '{}' must be an http(s) URL, got '{}' in {}",
                    branch, source, config_path_str
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ReportConfig::default().validate().is_ok());
    }

    #[test]
    fn test_comparison_equal_to_reference() {
        let config = ReportConfig {
            comparison: Some("master".to_string()),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("must differ"));
    }

    #[test]
    fn test_zero_timeout() {
        let config = ReportConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_http_source() {
        let mut config = ReportConfig::default();
        config.sources.insert("master".to_string(), "ftp://example.com/x.html".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("master"));
    }
}
