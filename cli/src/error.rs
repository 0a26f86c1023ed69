use report_diff::ReportDiffError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report error: {0}")]
    Report(#[from] ReportDiffError),

    #[error("Failed to serialize JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Dialoguer error: {0}")]
    DialoguerError(#[from] dialoguer::Error),

    #[error("{0}")]
    Other(String),

    #[error("{0}: {1}")]
    WithContext(String, Box<CliError>),
}

impl CliError {
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Io(err) => format!("I/O operation failed: {err}"),
            Self::Report(ReportDiffError::ConfigNotFound { path }) => format!(
                "Configuration file not found at {}. Run `model-report init` to create one",
                path.display()
            ),
            Self::Report(err) => err.to_string(),
            Self::JsonError(err) => format!("Failed to serialize JSON: {err}"),
            Self::DialoguerError(err) => format!("UI interaction error: {err}"),
            Self::Other(msg) => msg.clone(),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

pub trait ResultExt<T, E> {
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: Into<CliError>,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| {
            let cli_err: CliError = err.into();
            cli_err.with_context(context())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_context_chains_user_messages() {
        let err = CliError::Other("disk full".to_string())
            .with_context("Failed to write page")
            .with_context("Render failed");
        assert_eq!(err.user_message(), "Render failed: Failed to write page: disk full");
    }

    #[test]
    fn test_missing_config_suggests_init() {
        let err: CliError = ReportDiffError::ConfigNotFound {
            path: PathBuf::from("model-report.toml"),
        }
        .into();
        assert!(err.user_message().contains("model-report init"));
    }

    #[test]
    fn test_result_ext() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = result.with_context(|| "Reading data").unwrap_err();
        assert!(err.user_message().starts_with("Reading data: I/O operation failed"));
    }
}
