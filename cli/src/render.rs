use crate::error::{CliError, Result, ResultExt};
use crate::settings;
use crate::ui;
use report_diff::{DocumentSource, ReportClient, render_comparison};
use std::path::Path;
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub config: Option<String>,
    pub data: Option<String>,
    pub output: Option<String>,
    pub comparison: Option<String>,
    pub verbose: bool,
}

pub fn execute(args: RenderArgs) -> Result<()> {
    let rt = Runtime::new()
        .map_err(|e| CliError::Other(format!("Failed to create async runtime: {}", e)))?;

    rt.block_on(execute_async(args))
}

/// Render the configured comparison. The page is always written; when the data
/// could not be loaded it carries the error message and the command fails.
async fn execute_async(args: RenderArgs) -> Result<()> {
    let mut config = settings::load_config(args.config.as_deref())?;
    if let Some(data) = args.data {
        config.data = data;
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if args.comparison.is_some() {
        config.comparison = args.comparison;
    }
    config.validate()?;

    if args.verbose {
        ui::info_message(&format!("Report data: {}", config.data));
        ui::info_message(&format!("Reference dataset: {}", config.reference));
        ui::info_message(&format!(
            "Comparison dataset: {}",
            config
                .comparison
                .as_deref()
                .unwrap_or("first dataset other than the reference")
        ));
    }

    let client = ReportClient::new(config.timeout_seconds)?;
    let source = DocumentSource::parse(&config.data);

    let pb = ui::spinner(&format!("Loading report data from {}", config.data));
    let (page, failure) = render_comparison(
        &client,
        &source,
        &config.reference,
        config.comparison.as_deref(),
    )
    .await;
    pb.finish_and_clear();

    settings::write_output(Path::new(&config.output), &page)
        .with_context(|| format!("Failed to write {}", config.output))?;

    match failure {
        Some(err) => {
            ui::error_message(&format!(
                "Report data unavailable, error page written to {}",
                config.output
            ));
            Err(CliError::from(err).with_context("Failed to render comparison"))
        }
        None => {
            ui::success_message(&format!("Comparison written to {}", config.output));
            Ok(())
        }
    }
}
