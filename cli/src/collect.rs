use crate::error::{CliError, Result, ResultExt};
use crate::settings;
use crate::ui;
use report_diff::{Collector, ReportClient};
use std::path::Path;
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
pub struct CollectArgs {
    pub config: Option<String>,
    pub output: Option<String>,
    pub verbose: bool,
}

pub fn execute(args: CollectArgs) -> Result<()> {
    let rt = Runtime::new()
        .map_err(|e| CliError::Other(format!("Failed to create async runtime: {}", e)))?;

    rt.block_on(execute_async(args))
}

async fn execute_async(args: CollectArgs) -> Result<()> {
    let config = settings::load_config(args.config.as_deref())?;
    if config.sources.is_empty() {
        return Err(CliError::Other(
            "No branch sources configured. Add a [sources] table to your configuration file"
                .to_string(),
        ));
    }
    let output = args.output.unwrap_or_else(|| config.data.clone());

    ui::section_header("Collecting Branch Reports");
    if args.verbose {
        for (branch, url) in config.sources.iter() {
            ui::info_message(&format!("{branch}: {url}"));
        }
    }

    let collector = Collector::new(ReportClient::new(config.timeout_seconds)?);
    let pb = ui::spinner(&format!("Fetching {} branch pages", config.sources.len()));
    let collected = collector
        .collect_all(&config.sources, |branch, outcome| {
            pb.suspend(|| match outcome {
                Ok(report) => ui::success_message(&format!(
                    "Collected {branch} ({} tables)",
                    report.tables.len()
                )),
                Err(err) => ui::warning_message(&format!("Skipping {branch}: {err}")),
            });
        })
        .await;
    pb.finish_and_clear();

    let document = collected.with_context(|| "Collection failed")?;
    let json = serde_json::to_string_pretty(&document)?;
    settings::write_output(Path::new(&output), &json)
        .with_context(|| format!("Failed to write {output}"))?;

    ui::success_message(&format!(
        "Collected {} of {} branches into {}",
        document.data.len(),
        config.sources.len(),
        output
    ));
    Ok(())
}
