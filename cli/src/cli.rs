use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "model-report")]
#[command(
    author,
    version,
    about = "Compare branch model reports against master and publish them as HTML"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the comparison page from a collected report document
    Render {
        /// Configuration file path (defaults to model-report.toml when present)
        #[clap(short, long)]
        config: Option<String>,

        /// Report document to read: a file path or an http(s) URL
        #[clap(short, long)]
        data: Option<String>,

        /// Where to write the rendered HTML page
        #[clap(short, long)]
        output: Option<String>,

        /// Dataset to compare against the reference (defaults to the first other dataset)
        #[clap(long)]
        comparison: Option<String>,

        /// Enable verbose output with additional information
        #[clap(short, long, default_value_t = false)]
        verbose: bool,
    },

    /// Scrape every configured branch page into a report document
    Collect {
        /// Configuration file path (defaults to model-report.toml when present)
        #[clap(short, long)]
        config: Option<String>,

        /// Where to write the collected document (defaults to the configured data path)
        #[clap(short, long)]
        output: Option<String>,

        /// Enable verbose output with additional information
        #[clap(short, long, default_value_t = false)]
        verbose: bool,
    },

    /// Write a default configuration file
    Init {
        /// Configuration file path (defaults to model-report.toml)
        #[clap(short, long)]
        config: Option<String>,

        /// Overwrite an existing file without asking
        #[clap(long, default_value_t = false)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_arguments() {
        let cli = Cli::try_parse_from(["model-report", "render"]).unwrap();
        if let Commands::Render { config, data, output, comparison, verbose } = cli.command {
            assert_eq!(config, None);
            assert_eq!(data, None);
            assert_eq!(output, None);
            assert_eq!(comparison, None);
            assert!(!verbose);
        } else {
            panic!("Expected Render command");
        }

        let cli = Cli::try_parse_from([
            "model-report",
            "render",
            "-c",
            "custom.toml",
            "-d",
            "https://example.com/data.json",
            "-o",
            "out/index.html",
            "--comparison",
            "wmi",
            "--verbose",
        ])
        .unwrap();
        if let Commands::Render { config, data, output, comparison, verbose } = cli.command {
            assert_eq!(config.as_deref(), Some("custom.toml"));
            assert_eq!(data.as_deref(), Some("https://example.com/data.json"));
            assert_eq!(output.as_deref(), Some("out/index.html"));
            assert_eq!(comparison.as_deref(), Some("wmi"));
            assert!(verbose);
        } else {
            panic!("Expected Render command");
        }
    }

    #[test]
    fn test_collect_and_init_arguments() {
        let cli = Cli::try_parse_from(["model-report", "collect", "-o", "data.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Collect { output: Some(ref path), verbose: false, .. } if path == "data.json"
        ));

        let cli = Cli::try_parse_from(["model-report", "init", "--force"]).unwrap();
        assert!(matches!(cli.command, Commands::Init { config: None, force: true }));
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["model-report", "deploy"]).is_err());
    }
}
