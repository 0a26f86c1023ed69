mod cli;
mod collect;
mod error;
mod init;
mod render;
mod settings;
mod ui;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            config,
            data,
            output,
            comparison,
            verbose,
        } => render::execute(render::RenderArgs {
            config,
            data,
            output,
            comparison,
            verbose,
        }),
        Commands::Collect {
            config,
            output,
            verbose,
        } => collect::execute(collect::CollectArgs {
            config,
            output,
            verbose,
        }),
        Commands::Init { config, force } => init::execute(config, force),
    };

    if let Err(err) = result {
        eprintln!("{} {}", "Error:".bold().red(), err.user_message());
        process::exit(1);
    }
}
