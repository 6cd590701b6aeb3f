use std::process::ExitCode;

use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

use metascreen_cli::cli::Cli;
use metascreen_cli::commands;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // stdout carries the JSON output, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    commands::run(cli, &mut std::io::stdout().lock())
}
