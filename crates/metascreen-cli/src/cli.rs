use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "metascreen", version, about = "Metabolomic screening report engine")]
pub struct Cli {
    #[command(flatten)]
    pub options: EngineOptions,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides applied on top of the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct EngineOptions {
    /// Engine config file (JSON).
    #[arg(long, global = true, env = "METASCREEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Reference table TSV instead of the built-in one.
    #[arg(long, global = true)]
    pub reference: Option<PathBuf>,

    #[arg(long, global = true)]
    pub cardio_model: Option<PathBuf>,

    #[arg(long, global = true)]
    pub oncology_model: Option<PathBuf>,

    /// Risk zone width as a fraction of the reference band, e.g. 0.1.
    #[arg(long, global = true)]
    pub risk_margin: Option<f64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process laboratory files and print one JSON outcome per file.
    Analyze {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },
    /// Print the loaded reference table as TSV.
    Reference,
    /// Print the loaded model summaries as JSON.
    Models,
    /// Print the effective config, or write it to a file.
    Config {
        #[arg(long)]
        write: Option<PathBuf>,
    },
}
