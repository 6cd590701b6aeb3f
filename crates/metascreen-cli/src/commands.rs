use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use eyre::{Result, WrapErr};
use serde::Serialize;
use tracing::info;

use metascreen_core::models::result::EngineResult;
use metascreen_engine::{Engine, EngineConfig, EngineError, Upload};

use crate::cli::{Cli, Command, EngineOptions};

/// Per-file line of `analyze` output.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FileOutcome {
    Processed { file: String, result: Box<EngineResult> },
    Failed { file: String, error: FailureBody },
}

#[derive(Debug, Serialize)]
pub struct FailureBody {
    pub kind: String,
    pub message: String,
}

impl FileOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }

    fn failed(file: String, kind: &str, message: String) -> Self {
        FileOutcome::Failed {
            file,
            error: FailureBody {
                kind: kind.to_string(),
                message,
            },
        }
    }
}

pub fn run(cli: Cli, out: &mut impl Write) -> Result<ExitCode> {
    let config = resolve_config(&cli.options)?;

    if let Command::Config { write } = &cli.command {
        return print_config(&config, write.as_deref(), out);
    }

    let engine = Engine::from_config(&config).wrap_err("engine startup failed")?;
    match cli.command {
        Command::Analyze { files, pretty } => analyze(&engine, &files, pretty, out),
        Command::Reference => {
            out.write_all(engine.reference().to_tsv()?.as_bytes())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Models => {
            serde_json::to_writer_pretty(&mut *out, &engine.model_summaries())?;
            writeln!(out)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Config { .. } => Ok(ExitCode::SUCCESS),
    }
}

/// Built-in defaults, then the config file, then command-line overrides.
pub fn resolve_config(options: &EngineOptions) -> Result<EngineConfig> {
    let mut config = match &options.config {
        Some(path) => EngineConfig::load(path)
            .wrap_err_with(|| format!("cannot use config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(path) = &options.reference {
        config.reference_path = Some(path.clone());
    }
    if let Some(path) = &options.cardio_model {
        config.cardio_model_path = Some(path.clone());
    }
    if let Some(path) = &options.oncology_model {
        config.oncology_model_path = Some(path.clone());
    }
    if let Some(margin) = options.risk_margin {
        config.risk_margin = margin;
    }
    config.risk_margin()?;
    Ok(config)
}

pub fn analyze(
    engine: &Engine,
    files: &[PathBuf],
    pretty: bool,
    out: &mut impl Write,
) -> Result<ExitCode> {
    // Err slots are files that could not be read; Ok slots line up with
    // `uploads` in order.
    let mut uploads = Vec::with_capacity(files.len());
    let mut slots: Vec<Result<(), (String, String)>> = Vec::with_capacity(files.len());
    for path in files {
        let name = path.display().to_string();
        match std::fs::read(path) {
            Ok(bytes) => {
                uploads.push(Upload::new(name, bytes));
                slots.push(Ok(()));
            }
            Err(e) => slots.push(Err((name, e.to_string()))),
        }
    }

    let batch = engine.process_batch(&uploads);
    let mut processed = uploads.into_iter().zip(batch);
    let outcomes: Vec<FileOutcome> = slots
        .into_iter()
        .filter_map(|slot| match slot {
            Ok(()) => processed
                .next()
                .map(|(upload, outcome)| outcome_for(upload.name, outcome)),
            Err((file, message)) => Some(FileOutcome::failed(file, "io", message)),
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.is_failure()).count();
    info!(files = outcomes.len(), failed, "analysis finished");

    if pretty {
        serde_json::to_writer_pretty(&mut *out, &outcomes)?;
    } else {
        serde_json::to_writer(&mut *out, &outcomes)?;
    }
    writeln!(out)?;

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn outcome_for(file: String, outcome: Result<EngineResult, EngineError>) -> FileOutcome {
    match outcome {
        Ok(result) => FileOutcome::Processed {
            file,
            result: Box::new(result),
        },
        Err(e) => FileOutcome::failed(file, e.kind(), e.to_string()),
    }
}

fn print_config(
    config: &EngineConfig,
    write: Option<&Path>,
    out: &mut impl Write,
) -> Result<ExitCode> {
    if let Some(path) = write {
        config.save(path)?;
    }
    serde_json::to_writer_pretty(&mut *out, config)?;
    writeln!(out)?;
    Ok(ExitCode::SUCCESS)
}
