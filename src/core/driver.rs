//! Top-level run: resolve settings, open the streams, process one unit.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::{AppContext, Cli};
use crate::core::engine::Preprocessor;
use crate::core::error::PreprocessError;
use crate::core::mode::Mode;
use crate::core::state::UnitState;
use crate::infra::config::Config;
use crate::infra::io::{LineSink, LineSource, ReaderSource, WriterSink, open_input, open_output};

/// Effective options for one run, after merging config file and flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub mode: Mode,
    pub project_name: Option<String>,
    pub include_root: PathBuf,
    pub finalize: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Project,
            project_name: None,
            include_root: PathBuf::from("."),
            finalize: true,
        }
    }
}

impl Settings {
    /// Flags override the config file. Namespace mode together with a
    /// project name is rejected whichever side each came from.
    pub fn resolve(cli: &Cli, config: &Config) -> Result<Self> {
        let namespace_mode = cli.namespace_mode || config.namespace_mode;
        let project_name = cli
            .project_name
            .clone()
            .or_else(|| config.project_name.clone());

        if namespace_mode && project_name.is_some() {
            anyhow::bail!("Option \"--namespace-mode\" is incompatible with \"--project-name\"");
        }

        Ok(Self {
            mode: if namespace_mode {
                Mode::Namespace
            } else {
                Mode::Project
            },
            project_name,
            include_root: cli
                .include_root
                .clone()
                .or_else(|| config.include_root.clone())
                .unwrap_or_else(|| PathBuf::from(".")),
            finalize: !cli.no_finalize && config.finalize.unwrap_or(true),
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize settings")
    }
}

/// Preprocess everything `reader` yields into `writer` and flush.
pub fn process<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    name: &str,
    settings: &Settings,
) -> Result<(), PreprocessError> {
    let mut source = ReaderSource::new(reader, name);
    let mut sink = WriterSink::new(writer);
    run_unit(&mut source, &mut sink, settings)
}

fn run_unit(
    source: &mut ReaderSource<impl BufRead>,
    sink: &mut dyn LineSink,
    settings: &Settings,
) -> Result<(), PreprocessError> {
    let mut unit = UnitState::new(settings.project_name.clone(), settings.include_root.clone());
    Preprocessor::new(settings.mode, source, sink, &mut unit).run(settings.finalize)?;
    sink.flush()?;
    Ok(())
}

/// Convenience wrapper over [`process`] for in-memory input.
pub fn process_str(input: &str, settings: &Settings) -> Result<String, PreprocessError> {
    let mut out = Vec::new();
    process(input.as_bytes(), &mut out, "<input>", settings)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

pub fn run(cli: &Cli, config: &Config, ctx: &AppContext) -> Result<()> {
    let settings = Settings::resolve(cli, config)?;

    if cli.print_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    let mut source = open_input(cli.input.as_deref())?;
    info!(input = source.name(), mode = %settings.mode, "preprocessing");

    if ctx.dry_run {
        let mut sink = WriterSink::new(io::sink());
        run_unit(&mut source, &mut sink, &settings)?;
        if !ctx.quiet {
            eprintln!("{}: ok", source.name());
        }
        return Ok(());
    }

    let mut sink = open_output(cli.output.as_deref())?;
    run_unit(&mut source, &mut sink, &settings)?;
    Ok(())
}
