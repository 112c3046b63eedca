use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use atpp::cli::{AppContext, Cli};

fn init_tracing(ctx: &AppContext) {
    let default = if ctx.quiet { "error" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: &Cli, ctx: &AppContext) -> Result<()> {
    if let Some(shell) = cli.completions {
        atpp::completion::write_completions(shell, &mut io::stdout());
        return Ok(());
    }

    let config = atpp::infra::load_config(cli.config.as_deref())?;
    atpp::core::run(cli, &config, ctx)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Build a context once, pass everywhere
    let ctx = cli.context();
    init_tracing(&ctx);

    match run(&cli, &ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if ctx.no_color {
                eprintln!("error: {err:#}");
            } else {
                eprintln!("{} {err:#}", "error:".red().bold());
            }
            ExitCode::FAILURE
        }
    }
}
