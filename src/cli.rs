use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,    // --quiet
    pub no_color: bool, // --no-color
    pub dry_run: bool,  // --dry-run
}

#[derive(Debug, Parser)]
#[command(name = "atpp")]
#[command(
    about = "Expand @-directives and prefixed names in C sources before the C preprocessor runs"
)]
#[command(version, long_about = None)]
pub struct Cli {
    /// Input file (default: standard input)
    pub input: Option<PathBuf>,

    /// Output file (default: standard output)
    pub output: Option<PathBuf>,

    /// Use namespace mode instead of project mode
    #[arg(short = 'n', long, conflicts_with = "project_name")]
    pub namespace_mode: bool,

    /// Project name, as if set by a leading "@@project" directive
    #[arg(short, long)]
    pub project_name: Option<String>,

    /// Directory that "@@include" paths are resolved against
    #[arg(short = 'I', long)]
    pub include_root: Option<PathBuf>,

    /// Do not emit the final #undef block (output will be included elsewhere)
    #[arg(long)]
    pub no_finalize: bool,

    /// Configuration file (default: atpp.toml in the working directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the resolved settings as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,

    /// Disable colored error output
    #[arg(long)]
    pub no_color: bool,

    /// Only report errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Process the input but discard the output
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn context(&self) -> AppContext {
        AppContext {
            quiet: self.quiet,
            no_color: self.no_color || std::env::var_os("NO_COLOR").is_some(),
            dry_run: self.dry_run,
        }
    }
}
