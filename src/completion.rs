//! Shell completion generation using clap_complete.

use std::io::Write;

use clap::{Command, CommandFactory};
use clap_complete::{Shell, generate};

use crate::cli::Cli;

pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd: Command = Cli::command();
    generate(shell, &mut cmd, "atpp", out);
}
