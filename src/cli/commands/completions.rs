//! `encrypted-storage completions <shell>` — print a completion script.

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;

/// Write the completion script for `shell` to stdout.
pub fn execute(shell: Shell) {
    generate(shell, &mut Cli::command(), "encrypted-storage", &mut io::stdout());
}
