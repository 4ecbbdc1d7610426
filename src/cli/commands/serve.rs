//! `encrypted-storage serve` — host bridge over stdin/stdout.
//!
//! Reads one JSON request per line and writes one JSON response per line,
//! so a scripting host can drive the store as a child process. Nothing
//! but responses is written to stdout.

use std::io;

use crate::bridge::Bridge;
use crate::cli::{open_session, Cli};
use crate::errors::Result;

/// Execute the `serve` command; returns at EOF on stdin.
pub fn execute(cli: &Cli) -> Result<()> {
    let session = open_session(cli, true)?;
    let bridge = Bridge::new(session.store, session.auditor);

    let stdin = io::stdin();
    let stdout = io::stdout();
    bridge.serve(stdin.lock(), stdout.lock())?;

    Ok(())
}
