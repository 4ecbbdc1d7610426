//! `encrypted-storage remove` — delete a secret if it exists.

use crate::cli::output;
use crate::cli::{open_session, validate_key, warn_if_ephemeral, Cli};
use crate::errors::Result;

/// Execute the `remove` command.
pub fn execute(cli: &Cli, key: &str) -> Result<()> {
    validate_key(key)?;

    let session = open_session(cli, true)?;
    warn_if_ephemeral(&session.settings);

    let result = session.store.remove_item(key);
    session.auditor.record("removeItem", Some(key), &result);
    result?;

    output::success(&format!("Removed '{key}'"));

    Ok(())
}
