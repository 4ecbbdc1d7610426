//! `encrypted-storage get` — print a single secret's value.

use crate::cli::output;
use crate::cli::{open_session, validate_key, warn_if_ephemeral, Cli};
use crate::errors::Result;

/// Execute the `get` command.
///
/// A missing key is not an error: nothing goes to stdout and the exit
/// code is 0.
pub fn execute(cli: &Cli, key: &str) -> Result<()> {
    validate_key(key)?;

    let session = open_session(cli, false)?;
    warn_if_ephemeral(&session.settings);

    match session.store.get_item(key)? {
        Some(value) => println!("{value}"),
        None => output::warning(&format!("No value stored for '{key}'")),
    }

    Ok(())
}
